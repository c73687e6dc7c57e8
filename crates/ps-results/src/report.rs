//! Text table comparing runs.

use std::fmt;

use crate::types::RunSummary;

/// One line per run:
/// `Manual Tune | Kp=10.0 | Ki=40.0 | Kd=1.5 | OS=18.9% | Ts=2.070s | Ess=-0.000`
#[derive(Debug, Clone, Default)]
pub struct MetricsTable {
    rows: Vec<RunSummary>,
}

impl MetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, summary: RunSummary) {
        self.rows.push(summary);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<RunSummary> for MetricsTable {
    fn from_iter<I: IntoIterator<Item = RunSummary>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for MetricsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
        for row in &self.rows {
            let gains = row.kind.gains();
            let m = &row.metrics;
            let settling = match m.settling_time {
                Some(ts) => format!("{ts:.3}s"),
                None => "N/A".to_string(),
            };
            writeln!(
                f,
                "{:<width$} | Kp={:.1} | Ki={:.1} | Kd={:.1} | OS={:.1}% | Ts={} | Ess={:.3}",
                row.name,
                gains.kp,
                gains.ki,
                gains.kd,
                m.overshoot_percent,
                settling,
                m.steady_state_error,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PerformanceMetrics;
    use crate::types::RunKind;
    use ps_controls::PidGains;
    use ps_sim::LoopMode;

    fn summary(name: &str, kind: RunKind, settling_time: Option<f64>) -> RunSummary {
        RunSummary {
            run_id: name.to_lowercase(),
            name: name.to_string(),
            kind,
            setpoint: 1.0,
            step_count: 501,
            metrics: PerformanceMetrics {
                overshoot_percent: 18.9085,
                settling_time,
                steady_state_error: 0.5037,
                rise_time: None,
                peak_value: 1.189,
                peak_time: 0.5,
                final_value: 0.4963,
            },
        }
    }

    #[test]
    fn renders_one_aligned_line_per_run() {
        let table: MetricsTable = [
            summary("Uncontrolled", RunKind::OpenLoop, None),
            summary(
                "Manual Tune",
                RunKind::ClosedLoop {
                    gains: PidGains::new(10.0, 40.0, 1.5),
                    mode: LoopMode::Continuous,
                },
                Some(2.07),
            ),
        ]
        .into_iter()
        .collect();

        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Uncontrolled | Kp=0.0 | Ki=0.0 | Kd=0.0 | OS=18.9% | Ts=N/A | Ess=0.504"
        );
        assert_eq!(
            lines[1],
            "Manual Tune  | Kp=10.0 | Ki=40.0 | Kd=1.5 | OS=18.9% | Ts=2.070s | Ess=0.504"
        );
    }

    #[test]
    fn empty_table_renders_nothing() {
        assert!(MetricsTable::new().to_string().is_empty());
    }
}
