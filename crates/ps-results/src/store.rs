//! Run storage API.
//!
//! Layout under the store root:
//! ```text
//! metrics.json             study-level summary of every run
//! <run_id>/summary.json    RunSummary
//! <run_id>/series.csv      time_s,output,setpoint
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ps_sim::SimulationResult;
use tracing::debug;

use crate::types::{RunRecord, RunSummary, StudyMetrics};
use crate::{ResultsError, ResultsResult};

const SERIES_HEADER: &str = "time_s,output,setpoint";
const SUMMARY_FILE: &str = "summary.json";
const SERIES_FILE: &str = "series.csv";
const METRICS_FILE: &str = "metrics.json";

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join(SUMMARY_FILE).exists()
    }

    pub fn save_run(&self, record: &RunRecord) -> ResultsResult<()> {
        let run_dir = self.run_dir(record.run_id());
        fs::create_dir_all(&run_dir)?;

        let summary_json = serde_json::to_string_pretty(&record.summary)?;
        fs::write(run_dir.join(SUMMARY_FILE), summary_json)?;

        let mut file = fs::File::create(run_dir.join(SERIES_FILE))?;
        write_series_csv(&mut file, &record.result)?;

        debug!(
            run_id = record.run_id(),
            dir = %run_dir.display(),
            "saved run"
        );
        Ok(())
    }

    pub fn load_summary(&self, run_id: &str) -> ResultsResult<RunSummary> {
        let path = self.run_dir(run_id).join(SUMMARY_FILE);
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_series(&self, run_id: &str) -> ResultsResult<SimulationResult> {
        let path = self.run_dir(run_id).join(SERIES_FILE);
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        parse_series_csv(&fs::read_to_string(path)?)
    }

    pub fn load_run(&self, run_id: &str) -> ResultsResult<RunRecord> {
        Ok(RunRecord {
            summary: self.load_summary(run_id)?,
            result: self.load_series(run_id)?,
        })
    }

    /// Summaries of every stored run, ordered by run id.
    pub fn list_runs(&self) -> ResultsResult<Vec<RunSummary>> {
        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if self.has_run(&run_id) {
                    runs.push(self.load_summary(&run_id)?);
                }
            }
        }
        runs.sort_by(|a, b| a.run_id.cmp(&b.run_id));
        Ok(runs)
    }

    pub fn save_study_metrics(&self, metrics: &StudyMetrics) -> ResultsResult<()> {
        let json = serde_json::to_string_pretty(metrics)?;
        fs::write(self.root_dir.join(METRICS_FILE), json)?;
        Ok(())
    }

    pub fn load_study_metrics(&self) -> ResultsResult<StudyMetrics> {
        let content = fs::read_to_string(self.root_dir.join(METRICS_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}

/// Write a step response as `time_s,output,setpoint` CSV.
pub fn write_series_csv<W: Write>(out: &mut W, result: &SimulationResult) -> ResultsResult<()> {
    writeln!(out, "{SERIES_HEADER}")?;
    let sp = result.setpoint();
    for (t, y) in result.samples() {
        writeln!(out, "{t},{y},{sp}")?;
    }
    Ok(())
}

/// Parse CSV written by [`write_series_csv`].
pub fn parse_series_csv(content: &str) -> ResultsResult<SimulationResult> {
    let mut lines = content.lines().enumerate();
    match lines.next() {
        Some((_, header)) if header.trim() == SERIES_HEADER => {}
        _ => {
            return Err(ResultsError::Series {
                line: 1,
                reason: format!("expected header '{SERIES_HEADER}'"),
            });
        }
    }

    let mut time = Vec::new();
    let mut output = Vec::new();
    let mut setpoint = None;
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields = line
            .split(',')
            .map(|f| f.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ResultsError::Series {
                line: line_no,
                reason: e.to_string(),
            })?;
        let [t, y, sp] = fields[..] else {
            return Err(ResultsError::Series {
                line: line_no,
                reason: format!("expected 3 fields, found {}", fields.len()),
            });
        };
        time.push(t);
        output.push(y);
        setpoint.get_or_insert(sp);
    }

    let setpoint = setpoint.ok_or(ResultsError::Series {
        line: 2,
        reason: "no samples".to_string(),
    })?;
    Ok(SimulationResult::new(time, output, setpoint)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_keeps_full_precision() {
        let result = SimulationResult::new(vec![0.0, 0.01, 0.02], vec![0.0, 1.0 / 3.0, 0.7], 1.0)
            .unwrap();
        let mut buf = Vec::new();
        write_series_csv(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("time_s,output,setpoint\n0,0,1\n"));
        assert_eq!(parse_series_csv(&text).unwrap(), result);
    }

    #[test]
    fn csv_errors_name_the_line() {
        let err = parse_series_csv("time_s,output,setpoint\n0,0,1\n0.1,x,1\n").unwrap_err();
        assert!(matches!(err, ResultsError::Series { line: 3, .. }));

        let err = parse_series_csv("t,y\n").unwrap_err();
        assert!(matches!(err, ResultsError::Series { line: 1, .. }));

        let err = parse_series_csv("time_s,output,setpoint\n0,0\n").unwrap_err();
        assert!(matches!(err, ResultsError::Series { line: 2, .. }));

        let err = parse_series_csv("time_s,output,setpoint\n").unwrap_err();
        assert!(matches!(err, ResultsError::Series { .. }));
    }
}
