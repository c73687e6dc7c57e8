//! The built-in DC motor study end to end.

use ps_app::*;
use ps_controls::PidGains;
use ps_project::{HorizonDef, RunDef, reference_study};
use ps_results::{PerformanceMetrics, RunKind, RunStore};
use ps_sim::LoopMode;

fn run_all(mode_override: Option<LoopMode>) -> StudyOutcome {
    let options = StudyOptions {
        mode_override,
        parallel: true,
    };
    execute_study(&reference_study(), &options).expect("reference study runs")
}

fn metrics<'a>(outcome: &'a StudyOutcome, run_id: &str) -> &'a PerformanceMetrics {
    find_record(&outcome.records, run_id)
        .expect("run exists")
        .metrics()
}

#[test]
fn manual_tune_meets_reference_figures() {
    let outcome = run_all(None);
    let m = metrics(&outcome, "manual");
    assert!(
        (15.0..=25.0).contains(&m.overshoot_percent),
        "overshoot {}",
        m.overshoot_percent
    );
    assert!((m.overshoot_percent - 18.9).abs() < 0.1);
    assert!(m.steady_state_error.abs() < 0.01);
    let ts = m.settling_time.expect("manual tune settles");
    assert!((ts - 2.07).abs() < 0.02, "settling time {ts}");
}

#[test]
fn ziegler_nichols_settles_faster_than_manual() {
    let outcome = run_all(None);
    let zn = metrics(&outcome, "ziegler_nichols");
    let manual = metrics(&outcome, "manual");
    assert!((zn.overshoot_percent - 18.6).abs() < 0.1);
    assert!(zn.steady_state_error.abs() < 0.01);
    assert!(zn.settling_time.unwrap() < manual.settling_time.unwrap());
}

#[test]
fn uncontrolled_plant_never_settles_on_the_setpoint() {
    let outcome = run_all(None);
    let record = find_record(&outcome.records, "uncontrolled").unwrap();
    assert_eq!(record.summary.kind, RunKind::OpenLoop);
    let m = record.metrics();
    assert_eq!(m.settling_time, None);
    assert_eq!(m.overshoot_percent, 0.0);
    assert!((m.steady_state_error - 0.5).abs() < 0.01);
    assert!((m.final_value - 0.5).abs() < 0.01);
}

#[test]
fn proportional_offset_shrinks_with_gain() {
    let outcome = run_all(None);
    for (run_id, kp) in [("p_only_1", 5.0), ("p_only_2", 10.0), ("p_only_3", 15.0)] {
        let m = metrics(&outcome, run_id);
        let expected = 1.0 / (1.0 + 0.5 * kp);
        assert!(
            (m.steady_state_error - expected).abs() < 1e-4,
            "{run_id}: ess {} expected {expected}",
            m.steady_state_error
        );
    }
}

#[test]
fn integral_action_drives_error_to_zero() {
    for mode in [LoopMode::Continuous, LoopMode::Sampled] {
        let outcome = run_all(Some(mode));
        for run_id in ["pi_2", "pi_3", "pid_1", "pid_2", "pid_3", "ziegler_nichols", "manual"] {
            let m = metrics(&outcome, run_id);
            assert!(
                m.steady_state_error.abs() < 0.01,
                "{mode:?} {run_id}: ess {}",
                m.steady_state_error
            );
            assert!(m.overshoot_percent >= 0.0);
        }
    }
}

#[test]
fn sampled_controller_overshoots_more_without_derivative_kick() {
    let outcome = run_all(Some(LoopMode::Sampled));
    let m = metrics(&outcome, "manual");
    assert!(
        (30.0..=40.0).contains(&m.overshoot_percent),
        "overshoot {}",
        m.overshoot_percent
    );
    assert!(m.settling_time.is_some());
}

#[test]
fn refining_the_grid_converges() {
    for mode in [LoopMode::Continuous, LoopMode::Sampled] {
        let mut results = Vec::new();
        for step_count in [501, 1001, 2001] {
            let mut study = reference_study();
            study.horizon = HorizonDef {
                t_start: 0.0,
                t_end: 5.0,
                step_count,
            };
            let options = StudyOptions {
                mode_override: Some(mode),
                parallel: false,
            };
            let record = execute_run_by_id(&study, "manual", &options).unwrap();
            results.push(*record.metrics());
        }
        for pair in results.windows(2) {
            assert!(
                (pair[0].overshoot_percent - pair[1].overshoot_percent).abs() < 0.5,
                "{mode:?}: {} vs {}",
                pair[0].overshoot_percent,
                pair[1].overshoot_percent
            );
            let (a, b) = (pair[0].settling_time.unwrap(), pair[1].settling_time.unwrap());
            assert!((a - b).abs() < 0.05, "{mode:?}: {a} vs {b}");
        }
    }
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let study = reference_study();
    let parallel = execute_study(&study, &StudyOptions::default()).unwrap();
    let sequential = execute_study(
        &study,
        &StudyOptions {
            mode_override: None,
            parallel: false,
        },
    )
    .unwrap();
    assert_eq!(parallel.records, sequential.records);
    assert!(parallel.failures.is_empty());
}

#[test]
fn diverging_run_does_not_sink_the_study() {
    let mut study = reference_study();
    study.horizon = HorizonDef {
        t_start: 0.0,
        t_end: 60.0,
        step_count: 6001,
    };
    study.runs.push(RunDef::closed(
        "unstable",
        "Unstable",
        PidGains::new(-100.0, 0.0, 0.0),
    ));

    for parallel in [true, false] {
        let options = StudyOptions {
            mode_override: None,
            parallel,
        };
        let outcome = execute_study(&study, &options).unwrap();
        assert_eq!(outcome.records.len(), 15);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].run_id, "unstable");
        assert!(outcome.failures[0].reason.contains("Non-finite"));
        assert!(find_record(&outcome.records, "manual").is_ok());

        let metrics = study_metrics(&outcome);
        assert_eq!(metrics.runs.len(), 15);
        assert_eq!(metrics.failed, outcome.failures);
    }
}

#[test]
fn table_lists_every_run_in_study_order() {
    let outcome = run_all(None);
    let table = metrics_table(&outcome.records).to_string();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 15);
    assert!(lines[0].starts_with("Uncontrolled"));
    assert!(lines[0].contains("Ts=N/A"));
    assert!(lines[2].starts_with("Manual Tune"));
    assert!(lines[2].contains("Kp=10.0 | Ki=40.0 | Kd=1.5 | OS=18.9%"));
}

#[test]
fn export_writes_every_run() {
    let outcome = run_all(None);
    let dir = std::env::temp_dir().join("ps_app_export_reference");
    let _ = std::fs::remove_dir_all(&dir);
    let store = RunStore::new(dir).unwrap();

    let written = export_study(&outcome, &store).unwrap();
    assert_eq!(written.runs.len(), 15);
    assert!(written.failed.is_empty());
    assert_eq!(store.list_runs().unwrap().len(), 15);
    let manual = store.load_series("manual").unwrap();
    assert_eq!(manual.len(), 501);
    let written = store.load_study_metrics().unwrap();
    assert_eq!(written.study, outcome.study_name);
}
