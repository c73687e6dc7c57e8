use ps_controls::{PidConfig, PidGains};
use ps_model::TransferFunction;
use ps_results::*;
use ps_sim::{ClosedLoopSystem, LoopMode, SimOptions, simulate};

const MANUAL: PidGains = PidGains {
    kp: 10.0,
    ki: 40.0,
    kd: 1.5,
};

fn motor() -> TransferFunction {
    TransferFunction::new(&[5.0], &[1.0, 11.0, 10.0]).unwrap()
}

fn record(run_id: &str, name: &str, gains: Option<PidGains>) -> RunRecord {
    let opts = SimOptions::default();
    let (mut system, kind) = match gains {
        Some(gains) => (
            ClosedLoopSystem::closed(
                &motor(),
                PidConfig::new(gains).unwrap(),
                LoopMode::Continuous,
                1.0,
            )
            .unwrap(),
            RunKind::ClosedLoop {
                gains,
                mode: LoopMode::Continuous,
            },
        ),
        None => (
            ClosedLoopSystem::open_loop(&motor(), 1.0).unwrap(),
            RunKind::OpenLoop,
        ),
    };
    let result = simulate(&mut system, &opts).unwrap();
    let metrics = MetricsExtractor::default().extract(&result);
    RunRecord {
        summary: RunSummary {
            run_id: run_id.to_string(),
            name: name.to_string(),
            kind,
            setpoint: 1.0,
            step_count: opts.step_count,
            metrics,
        },
        result,
    }
}

fn fresh_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn save_and_load_run() {
    let store = RunStore::new(fresh_dir("ps_results_roundtrip")).unwrap();
    let manual = record("manual", "Manual Tune", Some(MANUAL));

    assert!(!store.has_run("manual"));
    store.save_run(&manual).unwrap();
    assert!(store.has_run("manual"));

    let loaded = store.load_run("manual").unwrap();
    assert_eq!(loaded.result, manual.result);
    assert_eq!(loaded.summary.name, "Manual Tune");
    assert_eq!(loaded.summary.kind, manual.summary.kind);
    let (a, b) = (loaded.metrics(), manual.metrics());
    assert!((a.overshoot_percent - b.overshoot_percent).abs() < 1e-9);
    assert_eq!(a.settling_time.is_some(), b.settling_time.is_some());
    assert!(store.root_dir().join("manual").join("series.csv").exists());
}

#[test]
fn list_and_delete_runs() {
    let store = RunStore::new(fresh_dir("ps_results_list")).unwrap();
    store
        .save_run(&record("uncontrolled", "Uncontrolled", None))
        .unwrap();
    store
        .save_run(&record("manual", "Manual Tune", Some(MANUAL)))
        .unwrap();

    let ids: Vec<String> = store
        .list_runs()
        .unwrap()
        .into_iter()
        .map(|s| s.run_id)
        .collect();
    assert_eq!(ids, vec!["manual".to_string(), "uncontrolled".to_string()]);

    store.delete_run("manual").unwrap();
    assert!(!store.has_run("manual"));
    assert!(matches!(
        store.load_summary("manual"),
        Err(ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn study_metrics_roundtrip() {
    let store = RunStore::new(fresh_dir("ps_results_study")).unwrap();
    let open = record("uncontrolled", "Uncontrolled", None);
    assert_eq!(open.metrics().settling_time, None);

    let metrics = StudyMetrics {
        study: "DC motor".to_string(),
        settling_threshold: 0.02,
        runs: vec![open.summary.clone()],
        failed: vec![RunFailure {
            run_id: "unstable".to_string(),
            name: "Unstable".to_string(),
            reason: "Non-finite output at t = 40.97".to_string(),
        }],
    };
    store.save_study_metrics(&metrics).unwrap();
    let loaded = store.load_study_metrics().unwrap();
    assert_eq!(loaded.study, "DC motor");
    assert_eq!(loaded.failed, metrics.failed);
    assert_eq!(loaded.runs.len(), 1);
    assert_eq!(loaded.runs[0].kind, RunKind::OpenLoop);
    assert_eq!(loaded.runs[0].metrics.settling_time, None);

    let json = std::fs::read_to_string(store.root_dir().join("metrics.json")).unwrap();
    assert!(json.contains("\"settling_time\": null"));
    assert!(json.contains("\"type\": \"open_loop\""));
}
