use clap::{Parser, Subcommand, ValueEnum};
use ps_app::{AppError, AppResult, StudyOptions};
use ps_results::RunStore;
use ps_sim::LoopMode;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "ps-cli")]
#[command(about = "pidsim CLI - PID step-response studies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in DC motor study
    Init {
        /// Output study file (YAML)
        #[arg(short, long, default_value = "study.yaml")]
        output: PathBuf,
    },
    /// Validate study file syntax and values
    Validate {
        /// Path to the study file (YAML or JSON)
        study_path: PathBuf,
    },
    /// List the runs of a study, sweeps expanded
    Runs {
        /// Path to the study file (YAML or JSON)
        study_path: PathBuf,
        /// Loop mode forced on every closed-loop run
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },
    /// Simulate every run and print the metrics table
    Run {
        /// Path to the study file (YAML or JSON)
        study_path: PathBuf,
        /// Loop mode forced on every closed-loop run
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Directory to export series and metrics into
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print metrics as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Simulate one run and export its step response as CSV
    ExportSeries {
        /// Path to the study file (YAML or JSON)
        study_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Loop mode forced on the run
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Continuous,
    Sampled,
}

impl From<ModeArg> for LoopMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Continuous => LoopMode::Continuous,
            ModeArg::Sampled => LoopMode::Sampled,
        }
    }
}

fn main() -> AppResult<()> {
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate { study_path } => cmd_validate(&study_path),
        Commands::Runs { study_path, mode } => cmd_runs(&study_path, mode.map(Into::into)),
        Commands::Run {
            study_path,
            mode,
            out,
            json,
        } => cmd_run(&study_path, mode.map(Into::into), out.as_deref(), json),
        Commands::ExportSeries {
            study_path,
            run_id,
            mode,
            output,
        } => cmd_export_series(
            &study_path,
            &run_id,
            mode.map(Into::into),
            output.as_deref(),
        ),
    }
}

fn cmd_init(output: &Path) -> AppResult<()> {
    let study = ps_app::init_reference_study(output)?;
    println!(
        "✓ Wrote study '{}' ({} runs) to {}",
        study.name,
        study.expanded_runs().len(),
        output.display()
    );
    Ok(())
}

fn cmd_validate(study_path: &Path) -> AppResult<()> {
    println!("Validating study: {}", study_path.display());
    let study = ps_app::load_study(study_path)?;
    ps_app::validate_study(&study)?;
    println!("✓ Study is valid");
    Ok(())
}

fn cmd_runs(study_path: &Path, mode: Option<LoopMode>) -> AppResult<()> {
    let study = ps_app::load_study(study_path)?;
    let runs = ps_app::list_runs(&study, mode);

    if runs.is_empty() {
        println!("No runs found in study");
        return Ok(());
    }

    println!("Runs in study '{}':", study.name);
    for run in runs {
        match (run.gains, run.mode) {
            (Some(g), Some(mode)) => println!(
                "  {} - {} (Kp={}, Ki={}, Kd={}, {:?})",
                run.id, run.name, g.kp, g.ki, g.kd, mode
            ),
            _ => println!("  {} - {} (open loop)", run.id, run.name),
        }
    }
    Ok(())
}

fn cmd_run(
    study_path: &Path,
    mode: Option<LoopMode>,
    out: Option<&Path>,
    json: bool,
) -> AppResult<()> {
    debug!(study = %study_path.display(), ?mode, "running study");
    let study = ps_app::load_study(study_path)?;
    let options = StudyOptions {
        mode_override: mode,
        ..StudyOptions::default()
    };
    let outcome = ps_app::execute_study(&study, &options)?;

    if json {
        let metrics = ps_app::study_metrics(&outcome);
        let text = serde_json::to_string_pretty(&metrics)
            .map_err(|e| AppError::Results(e.to_string()))?;
        println!("{text}");
    } else {
        println!("Performance metrics for '{}':", outcome.study_name);
        print!("{}", ps_app::metrics_table(&outcome.records));
        for failure in &outcome.failures {
            println!(
                "✗ {} ({}): {}",
                failure.name, failure.run_id, failure.reason
            );
        }
    }

    if let Some(dir) = out {
        let store = RunStore::new(dir.to_path_buf())?;
        ps_app::export_study(&outcome, &store)?;
        if !json {
            println!(
                "✓ Exported {} runs to {}",
                outcome.records.len(),
                dir.display()
            );
        }
    }
    Ok(())
}

fn cmd_export_series(
    study_path: &Path,
    run_id: &str,
    mode: Option<LoopMode>,
    output: Option<&Path>,
) -> AppResult<()> {
    let study = ps_app::load_study(study_path)?;
    let options = StudyOptions {
        mode_override: mode,
        parallel: false,
    };
    let record = ps_app::execute_run_by_id(&study, run_id, &options)?;

    let mut csv = Vec::new();
    ps_results::write_series_csv(&mut csv, &record.result)?;

    if let Some(path) = output {
        std::fs::write(path, &csv)?;
        println!(
            "✓ Exported {} data points to {}",
            record.result.len(),
            path.display()
        );
    } else {
        print!("{}", String::from_utf8_lossy(&csv));
    }

    Ok(())
}
