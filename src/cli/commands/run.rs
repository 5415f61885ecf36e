use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{ConfigOverrides, TaskOverrides, flag};
use crate::cli::Output;
use crate::config::ParsumConfig;
use crate::error::ReduceError;
use crate::parallel::{RunSummary, TaskProgress};
use crate::pipeline::Pipeline;
use crate::verify::VerificationReport;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Working directory holding the input files
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Number of worker threads (defaults to the configured count)
    #[arg(value_name = "WORKERS")]
    pub workers: Option<usize>,

    /// Number of numbered input files (in_1 .. in_N)
    #[arg(long, value_name = "N")]
    pub tasks: Option<usize>,

    /// Process every matching input file found in the directory
    #[arg(long)]
    pub discover: bool,

    /// Output file name inside the working directory
    #[arg(long, value_name = "FILE")]
    pub output: Option<String>,

    /// Verification tolerance
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Skip the verification pass
    #[arg(long)]
    pub no_verify: bool,

    /// Show a progress bar while processing
    #[arg(long)]
    pub progress: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            workers: self.workers,
            epsilon: self.epsilon,
            output_file: self.output.clone(),
            progress: flag(self.progress),
            tasks: TaskOverrides {
                count: self.tasks,
                discover: flag(self.discover),
            },
        }
    }
}

#[derive(Serialize)]
struct RunReport<'a> {
    directory: &'a Path,
    output_file: &'a Path,
    summary: &'a RunSummary,
    verification: Option<&'a VerificationReport>,
}

pub async fn execute(args: RunArgs, config_path: Option<&Path>, output: &Output) -> Result<()> {
    if args.workers == Some(0) {
        return Err(ReduceError::invalid_config("worker count must be positive").into());
    }

    let config = ParsumConfig::load(config_path, Some(args.overrides()))?;
    let pipeline = Pipeline::new(&args.directory, config)?;
    let workers = pipeline.config().worker_count();
    let output_path = pipeline.output_path();

    output.verbose(&format!(
        "Processing {} tasks from {} with {} workers",
        pipeline.tasks().len(),
        pipeline.directory().display(),
        workers
    ));

    let progress = (pipeline.config().progress && !output.is_quiet())
        .then(|| TaskProgress::new(pipeline.tasks().len(), workers));
    let verify = !args.no_verify;

    // Worker threads block; keep them off the async runtime
    let (summary, verification) = tokio::task::spawn_blocking(move || {
        let processed = pipeline.process(workers, progress.as_ref());
        if let Some(progress) = &progress {
            progress.finish();
        }
        let summary = processed?;
        let verification = if verify {
            Some(pipeline.verify()?)
        } else {
            None
        };
        Ok::<_, ReduceError>((summary, verification))
    })
    .await
    .context("Processing thread did not complete")??;

    if args.json {
        let report = RunReport {
            directory: &args.directory,
            output_file: &output_path,
            summary: &summary,
            verification: verification.as_ref(),
        };
        output.raw(&serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output.success(&format!(
        "Processed {} files with {} workers in {}ms",
        summary.tasks_processed, summary.workers, summary.duration_ms
    ));
    output.key_value("Total", &summary.total.to_string(), true);
    output.key_value("Output", &output_path.display().to_string(), false);
    if output.is_verbose() {
        for (worker_id, count) in summary.per_worker.iter().enumerate() {
            output.key_value(&format!("worker-{worker_id}"), &format!("{count} files"), false);
        }
    }

    match verification {
        Some(report) => output.success(&format!(
            "Verified: expected {} (difference {:e})",
            report.expected, report.difference
        )),
        None => output.warning("Verification skipped"),
    }

    Ok(())
}
