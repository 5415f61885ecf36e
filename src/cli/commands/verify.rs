use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use super::{ConfigOverrides, TaskOverrides, flag};
use crate::cli::Output;
use crate::config::ParsumConfig;
use crate::pipeline::Pipeline;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Working directory holding the input and output files
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Number of numbered input files (in_1 .. in_N)
    #[arg(long, value_name = "N")]
    pub tasks: Option<usize>,

    /// Check every matching input file found in the directory
    #[arg(long)]
    pub discover: bool,

    /// Output file name inside the working directory
    #[arg(long, value_name = "FILE")]
    pub output: Option<String>,

    /// Verification tolerance
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Print the verification report as JSON
    #[arg(long)]
    pub json: bool,
}

impl VerifyArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            epsilon: self.epsilon,
            output_file: self.output.clone(),
            tasks: TaskOverrides {
                count: self.tasks,
                discover: flag(self.discover),
            },
            ..ConfigOverrides::default()
        }
    }
}

pub async fn execute(args: VerifyArgs, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = ParsumConfig::load(config_path, Some(args.overrides()))?;
    let pipeline = Pipeline::new(&args.directory, config)?;
    let output_path = pipeline.output_path();

    output.verbose(&format!(
        "Verifying {} against {} tasks",
        output_path.display(),
        pipeline.tasks().len()
    ));

    let report = tokio::task::spawn_blocking(move || pipeline.verify())
        .await
        .context("Verification thread did not complete")??;

    if args.json {
        output.raw(&serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output.success(&format!(
        "Verified {} over {} files",
        output_path.display(),
        report.tasks_checked
    ));
    output.key_value("Reported", &report.reported.to_string(), true);
    output.key_value("Expected", &report.expected.to_string(), false);
    Ok(())
}
