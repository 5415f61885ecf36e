//! Configuration command implementations

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use std::path::Path;

use crate::cli::Output;
use crate::config::{ENV_PREFIX, PROJECT_CONFIG, ParsumConfig};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the merged configuration
    Show {
        /// Output format
        #[arg(long, value_enum, default_value = "toml")]
        format: ConfigFormat,
    },
    /// Validate the merged configuration
    Validate,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
}

pub async fn execute(args: ConfigArgs, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = ParsumConfig::load(config_path, None::<&()>)?;

    match args.command {
        ConfigCommand::Show { format } => {
            let rendered = match format {
                ConfigFormat::Toml => config.to_toml()?,
                ConfigFormat::Json => config.to_json()?,
            };
            output.raw(rendered.trim_end());
        }
        ConfigCommand::Validate => {
            output.success("Configuration is valid");
            output.verbose(&format!(
                "Sources: built-in defaults, {PROJECT_CONFIG}, --config, {ENV_PREFIX}* environment"
            ));
            output.key_value("Workers", &config.worker_count().to_string(), false);
            output.key_value("Output file", &config.output_file, false);
        }
    }

    Ok(())
}
