use super::ParsumConfig;
use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::Serialize;
use std::path::Path;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Config file picked up from the current directory
pub const PROJECT_CONFIG: &str = "parsum.toml";

/// Prefix for environment overrides; nested keys use `__` (`PARSUM_TASKS__COUNT`)
pub const ENV_PREFIX: &str = "PARSUM_";

impl ParsumConfig {
    /// Load the layered configuration
    ///
    /// Lowest to highest priority: embedded defaults, `parsum.toml`, the
    /// custom config file, `PARSUM_*` environment variables, CLI overrides.
    pub fn load<T: Serialize>(custom_config: Option<&Path>, cli_overrides: Option<T>) -> Result<Self> {
        let figment = Self::figment(custom_config, cli_overrides)?;
        let config: ParsumConfig = figment
            .extract()
            .context("Failed to parse configuration")?;
        config.validate()?;

        tracing::trace!("CONFIG LOAD: {:?}", config);
        Ok(config)
    }

    /// The merged provider chain, before extraction
    pub fn figment<T: Serialize>(
        custom_config: Option<&Path>,
        cli_overrides: Option<T>,
    ) -> Result<Figment> {
        let mut figment = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .merge(Toml::file(PROJECT_CONFIG));

        if let Some(path) = custom_config {
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(overrides) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(overrides));
        }

        Ok(figment)
    }

    /// Merged configuration as JSON, for display
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Merged configuration as TOML, for display
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
