//! Configuration management for parsum
//!
//! Settings are layered with figment (see [`ParsumConfig::load`]) and
//! deserialized into the typed structure below.

use crate::error::ReduceError;
use crate::parallel::resolve_worker_count;
use crate::tasks::TaskNaming;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod loader;

pub use self::loader::{ENV_PREFIX, PROJECT_CONFIG};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsumConfig {
    /// Worker threads (0 = size from available cores)
    pub workers: usize,

    /// Percentage of CPU cores used when `workers` is 0
    pub thread_percentage: u8,

    /// Tolerance for verification
    pub epsilon: f64,

    /// Output file name, relative to the working directory
    pub output_file: String,

    /// Show a progress bar
    pub progress: bool,

    /// Input naming convention
    pub tasks: TaskNaming,
}

impl Default for ParsumConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            thread_percentage: 75,
            epsilon: crate::verify::DEFAULT_EPSILON,
            output_file: "out.dat".to_string(),
            progress: false,
            tasks: TaskNaming::default(),
        }
    }
}

impl ParsumConfig {
    pub fn validate(&self) -> Result<(), ReduceError> {
        if !(1..=100).contains(&self.thread_percentage) {
            return Err(ReduceError::invalid_config(format!(
                "thread_percentage must be between 1 and 100, got {}",
                self.thread_percentage
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(ReduceError::invalid_config(format!(
                "epsilon must be a positive number, got {}",
                self.epsilon
            )));
        }
        if self.output_file.trim().is_empty() {
            return Err(ReduceError::invalid_config("output_file must not be empty"));
        }
        if self.tasks.extension.is_empty() && self.tasks.prefix.is_empty() {
            return Err(ReduceError::invalid_config(
                "tasks.prefix and tasks.extension cannot both be empty",
            ));
        }
        Ok(())
    }

    /// Number of workers to spawn for this configuration
    pub fn worker_count(&self) -> usize {
        resolve_worker_count(self.workers, self.thread_percentage)
    }

    /// Output file inside `directory`
    pub fn output_path(&self, directory: &Path) -> PathBuf {
        directory.join(&self.output_file)
    }
}
