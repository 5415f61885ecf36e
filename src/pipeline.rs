//! End-to-end run over one working directory
//!
//! Ties the pieces together in the order a run needs them: resolve tasks,
//! reduce them on the worker pool, persist the total, then verify the
//! persisted value independently.

use crate::config::ParsumConfig;
use crate::error::{ReduceError, Result};
use crate::input::DirectoryReader;
use crate::output;
use crate::parallel::{Coordinator, RunSummary, TaskProgress};
use crate::tasks::TaskSet;
use crate::verify::{self, VerificationReport};
use std::path::{Path, PathBuf};

/// A configured run over one working directory
pub struct Pipeline {
    directory: PathBuf,
    config: ParsumConfig,
    tasks: TaskSet,
}

impl Pipeline {
    /// Check the directory and resolve its task set
    pub fn new(directory: impl Into<PathBuf>, config: ParsumConfig) -> Result<Self> {
        let directory = directory.into();
        if directory.as_os_str().is_empty() {
            return Err(ReduceError::invalid_config("working directory must not be empty"));
        }
        if !directory.is_dir() {
            return Err(ReduceError::invalid_config(format!(
                "working directory '{}' does not exist or is not a directory",
                directory.display()
            )));
        }
        config.validate()?;

        let tasks = TaskSet::resolve(&directory, &config.tasks)?;
        Ok(Self {
            directory,
            config,
            tasks,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn config(&self) -> &ParsumConfig {
        &self.config
    }

    pub fn tasks(&self) -> &TaskSet {
        &self.tasks
    }

    pub fn output_path(&self) -> PathBuf {
        self.config.output_path(&self.directory)
    }

    /// Reduce every task on `worker_count` threads and write the total
    ///
    /// The output file is only written after every worker succeeded.
    pub fn process(&self, worker_count: usize, progress: Option<&TaskProgress>) -> Result<RunSummary> {
        let mut coordinator = Coordinator::new(DirectoryReader::new(&self.directory));
        if let Some(progress) = progress {
            let progress = progress.clone();
            coordinator = coordinator.with_progress(move |current, total, worker_id| {
                progress.update(current, total, worker_id)
            });
        }

        let summary = coordinator.run(&self.tasks, worker_count)?;
        output::write_total(&self.output_path(), summary.total)?;
        Ok(summary)
    }

    /// Recompute the total sequentially and compare with the output file
    pub fn verify(&self) -> Result<VerificationReport> {
        let reader = DirectoryReader::new(&self.directory);
        verify::verify_output(&reader, &self.tasks, &self.output_path(), self.config.epsilon)
    }
}
