//! Task identifiers and the input naming convention
//!
//! A task is one input file, named `<prefix><n><extension>` relative to the
//! working directory (`in_1.dat`, `in_2.dat`, ...).

use crate::error::{ReduceError, Result};
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// One unit of work: the name of a file to read and reduce
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileTask {
    name: String,
}

impl FileTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FileTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Naming convention for input files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNaming {
    /// File name prefix before the index
    pub prefix: String,
    /// File name suffix after the index
    pub extension: String,
    /// Number of numbered files when not discovering
    pub count: usize,
    /// List the directory instead of assuming `1..=count`
    pub discover: bool,
}

impl Default for TaskNaming {
    fn default() -> Self {
        Self {
            prefix: "in_".to_string(),
            extension: ".dat".to_string(),
            count: 10,
            discover: false,
        }
    }
}

impl TaskNaming {
    /// File name for the task with 1-based `index`
    pub fn file_name(&self, index: usize) -> String {
        format!("{}{}{}", self.prefix, index, self.extension)
    }

    /// Parse the index back out of a file name following this convention
    pub fn index_of(&self, file_name: &str) -> Option<usize> {
        file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.extension.as_str())?
            .parse()
            .ok()
    }
}

/// Fixed, ordered list of tasks for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSet {
    tasks: Vec<FileTask>,
}

impl TaskSet {
    pub fn new(tasks: Vec<FileTask>) -> Self {
        Self { tasks }
    }

    /// Tasks `1..=naming.count`, whether or not the files exist yet
    pub fn numbered(naming: &TaskNaming) -> Self {
        let tasks = (1..=naming.count)
            .map(|index| FileTask::new(naming.file_name(index)))
            .collect();
        Self { tasks }
    }

    /// Every file in `directory` matching the convention, ordered by index
    pub fn discover(directory: &Path, naming: &TaskNaming) -> Result<Self> {
        let pattern = format!("{}*{}", naming.prefix, naming.extension);
        let matcher = Glob::new(&pattern)
            .map_err(|e| {
                ReduceError::invalid_config(format!("invalid task pattern '{pattern}': {e}"))
            })?
            .compile_matcher();

        let entries =
            std::fs::read_dir(directory).map_err(|e| ReduceError::file_access(directory, e))?;

        let mut indexed = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ReduceError::file_access(directory, e))?;
            if !entry.file_type().is_ok_and(|ft| ft.is_file()) {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !matcher.is_match(&file_name) {
                continue;
            }
            match naming.index_of(&file_name) {
                Some(index) => indexed.push((index, file_name)),
                None => tracing::debug!("Skipping {file_name}: no numeric index"),
            }
        }

        indexed.sort();
        tracing::debug!("Discovered {} task files in {}", indexed.len(), directory.display());

        Ok(Self {
            tasks: indexed.into_iter().map(|(_, name)| FileTask::new(name)).collect(),
        })
    }

    /// Build the task set the way the configuration asks for
    pub fn resolve(directory: &Path, naming: &TaskNaming) -> Result<Self> {
        if naming.discover {
            Self::discover(directory, naming)
        } else {
            Ok(Self::numbered(naming))
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileTask> {
        self.tasks.iter()
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a FileTask;
    type IntoIter = std::slice::Iter<'a, FileTask>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

impl FromIterator<FileTask> for TaskSet {
    fn from_iter<I: IntoIterator<Item = FileTask>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}
