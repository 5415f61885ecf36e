//! Command implementations for the parsum CLI
//!
//! Each command lives in its own module. Flags that map onto configuration
//! keys are collected into [`ConfigOverrides`], the highest-priority layer.

use serde::Serialize;

pub mod config;
pub mod run;
pub mod verify;

/// CLI flags layered over the file and environment configuration
///
/// Only flags the user actually gave are serialized, so unset flags leave the
/// lower layers untouched.
#[derive(Debug, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<bool>,
    #[serde(skip_serializing_if = "TaskOverrides::is_empty")]
    pub tasks: TaskOverrides,
}

#[derive(Debug, Default, Serialize)]
pub struct TaskOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discover: Option<bool>,
}

impl TaskOverrides {
    fn is_empty(&self) -> bool {
        self.count.is_none() && self.discover.is_none()
    }
}

/// `true` flags become overrides, absent flags stay unset
fn flag(value: bool) -> Option<bool> {
    value.then_some(true)
}
