//! Operation registry
//!
//! Maps the integer code at the head of each task file to a reduction over
//! its operands. The set of operations is closed, so dispatch is a plain
//! `match` on a `Copy` enum.

use crate::error::{ReduceError, Result};
use serde::Serialize;
use std::fmt;

/// Reduction selected by a task file's leading code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Code 1: Σx
    Sum,
    /// Code 2: Πx
    Product,
    /// Code 3: Σx²
    SumOfSquares,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Sum,
        OperationKind::Product,
        OperationKind::SumOfSquares,
    ];

    /// Code used for this operation in task files
    pub fn code(self) -> i64 {
        match self {
            OperationKind::Sum => 1,
            OperationKind::Product => 2,
            OperationKind::SumOfSquares => 3,
        }
    }

    /// Reduce `numbers` with this operation
    pub fn reduce(self, numbers: &[f64]) -> f64 {
        reduce(self, numbers)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Sum => "sum",
            OperationKind::Product => "product",
            OperationKind::SumOfSquares => "sum of squares",
        };
        f.write_str(name)
    }
}

/// Resolve an operation code read from `task`
///
/// Unknown codes are an input error for the whole run, never a default.
pub fn resolve(code: i64, task: &str) -> Result<OperationKind> {
    OperationKind::ALL
        .into_iter()
        .find(|kind| kind.code() == code)
        .ok_or_else(|| ReduceError::InvalidOperationCode {
            code: code.to_string(),
            task: task.to_string(),
        })
}

/// Apply `kind` to `numbers`. An empty slice yields the operator's identity.
pub fn reduce(kind: OperationKind, numbers: &[f64]) -> f64 {
    match kind {
        OperationKind::Sum => numbers.iter().sum(),
        OperationKind::Product => numbers.iter().product(),
        OperationKind::SumOfSquares => numbers.iter().map(|x| x * x).sum(),
    }
}
