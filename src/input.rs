//! Reading and parsing task files
//!
//! A task file holds one integer operation code followed by any number of
//! whitespace-separated floating-point operands.

use crate::error::{ReduceError, Result};
use crate::operation::{self, OperationKind};
use crate::tasks::FileTask;
use std::num::{IntErrorKind, ParseIntError};
use std::path::PathBuf;

/// Content of one task file, ready to reduce
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInput {
    pub operation: OperationKind,
    pub numbers: Vec<f64>,
}

impl ParsedInput {
    pub fn reduce(&self) -> f64 {
        operation::reduce(self.operation, &self.numbers)
    }
}

/// Source of parsed task content
///
/// Both the worker pool and the verifier go through this trait, so tests can
/// substitute an in-memory source.
pub trait TaskReader: Send + Sync {
    fn read(&self, task: &FileTask) -> Result<ParsedInput>;
}

/// Reads tasks as files relative to a working directory
#[derive(Debug, Clone)]
pub struct DirectoryReader {
    directory: PathBuf,
}

impl DirectoryReader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path_of(&self, task: &FileTask) -> PathBuf {
        self.directory.join(task.name())
    }
}

impl TaskReader for DirectoryReader {
    fn read(&self, task: &FileTask) -> Result<ParsedInput> {
        let path = self.path_of(task);
        let content =
            std::fs::read_to_string(&path).map_err(|e| ReduceError::file_access(&path, e))?;
        parse_content(task.name(), &content)
    }
}

/// Parse the text of a task file
pub fn parse_content(task: &str, content: &str) -> Result<ParsedInput> {
    let mut tokens = content.split_whitespace();

    let code_token = tokens
        .next()
        .ok_or_else(|| ReduceError::malformed(task, "file is empty, expected an operation code"))?;
    let code: i64 = code_token.parse().map_err(|e: ParseIntError| match e.kind() {
        // Still an integer, just not one of the known codes
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ReduceError::InvalidOperationCode {
                code: code_token.to_string(),
                task: task.to_string(),
            }
        }
        _ => ReduceError::malformed(task, format!("operation code '{code_token}' is not an integer")),
    })?;
    let operation = operation::resolve(code, task)?;

    let numbers = tokens
        .enumerate()
        .map(|(position, token)| {
            token.parse::<f64>().map_err(|_| {
                ReduceError::malformed(
                    task,
                    format!("operand {} ('{token}') is not a number", position + 1),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ParsedInput { operation, numbers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_content() {
        let parsed = parse_content("in_1.dat", "1 1 2 3").unwrap();
        assert_eq!(parsed.operation, OperationKind::Sum);
        assert_eq!(parsed.numbers, vec![1.0, 2.0, 3.0]);
        assert_eq!(parsed.reduce(), 6.0);
    }

    #[test]
    fn test_parse_mixed_whitespace() {
        let parsed = parse_content("in_1.dat", "3\n1.5\t-2\n\n  0.25 \n").unwrap();
        assert_eq!(parsed.operation, OperationKind::SumOfSquares);
        assert_eq!(parsed.numbers, vec![1.5, -2.0, 0.25]);
    }

    #[test]
    fn test_parse_code_only() {
        let parsed = parse_content("in_1.dat", "2\n").unwrap();
        assert_eq!(parsed.operation, OperationKind::Product);
        assert!(parsed.numbers.is_empty());
        assert_eq!(parsed.reduce(), 1.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_content("in_1.dat", "   "),
            Err(ReduceError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_content("in_1.dat", "one 2 3"),
            Err(ReduceError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_content("in_1.dat", "5 1 2"),
            Err(ReduceError::InvalidOperationCode { code, .. }) if code == "5"
        ));
        for huge in ["99999999999999999999", "-99999999999999999999"] {
            match parse_content("in_2.dat", &format!("{huge} 1 2")) {
                Err(ReduceError::InvalidOperationCode { code, task }) => {
                    assert_eq!(code, huge);
                    assert_eq!(task, "in_2.dat");
                }
                other => panic!("expected InvalidOperationCode, got {other:?}"),
            }
        }

        match parse_content("in_4.dat", "1 2 x 3") {
            Err(ReduceError::MalformedInput { task, reason }) => {
                assert_eq!(task, "in_4.dat");
                assert!(reason.contains("'x'"));
                assert!(reason.contains("operand 2"));
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_reader() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("in_1.dat"), "2 2 2 2").unwrap();

        let reader = DirectoryReader::new(temp_dir.path());
        let parsed = reader.read(&FileTask::new("in_1.dat")).unwrap();
        assert_eq!(parsed.reduce(), 8.0);

        match reader.read(&FileTask::new("in_2.dat")) {
            Err(ReduceError::FileAccess { path, .. }) => {
                assert_eq!(path, temp_dir.path().join("in_2.dat"));
            }
            other => panic!("expected FileAccess, got {other:?}"),
        }
    }
}
