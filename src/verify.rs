//! Independent verification of a reported total
//!
//! The verifier recomputes the expected total on the calling thread, one task
//! after another. It never touches the work queue or the accumulator, so a
//! defect in the parallel path cannot also hide in the check.

use crate::error::{ReduceError, Result};
use crate::input::TaskReader;
use crate::output;
use crate::tasks::TaskSet;
use serde::Serialize;
use std::path::Path;

/// Default tolerance between reported and expected totals
pub const DEFAULT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub reported: f64,
    pub expected: f64,
    pub difference: f64,
    pub epsilon: f64,
    pub tasks_checked: usize,
}

/// Sequentially recompute the total of `tasks`
pub fn expected_total<R>(reader: &R, tasks: &TaskSet) -> Result<f64>
where
    R: TaskReader + ?Sized,
{
    let mut expected = 0.0;
    for task in tasks {
        expected += reader.read(task)?.reduce();
    }
    Ok(expected)
}

/// Check `reported` against the sequentially recomputed total
///
/// Fails with `VerificationMismatch` unless `|reported - expected| < epsilon`.
pub fn verify<R>(reader: &R, tasks: &TaskSet, reported: f64, epsilon: f64) -> Result<VerificationReport>
where
    R: TaskReader + ?Sized,
{
    let expected = expected_total(reader, tasks)?;
    let difference = (reported - expected).abs();

    // NaN differences must fail too, hence the negated comparison
    if !(difference < epsilon) {
        tracing::error!(
            "Verification mismatch: reported {} expected {} (difference {})",
            reported,
            expected,
            difference
        );
        return Err(ReduceError::VerificationMismatch {
            reported,
            expected,
            epsilon,
        });
    }

    tracing::info!("Verified total {} over {} tasks", reported, tasks.len());
    Ok(VerificationReport {
        reported,
        expected,
        difference,
        epsilon,
        tasks_checked: tasks.len(),
    })
}

/// Verify the total stored in `output_path`
pub fn verify_output<R>(
    reader: &R,
    tasks: &TaskSet,
    output_path: &Path,
    epsilon: f64,
) -> Result<VerificationReport>
where
    R: TaskReader + ?Sized,
{
    let reported = output::read_total(output_path)?;
    verify(reader, tasks, reported, epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DirectoryReader;
    use crate::tasks::{TaskNaming, TaskSet};
    use std::fs;
    use tempfile::TempDir;

    fn scenario_a() -> (TempDir, TaskSet) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("in_1.dat"), "1 1 2 3").unwrap();
        fs::write(temp_dir.path().join("in_2.dat"), "2 2 2 2").unwrap();
        fs::write(temp_dir.path().join("in_3.dat"), "3 1 2 3").unwrap();
        let naming = TaskNaming {
            count: 3,
            ..TaskNaming::default()
        };
        (temp_dir, TaskSet::numbered(&naming))
    }

    #[test]
    fn test_expected_total() {
        let (temp_dir, tasks) = scenario_a();
        let reader = DirectoryReader::new(temp_dir.path());
        assert_eq!(expected_total(&reader, &tasks).unwrap(), 28.0);
    }

    #[test]
    fn test_verify_within_tolerance() {
        let (temp_dir, tasks) = scenario_a();
        let reader = DirectoryReader::new(temp_dir.path());

        let report = verify(&reader, &tasks, 28.0 + 1e-9, DEFAULT_EPSILON).unwrap();
        assert_eq!(report.expected, 28.0);
        assert_eq!(report.tasks_checked, 3);
        assert!(report.difference < DEFAULT_EPSILON);
    }

    #[test]
    fn test_verify_mismatch() {
        let (temp_dir, tasks) = scenario_a();
        let reader = DirectoryReader::new(temp_dir.path());

        for reported in [29.0, 28.00001, f64::NAN] {
            assert!(matches!(
                verify(&reader, &tasks, reported, DEFAULT_EPSILON),
                Err(ReduceError::VerificationMismatch { .. })
            ));
        }
    }

    #[test]
    fn test_verify_corrupted_output_file() {
        let (temp_dir, tasks) = scenario_a();
        let reader = DirectoryReader::new(temp_dir.path());
        let out = temp_dir.path().join("out.dat");

        output::write_total(&out, 28.0).unwrap();
        verify_output(&reader, &tasks, &out, DEFAULT_EPSILON).unwrap();

        fs::write(&out, "27\n").unwrap();
        match verify_output(&reader, &tasks, &out, DEFAULT_EPSILON) {
            Err(ReduceError::VerificationMismatch { reported, expected, .. }) => {
                assert_eq!(reported, 27.0);
                assert_eq!(expected, 28.0);
            }
            other => panic!("expected VerificationMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_propagates_input_errors() {
        let (temp_dir, _) = scenario_a();
        fs::write(temp_dir.path().join("in_4.dat"), "7 1").unwrap();
        let reader = DirectoryReader::new(temp_dir.path());
        let naming = TaskNaming {
            count: 4,
            ..TaskNaming::default()
        };
        let tasks = TaskSet::numbered(&naming);
        assert!(matches!(
            verify(&reader, &tasks, 28.0, DEFAULT_EPSILON),
            Err(ReduceError::InvalidOperationCode { code, .. }) if code == "7"
        ));
    }
}
