//! Persisting the final total
//!
//! The output file holds a single number and a newline. Floats are written
//! with Rust's shortest round-trip formatting, so reading the file back gives
//! exactly the value that was written.

use crate::error::{ReduceError, Result};
use std::path::Path;

/// Write `total` to `path`
///
/// The value goes to a sibling temporary file first and is renamed into place,
/// so `path` never holds a partially written number.
pub fn write_total(path: &Path, total: f64) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ReduceError::invalid_config(format!("'{}' is not a file path", path.display())))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    std::fs::write(&temp_path, format!("{total}\n"))
        .map_err(|e| ReduceError::file_access(&temp_path, e))?;
    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        ReduceError::file_access(path, e)
    })?;

    tracing::debug!("Wrote total {} to {}", total, path.display());
    Ok(())
}

/// Read a total previously written by [`write_total`]
pub fn read_total(path: &Path) -> Result<f64> {
    let content = std::fs::read_to_string(path).map_err(|e| ReduceError::file_access(path, e))?;
    let token = content.split_whitespace().next().ok_or_else(|| {
        ReduceError::malformed(path.display().to_string(), "output file is empty")
    })?;
    token.parse().map_err(|_| {
        ReduceError::malformed(
            path.display().to_string(),
            format!("'{token}' is not a number"),
        )
    })
}
