//! Input validation primitives shared by the loaders.

use crate::error::{Error, Result};

/// Require a field to be non-empty after trimming.
///
/// Returns the trimmed value; the error names the field and, when known, the
/// line it came from.
pub fn require_non_empty<'a>(
    value: &'a str,
    field: &str,
    path: &str,
    line: Option<usize>,
) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::plan_invalid(path, line, format!("'{}' is empty", field)))
    } else {
        Ok(trimmed)
    }
}

/// Require exactly `expected` columns in a row.
pub fn require_columns<T>(
    row: &[T],
    expected: usize,
    path: &str,
    line: Option<usize>,
) -> Result<()> {
    if row.len() != expected {
        return Err(Error::plan_invalid(
            path,
            line,
            format!("expected {} columns, got {}", expected, row.len()),
        ));
    }
    Ok(())
}
