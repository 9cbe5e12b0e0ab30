//! Mapping file loader.
//!
//! Reads the `asis,tobe` file into an ordered rename plan. Loading is strict:
//! any structural problem aborts the run before a single remote call is made.

use serde::Serialize;
use std::fs;

use crate::error::{Error, Result};
use crate::utils::parser;
use crate::utils::validation;

const HEADER: [&str; 2] = ["asis", "tobe"];

/// One desired rename. Position in the plan is its identity; `line` is the
/// physical line in the mapping file, or 0 for entries built in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameEntry {
    pub asis: String,
    pub tobe: String,
    #[serde(skip_serializing_if = "is_unknown_line")]
    pub line: usize,
}

fn is_unknown_line(line: &usize) -> bool {
    *line == 0
}

impl RenameEntry {
    pub fn new(asis: impl Into<String>, tobe: impl Into<String>) -> Self {
        Self {
            asis: asis.into(),
            tobe: tobe.into(),
            line: 0,
        }
    }
}

/// Load a plan from disk. `~` is expanded.
pub fn load(path: &str) -> Result<Vec<RenameEntry>> {
    let expanded = shellexpand::tilde(path).to_string();
    let content =
        fs::read_to_string(&expanded).map_err(|e| Error::plan_read_failed(path, e.to_string()))?;

    let plan = parse(&content, path)?;
    log_status!("plan", "loaded {} rename entries from {}", plan.len(), path);
    Ok(plan)
}

/// Parse mapping content. `source` only labels errors.
pub fn parse(content: &str, source: &str) -> Result<Vec<RenameEntry>> {
    let records = parser::split_records(content).map_err(|e| {
        Error::plan_invalid(source, Some(e.line), format!("parse CSV: {}", e.problem))
    })?;

    let mut rows = records.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| Error::plan_invalid(source, None, "CSV is empty"))?;

    if !is_header(&header.fields) {
        return Err(Error::plan_invalid(
            source,
            Some(header.line),
            format!(
                "CSV header must be 'asis,tobe', got: {}",
                header.fields.join(",")
            ),
        ));
    }

    let mut entries = Vec::new();
    for row in rows {
        let line = Some(row.line);
        validation::require_columns(&row.fields, HEADER.len(), source, line)?;
        let asis = validation::require_non_empty(&row.fields[0], "asis", source, line)?;
        let tobe = validation::require_non_empty(&row.fields[1], "tobe", source, line)?;
        entries.push(RenameEntry {
            asis: asis.to_string(),
            tobe: tobe.to_string(),
            line: row.line,
        });
    }

    if entries.is_empty() {
        return Err(Error::plan_invalid(source, None, "CSV has no data rows"));
    }

    Ok(entries)
}

fn is_header(fields: &[String]) -> bool {
    fields.len() == HEADER.len()
        && fields
            .iter()
            .zip(HEADER)
            .all(|(field, expected)| field.trim().eq_ignore_ascii_case(expected))
}
