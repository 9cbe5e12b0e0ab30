//! Public output types for run results.
//!
//! These are what the CLI serializes in `--json` mode and what library
//! consumers get back from a run.

use serde::Serialize;

// ============================================================================
// Bulk Operations
// ============================================================================

/// Standardized bulk execution result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult<T: Serialize> {
    pub action: String,
    pub results: Vec<ItemOutcome<T>>,
    pub summary: BulkSummary,
}

/// Outcome for a single item in a bulk operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome<T: Serialize> {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(flatten)]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ItemOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of bulk operation results.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl<T: Serialize> BulkResult<T> {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            results: Vec::new(),
            summary: BulkSummary::default(),
        }
    }

    /// Record one item. Items are never dropped; a failure only bumps the
    /// failed count.
    pub fn record(&mut self, outcome: ItemOutcome<T>) {
        self.summary.total += 1;
        if outcome.is_ok() {
            self.summary.succeeded += 1;
        } else {
            self.summary.failed += 1;
        }
        self.results.push(outcome);
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}
