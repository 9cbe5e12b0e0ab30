//! Plan validation against live channel state.
//!
//! Validation is all-or-nothing: the verdict lists every problem in the plan,
//! and a single error means no channel is renamed. Archived source channels
//! are not errors; they produce skip notices and drop out of the active plan.

use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::channels::ChannelIndex;
use crate::plan::RenameEntry;

/// Rule shown to users in error messages.
pub const DOCUMENTED_NAME_RULE: &str = "^[a-z0-9_-]{1,80}$";

// Lowercase ASCII, digits, `_` and `-`, plus non-ASCII letters and numbers
// that have no uppercase form. 1 to 80 characters. Broader than
// DOCUMENTED_NAME_RULE, which error messages quote as-is.
static CHANNEL_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9_\-\p{Ll}\p{Lm}\p{Lo}\p{N}]{1,80}$").unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    pub errors: Vec<String>,
    pub skipped: Vec<String>,
}

impl Verdict {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn is_valid_channel_name(name: &str) -> bool {
    CHANNEL_NAME_PATTERN.is_match(name)
}

/// Check every entry of `plan` against `channels`, in plan order.
pub fn validate_plan(plan: &[RenameEntry], channels: &ChannelIndex) -> Verdict {
    let mut tobe_count: HashMap<&str, usize> = HashMap::new();
    for entry in plan {
        *tobe_count.entry(entry.tobe.as_str()).or_default() += 1;
    }
    let mut duplicates_reported: HashSet<&str> = HashSet::new();

    let mut verdict = Verdict::default();

    for entry in plan {
        let Some(source) = channels.get(&entry.asis) else {
            verdict
                .errors
                .push(format!("channel {:?} not found", entry.asis));
            continue;
        };

        if source.is_archived {
            verdict
                .skipped
                .push(format!("channel {:?} is archived, skipping", entry.asis));
            continue;
        }

        if !is_valid_channel_name(&entry.tobe) {
            verdict.errors.push(format!(
                "channel name {:?} is invalid (must match {})",
                entry.tobe, DOCUMENTED_NAME_RULE
            ));
        }

        if entry.asis != entry.tobe {
            if let Some(target) = channels.get(&entry.tobe) {
                if !target.is_archived {
                    verdict
                        .errors
                        .push(format!("target channel {:?} already exists", entry.tobe));
                }
            }
        }

        let tobe = entry.tobe.as_str();
        if tobe_count.get(tobe).copied().unwrap_or(0) > 1 && duplicates_reported.insert(tobe) {
            verdict
                .errors
                .push(format!("duplicate tobe target: {:?}", entry.tobe));
        }
    }

    verdict
}

/// A plan entry cleared for execution, with its resolved channel id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEntry {
    #[serde(flatten)]
    pub entry: RenameEntry,
    pub channel_id: String,
}

/// Entries whose source channel exists and is not archived, in plan order.
pub fn active_plan(plan: &[RenameEntry], channels: &ChannelIndex) -> Vec<ActiveEntry> {
    plan.iter()
        .filter_map(|entry| {
            let channel = channels.get(&entry.asis)?;
            (!channel.is_archived).then(|| ActiveEntry {
                entry: entry.clone(),
                channel_id: channel.id.clone(),
            })
        })
        .collect()
}
