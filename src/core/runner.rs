//! Run orchestration.
//!
//! A run moves through load → fetch → validate, then either stops (validation
//! errors or dry run) or applies the active plan one rename at a time:
//!
//! - Load and fetch failures are fatal and happen before any mutation.
//! - Any validation error blocks the whole batch; nothing is renamed.
//! - Renames run serially in plan order with a fixed pause between calls.
//!   A failed rename is recorded and the run carries on with the next entry.

use serde::Serialize;

use crate::channels;
use crate::error::{Error, Result};
use crate::output::{BulkResult, ItemOutcome};
use crate::plan::{self, RenameEntry};
use crate::retry::{self, Sleeper};
use crate::settings::Settings;
use crate::slack::ChannelApi;
use crate::validate::{self, ActiveEntry, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    DryRun,
    Apply,
}

impl RunMode {
    pub fn from_apply_flag(apply: bool) -> Self {
        if apply {
            RunMode::Apply
        } else {
            RunMode::DryRun
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub plan_path: String,
    pub mode: RunMode,
}

/// Hooks for live progress. Every method defaults to doing nothing.
pub trait RunObserver {
    /// Validation passed; `active` is about to be applied (or reported).
    fn plan_ready(&mut self, _verdict: &Verdict, _active: &[ActiveEntry]) {}

    fn renamed(&mut self, _outcome: &ItemOutcome<RenamedChannel>) {}
}

impl RunObserver for () {}

/// Per-entry payload of a rename outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamedChannel {
    pub channel_id: String,
    pub asis: String,
    pub tobe: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub mode: RunMode,
    pub started_at: String,
    pub plan_entries: usize,
    pub channels: usize,
    pub skipped: Vec<String>,
    pub plan: Vec<ActiveEntry>,
    pub results: BulkResult<RenamedChannel>,
}

impl RunReport {
    /// 0 when every attempted rename succeeded (or nothing was attempted).
    pub fn exit_code(&self) -> i32 {
        if self.results.has_failures() {
            1
        } else {
            0
        }
    }
}

pub struct Runner<'a, A: ?Sized, S: ?Sized> {
    api: &'a A,
    sleeper: &'a S,
    settings: &'a Settings,
}

impl<'a, A, S> Runner<'a, A, S>
where
    A: ChannelApi + ?Sized,
    S: Sleeper + ?Sized,
{
    pub fn new(api: &'a A, sleeper: &'a S, settings: &'a Settings) -> Self {
        Self {
            api,
            sleeper,
            settings,
        }
    }

    /// Load the plan file named in `config`, then run it.
    pub fn run(&self, config: &RunConfig, observer: &mut dyn RunObserver) -> Result<RunReport> {
        let plan = plan::load(&config.plan_path)?;
        self.run_plan(&plan, config.mode, observer)
    }

    /// Run an already-loaded plan.
    ///
    /// Returns `validation.plan_rejected` without touching any channel when
    /// the verdict carries errors.
    pub fn run_plan(
        &self,
        plan: &[RenameEntry],
        mode: RunMode,
        observer: &mut dyn RunObserver,
    ) -> Result<RunReport> {
        let started_at = chrono::Local::now().to_rfc3339();

        let channels = channels::fetch_public_channels(self.api, self.sleeper, self.settings)?;

        let verdict = validate::validate_plan(plan, &channels);
        if !verdict.is_clean() {
            return Err(Error::plan_rejected(verdict.errors, verdict.skipped));
        }
        log_status!("validate", "validation passed");

        let active = validate::active_plan(plan, &channels);
        observer.plan_ready(&verdict, &active);

        let mut results = BulkResult::new("rename");
        match mode {
            RunMode::DryRun => {
                log_status!("run", "dry-run mode (set APPLY=true to execute)");
            }
            RunMode::Apply => {
                log_status!("run", "starting rename of {} channel(s)", active.len());
                self.apply(&active, &mut results, observer);
            }
        }

        Ok(RunReport {
            mode,
            started_at,
            plan_entries: plan.len(),
            channels: channels.len(),
            skipped: verdict.skipped,
            plan: active,
            results,
        })
    }

    fn apply(
        &self,
        active: &[ActiveEntry],
        results: &mut BulkResult<RenamedChannel>,
        observer: &mut dyn RunObserver,
    ) {
        for (i, item) in active.iter().enumerate() {
            if i > 0 {
                self.sleeper.sleep(self.settings.pause_between());
            }

            let RenameEntry { asis, tobe, .. } = &item.entry;
            let error = retry::rename_channel(
                self.api,
                self.sleeper,
                self.settings,
                &item.channel_id,
                asis,
                tobe,
            )
            .err()
            .map(|e| e.message);

            let outcome = ItemOutcome {
                id: asis.clone(),
                result: Some(RenamedChannel {
                    channel_id: item.channel_id.clone(),
                    asis: asis.clone(),
                    tobe: tobe.clone(),
                }),
                error,
            };
            observer.renamed(&outcome);
            results.record(outcome);
        }
    }
}
