use clap::Args;
use std::fmt::{self, Write};

use channel_rename::output::ItemOutcome;
use channel_rename::runner::{RenamedChannel, RunConfig, RunMode, RunObserver, RunReport, Runner};
use channel_rename::validate::{ActiveEntry, Verdict};
use channel_rename::{retry, settings, slack, Error};

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// CSV file with an `asis,tobe` header and one rename per row
    #[arg(short, long, default_value = settings::DEFAULT_PLAN_FILE)]
    pub file: String,

    /// Execute the renames (default is dry-run; APPLY=true also enables this)
    #[arg(long)]
    pub apply: bool,

    /// JSON settings file overriding timeouts, pacing and retry limits
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Slack user token (defaults to $SLACK_USER_TOKEN)
    #[arg(long)]
    pub token: Option<String>,
}

/// Prints skip notices, the plan, and each rename result to stdout as they
/// happen.
pub struct TextObserver;

impl RunObserver for TextObserver {
    fn plan_ready(&mut self, verdict: &Verdict, active: &[ActiveEntry]) {
        let mut text = String::new();
        if write_plan(&mut text, verdict, active).is_ok() {
            print!("{}", text);
        }
    }

    fn renamed(&mut self, outcome: &ItemOutcome<RenamedChannel>) {
        let mut text = String::new();
        if write_outcome(&mut text, outcome).is_ok() {
            print!("{}", text);
        }
    }
}

fn write_plan(out: &mut impl Write, verdict: &Verdict, active: &[ActiveEntry]) -> fmt::Result {
    if !verdict.skipped.is_empty() {
        writeln!(out, "skipped entries:")?;
        for notice in &verdict.skipped {
            writeln!(out, "  - {}", notice)?;
        }
    }

    writeln!(out, "rename plan:")?;
    for item in active {
        writeln!(out, "  {} -> {}", item.entry.asis, item.entry.tobe)?;
    }
    Ok(())
}

fn write_outcome(out: &mut impl Write, outcome: &ItemOutcome<RenamedChannel>) -> fmt::Result {
    let Some(renamed) = &outcome.result else {
        return Ok(());
    };
    match &outcome.error {
        None => writeln!(out, "OK: {} -> {}", renamed.asis, renamed.tobe),
        Some(err) => writeln!(out, "FAIL: {} -> {} ({})", renamed.asis, renamed.tobe, err),
    }
}

pub fn run(
    args: RenameArgs,
    global: &GlobalArgs,
    observer: &mut dyn RunObserver,
) -> CmdResult<RunReport> {
    let settings = settings::load(args.config.as_deref())?;

    let token = match args.token {
        Some(token) => token,
        None => std::env::var(settings::TOKEN_ENV_VAR)
            .map_err(|_| Error::auth_missing_token(settings::TOKEN_ENV_VAR))?,
    };

    let mode = RunMode::from_apply_flag(args.apply || settings::apply_from_env());
    let config = RunConfig {
        plan_path: args.file,
        mode,
    };

    let client = slack::SlackClient::new(&token, &settings)?;
    let sleeper = retry::ThreadSleeper;
    let runner = Runner::new(&client, &sleeper, &settings);

    let report = runner.run(&config, observer)?;

    if !global.json {
        print_summary(&report);
    }

    let exit_code = report.exit_code();
    Ok((report, exit_code))
}

fn print_summary(report: &RunReport) {
    match report.mode {
        RunMode::DryRun => {
            println!("dry-run: no channels renamed (pass --apply or set APPLY=true to execute)");
        }
        RunMode::Apply => {
            let summary = &report.results.summary;
            println!(
                "renamed {} of {} channel(s), {} failed",
                summary.succeeded, summary.total, summary.failed
            );
        }
    }
}
