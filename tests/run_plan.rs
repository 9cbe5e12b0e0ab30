mod common;

use std::time::Duration;

use channel_rename::runner::{RunConfig, RunMode, Runner};
use channel_rename::settings::Settings;
use channel_rename::slack::ApiError;

use common::{plan_file, NoSleep, Workspace};

fn config(file: &tempfile::NamedTempFile, mode: RunMode) -> RunConfig {
    RunConfig {
        plan_path: file.path().to_string_lossy().to_string(),
        mode,
    }
}

#[test]
fn clean_plan_applies_every_rename() {
    let workspace = Workspace::with(&[("C1", "old-1", false), ("C2", "old-2", false)]);
    let sleeper = NoSleep::default();
    let settings = Settings::default();
    let file = plan_file("asis,tobe\nold-1,new-1\nold-2,new-2\n");

    let report = Runner::new(&workspace, &sleeper, &settings)
        .run(&config(&file, RunMode::Apply), &mut ())
        .unwrap();

    assert_eq!(report.plan.len(), 2);
    assert_eq!(
        *workspace.rename_calls.borrow(),
        vec![
            ("C1".to_string(), "new-1".to_string()),
            ("C2".to_string(), "new-2".to_string()),
        ]
    );
    assert_eq!(report.results.summary.succeeded, 2);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn missing_channel_and_bad_name_block_the_run() {
    let workspace = Workspace::with(&[("C1", "old-1", false)]);
    let sleeper = NoSleep::default();
    let settings = Settings::default();
    let file = plan_file("asis,tobe\nold-99,new-99\nold-1,New Channel!\n");

    let err = Runner::new(&workspace, &sleeper, &settings)
        .run(&config(&file, RunMode::Apply), &mut ())
        .unwrap_err();

    let messages = err.rejected_messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("\"old-99\" not found"));
    assert!(messages[1].contains("\"New Channel!\" is invalid"));
    assert_eq!(workspace.rename_count(), 0);
}

#[test]
fn one_bad_entry_blocks_the_good_ones() {
    let workspace = Workspace::with(&[
        ("C1", "a", false),
        ("C2", "b", false),
        ("C3", "taken", false),
    ]);
    let sleeper = NoSleep::default();
    let settings = Settings::default();
    let file = plan_file("asis,tobe\na,a-new\nb,taken\n");

    let err = Runner::new(&workspace, &sleeper, &settings)
        .run(&config(&file, RunMode::Apply), &mut ())
        .unwrap_err();

    assert_eq!(
        err.rejected_messages(),
        vec!["target channel \"taken\" already exists"]
    );
    assert_eq!(workspace.rename_count(), 0);
}

#[test]
fn load_failure_happens_before_any_remote_call() {
    let workspace = Workspace::with(&[("C1", "a", false)]);
    let sleeper = NoSleep::default();
    let settings = Settings::default();
    let file = plan_file("asis,tobe\na\n");

    let err = Runner::new(&workspace, &sleeper, &settings)
        .run(&config(&file, RunMode::Apply), &mut ())
        .unwrap_err();

    assert_eq!(err.code.as_str(), "plan.invalid");
    assert!(err.message.contains("line 2"));
    assert_eq!(workspace.list_calls.get(), 0);
}

#[test]
fn dry_run_reports_plan_without_renaming() {
    let workspace = Workspace::with(&[("C1", "a", false), ("C2", "b", true)]);
    let sleeper = NoSleep::default();
    let settings = Settings::default();
    let file = plan_file("asis,tobe\na,a-new\nb,b-new\n");

    let report = Runner::new(&workspace, &sleeper, &settings)
        .run(&config(&file, RunMode::DryRun), &mut ())
        .unwrap();

    assert_eq!(report.plan.len(), 1);
    assert_eq!(report.skipped, vec!["channel \"b\" is archived, skipping"]);
    assert_eq!(workspace.rename_count(), 0);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn rate_limited_rename_recovers_within_budget() {
    let workspace = Workspace::with(&[("C1", "a", false)]).script_renames(vec![
        Err(ApiError::RateLimited(Some(Duration::from_secs(3)))),
        Err(ApiError::RateLimited(Some(Duration::from_secs(3)))),
        Ok(()),
    ]);
    let sleeper = NoSleep::default();
    let settings = Settings::default();
    let file = plan_file("asis,tobe\na,a-new\n");

    let report = Runner::new(&workspace, &sleeper, &settings)
        .run(&config(&file, RunMode::Apply), &mut ())
        .unwrap();

    assert_eq!(report.exit_code(), 0);
    assert_eq!(workspace.rename_count(), 3);
    assert_eq!(*sleeper.slept.borrow(), vec![Duration::from_secs(3); 2]);
}

#[test]
fn exhausted_retries_fail_only_that_entry() {
    let workspace = Workspace::with(&[("C1", "a", false), ("C2", "b", false)]).script_renames(
        vec![
            Err(ApiError::RateLimited(None)),
            Err(ApiError::RateLimited(None)),
            Err(ApiError::RateLimited(None)),
        ],
    );
    let sleeper = NoSleep::default();
    let settings = Settings::default();
    let file = plan_file("asis,tobe\na,a-new\nb,b-new\n");

    let report = Runner::new(&workspace, &sleeper, &settings)
        .run(&config(&file, RunMode::Apply), &mut ())
        .unwrap();

    let results = &report.results;
    assert_eq!(
        results.results[0].error.as_deref(),
        Some("exceeded max retries (3) for a -> a-new")
    );
    assert!(results.results[1].is_ok());
    assert_eq!(results.summary.failed, 1);
    assert_eq!(report.exit_code(), 1);

    // three backoffs at the fallback, then one pause before the second entry
    assert_eq!(
        *sleeper.slept.borrow(),
        vec![
            Duration::from_secs(5),
            Duration::from_secs(5),
            Duration::from_secs(5),
            Duration::from_secs(1),
        ]
    );
}

#[test]
fn report_serializes_for_json_output() {
    let workspace = Workspace::with(&[("C1", "a", false)]);
    let sleeper = NoSleep::default();
    let settings = Settings::default();
    let file = plan_file("asis,tobe\na,a-new\n");

    let report = Runner::new(&workspace, &sleeper, &settings)
        .run(&config(&file, RunMode::Apply), &mut ())
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["mode"], "apply");
    assert_eq!(json["plan"][0]["channelId"], "C1");
    assert_eq!(json["plan"][0]["asis"], "a");
    assert_eq!(json["plan"][0]["line"], 2);
    assert_eq!(json["results"]["results"][0]["tobe"], "a-new");
    assert_eq!(json["results"]["summary"]["succeeded"], 1);
}
