//! Integration tests for the acctsync workflows.

use std::path::{Path, PathBuf};

use acctdiff::{AccessId, Account, reconcile};
use acctdiff_sync::audit::AuditLog;
use acctdiff_sync::config::{Config, ReportFormat};
use acctdiff_sync::error::Error;
use acctdiff_sync::plan::{SyncAction, SyncPlan};
use acctdiff_sync::workflow::{
    self, InputFiles, ReviewOptions, encode_plan, render_diff, review_plan,
};

fn known_json() -> &'static str {
    r#"[
        { "accessId": 0, "label": "Checking account", "vendorAccountId": "1234abcd" },
        { "accessId": 0, "label": "Savings account", "vendorAccountId": "0147200001",
          "iban": "1234 5678 9012 34", "currency": "EUR" },
        { "accessId": 1, "label": "Closed card", "vendorAccountId": "9999" }
    ]"#
}

fn provider_json() -> &'static str {
    r#"[
        { "accessId": 0, "label": "Checking account", "vendorAccountId": "1234abcd" },
        { "accessId": 0, "label": "Livret A", "vendorAccountId": "0147200099",
          "iban": "1234 5678 9012 34", "currency": "EUR" },
        { "accessId": 2, "label": "New card", "vendorAccountId": "5555" }
    ]"#
}

struct Fixture {
    dir: tempfile::TempDir,
    files: InputFiles,
    config: Config,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let known = dir.path().join("known.json");
    let provider = dir.path().join("provider.json");
    std::fs::write(&known, known_json()).unwrap();
    std::fs::write(&provider, provider_json()).unwrap();

    let mut config = Config::default();
    config.logging.dir = dir.path().join("logs").display().to_string();

    Fixture {
        dir,
        files: InputFiles { known, provider },
        config,
    }
}

fn audit_events(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn event_names(events: &[serde_json::Value]) -> Vec<String> {
    events
        .iter()
        .map(|e| e["event"].as_str().unwrap().to_string())
        .collect()
}

fn sample() -> (Vec<Account>, Vec<Account>) {
    let known = acctdiff_sync::accounts::from_json(known_json()).unwrap();
    let provider = acctdiff_sync::accounts::from_json(provider_json()).unwrap();
    (known, provider)
}

// ============================================================================
// run_diff / run_plan
// ============================================================================

#[test]
fn diff_writes_audit_trail() {
    let fx = fixture();
    workflow::run_diff(&fx.config, &fx.files, false).unwrap();

    let events = audit_events(&fx.config.audit_path());
    assert_eq!(
        event_names(&events),
        vec!["run_started", "classification", "run_completed"]
    );
    assert_eq!(events[0]["command"], "diff");
    assert_eq!(events[1]["perfect_matches"], 1);
    assert_eq!(events[1]["duplicate_candidates"], 1);
    assert_eq!(events[1]["known_orphans"], 1);
    assert_eq!(events[1]["provider_orphans"], 1);
}

#[test]
fn runs_append_to_the_same_trail() {
    let fx = fixture();
    workflow::run_diff(&fx.config, &fx.files, true).unwrap();
    workflow::run_plan(&fx.config, &fx.files).unwrap();

    let events = audit_events(&fx.config.audit_path());
    assert_eq!(events.len(), 6);
    assert_eq!(events[3]["command"], "plan");
}

#[test]
fn diff_reports_missing_input() {
    let fx = fixture();
    let files = InputFiles {
        known: fx.dir.path().join("missing.json"),
        provider: fx.files.provider.clone(),
    };
    let err = workflow::run_diff(&fx.config, &files, false).unwrap_err();
    assert!(matches!(err, Error::AccountsRead { .. }));
}

#[test]
fn plan_rejects_non_array_input() {
    let fx = fixture();
    std::fs::write(&fx.files.provider, r#"{ "accounts": [] }"#).unwrap();
    let err = workflow::run_plan(&fx.config, &fx.files).unwrap_err();
    assert!(matches!(err, Error::AccountsParse(_)));
}

// ============================================================================
// run_review
// ============================================================================

#[test]
fn review_with_yes_merges_and_writes_output() {
    let fx = fixture();
    let output: PathBuf = fx.dir.path().join("decisions.json");
    let opts = ReviewOptions {
        yes: true,
        output: Some(output.clone()),
    };
    workflow::run_review(&fx.config, &fx.files, &opts).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let actions: Vec<&str> = written["actions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["keep", "merge", "disable", "create"]);

    let events = audit_events(&fx.config.audit_path());
    assert_eq!(
        event_names(&events),
        vec!["run_started", "classification", "review_decision", "run_completed"]
    );
    assert_eq!(events[2]["decision"], "merge");
    assert_eq!(events[2]["automatic"], true);
    assert_eq!(events[3]["actions"]["merge"], 1);
}

#[test]
fn review_honors_auto_merge_config() {
    let mut fx = fixture();
    fx.config.sync.auto_merge = true;
    fx.config.sync.disable_known_orphans = false;
    let output = fx.dir.path().join("decisions.json");
    let opts = ReviewOptions {
        yes: false,
        output: Some(output.clone()),
    };
    workflow::run_review(&fx.config, &fx.files, &opts).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"merge\""));
    assert!(written.contains("\"ignore\""));
    assert!(!written.contains("\"review\""));
}

#[test]
fn review_reports_unwritable_output() {
    let fx = fixture();
    let opts = ReviewOptions {
        yes: true,
        output: Some(fx.dir.path().join("no-such-dir").join("out.json")),
    };
    let err = workflow::run_review(&fx.config, &fx.files, &opts).unwrap_err();
    assert!(matches!(err, Error::OutputWrite { .. }));
}

// ============================================================================
// review_plan
// ============================================================================

#[test]
fn review_plan_uses_prompt_answers() {
    let dir = tempfile::tempdir().unwrap();
    let mut audit = AuditLog::open(&dir.path().join("audit.jsonl")).unwrap();

    let known = vec![
        Account::new(AccessId(0), "Savings", "01").with_iban("FR01"),
        Account::new(AccessId(0), "Card", "02").with_iban("FR02"),
    ];
    let provider = vec![
        Account::new(AccessId(0), "Savings", "01"),
        Account::new(AccessId(0), "Card", "02"),
    ];
    let diff = reconcile(&known, &provider);
    let plan = SyncPlan::from_classification(&diff, &Config::default().sync);
    assert_eq!(plan.pending_reviews(), 2);

    let mut asked = 0;
    let resolved = review_plan(plan, &mut audit, false, |k, _| {
        asked += 1;
        Ok(k.label == "Savings")
    })
    .unwrap();

    assert_eq!(asked, 2);
    assert!(matches!(resolved.actions[0], SyncAction::Merge { .. }));
    assert!(matches!(resolved.actions[1], SyncAction::KeepSeparate { .. }));

    let events = audit_events(&dir.path().join("audit.jsonl"));
    assert_eq!(events[1]["decision"], "keep_separate");
    assert_eq!(events[1]["automatic"], false);
}

#[test]
fn review_plan_automatic_never_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let mut audit = AuditLog::open(&dir.path().join("audit.jsonl")).unwrap();
    let (known, provider) = sample();
    let diff = reconcile(&known, &provider);
    let plan = SyncPlan::from_classification(&diff, &Config::default().sync);

    let resolved = review_plan(plan, &mut audit, true, |_, _| {
        panic!("prompt must not be called")
    })
    .unwrap();
    assert_eq!(resolved.counts().merge, 1);
}

#[test]
fn review_plan_propagates_abort() {
    let dir = tempfile::tempdir().unwrap();
    let mut audit = AuditLog::open(&dir.path().join("audit.jsonl")).unwrap();
    let (known, provider) = sample();
    let diff = reconcile(&known, &provider);
    let plan = SyncPlan::from_classification(&diff, &Config::default().sync);

    let err = review_plan(plan, &mut audit, false, |_, _| {
        Err(Error::Aborted("interrupted".into()))
    })
    .unwrap_err();
    assert!(matches!(err, Error::Aborted(_)));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn render_text_and_json() {
    let (known, provider) = sample();
    let diff = reconcile(&known, &provider);

    let text = render_diff(&diff, ReportFormat::Text).unwrap();
    assert!(text.starts_with("ACCOUNT DIFF: 1 perfect, 1 candidates"));
    assert!(text.contains("  ~ access#0 Savings account [0147200001]"));
    assert!(text.contains("  + access#2 New card [5555]"));

    let json: serde_json::Value =
        serde_json::from_str(&render_diff(&diff, ReportFormat::Json).unwrap()).unwrap();
    assert_eq!(json["knownOrphans"][0]["label"], "Closed card");
    assert_eq!(json["duplicateCandidates"][0][1]["label"], "Livret A");
    assert_eq!(json["duplicateCandidates"][0][1]["vendorAccountId"], "0147200099");
}

#[test]
fn encoded_plan_lists_every_account() {
    let (known, provider) = sample();
    let diff = reconcile(&known, &provider);
    let plan = SyncPlan::from_classification(&diff, &Config::default().sync);

    let json: serde_json::Value = serde_json::from_str(&encode_plan(&plan).unwrap()).unwrap();
    assert_eq!(json["actions"].as_array().unwrap().len(), 4);
    assert_eq!(json["actions"][1]["action"], "review");
}
