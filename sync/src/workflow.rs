//! Command workflows: load → reconcile → report → (review) → audit.

use std::path::{Path, PathBuf};

use acctdiff::{Account, Classification, reconcile};
use log::{info, warn};

use crate::accounts;
use crate::audit::{self, AuditLog};
use crate::config::{Config, ReportFormat};
use crate::error::{Error, Result};
use crate::plan::SyncPlan;

/// The two account lists a command works on.
pub struct InputFiles {
    pub known: PathBuf,
    pub provider: PathBuf,
}

/// Options for the `review` command.
#[derive(Default)]
pub struct ReviewOptions {
    /// Merge every candidate without prompting.
    pub yes: bool,
    /// Also write the resolved plan to this file.
    pub output: Option<PathBuf>,
}

struct Loaded {
    known: Vec<Account>,
    provider: Vec<Account>,
}

fn load_inputs(files: &InputFiles) -> Result<Loaded> {
    let known = accounts::load(&files.known)?;
    let provider = accounts::load(&files.provider)?;
    info!(
        "Loaded {} known and {} provider accounts",
        known.len(),
        provider.len()
    );
    Ok(Loaded { known, provider })
}

fn start_run(config: &Config, command: &str, files: &InputFiles) -> Result<AuditLog> {
    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_run_started(
        &mut audit,
        command,
        &files.known.display().to_string(),
        &files.provider.display().to_string(),
    )?;
    Ok(audit)
}

fn finish_run(audit: &mut AuditLog, plan: &SyncPlan<'_>) -> Result<()> {
    audit::log_run_completed(audit, plan)?;
    info!("Audit logged to {}", audit.path().display());
    Ok(())
}

/// Print the classification of two account lists.
pub fn run_diff(config: &Config, files: &InputFiles, json: bool) -> Result<()> {
    let inputs = load_inputs(files)?;
    let mut audit = start_run(config, "diff", files)?;

    let diff = reconcile(&inputs.known, &inputs.provider);
    audit::log_classification(&mut audit, &diff)?;
    if diff.needs_review() {
        warn!(
            "{} duplicate candidate(s) need review",
            diff.duplicate_candidates.len()
        );
    }

    let format = if json {
        ReportFormat::Json
    } else {
        config.report.format
    };
    print!("{}", render_diff(&diff, format)?);

    let plan = SyncPlan::from_classification(&diff, &config.sync);
    finish_run(&mut audit, &plan)
}

/// Print the sync plan without deciding on duplicate candidates.
pub fn run_plan(config: &Config, files: &InputFiles) -> Result<()> {
    let inputs = load_inputs(files)?;
    let mut audit = start_run(config, "plan", files)?;

    let diff = reconcile(&inputs.known, &inputs.provider);
    audit::log_classification(&mut audit, &diff)?;
    let plan = SyncPlan::from_classification(&diff, &config.sync);

    match config.report.format {
        ReportFormat::Text => {
            print!("{plan}");
            if plan.is_noop() {
                println!("\nNothing to sync: accounts are unchanged.");
            }
        }
        ReportFormat::Json => println!("{}", encode_plan(&plan)?),
    }

    finish_run(&mut audit, &plan)
}

/// Decide every duplicate candidate and print the resolved plan as JSON.
pub fn run_review(config: &Config, files: &InputFiles, opts: &ReviewOptions) -> Result<()> {
    let inputs = load_inputs(files)?;
    let mut audit = start_run(config, "review", files)?;

    let diff = reconcile(&inputs.known, &inputs.provider);
    audit::log_classification(&mut audit, &diff)?;
    let plan = SyncPlan::from_classification(&diff, &config.sync);

    let automatic = opts.yes || config.sync.auto_merge;
    match plan.pending_reviews() {
        0 => info!("No duplicate candidates to review"),
        n if automatic => info!("Merging {n} duplicate candidate(s) without prompting"),
        n => info!("{n} duplicate candidate(s) to review"),
    }

    let plan = review_plan(plan, &mut audit, automatic, confirm_merge)?;
    let json = encode_plan(&plan)?;
    println!("{json}");

    if let Some(path) = &opts.output {
        write_output(path, &json)?;
        info!("Resolved plan written to {}", path.display());
    }

    finish_run(&mut audit, &plan)
}

/// Resolve pending reviews, recording each decision in the audit trail.
///
/// With `automatic` set every candidate is merged and `prompt` is never
/// called.
pub fn review_plan<'a, F>(
    plan: SyncPlan<'a>,
    audit: &mut AuditLog,
    automatic: bool,
    mut prompt: F,
) -> Result<SyncPlan<'a>>
where
    F: FnMut(&Account, &Account) -> Result<bool>,
{
    plan.resolve(|known, provider| {
        let merge = automatic || prompt(known, provider)?;
        audit::log_review_decision(audit, known, provider, merge, automatic)?;
        Ok(merge)
    })
}

/// Render a classification report in the given format.
pub fn render_diff(diff: &Classification<'_, Account>, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(diff.to_string()),
        ReportFormat::Json => serde_json::to_string_pretty(diff)
            .map(|s| s + "\n")
            .map_err(|e| Error::Encode(e.to_string())),
    }
}

/// Encode a plan as pretty-printed JSON.
pub fn encode_plan(plan: &SyncPlan<'_>) -> Result<String> {
    serde_json::to_string_pretty(plan).map_err(|e| Error::Encode(e.to_string()))
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| Error::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn confirm_merge(known: &Account, provider: &Account) -> Result<bool> {
    println!("\nPossible duplicate:");
    println!("  known:    {known}");
    println!("  provider: {provider}");

    dialoguer::Confirm::new()
        .with_prompt("Merge these accounts?")
        .default(true)
        .interact()
        .map_err(|e| Error::Aborted(format!("confirmation prompt failed: {e}")))
}
