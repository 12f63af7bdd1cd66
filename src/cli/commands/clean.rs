//! Clean command - reconcile the build cache against retention settings

use super::build_dir;
use crate::audit::AuditLog;
use crate::backend::Backends;
use crate::cache::{
    failed_count, Decision, EntryOutcome, PlannedEntry, Reconciler, RetentionPolicy,
};
use crate::cli::args::CleanArgs;
use crate::config::{CleanMethod, Config};
use crate::error::{PkgCacheError, PkgCacheResult};
use crate::ui::{self, DisposalProgress, TaskSpinner, UiContext};
use std::path::Path;
use tracing::debug;

/// Execute the clean command
pub async fn execute(args: CleanArgs, config: &Config) -> PkgCacheResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let root = build_dir(args.build_dir.clone(), config);
    let policy = retention_policy(&args, config);
    let backends = Backends::from_config(config);

    ui::intro(&ctx, "Build cache");
    ui::key_value(&ctx, "Build directory", &root.display().to_string());
    ui::key_value(&ctx, "Retention", &describe(&policy));

    if args.dry_run {
        return preview(&ctx, &backends, &root, policy).await;
    }

    let question = if args.all {
        "Remove ALL packages from cache?"
    } else {
        "Remove all other packages from cache?"
    };
    if !ui::confirm(&ctx, question, true).await? {
        ui::outro_warn(&ctx, "Nothing removed");
        return Ok(());
    }

    let audit = AuditLog::new(config);
    let mut total = 0;
    let mut failed = 0;

    let outcomes = run_pass(&ctx, &backends, config, &root, Pass::Reconcile(policy)).await?;
    audit.log_outcomes("cache.reconcile", &outcomes).await;
    total += outcomes.len();
    failed += failed_count(&outcomes);

    if !args.all
        && ui::confirm(&ctx, "Remove untracked files from VCS workspaces?", true).await?
    {
        let outcomes = run_pass(&ctx, &backends, config, &root, Pass::PurgeUntracked).await?;
        audit.log_outcomes("cache.purge_untracked", &outcomes).await;
        total += outcomes.len();
        failed += failed_count(&outcomes);
    }

    if failed > 0 {
        return Err(PkgCacheError::DisposalIncomplete { failed, total });
    }

    ui::outro_success(&ctx, "Build cache is clean");
    Ok(())
}

/// Retention from `--keep-*` when given, otherwise from `cache.clean_method`
fn retention_policy(args: &CleanArgs, config: &Config) -> RetentionPolicy {
    if args.overrides_retention() {
        let mut methods = Vec::new();
        if args.keep_installed {
            methods.push(CleanMethod::KeepInstalled);
        }
        if args.keep_current {
            methods.push(CleanMethod::KeepCurrent);
        }
        RetentionPolicy::from_clean_methods(&methods, args.all)
    } else {
        RetentionPolicy::from_clean_methods(&config.cache.clean_method, args.all)
    }
}

fn describe(policy: &RetentionPolicy) -> String {
    if policy.remove_all {
        return "remove all".to_string();
    }

    let mut kept = Vec::new();
    if policy.keep_installed {
        kept.push("installed");
    }
    if policy.keep_current {
        kept.push("current");
    }
    if kept.is_empty() {
        "keep nothing".to_string()
    } else {
        format!("keep {}", kept.join(" + "))
    }
}

/// Which disposal pass to run
#[derive(Debug, Clone, Copy)]
enum Pass {
    Reconcile(RetentionPolicy),
    PurgeUntracked,
}

/// Run one disposal pass with a progress display, then report its outcomes
async fn run_pass(
    ctx: &UiContext,
    backends: &Backends,
    config: &Config,
    root: &Path,
    pass: Pass,
) -> PkgCacheResult<Vec<EntryOutcome>> {
    let label = match pass {
        Pass::Reconcile(_) => "Cleaning build cache",
        Pass::PurgeUntracked => "Removing untracked files",
    };
    let progress = DisposalProgress::new(ctx, label);
    let observer = |outcome: &EntryOutcome| progress.on_outcome(outcome);
    let reconciler = Reconciler::from_backends(backends)
        .with_jobs(config.cache.jobs)
        .with_observer(&observer);

    let result = match pass {
        Pass::Reconcile(policy) => reconciler.reconcile(root, policy).await,
        Pass::PurgeUntracked => reconciler.purge_untracked(root).await,
    };
    progress.finish();
    let outcomes = result?;

    report(ctx, &outcomes);
    Ok(outcomes)
}

fn report(ctx: &UiContext, outcomes: &[EntryOutcome]) {
    for entry in outcomes {
        if entry.outcome.is_removed() || entry.outcome.is_failed() {
            ui::entry_outcome(ctx, entry);
        } else {
            debug!("{}: kept", entry.name);
        }
    }
    ui::remark(ctx, &ui::outcome_summary(outcomes));
}

async fn preview(
    ctx: &UiContext,
    backends: &Backends,
    root: &Path,
    policy: RetentionPolicy,
) -> PkgCacheResult<()> {
    let mut spinner = TaskSpinner::new(ctx);
    spinner.start("Resolving retention");

    let plan = match Reconciler::from_backends(backends).plan(root, policy).await {
        Ok(plan) => plan,
        Err(e) => {
            spinner.stop_error("Could not resolve retention");
            return Err(e);
        }
    };
    let removals: Vec<&PlannedEntry> = plan
        .iter()
        .filter(|p| p.decision == Decision::Remove)
        .collect();
    spinner.stop(&format!(
        "{} of {} workspace(s) would be removed",
        removals.len(),
        plan.len()
    ));

    for planned in removals {
        ui::step_info(ctx, &planned.entry.name);
    }
    ui::outro_warn(ctx, "Dry run - nothing removed");
    Ok(())
}
