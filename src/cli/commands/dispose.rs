//! Dispose command - clean up workspaces of freshly installed bases

use super::build_dir;
use crate::audit::AuditLog;
use crate::backend::Backends;
use crate::cache::inventory::is_base_name;
use crate::cache::{failed_count, Reconciler};
use crate::cli::args::DisposeArgs;
use crate::config::Config;
use crate::error::{PkgCacheError, PkgCacheResult};
use crate::ui::{self, UiContext};

/// Execute the dispose command
pub async fn execute(args: DisposeArgs, config: &Config) -> PkgCacheResult<()> {
    if let Some(bad) = args.bases.iter().find(|b| !is_base_name(b)) {
        return Err(PkgCacheError::User(format!(
            "'{}' is not a package base name",
            bad
        )));
    }

    let ctx = UiContext::detect();
    let root = build_dir(args.build_dir, config);
    let backends = Backends::from_config(config);
    let reconciler = Reconciler::from_backends(&backends).with_jobs(config.cache.jobs);

    let (event, outcomes) = if args.delete {
        (
            "cache.delete_bases",
            reconciler.delete_bases(&root, &args.bases).await,
        )
    } else {
        (
            "cache.dispose_bases",
            reconciler.dispose_bases(&root, &args.bases).await,
        )
    };

    for entry in &outcomes {
        ui::entry_outcome(&ctx, entry);
    }
    AuditLog::new(config).log_outcomes(event, &outcomes).await;

    let failed = failed_count(&outcomes);
    if failed > 0 {
        return Err(PkgCacheError::DisposalIncomplete {
            failed,
            total: outcomes.len(),
        });
    }
    Ok(())
}
