//! Orphans command - uninstall unneeded dependencies

use crate::audit::AuditLog;
use crate::backend::PacmanCli;
use crate::cli::args::OrphansArgs;
use crate::config::Config;
use crate::error::PkgCacheResult;
use crate::packages;
use crate::ui::{self, UiContext};

/// Execute the orphans command
pub async fn execute(args: OrphansArgs, config: &Config) -> PkgCacheResult<()> {
    let ctx = UiContext::detect();
    let pacman = PacmanCli::new(&config.pacman).with_noconfirm(args.yes);

    let removed = packages::clean_orphans(&pacman, args.optional).await?;
    if removed.is_empty() {
        ui::step_info(&ctx, "No orphaned packages");
        return Ok(());
    }

    AuditLog::new(config)
        .log(
            "packages.orphans",
            &serde_json::json!({
                "optional": args.optional,
                "removed": removed,
            }),
        )
        .await;
    ui::step_ok(&ctx, &format!("Removed {} orphaned package(s)", removed.len()));
    Ok(())
}
