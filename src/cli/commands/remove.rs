//! Remove command - uninstall packages and prune their VCS records

use crate::audit::AuditLog;
use crate::backend::PacmanCli;
use crate::cache::VcsStore;
use crate::cli::args::RemoveArgs;
use crate::config::{Config, ConfigManager};
use crate::error::PkgCacheResult;
use crate::packages;
use crate::ui::{self, UiContext};

/// Execute the remove command
pub async fn execute(args: RemoveArgs, config: &Config) -> PkgCacheResult<()> {
    let ctx = UiContext::detect();
    let pacman = PacmanCli::new(&config.pacman).with_noconfirm(args.yes);
    let mut store = VcsStore::load(&ConfigManager::vcs_store_path()).await?;

    packages::remove_packages(&pacman, &mut store, &args.packages).await?;

    AuditLog::new(config)
        .log(
            "packages.remove",
            &serde_json::json!({ "targets": args.packages }),
        )
        .await;
    ui::step_ok(
        &ctx,
        &format!("Removed {} package(s)", args.packages.len()),
    );
    Ok(())
}
