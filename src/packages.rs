//! Package removal through the system package manager

use crate::backend::PackageDatabase;
use crate::cache::VcsStore;
use crate::error::PkgCacheResult;
use tracing::info;

/// Remove dependency packages nothing requires anymore.
///
/// Returns the packages that were removed (empty when there were none).
pub async fn clean_orphans(
    packages: &dyn PackageDatabase,
    include_optional: bool,
) -> PkgCacheResult<Vec<String>> {
    let orphans = packages.list_orphans(include_optional).await?;
    if orphans.is_empty() {
        info!("No orphaned packages");
        return Ok(orphans);
    }

    packages.remove_packages(&orphans).await?;
    Ok(orphans)
}

/// Uninstall `targets` and forget their VCS records.
///
/// The store is only written when a record was actually dropped.
pub async fn remove_packages(
    packages: &dyn PackageDatabase,
    store: &mut VcsStore,
    targets: &[String],
) -> PkgCacheResult<()> {
    packages.remove_packages(targets).await?;

    if store.remove_packages(targets) {
        store.save().await?;
    }
    Ok(())
}
