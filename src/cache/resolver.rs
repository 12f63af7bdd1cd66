//! Membership set resolution
//!
//! Two independent sources say which workspaces are still needed: the
//! local package database (what is installed) and the remote index (what
//! is still published). The remote lookup is slow and needs network
//! access, so callers only resolve it when a retention rule reads it.

use crate::backend::{InstalledPackage, RemoteIndex};
use crate::cache::membership::MembershipSet;
use crate::error::PkgCacheResult;
use tracing::{debug, info};

/// Bases of the installed foreign packages
pub fn resolve_installed(packages: &[InstalledPackage]) -> MembershipSet {
    packages
        .iter()
        .map(InstalledPackage::package_base)
        .collect()
}

/// Bases the remote index still publishes, looked up in bulk.
///
/// Any query failure is returned as-is: a partial set would make more
/// entries look unpublished than really are.
pub async fn resolve_remote_available(
    index: &dyn RemoteIndex,
    candidates: &[String],
) -> PkgCacheResult<MembershipSet> {
    if candidates.is_empty() {
        return Ok(MembershipSet::new());
    }

    info!("Querying remote index for {} package(s)", candidates.len());
    let records = index.query(candidates).await?;
    let set: MembershipSet = records.into_iter().map(|r| r.package_base).collect();

    debug!("{} base(s) still published", set.len());
    Ok(set)
}
