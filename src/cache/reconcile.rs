//! Cache reconciliation passes
//!
//! A pass inventories the build directory, resolves the membership sets the
//! policy needs, decides each entry and disposes of the removals. Inventory
//! and membership failures abort the pass before anything is touched;
//! disposal failures are recorded per entry and never stop the pass.
//!
//! Outcomes always come back in inventory order, one per entry, even when
//! disposal runs concurrently.

use crate::backend::{Backends, PackageDatabase, RemoteIndex, VersionControl};
use crate::cache::disposal::{
    self, DisposalError, DisposalExecutor, DisposalOutcome, DisposalStep, EntryOutcome,
};
use crate::cache::inventory::{self, CacheEntry};
use crate::cache::membership::MembershipSet;
use crate::cache::policy::{decide, Decision, RetentionPolicy};
use crate::cache::resolver::{resolve_installed, resolve_remote_available};
use crate::error::PkgCacheResult;
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Callback invoked as each entry's outcome becomes known
pub type OutcomeObserver<'a> = dyn Fn(&EntryOutcome) + Send + Sync + 'a;

/// An inventoried entry and what the policy decided for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedEntry {
    #[serde(flatten)]
    pub entry: CacheEntry,
    pub decision: Decision,
}

/// Runs reconciliation passes against a set of collaborators
pub struct Reconciler<'a> {
    vcs: &'a dyn VersionControl,
    packages: &'a dyn PackageDatabase,
    index: &'a dyn RemoteIndex,
    jobs: usize,
    observer: Option<&'a OutcomeObserver<'a>>,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        packages: &'a dyn PackageDatabase,
        index: &'a dyn RemoteIndex,
    ) -> Self {
        Self {
            vcs,
            packages,
            index,
            jobs: 1,
            observer: None,
        }
    }

    pub fn from_backends(backends: &'a Backends) -> Self {
        Self::new(
            backends.vcs.as_ref(),
            backends.packages.as_ref(),
            backends.index.as_ref(),
        )
    }

    /// Dispose up to `jobs` entries at once
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Report each outcome as soon as it is known
    pub fn with_observer(mut self, observer: &'a OutcomeObserver<'a>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Inventory `root` and decide every entry without disposing anything
    pub async fn plan(
        &self,
        root: &Path,
        policy: RetentionPolicy,
    ) -> PkgCacheResult<Vec<PlannedEntry>> {
        let entries = inventory::list(root).await?;

        let installed = if policy.needs_installed() {
            resolve_installed(&self.packages.list_installed().await?)
        } else {
            MembershipSet::new()
        };

        let remote_available = if policy.needs_remote() {
            let names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
            resolve_remote_available(self.index, &names).await?
        } else {
            MembershipSet::new()
        };

        Ok(entries
            .into_iter()
            .map(|entry| {
                let decision = decide(&entry, &installed, &remote_available, &policy);
                debug!("{}: {}", entry.name, decision);
                PlannedEntry { entry, decision }
            })
            .collect())
    }

    /// Apply `policy` to every workspace under `root`.
    ///
    /// With `remove_all` every entry is deleted outright; otherwise removals
    /// go through version-control-aware disposal.
    pub async fn reconcile(
        &self,
        root: &Path,
        policy: RetentionPolicy,
    ) -> PkgCacheResult<Vec<EntryOutcome>> {
        let plan = self.plan(root, policy).await?;
        let removals = plan
            .iter()
            .filter(|p| p.decision == Decision::Remove)
            .count();
        info!(
            "Removing {} of {} workspace(s) from {}",
            removals,
            plan.len(),
            root.display()
        );

        let executor = &DisposalExecutor::new(self.vcs);
        Ok(self
            .run(plan, move |planned: PlannedEntry| async move {
                let outcome = match planned.decision {
                    Decision::Keep => DisposalOutcome::Kept,
                    Decision::Remove if policy.remove_all => {
                        disposal::delete(&planned.entry).await
                    }
                    Decision::Remove => executor.classify_and_dispose(&planned.entry).await,
                };
                EntryOutcome::new(planned.entry, outcome)
            })
            .await)
    }

    /// Drop untracked files from every version-controlled workspace
    pub async fn purge_untracked(&self, root: &Path) -> PkgCacheResult<Vec<EntryOutcome>> {
        let entries = inventory::list(root).await?;
        info!("Removing untracked files from {}", root.display());

        let executor = &DisposalExecutor::new(self.vcs);
        Ok(self
            .run(entries, move |entry: CacheEntry| async move {
                let outcome = executor.clean_untracked(&entry).await;
                EntryOutcome::new(entry, outcome)
            })
            .await)
    }

    /// Dispose the workspaces of specific bases, e.g. after installing them
    ///
    /// A base that is not a bare directory name is reported `Failed` and
    /// nothing outside `root` is touched.
    pub async fn dispose_bases(&self, root: &Path, bases: &[String]) -> Vec<EntryOutcome> {
        let executor = &DisposalExecutor::new(self.vcs);
        self.run(bases.to_vec(), move |base: String| async move {
            match CacheEntry::checked_under(root, &base) {
                Some(entry) => {
                    let outcome = executor.classify_and_dispose(&entry).await;
                    EntryOutcome::new(entry, outcome)
                }
                None => outside_root(root, base),
            }
        })
        .await
    }

    /// Delete the workspaces of specific bases outright
    pub async fn delete_bases(&self, root: &Path, bases: &[String]) -> Vec<EntryOutcome> {
        self.run(bases.to_vec(), move |base: String| async move {
            match CacheEntry::checked_under(root, &base) {
                Some(entry) => {
                    let outcome = disposal::delete(&entry).await;
                    EntryOutcome::new(entry, outcome)
                }
                None => outside_root(root, base),
            }
        })
        .await
    }

    /// Run `dispose` over `items` with bounded concurrency, keeping order
    async fn run<T, F, Fut>(&self, items: Vec<T>, dispose: F) -> Vec<EntryOutcome>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = EntryOutcome>,
    {
        let observer = self.observer;
        stream::iter(items)
            .map(|item| {
                let pending = dispose(item);
                async move {
                    let outcome = pending.await;
                    if let Some(observe) = observer {
                        observe(&outcome);
                    }
                    outcome
                }
            })
            .buffered(self.jobs)
            .collect()
            .await
    }
}

/// Failed outcome for a base that would resolve outside `root`
fn outside_root(root: &Path, base: String) -> EntryOutcome {
    warn!("Refusing to dispose {:?}: not a directory name under {}", base, root.display());
    EntryOutcome {
        path: PathBuf::from(&base),
        name: base,
        outcome: DisposalOutcome::Failed(DisposalError::refused(
            DisposalStep::Delete,
            format!("not a directory name under {}", root.display()),
        )),
    }
}

/// Count outcomes that failed
pub fn failed_count(outcomes: &[EntryOutcome]) -> usize {
    outcomes.iter().filter(|o| o.outcome.is_failed()).count()
}
