//! Workspace disposal
//!
//! Version-controlled workspaces are reset and cleaned rather than deleted.
//! Reset and clean are independent best-effort steps: a failed reset is
//! recorded and the clean still runs. Plain workspaces are deleted
//! recursively. No failure here is fatal; every entry gets an outcome.

use crate::backend::VersionControl;
use crate::cache::inventory::CacheEntry;
use crate::cache::workspace::{classify, WorkspaceState};
use crate::error::PkgCacheError;
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A step of the disposal procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisposalStep {
    Reset,
    Clean,
    Delete,
}

impl fmt::Display for DisposalStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => write!(f, "reset"),
            Self::Clean => write!(f, "clean"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// One failed step with the collaborator's detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    pub step: DisposalStep,
    pub detail: String,
}

/// Every step that failed while disposing one entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisposalError {
    pub failures: Vec<StepFailure>,
}

impl DisposalError {
    /// A step that was refused before anything ran
    pub fn refused(step: DisposalStep, detail: impl Into<String>) -> Self {
        let mut error = Self::default();
        error.push(step, detail);
        error
    }

    fn push(&mut self, step: DisposalStep, detail: impl Into<String>) {
        self.failures.push(StepFailure {
            step,
            detail: detail.into(),
        });
    }

    /// Whether `step` is among the failures
    pub fn failed(&self, step: DisposalStep) -> bool {
        self.failures.iter().any(|f| f.step == step)
    }

    fn into_outcome(self) -> DisposalOutcome {
        if self.failures.is_empty() {
            DisposalOutcome::Removed
        } else {
            DisposalOutcome::Failed(self)
        }
    }
}

impl fmt::Display for DisposalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", failure.step, failure.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for DisposalError {}

/// What happened to one entry during a pass.
///
/// A reset failure followed by a successful clean is still `Failed`; the
/// error lists exactly which steps failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DisposalOutcome {
    Kept,
    Removed,
    Failed(DisposalError),
}

impl DisposalOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }
}

/// An entry paired with its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutcome {
    pub name: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: DisposalOutcome,
}

impl EntryOutcome {
    pub fn new(entry: CacheEntry, outcome: DisposalOutcome) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            outcome,
        }
    }
}

/// Disposes workspaces according to their version control state
pub struct DisposalExecutor<'a> {
    vcs: &'a dyn VersionControl,
}

impl<'a> DisposalExecutor<'a> {
    pub fn new(vcs: &'a dyn VersionControl) -> Self {
        Self { vcs }
    }

    /// Reset and clean a tracked workspace, or delete a plain one
    pub async fn dispose(&self, entry: &CacheEntry, state: WorkspaceState) -> DisposalOutcome {
        match state {
            WorkspaceState::VersionControlled => {
                debug!("Resetting {}", entry.path.display());
                let mut error = DisposalError::default();

                if let Err(e) = self.vcs.reset(&entry.path).await {
                    warn!("Error resetting {}: {}", entry.name, e);
                    error.push(DisposalStep::Reset, step_detail(e));
                }

                if let Err(e) = self.vcs.clean(&entry.path).await {
                    warn!("Error cleaning {}: {}", entry.name, e);
                    error.push(DisposalStep::Clean, step_detail(e));
                }

                error.into_outcome()
            }
            WorkspaceState::Plain => delete(entry).await,
        }
    }

    /// Classify `entry` and dispose of it accordingly
    pub async fn classify_and_dispose(&self, entry: &CacheEntry) -> DisposalOutcome {
        let state = classify(self.vcs, &entry.path).await;
        self.dispose(entry, state).await
    }

    /// Drop untracked files from a tracked workspace; plain ones are kept
    pub async fn clean_untracked(&self, entry: &CacheEntry) -> DisposalOutcome {
        match classify(self.vcs, &entry.path).await {
            WorkspaceState::Plain => DisposalOutcome::Kept,
            WorkspaceState::VersionControlled => {
                debug!("Cleaning untracked files in {}", entry.path.display());
                let mut error = DisposalError::default();
                if let Err(e) = self.vcs.clean(&entry.path).await {
                    warn!("Error cleaning {}: {}", entry.name, e);
                    error.push(DisposalStep::Clean, step_detail(e));
                }
                error.into_outcome()
            }
        }
    }
}

/// Recursively delete a workspace without looking at version control
pub async fn delete(entry: &CacheEntry) -> DisposalOutcome {
    debug!("Deleting {}", entry.path.display());
    let mut error = DisposalError::default();

    if let Err(e) = delete_tree(&entry.path).await {
        warn!("Error deleting {}: {}", entry.path.display(), e);
        error.push(DisposalStep::Delete, e.to_string());
    }

    error.into_outcome()
}

/// `remove_dir_all` that treats an already-absent tree as deleted
async fn delete_tree(path: &Path) -> io::Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn step_detail(err: PkgCacheError) -> String {
    match err {
        PkgCacheError::Vcs { detail, .. } => detail,
        other => other.to_string(),
    }
}
