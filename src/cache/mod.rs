//! Build cache reconciliation and retention
//!
//! The build directory holds one workspace per package base. A pass decides
//! which workspaces are still needed and disposes of the rest.
//!
//! # Pass stages
//!
//! | Stage | Module | Fatal on failure |
//! |-------|--------|------------------|
//! | Inventory | [`inventory`] | yes |
//! | Membership | [`resolver`] | yes |
//! | Decision | [`policy`] | - |
//! | Disposal | [`disposal`] | no, recorded per entry |

pub mod disposal;
pub mod inventory;
pub mod membership;
pub mod policy;
pub mod reconcile;
pub mod resolver;
pub mod vcs_store;
pub mod workspace;

pub use disposal::{
    DisposalError, DisposalExecutor, DisposalOutcome, DisposalStep, EntryOutcome, StepFailure,
};
pub use inventory::CacheEntry;
pub use membership::MembershipSet;
pub use policy::{decide, Decision, RetentionPolicy};
pub use reconcile::{failed_count, OutcomeObserver, PlannedEntry, Reconciler};
pub use resolver::{resolve_installed, resolve_remote_available};
pub use vcs_store::{SourceState, VcsStore};
pub use workspace::{classify, WorkspaceState};
