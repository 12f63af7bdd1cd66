//! Collaborators consumed by the cache engine
//!
//! Each external system sits behind an async trait so the engine can be
//! driven by real tools or by in-memory doubles:
//! - [`VersionControl`]: workspace probe, reset and clean (git)
//! - [`PackageDatabase`]: installed packages and removals (pacman)
//! - [`RemoteIndex`]: bulk package metadata lookup (AUR RPC)

mod aur;
mod factory;
mod git;
mod pacman;

pub use aur::{AurRpc, RemoteIndex, RemotePackage};
pub use factory::Backends;
pub use git::{GitCli, VersionControl};
pub use pacman::{InstalledPackage, PackageDatabase, PacmanCli};

use std::process::Output;

/// Extract a one-line failure detail from a finished command.
///
/// Uses the last non-empty stderr line, falling back to the exit status
/// when the tool printed nothing.
pub(crate) fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("exited with {}", output.status))
}
