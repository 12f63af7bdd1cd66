//! Build directory inventory

use crate::error::{PkgCacheError, PkgCacheResult};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// One workspace directory in the build cache.
///
/// The directory name is the package base the workspace was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    /// Package base (the directory name)
    pub name: String,
    /// Full path of the workspace
    pub path: PathBuf,
}

impl CacheEntry {
    /// Entry for `name` under `root`, whether or not it exists yet
    pub fn under(root: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: root.join(name),
        }
    }

    /// Entry for `name` under `root`, or `None` when `name` is not a bare
    /// directory name and could resolve outside `root`
    pub fn checked_under(root: &Path, name: &str) -> Option<Self> {
        is_base_name(name).then(|| Self::under(root, name))
    }
}

/// Whether `name` is exactly one normal path component.
///
/// Rejects separators, `.`, `..`, absolute paths and the empty string.
pub fn is_base_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('/')
}

/// List the workspaces under `root`, sorted by name.
///
/// Only directories are returned; stray files and symlinks are skipped.
/// Failing to read `root` itself is fatal for the pass.
pub async fn list(root: &Path) -> PkgCacheResult<Vec<CacheEntry>> {
    let read_err = |source| PkgCacheError::CacheRootRead {
        path: root.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    let mut dir = fs::read_dir(root).await.map_err(read_err)?;

    while let Some(child) = dir.next_entry().await.map_err(read_err)? {
        let file_type = match child.file_type().await {
            Ok(t) => t,
            Err(e) => {
                debug!("Skipping {}: {}", child.path().display(), e);
                continue;
            }
        };
        if !file_type.is_dir() {
            continue;
        }

        let name = child.file_name().to_string_lossy().into_owned();
        entries.push(CacheEntry {
            name,
            path: child.path(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Inventoried {} workspace(s) in {}", entries.len(), root.display());
    Ok(entries)
}
