//! Persistent record of VCS sources behind installed packages
//!
//! Development packages built from a git source are tracked here so their
//! upstream heads can be compared later. The store is loaded and saved
//! explicitly by whoever owns it; nothing reads it implicitly.

use crate::error::{PkgCacheError, PkgCacheResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Last known state of one VCS source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceState {
    /// Branch being followed
    #[serde(default)]
    pub branch: String,
    /// Protocols the source can be fetched over
    #[serde(default)]
    pub protocols: Vec<String>,
    /// Commit the package was last built from
    #[serde(default)]
    pub sha: String,
}

/// Package name => source url => state
pub type SourceMap = BTreeMap<String, BTreeMap<String, SourceState>>;

/// JSON-backed store of tracked VCS sources
#[derive(Debug)]
pub struct VcsStore {
    path: PathBuf,
    packages: SourceMap,
}

impl VcsStore {
    /// Load the store at `path`; a missing file is an empty store
    pub async fn load(path: &Path) -> PkgCacheResult<Self> {
        let packages = match fs::read_to_string(path).await {
            Ok(content) if content.trim().is_empty() => SourceMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No VCS store at {}, starting empty", path.display());
                SourceMap::new()
            }
            Err(e) => {
                return Err(PkgCacheError::io(
                    format!("reading VCS store {}", path.display()),
                    e,
                ))
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            packages,
        })
    }

    /// Write the store back to its file
    pub async fn save(&self) -> PkgCacheResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PkgCacheError::io("creating state directory", e))?;
        }

        let content = serde_json::to_string_pretty(&self.packages)?;
        fs::write(&self.path, content).await.map_err(|e| {
            PkgCacheError::io(format!("writing VCS store {}", self.path.display()), e)
        })
    }

    /// Record the state of one source of `package`
    #[cfg(test)]
    pub fn track(&mut self, package: &str, url: &str, state: SourceState) {
        self.packages
            .entry(package.to_string())
            .or_default()
            .insert(url.to_string(), state);
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Forget `names`. Returns true when anything was dropped, i.e. when
    /// the store needs saving.
    pub fn remove_packages(&mut self, names: &[String]) -> bool {
        let mut updated = false;
        for name in names {
            if self.packages.remove(name).is_some() {
                debug!("Dropped VCS record for {}", name);
                updated = true;
            }
        }
        updated
    }
}
