//! Git-backed workspace operations
//!
//! Workspaces cloned from a package repository carry a `.git` marker.
//! Those can be restored to their tracked state instead of being deleted.

use crate::backend::failure_detail;
use crate::config::schema::VcsConfig;
use crate::error::{PkgCacheError, PkgCacheResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Version control operations on a single workspace directory
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Whether `path` holds a checkout this tool can reset. Never mutates.
    async fn is_version_controlled(&self, path: &Path) -> bool;

    /// Hard reset the checkout to its tracked head
    async fn reset(&self, path: &Path) -> PkgCacheResult<()>;

    /// Remove untracked and ignored files from the checkout
    async fn clean(&self, path: &Path) -> PkgCacheResult<()>;
}

/// Version control through the git command line
pub struct GitCli {
    enabled: bool,
    bin: String,
    flags: Vec<String>,
}

impl GitCli {
    /// Create a git runner from config
    pub fn new(config: &VcsConfig) -> Self {
        Self {
            enabled: config.enabled,
            bin: config.bin.clone(),
            flags: config.flags.clone(),
        }
    }

    /// Run `git <flags> -C <dir> <args>` and capture its output
    async fn exec(&self, dir: &Path, args: &[&str]) -> PkgCacheResult<Output> {
        debug!("Executing: {} -C {} {:?}", self.bin, dir.display(), args);

        Command::new(&self.bin)
            .args(&self.flags)
            .arg("-C")
            .arg(dir)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PkgCacheError::command_failed(format!("{} {:?}", self.bin, args), e))
    }

    async fn run_step(&self, step: &'static str, dir: &Path, args: &[&str]) -> PkgCacheResult<()> {
        let output = self.exec(dir, args).await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(PkgCacheError::Vcs {
                step,
                path: dir.to_path_buf(),
                detail: failure_detail(&output),
            })
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(&VcsConfig::default())
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn is_version_controlled(&self, path: &Path) -> bool {
        if !self.enabled {
            return false;
        }
        // .git is a directory for clones and a file for worktrees
        tokio::fs::metadata(path.join(".git")).await.is_ok()
    }

    async fn reset(&self, path: &Path) -> PkgCacheResult<()> {
        self.run_step("reset", path, &["reset", "--hard", "HEAD"]).await
    }

    async fn clean(&self, path: &Path) -> PkgCacheResult<()> {
        self.run_step("clean", path, &["clean", "-fx"]).await
    }
}
