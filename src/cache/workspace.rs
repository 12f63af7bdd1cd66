//! Workspace classification

use crate::backend::VersionControl;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Whether a workspace can be restored through version control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceState {
    /// A checkout that can be reset and cleaned
    #[serde(rename = "vcs")]
    VersionControlled,
    /// Anything else; can only be deleted
    Plain,
}

impl fmt::Display for WorkspaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionControlled => write!(f, "vcs"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// Probe `path` without touching it
pub async fn classify(vcs: &dyn VersionControl, path: &Path) -> WorkspaceState {
    if vcs.is_version_controlled(path).await {
        WorkspaceState::VersionControlled
    } else {
        WorkspaceState::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GitCli;
    use tempfile::TempDir;

    #[tokio::test]
    async fn classify_by_marker() {
        let temp = TempDir::new().unwrap();
        let git = GitCli::default();

        let plain = temp.path().join("plain");
        let tracked = temp.path().join("tracked");
        std::fs::create_dir_all(&plain).unwrap();
        std::fs::create_dir_all(tracked.join(".git")).unwrap();

        assert_eq!(classify(&git, &plain).await, WorkspaceState::Plain);
        assert_eq!(
            classify(&git, &tracked).await,
            WorkspaceState::VersionControlled
        );
    }

    #[test]
    fn state_display() {
        assert_eq!(WorkspaceState::VersionControlled.to_string(), "vcs");
        assert_eq!(WorkspaceState::Plain.to_string(), "plain");
    }
}
