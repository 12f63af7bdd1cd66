//! Collaborator wiring from configuration

use crate::backend::aur::{AurRpc, RemoteIndex};
use crate::backend::git::{GitCli, VersionControl};
use crate::backend::pacman::{PackageDatabase, PacmanCli};
use crate::config::Config;

/// The set of collaborators a cache pass runs against
pub struct Backends {
    /// Workspace probe, reset and clean
    pub vcs: Box<dyn VersionControl>,
    /// Installed packages and removals
    pub packages: Box<dyn PackageDatabase>,
    /// Remote package metadata
    pub index: Box<dyn RemoteIndex>,
}

impl Backends {
    /// Create the system collaborators described by `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            vcs: Box::new(GitCli::new(&config.vcs)),
            packages: Box::new(PacmanCli::new(&config.pacman)),
            index: Box::new(AurRpc::new(&config.remote)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::VcsConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn from_config_honours_vcs_toggle() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();

        let mut config = Config::default();
        config.vcs = VcsConfig {
            enabled: false,
            ..VcsConfig::default()
        };
        let backends = Backends::from_config(&config);
        assert!(!backends.vcs.is_version_controlled(temp.path()).await);

        let backends = Backends::from_config(&Config::default());
        assert!(backends.vcs.is_version_controlled(temp.path()).await);
    }
}
