//! Configuration schema for pkgcache
//!
//! Configuration is stored at `~/.config/pkgcache/config.toml`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Build cache settings
    pub cache: CacheConfig,

    /// Remote package index settings
    pub remote: RemoteConfig,

    /// Version control settings
    pub vcs: VcsConfig,

    /// System package manager settings
    pub pacman: PacmanConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Enable audit logging
    pub audit_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            audit_log: true,
        }
    }
}

/// Retention rules that can be listed in `cache.clean_method`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CleanMethod {
    /// Keep workspaces of installed packages
    KeepInstalled,
    /// Keep workspaces whose base is still published in the remote index
    KeepCurrent,
}

impl fmt::Display for CleanMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepInstalled => write!(f, "KeepInstalled"),
            Self::KeepCurrent => write!(f, "KeepCurrent"),
        }
    }
}

/// Build cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one workspace per package base
    pub build_dir: PathBuf,

    /// Retention rules applied by `clean`
    pub clean_method: Vec<CleanMethod>,

    /// Entries disposed concurrently (1 = sequential)
    pub jobs: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            build_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pkgcache"),
            clean_method: vec![CleanMethod::KeepInstalled],
            jobs: 1,
        }
    }
}

/// Remote package index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// RPC endpoint of the package index
    pub rpc_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum package names per info request
    pub batch_size: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://aur.archlinux.org/rpc/".to_string(),
            timeout_secs: 30,
            batch_size: 150,
        }
    }
}

/// Version control configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VcsConfig {
    /// Treat git checkouts as version-controlled workspaces
    pub enabled: bool,

    /// Git binary
    pub bin: String,

    /// Extra global arguments passed before the subcommand
    pub flags: Vec<String>,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bin: "git".to_string(),
            flags: vec![],
        }
    }
}

/// System package manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacmanConfig {
    /// Package manager binary
    pub bin: String,

    /// Privilege escalation binary used for removals
    pub sudo_bin: String,

    /// Package database root
    pub db_path: PathBuf,
}

impl Default for PacmanConfig {
    fn default() -> Self {
        Self {
            bin: "pacman".to_string(),
            sudo_bin: "sudo".to_string(),
            db_path: PathBuf::from("/var/lib/pacman"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[cache]"));
        assert!(toml.contains("clean_method = [\"KeepInstalled\"]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.cache.clean_method, vec![CleanMethod::KeepInstalled]);
        assert_eq!(config.cache.jobs, 1);
        assert_eq!(config.vcs.bin, "git");
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [cache]
            build_dir = "/tmp/builds"
            clean_method = ["KeepInstalled", "KeepCurrent"]
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.build_dir, PathBuf::from("/tmp/builds"));
        assert_eq!(
            config.cache.clean_method,
            vec![CleanMethod::KeepInstalled, CleanMethod::KeepCurrent]
        );
        assert_eq!(config.remote.batch_size, 150); // default preserved
    }

    #[test]
    fn config_rejects_unknown_clean_method() {
        let toml = r#"
            [cache]
            clean_method = ["KeepEverything"]
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }
}
