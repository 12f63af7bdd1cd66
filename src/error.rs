//! Error types for pkgcache
//!
//! All modules use `PkgCacheResult<T>` as their return type. Per-entry
//! disposal failures are not errors at this level; they travel as data in
//! [`crate::cache::DisposalOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pkgcache operations
pub type PkgCacheResult<T> = Result<T, PkgCacheError>;

/// All errors that can occur in pkgcache
#[derive(Error, Debug)]
pub enum PkgCacheError {
    // Pass preconditions
    #[error("Cannot read build directory {path}: {source}")]
    CacheRootRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Remote package index query failed: {0}")]
    RemoteQuery(String),

    // Collaborator errors
    #[error("{step} failed in {path}: {detail}")]
    Vcs {
        step: &'static str,
        path: PathBuf,
        detail: String,
    },

    #[error("Package manager error: {0}")]
    PackageManager(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Outcome errors
    #[error("{failed} of {total} cache entries could not be disposed")]
    DisposalIncomplete { failed: usize, total: usize },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl PkgCacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Whether this error aborts a pass before any entry is touched
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::CacheRootRead { .. } | Self::RemoteQuery(_))
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CacheRootRead { .. } => {
                Some("Set cache.build_dir in the config or pass --build-dir")
            }
            Self::RemoteQuery(_) => Some(
                "Check network access, or drop KeepCurrent from cache.clean_method",
            ),
            Self::DisposalIncomplete { .. } => Some("Re-run with -v for per-entry details"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PkgCacheError::RemoteQuery("timed out".to_string());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn error_hint() {
        let err = PkgCacheError::CacheRootRead {
            path: PathBuf::from("/nope"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.hint().unwrap().contains("build_dir"));
        assert_eq!(PkgCacheError::User("x".into()).hint(), None);
    }

    #[test]
    fn error_precondition() {
        assert!(PkgCacheError::RemoteQuery(String::new()).is_precondition());
        assert!(!PkgCacheError::PackageManager(String::new()).is_precondition());
    }

    #[test]
    fn vcs_error_names_step() {
        let err = PkgCacheError::Vcs {
            step: "reset",
            path: PathBuf::from("/cache/foo"),
            detail: "fatal: not a git repository".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "reset failed in /cache/foo: fatal: not a git repository"
        );
    }
}
