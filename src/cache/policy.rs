//! Retention policy
//!
//! | remove_all | keep_installed and installed | keep_current and published | Decision |
//! |------------|------------------------------|----------------------------|----------|
//! | true       | any                          | any                        | Remove   |
//! | false      | true                         | any                        | Keep     |
//! | false      | any                          | true                       | Keep     |
//! | false      | false                        | false                      | Remove   |

use crate::cache::inventory::CacheEntry;
use crate::cache::membership::MembershipSet;
use crate::config::CleanMethod;
use serde::Serialize;
use std::fmt;

/// Flags deciding which workspaces survive a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Keep workspaces of installed packages
    pub keep_installed: bool,
    /// Keep workspaces still published in the remote index
    pub keep_current: bool,
    /// Remove everything regardless of the other flags
    pub remove_all: bool,
}

impl RetentionPolicy {
    /// Build a policy from configured clean methods
    pub fn from_clean_methods(methods: &[CleanMethod], remove_all: bool) -> Self {
        Self {
            keep_installed: methods.contains(&CleanMethod::KeepInstalled),
            keep_current: methods.contains(&CleanMethod::KeepCurrent),
            remove_all,
        }
    }

    /// Whether deciding needs the installed set
    pub fn needs_installed(&self) -> bool {
        self.keep_installed && !self.remove_all
    }

    /// Whether deciding needs the remote-availability set
    pub fn needs_remote(&self) -> bool {
        self.keep_current && !self.remove_all
    }
}

/// Disposition of a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Keep,
    Remove,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Decide whether `entry` survives. The first matching row wins.
pub fn decide(
    entry: &CacheEntry,
    installed: &MembershipSet,
    remote_available: &MembershipSet,
    policy: &RetentionPolicy,
) -> Decision {
    if policy.remove_all {
        return Decision::Remove;
    }
    if policy.keep_installed && installed.contains(&entry.name) {
        return Decision::Keep;
    }
    if policy.keep_current && remote_available.contains(&entry.name) {
        return Decision::Keep;
    }
    Decision::Remove
}
