//! pkgcache - AUR build cache maintenance
//!
//! Decides which package build workspaces are still needed, resets
//! version-controlled checkouts and deletes the rest.

pub mod audit;
pub mod backend;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod packages;
pub mod ui;

pub use error::{PkgCacheError, PkgCacheResult};
