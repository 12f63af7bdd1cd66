//! CLI command implementations

pub mod clean;
pub mod completions;
pub mod config;
pub mod dispose;
pub mod list;
pub mod orphans;
pub mod remove;

pub use clean::execute as clean;
pub use completions::execute as completions;
pub use config::execute as config;
pub use dispose::execute as dispose;
pub use list::execute as list;
pub use orphans::execute as orphans;
pub use remove::execute as remove;

use crate::config::Config;
use std::path::PathBuf;

/// `--build-dir` when given, otherwise `cache.build_dir`
fn build_dir(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    arg.unwrap_or_else(|| config.cache.build_dir.clone())
}
