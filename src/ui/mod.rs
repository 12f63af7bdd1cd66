//! Terminal output for the CLI
//!
//! Uses `cliclack` for prompts and log lines in an interactive terminal and
//! falls back to plain prefixed lines in CI or when piped.
//!
//! # Example
//!
//! ```rust,ignore
//! use pkgcache::ui::{self, UiContext};
//!
//! let ctx = UiContext::detect().with_auto_yes(args.yes);
//!
//! ui::intro(&ctx, "Build cache");
//! if ui::confirm(&ctx, "Remove all other packages from cache?", true).await? {
//!     // ...
//! }
//! ui::outro_success(&ctx, "Build cache is clean");
//! ```

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    entry_outcome, intro, key_value, outcome_summary, outro_success, outro_warn, remark,
    step_error_detail, step_info, step_ok, step_ok_detail, step_warn_hint,
};
pub use progress::{DisposalProgress, TaskSpinner};
pub use prompts::confirm;
pub use theme::{init_theme, PkgCacheTheme};
