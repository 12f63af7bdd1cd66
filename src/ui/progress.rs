//! Spinners and progress bars with a plain-text fallback

use super::context::UiContext;
use crate::cache::{DisposalOutcome, EntryOutcome};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A cliclack spinner, or `...`/`[OK]` lines when not interactive
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    pub fn start(&mut self, message: &str) {
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            println!("{} {}", style("...").dim(), message);
        }
    }

    /// Stop with success message
    pub fn stop(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(message);
        } else {
            println!("{} {}", style("[OK]").green(), message);
        }
    }

    /// Stop with error message
    pub fn stop_error(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.error(message);
        } else {
            println!("{} {}", style("[FAIL]").red(), message);
        }
    }
}

/// Running tally of a disposal pass.
///
/// Interactive runs get an indicatif counter naming the last entry
/// finished; plain runs print nothing until the final report.
pub struct DisposalProgress {
    bar: Option<ProgressBar>,
}

impl DisposalProgress {
    pub fn new(ctx: &UiContext, label: &str) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template(
                    "  {spinner:.blue} {prefix}  {pos} done {msg:.dim}  {elapsed:.dim}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
            );
            bar.set_prefix(label.to_string());
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            println!("{} {}", style("...").dim(), label);
            None
        };
        Self { bar }
    }

    /// Count one finished entry
    pub fn on_outcome(&self, entry: &EntryOutcome) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
            let status = match entry.outcome {
                DisposalOutcome::Kept => "kept",
                DisposalOutcome::Removed => "removed",
                DisposalOutcome::Failed(_) => "failed",
            };
            bar.set_message(format!("{} {}", entry.name, status));
        }
    }

    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEntry;
    use std::path::Path;

    #[test]
    fn spinner_non_interactive() {
        let ctx = UiContext::non_interactive();
        let mut spinner = TaskSpinner::new(&ctx);
        spinner.start("Testing...");
        spinner.stop("Done");
        // Should not panic
    }

    #[test]
    fn disposal_progress_non_interactive() {
        let ctx = UiContext::non_interactive();
        let progress = DisposalProgress::new(&ctx, "Cleaning build cache");
        progress.on_outcome(&EntryOutcome::new(
            CacheEntry::under(Path::new("/cache"), "foo"),
            DisposalOutcome::Removed,
        ));
        progress.finish();
    }
}
