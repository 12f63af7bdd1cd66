//! Status lines with a plain-text fallback
//!
//! Interactive runs go through cliclack's log; otherwise each line gets a
//! bracketed tag such as `[OK]` so piped output stays greppable.

use super::context::UiContext;
use crate::cache::{DisposalOutcome, EntryOutcome};
use console::style;

#[derive(Debug, Clone, Copy)]
enum Level {
    Ok,
    Info,
    Warn,
    Fail,
}

fn step(ctx: &UiContext, level: Level, message: &str) {
    if ctx.use_fancy_output() {
        let _ = match level {
            Level::Ok => cliclack::log::success(message),
            Level::Info => cliclack::log::info(message),
            Level::Warn => cliclack::log::warning(message),
            Level::Fail => cliclack::log::error(message),
        };
    } else {
        let tag = match level {
            Level::Ok => style("[OK]").green(),
            Level::Info => style("[INFO]").blue(),
            Level::Warn => style("[WARN]").yellow(),
            Level::Fail => style("[FAIL]").red(),
        };
        println!("  {} {}", tag, message);
    }
}

pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).blue().bold()).ok();
    } else {
        println!("{}", style(title).blue().bold());
        println!();
    }
}

pub fn outro_success(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).green().bold()).ok();
    } else {
        println!();
        println!("{} {}", style("[OK]").green(), message);
    }
}

pub fn outro_warn(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).yellow().bold()).ok();
    } else {
        println!();
        println!("{} {}", style("[WARN]").yellow(), message);
    }
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    step(ctx, Level::Ok, message);
}

/// `message (detail)`, detail dimmed
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    step(ctx, Level::Ok, &format!("{} ({})", message, style(detail).dim()));
}

pub fn step_info(ctx: &UiContext, message: &str) {
    step(ctx, Level::Info, message);
}

/// `message - hint`, hint dimmed
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    step(ctx, Level::Warn, &format!("{} - {}", message, style(hint).dim()));
}

pub fn step_error_detail(ctx: &UiContext, message: &str, detail: &str) {
    step(ctx, Level::Fail, &format!("{}: {}", message, style(detail).red()));
}

/// Dimmed line without a tag
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::remark(message).ok();
    } else {
        println!("  {}", style(message).dim());
    }
}

pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// Report what happened to one cache entry
pub fn entry_outcome(ctx: &UiContext, entry: &EntryOutcome) {
    match &entry.outcome {
        DisposalOutcome::Removed => step_ok(ctx, &entry.name),
        DisposalOutcome::Kept => remark(ctx, &format!("{} (kept)", entry.name)),
        DisposalOutcome::Failed(err) => step_error_detail(ctx, &entry.name, &err.to_string()),
    }
}

/// One-line tally of a pass, e.g. `2 removed, 1 kept, 0 failed`
pub fn outcome_summary(outcomes: &[EntryOutcome]) -> String {
    let (mut removed, mut kept, mut failed) = (0, 0, 0);
    for entry in outcomes {
        match entry.outcome {
            DisposalOutcome::Removed => removed += 1,
            DisposalOutcome::Kept => kept += 1,
            DisposalOutcome::Failed(_) => failed += 1,
        }
    }
    format!("{} removed, {} kept, {} failed", removed, kept, failed)
}
