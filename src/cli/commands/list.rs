//! List command - show build cache workspaces

use super::build_dir;
use crate::backend::{GitCli, VersionControl};
use crate::cache::{classify, inventory, CacheEntry, WorkspaceState};
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::PkgCacheResult;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;

/// A workspace and how it would be disposed
#[derive(Debug, Serialize)]
struct ListedEntry {
    #[serde(flatten)]
    entry: CacheEntry,
    state: WorkspaceState,
}

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> PkgCacheResult<()> {
    let root = build_dir(args.build_dir, config);
    let vcs = GitCli::new(&config.vcs);
    let listed = collect(&vcs, &root).await?;

    if listed.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(&ctx, &format!("No workspaces in {}", root.display()));
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&listed),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listed)?),
        OutputFormat::Plain => {
            for item in &listed {
                println!("{}", item.entry.name);
            }
        }
    }

    Ok(())
}

async fn collect(
    vcs: &dyn VersionControl,
    root: &std::path::Path,
) -> PkgCacheResult<Vec<ListedEntry>> {
    let entries = inventory::list(root).await?;
    let mut listed = Vec::with_capacity(entries.len());
    for entry in entries {
        let state = classify(vcs, &entry.path).await;
        listed.push(ListedEntry { entry, state });
    }
    Ok(listed)
}

fn print_table(listed: &[ListedEntry]) {
    println!("{:<40} {:<8}", style("BASE").bold(), style("STATE").bold());
    println!("{}", "-".repeat(49));

    for item in listed {
        let state = match item.state {
            WorkspaceState::VersionControlled => style(item.state.to_string()).cyan(),
            WorkspaceState::Plain => style(item.state.to_string()).dim(),
        };
        println!("{:<40} {:<8}", item.entry.name, state);
    }

    println!();
    println!("{} workspace(s)", listed.len());
}
