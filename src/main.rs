//! pkgcache - AUR build cache maintenance
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use pkgcache::cli::{commands, Cli, Commands};
use pkgcache::config::{Config, ConfigManager};
use pkgcache::error::PkgCacheResult;
use pkgcache::ui;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PkgCacheResult<()> {
    let cli = Cli::parse();

    // Completions must not depend on a readable config
    if let Commands::Completions(args) = cli.command {
        return commands::completions(args);
    }

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load().await?;

    init_tracing(cli.verbose, &config);
    ui::init_theme();

    match cli.command {
        Commands::Clean(args) => commands::clean(args, &config).await,
        Commands::List(args) => commands::list(args, &config).await,
        Commands::Dispose(args) => commands::dispose(args, &config).await,
        Commands::Orphans(args) => commands::orphans(args, &config).await,
        Commands::Remove(args) => commands::remove(args, &config).await,
        Commands::Config(args) => commands::config(args, &manager, &config).await,
        Commands::Completions(_) => unreachable!("Completions handled above"),
    }
}

/// 0 = warn, 1 = info, 2+ = debug; JSON lines when `general.log_format = "json"`
fn init_tracing(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("pkgcache=warn"),
        1 => EnvFilter::new("pkgcache=info"),
        _ => EnvFilter::new("pkgcache=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time();

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
