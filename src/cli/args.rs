//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// pkgcache - AUR build cache maintenance
///
/// Removes package build workspaces that are no longer needed, resets
/// version-controlled ones, and cleans up orphaned packages.
#[derive(Parser, Debug)]
#[command(name = "pkgcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PKGCACHE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove unneeded package workspaces from the build cache
    Clean(CleanArgs),

    /// List the workspaces in the build cache
    List(ListArgs),

    /// Dispose the workspaces of specific package bases
    Dispose(DisposeArgs),

    /// Uninstall dependencies nothing requires anymore
    Orphans(OrphansArgs),

    /// Uninstall packages and forget their VCS records
    Remove(RemoveArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Remove every workspace regardless of retention settings
    #[arg(short, long)]
    pub all: bool,

    /// Show what would be removed without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Build directory (defaults to cache.build_dir)
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Keep workspaces of installed packages
    #[arg(long)]
    pub keep_installed: bool,

    /// Keep workspaces of packages still in the remote index
    #[arg(long)]
    pub keep_current: bool,
}

impl CleanArgs {
    /// Whether retention was set on the command line, replacing the config
    pub fn overrides_retention(&self) -> bool {
        self.keep_installed || self.keep_current
    }
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Build directory (defaults to cache.build_dir)
    #[arg(long)]
    pub build_dir: Option<PathBuf>,
}

/// Arguments for the dispose command
#[derive(Parser, Debug)]
pub struct DisposeArgs {
    /// Package bases whose workspaces to dispose
    #[arg(required = true)]
    pub bases: Vec<String>,

    /// Delete the workspaces instead of resetting checkouts
    #[arg(long)]
    pub delete: bool,

    /// Build directory (defaults to cache.build_dir)
    #[arg(long)]
    pub build_dir: Option<PathBuf>,
}

/// Arguments for the orphans command
#[derive(Parser, Debug)]
pub struct OrphansArgs {
    /// Also remove packages only optionally required by others
    #[arg(long)]
    pub optional: bool,

    /// Don't ask the package manager for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the remove command
#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Packages to uninstall
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Don't ask the package manager for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format for the list command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Workspace names, one per line
    Plain,
}
