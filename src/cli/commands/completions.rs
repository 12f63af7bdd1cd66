//! Completions command - print a shell completion script

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::PkgCacheResult;
use clap::CommandFactory;
use clap_complete::generate;
use std::io;

/// Write the completion script for `args.shell` to stdout
pub fn execute(args: CompletionsArgs) -> PkgCacheResult<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "pkgcache", &mut io::stdout());
    Ok(())
}
