use super::args::*;
use crate::exit_codes::EXIT_SUCCESS;
use anyhow::{Context, Result};
use std::path::Path;

pub mod configs;
pub mod generate;
pub mod validate;

pub fn dispatch(cli: Cli) -> Result<i32> {
    match cli.cmd {
        Command::Generate(args) => generate::run(args),
        Command::Configs(args) => configs::run(args),
        Command::Validate(args) => validate::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(EXIT_SUCCESS)
        }
    }
}

/// Write command output to `path`, or to stdout when no path is given.
pub(crate) fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, format!("{content}\n"))
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}
