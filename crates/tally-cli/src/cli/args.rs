use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::commands::configs::ConfigsArgs;
use super::commands::generate::GenerateArgs;
use super::commands::validate::ValidateArgs;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Shape measurement results into table and chart reports"
)]
pub struct Cli {
    /// Log output format (stderr). Verbosity follows RUST_LOG.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a report for a run with one report config
    Generate(GenerateArgs),
    /// List report configs that apply to a run
    Configs(ConfigsArgs),
    /// Check report config files
    Validate(ValidateArgs),
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConfigDirArgs {
    /// Directory holding report configs (*.yaml, *.yml, *.json)
    #[arg(long, env = "TALLY_CONFIG_DIR", default_value = "reports")]
    pub config_dir: PathBuf,
}
