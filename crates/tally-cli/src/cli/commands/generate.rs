//! Generate a report.
//!
//! # Usage
//! ```bash
//! tally generate --run run.json --config net --config-dir reports
//! tally generate --run run.json --config net -o report.json --compact
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tally_core::{generate_report, ConfigDir, RunFile};

use super::write_output;
use crate::cli::args::ConfigDirArgs;
use crate::exit_codes::EXIT_SUCCESS;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Run document (JSON)
    #[arg(long)]
    pub run: PathBuf,

    /// Report config id
    #[arg(long = "config")]
    pub config_id: String,

    #[command(flatten)]
    pub configs: ConfigDirArgs,

    /// Run to report on; defaults to the id stored in the run document
    #[arg(long)]
    pub run_id: Option<String>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

pub fn run(args: GenerateArgs) -> Result<i32> {
    let run = RunFile::load(&args.run)?;
    let configs = ConfigDir::open(&args.configs.config_dir)?;
    let run_id = args.run_id.as_deref().unwrap_or(&run.id);

    let report = generate_report(&run, &configs, run_id, &args.config_id)?;

    let json = if args.compact {
        serde_json::to_string(&report)
    } else {
        report.to_json_pretty()
    }
    .context("failed to serialize report")?;

    write_output(args.output.as_deref(), &json)?;
    Ok(EXIT_SUCCESS)
}
