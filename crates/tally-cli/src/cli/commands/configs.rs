use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tally_core::{
    applicable_configs, ConfigDir, ConfigListing, ConfigSource, ObservationSource, ReportConfig,
    RunFile,
};

use crate::cli::args::ConfigDirArgs;
use crate::exit_codes::EXIT_SUCCESS;

#[derive(Args, Debug, Clone)]
pub struct ConfigsArgs {
    /// Only list active configs whose tests appear in this run document
    #[arg(long)]
    pub run: Option<PathBuf>,

    #[command(flatten)]
    pub configs: ConfigDirArgs,
}

pub fn run(args: ConfigsArgs) -> Result<i32> {
    let source = ConfigDir::open(&args.configs.config_dir)?;
    let configs = source.configs()?;

    let listing: Vec<ConfigListing> = match &args.run {
        Some(path) => {
            let run = RunFile::load(path)?;
            let info = run.run(&run.id)?;
            applicable_configs(&info, &configs)
        }
        None => configs.iter().map(ReportConfig::listing).collect(),
    };

    let json = serde_json::to_string_pretty(&listing).context("failed to serialize listing")?;
    super::write_output(None, &json)?;
    Ok(EXIT_SUCCESS)
}
