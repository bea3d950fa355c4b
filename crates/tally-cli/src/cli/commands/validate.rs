use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tally_core::{load_config, ConfigFormat};

use crate::exit_codes::{self, EXIT_SUCCESS};

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Config files to check; every config in --config-dir when omitted
    pub files: Vec<PathBuf>,

    #[arg(long, env = "TALLY_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,
}

pub fn run(args: ValidateArgs) -> Result<i32> {
    let files = if !args.files.is_empty() {
        args.files
    } else if let Some(dir) = &args.config_dir {
        config_files(dir)?
    } else {
        bail!("nothing to validate: pass config files or --config-dir");
    };

    let mut code = EXIT_SUCCESS;
    for path in &files {
        match load_config(path) {
            Ok(cfg) => println!("ok     {} ({})", path.display(), cfg.id),
            Err(e) => {
                println!("error  {}: {e}", path.display());
                code = code.max(exit_codes::for_error(&anyhow::Error::from(e)));
            }
        }
    }
    tracing::debug!(files = files.len(), code, "validation finished");
    Ok(code)
}

fn config_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && ConfigFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
