use clap::Parser;

mod cli;
pub mod exit_codes;
mod logging;

use cli::args::Cli;
use cli::commands::dispatch;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_format);
    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("fatal: {e:#}");
            exit_codes::for_error(&e)
        }
    };
    std::process::exit(code);
}
