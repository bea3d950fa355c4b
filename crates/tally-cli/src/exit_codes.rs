//! Exit codes of the `tally` binary. Part of the public contract.

use tally_core::ReportError;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_NOT_FOUND: i32 = 1; // Unknown run or config id
pub const EXIT_CONFIG_ERROR: i32 = 2; // Invalid report config, bad usage
pub const EXIT_INPUT_ERROR: i32 = 3; // Unreadable or malformed input, failed write

/// Exit code for a failed command.
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(report_err) = err.downcast_ref::<ReportError>() {
        return match report_err {
            ReportError::NotFound { .. } => EXIT_NOT_FOUND,
            e if e.is_config_error() => EXIT_CONFIG_ERROR,
            _ => EXIT_INPUT_ERROR,
        };
    }
    if err.downcast_ref::<std::io::Error>().is_some() {
        return EXIT_INPUT_ERROR;
    }
    EXIT_CONFIG_ERROR
}
