//! Error types for report generation.

/// What kind of object a lookup failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Run,
    Config,
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Missing::Run => write!(f, "run"),
            Missing::Config => write!(f, "report config"),
        }
    }
}

/// Report generation errors.
///
/// Per-point problems are not errors: they travel as [`crate::point::InvalidPoint`] values
/// and end up in the report's `unprocessed_iters`.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Run or config identifier does not resolve.
    #[error("{kind} not found: {id}")]
    NotFound { kind: Missing, id: String },

    /// Malformed or inconsistent configuration content.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// `records_order` names an argument no point of the test carries.
    #[error(
        "configuration error: records_order of '{test}' test names argument '{arg}', \
         which is not a record argument (common, axis or sequence argument?)"
    )]
    RecordsOrder { test: String, arg: String },

    /// Config file uses a version this build does not understand.
    #[error("unsupported config version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Input document could not be decoded.
    #[error("failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn run_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: Missing::Run,
            id: id.into(),
        }
    }

    pub fn config_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: Missing::Config,
            id: id.into(),
        }
    }

    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 1,

            Self::Config { .. } => 2,
            Self::RecordsOrder { .. } => 2,
            Self::UnsupportedVersion { .. } => 2,

            Self::Parse { .. } => 3,
            Self::Io { .. } => 3,
        }
    }

    /// Whether the error stems from the report configuration rather than the data.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::RecordsOrder { .. } | Self::UnsupportedVersion { .. }
        )
    }
}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;
