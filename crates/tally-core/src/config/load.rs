use super::ReportConfig;
use crate::errors::{ReportError, ReportResult};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Format implied by the file extension; `None` for files that are not report configs.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
            Some("json") => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

/// Parse and validate a report config document.
pub fn parse_config(raw: &str, format: ConfigFormat) -> ReportResult<ReportConfig> {
    let cfg: ReportConfig = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(raw).map_err(|e| ReportError::Parse {
            what: "report config (YAML)".into(),
            message: e.to_string(),
        })?,
        ConfigFormat::Json => serde_json::from_str(raw).map_err(|e| ReportError::Parse {
            what: "report config (JSON)".into(),
            message: e.to_string(),
        })?,
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Load a report config file; YAML unless the extension says JSON.
pub fn load_config(path: &Path) -> ReportResult<ReportConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    let format = ConfigFormat::from_path(path).unwrap_or(ConfigFormat::Yaml);
    parse_config(&raw, format).map_err(|e| match e {
        ReportError::Parse { what, message } => ReportError::Parse {
            what: format!("{what} {}", path.display()),
            message,
        },
        other => other,
    })
}
