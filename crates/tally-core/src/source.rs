//! Where runs and report configs come from.
//!
//! Report generation only talks to the two traits below. [`RunFile`] and [`ConfigDir`] are
//! the file-backed implementations the command line uses.

use crate::config::{load_config, ConfigFormat, ReportConfig};
use crate::errors::{ReportError, ReportResult};
use crate::model::Observation;
use crate::scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A source revision the run was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Run-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunInfo {
    pub id: String,
    /// Run label name -> value (e.g. `board`, `kernel`).
    pub labels: BTreeMap<String, String>,
    pub branches: Vec<String>,
    pub revisions: Vec<Revision>,
    /// Tests with at least one observation, in discovery order.
    pub test_names: Vec<String>,
}

pub trait ObservationSource {
    /// Run metadata; an unknown id is [`ReportError::NotFound`].
    fn run(&self, run_id: &str) -> ReportResult<RunInfo>;

    /// Observations of one test of the run, in any order. Unknown tests yield nothing.
    fn observations(&self, run_id: &str, test_name: &str) -> ReportResult<Vec<Observation>>;
}

pub trait ConfigSource {
    /// A validated config; an unknown id is [`ReportError::NotFound`].
    fn config(&self, config_id: &str) -> ReportResult<ReportConfig>;

    /// Every config the source knows about.
    fn configs(&self) -> ReportResult<Vec<ReportConfig>>;
}

impl ConfigSource for Vec<ReportConfig> {
    fn config(&self, config_id: &str) -> ReportResult<ReportConfig> {
        let cfg = self
            .iter()
            .find(|c| c.id == config_id)
            .ok_or_else(|| ReportError::config_not_found(config_id))?;
        cfg.validate()?;
        Ok(cfg.clone())
    }

    fn configs(&self) -> ReportResult<Vec<ReportConfig>> {
        Ok(self.clone())
    }
}

/// One run stored as a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFile {
    #[serde(deserialize_with = "run_id")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar::string_map")]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub revisions: Vec<Revision>,
    #[serde(default)]
    pub observations: Vec<Observation>,
}

fn run_id<'de, D>(d: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    scalar::ScalarString::deserialize(d).map(|s| s.0)
}

impl RunFile {
    pub fn from_json(raw: &str) -> ReportResult<Self> {
        serde_json::from_str(raw).map_err(|e| ReportError::Parse {
            what: "run document".into(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> ReportResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        Self::from_json(&raw).map_err(|e| match e {
            ReportError::Parse { message, .. } => ReportError::Parse {
                what: format!("run document {}", path.display()),
                message,
            },
            other => other,
        })
    }

    fn test_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for obs in &self.observations {
            if !names.contains(&obs.test_name) {
                names.push(obs.test_name.clone());
            }
        }
        names
    }

    fn check_id(&self, run_id: &str) -> ReportResult<()> {
        if self.id == run_id {
            Ok(())
        } else {
            Err(ReportError::run_not_found(run_id))
        }
    }
}

impl ObservationSource for RunFile {
    fn run(&self, run_id: &str) -> ReportResult<RunInfo> {
        self.check_id(run_id)?;
        Ok(RunInfo {
            id: self.id.clone(),
            labels: self.labels.clone(),
            branches: self.branches.clone(),
            revisions: self.revisions.clone(),
            test_names: self.test_names(),
        })
    }

    fn observations(&self, run_id: &str, test_name: &str) -> ReportResult<Vec<Observation>> {
        self.check_id(run_id)?;
        Ok(self
            .observations
            .iter()
            .filter(|o| o.test_name == test_name)
            .cloned()
            .collect())
    }
}

/// A directory of report configs (`*.yaml`, `*.yml`, `*.json`), looked up by `id`.
///
/// Files are read in name order; for a repeated id the first file wins. A file that fails to
/// load is remembered under its `id` (or file stem) so that asking for it reports the load
/// error instead of a missing config.
#[derive(Debug, Clone)]
pub struct ConfigDir {
    configs: Vec<ReportConfig>,
    rejected: Vec<(String, PathBuf)>,
}

impl ConfigDir {
    pub fn open(root: impl Into<PathBuf>) -> ReportResult<Self> {
        let root = root.into();
        let entries = std::fs::read_dir(&root).map_err(|e| ReportError::io(&root, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ReportError::io(&root, e))?;
            let path = entry.path();
            if path.is_file() && ConfigFormat::from_path(&path).is_some() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut configs: Vec<ReportConfig> = Vec::new();
        let mut rejected = Vec::new();
        for path in paths {
            match load_config(&path) {
                Ok(cfg) => {
                    if configs.iter().any(|c| c.id == cfg.id) {
                        tracing::warn!(
                            path = %path.display(),
                            id = %cfg.id,
                            reason = "duplicate_id",
                            "skipping report config"
                        );
                        continue;
                    }
                    configs.push(cfg);
                }
                Err(e) => {
                    let id = declared_id(&path);
                    tracing::warn!(
                        path = %path.display(),
                        id = %id,
                        error = %e,
                        reason = "invalid_config",
                        "skipping report config"
                    );
                    rejected.push((id, path));
                }
            }
        }
        tracing::debug!(
            root = %root.display(),
            configs = configs.len(),
            rejected = rejected.len(),
            "loaded report configs"
        );
        Ok(Self { configs, rejected })
    }
}

/// The `id` a config file declares, read without validating the rest of the document.
/// Falls back to the file stem when the file does not parse at all.
fn declared_id(path: &Path) -> String {
    let stem = || {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let Ok(raw) = std::fs::read_to_string(path) else {
        return stem();
    };
    // JSON documents are valid YAML flow mappings.
    let Ok(doc) = serde_yaml::from_str::<serde_yaml::Value>(&raw) else {
        return stem();
    };
    match doc.get("id") {
        Some(serde_yaml::Value::String(s)) => s.clone(),
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        _ => stem(),
    }
}

impl ConfigSource for ConfigDir {
    fn config(&self, config_id: &str) -> ReportResult<ReportConfig> {
        if let Some(cfg) = self.configs.iter().find(|c| c.id == config_id) {
            return Ok(cfg.clone());
        }
        match self.rejected.iter().find(|(id, _)| id == config_id) {
            // Reload so the caller sees the error that made the file unusable.
            Some((_, path)) => load_config(path),
            None => Err(ReportError::config_not_found(config_id)),
        }
    }

    fn configs(&self) -> ReportResult<Vec<ReportConfig>> {
        Ok(self.configs.clone())
    }
}
