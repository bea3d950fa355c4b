//! Report configuration.
//!
//! A report config describes, per test, which argument is the x-axis, which metrics become
//! y-values, which argument splits points into sequences and how records are ordered. It is
//! deserialized once, validated with [`ReportConfig::validate`], and then only read.

mod load;

pub use load::{load_config, parse_config, ConfigFormat};

use crate::errors::{ReportError, ReportResult};
use crate::model::SUBJECT_ATTRS;
use crate::scalar::{self, ScalarString};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Config file format this build understands.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    SUPPORTED_FORMAT_VERSION
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(deserialize_with = "scalar_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Revision of this config, echoed in the report.
    #[serde(default)]
    pub version: u32,
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Run label names the report title is composed of.
    #[serde(default)]
    pub title_content: Vec<String>,
    #[serde(default)]
    pub test_names_order: Vec<String>,
    pub tests: BTreeMap<String, TestConfig>,
}

fn scalar_id<'de, D>(d: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    ScalarString::deserialize(d).map(|s| s.0)
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    pub axis_x: AxisX,
    pub axis_y: Vec<AxisYClause>,
    pub sequences: SequencesConfig,
    /// Argument name -> values whose iterations are hidden from the report.
    #[serde(default, deserialize_with = "scalar::string_list_map")]
    pub not_show_args: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_true")]
    pub table_view: bool,
    #[serde(default = "default_true")]
    pub chart_view: bool,
    #[serde(default)]
    pub records_order: Vec<RecordsOrderEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AxisX {
    pub arg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AxisX {
    /// Column header used for the x-values.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.arg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SequencesConfig {
    /// Argument whose value splits a record into sequences.
    pub arg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg_label: Option<String>,
    /// Argument value -> display label.
    #[serde(default, deserialize_with = "scalar::string_map")]
    pub arg_vals_labels: BTreeMap<String, String>,
    /// Sequence the gain columns are computed against.
    #[serde(
        default,
        deserialize_with = "scalar::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub percentage_base_value: Option<String>,
}

impl SequencesConfig {
    pub fn arg_label(&self) -> &str {
        self.arg_label.as_deref().unwrap_or(&self.arg)
    }
}

/// One `axis_y` selection clause.
///
/// Within a clause `tool`, the `keys` block and every subject attribute must all match;
/// the entries of `keys` match if any one of them does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "AxisYClauseRaw")]
pub struct AxisYClause {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<BTreeMap<String, Vec<String>>>,
    /// Measurement-subject attribute -> allowed values.
    #[serde(flatten)]
    pub subjects: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
struct AxisYClauseRaw {
    #[serde(default, deserialize_with = "scalar::opt_string_list")]
    tool: Option<Vec<String>>,
    #[serde(default, deserialize_with = "scalar::opt_string_list_map")]
    keys: Option<BTreeMap<String, Vec<String>>>,
    #[serde(flatten)]
    subjects: BTreeMap<String, Vec<ScalarString>>,
}

impl From<AxisYClauseRaw> for AxisYClause {
    fn from(raw: AxisYClauseRaw) -> Self {
        Self {
            tool: raw.tool,
            keys: raw.keys,
            subjects: raw
                .subjects
                .into_iter()
                .map(|(k, v)| (k, v.into_iter().map(|s| s.0).collect()))
                .collect(),
        }
    }
}

/// A `records_order` entry: either a bare argument name, or an argument with an explicit
/// value ranking.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RecordsOrderEntry {
    Arg(String),
    Ranked {
        arg: String,
        #[serde(deserialize_with = "scalar::string_list")]
        values: Vec<String>,
    },
}

impl RecordsOrderEntry {
    pub fn arg(&self) -> &str {
        match self {
            RecordsOrderEntry::Arg(arg) => arg,
            RecordsOrderEntry::Ranked { arg, .. } => arg,
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            RecordsOrderEntry::Arg(_) => &[],
            RecordsOrderEntry::Ranked { values, .. } => values,
        }
    }
}

/// `config` block of a generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub name: String,
    pub description: String,
    pub version: u32,
}

/// One entry of the "configs applicable to a run" listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigListing {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: u32,
}

impl ReportConfig {
    /// Boundary validation. Everything downstream assumes a validated config.
    pub fn validate(&self) -> ReportResult<()> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ReportError::UnsupportedVersion {
                found: self.format_version,
                supported: SUPPORTED_FORMAT_VERSION,
            });
        }
        if self.tests.is_empty() {
            return Err(ReportError::config("config has no tests"));
        }
        for (test_name, test) in &self.tests {
            test.validate(test_name)?;
        }
        Ok(())
    }

    pub fn test(&self, test_name: &str) -> Option<&TestConfig> {
        self.tests.get(test_name)
    }

    pub fn info(&self) -> ConfigInfo {
        ConfigInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version,
        }
    }

    pub fn listing(&self) -> ConfigListing {
        ConfigListing {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version,
        }
    }
}

impl TestConfig {
    fn validate(&self, test_name: &str) -> ReportResult<()> {
        if self.axis_x.arg.is_empty() {
            return Err(ReportError::config(format!(
                "axis_x.arg is empty for '{test_name}' test in the configuration"
            )));
        }
        if self.sequences.arg.is_empty() {
            return Err(ReportError::config(format!(
                "sequences.arg is empty for '{test_name}' test in the configuration"
            )));
        }
        if self.axis_x.arg == self.sequences.arg {
            return Err(ReportError::config(format!(
                "argument '{}' is both axis_x and sequences argument for '{test_name}' test",
                self.axis_x.arg
            )));
        }

        for clause in &self.axis_y {
            for param in clause.subjects.keys() {
                if !SUBJECT_ATTRS.contains(&param.as_str()) {
                    let possible = ["tool", "keys"]
                        .iter()
                        .chain(SUBJECT_ATTRS.iter())
                        .map(|k| format!("'{k}'"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(ReportError::config(format!(
                        "unsupported measurement parameter '{param}' for '{test_name}' test \
                         in the configuration. Possible are {possible}"
                    )));
                }
            }
        }

        let mut seen = BTreeSet::new();
        for entry in &self.records_order {
            if !seen.insert(entry.arg()) {
                return Err(ReportError::config(format!(
                    "records_order of '{test_name}' test lists argument '{}' twice",
                    entry.arg()
                )));
            }
        }
        Ok(())
    }
}
