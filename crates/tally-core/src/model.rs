//! Input model: observations as handed over by the observation source.

use crate::scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Measurement-subject attributes an `axis_y` clause may select on.
pub const SUBJECT_ATTRS: [&str; 5] = ["name", "type", "aggr", "base_units", "multiplier"];

/// A test argument value.
///
/// Raw values made of ASCII digits only are integers; everything else is text.
/// Integers order numerically and before any text value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Int(i64),
    Text(String),
}

impl ArgValue {
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<i64>() {
                return ArgValue::Int(n);
            }
        }
        ArgValue::Text(raw.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ArgValue::Int(_))
    }

    /// Same value, compared lexically.
    pub fn into_text(self) -> Self {
        match self {
            ArgValue::Int(n) => ArgValue::Text(n.to_string()),
            text => text,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Int(n) => write!(f, "{n}"),
            ArgValue::Text(s) => f.write_str(s),
        }
    }
}

/// Metric metadata of one measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_units: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub multiplier: Option<String>,
    /// Measurement keys (`key name -> key value`).
    #[serde(
        default,
        deserialize_with = "scalar::string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub keys: BTreeMap<String, String>,
}

impl MetricMeta {
    /// Value of a measurement-subject attribute (see [`SUBJECT_ATTRS`]).
    pub fn subject(&self, attr: &str) -> Option<&str> {
        match attr {
            "name" => self.name.as_deref(),
            "type" => Some(self.kind.as_str()),
            "aggr" => self.aggr.as_deref(),
            "base_units" => self.base_units.as_deref(),
            "multiplier" => self.multiplier.as_deref(),
            _ => None,
        }
    }
}

/// One raw measurement result of one test iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Global processing order within a run.
    pub id: u64,
    pub test_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<u64>,
    /// Iteration arguments, raw values.
    #[serde(default, deserialize_with = "scalar::string_map")]
    pub args: BTreeMap<String, String>,
    pub value: f64,
    pub metric: MetricMeta,
}

impl Observation {
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }
}
