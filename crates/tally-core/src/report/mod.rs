//! Generated report and its serialized shape.

mod assemble;

pub use assemble::{applicable_configs, generate_report, ReportGenerator};

use crate::common_args::CommonArgs;
use crate::config::ConfigInfo;
use crate::dataset::Dataset;
use crate::grouping::OrderedArgs;
use crate::model::ArgValue;
use crate::point::PointOrigin;
use crate::source::Revision;
use serde::Serialize;
use std::collections::BTreeMap;

/// A report built for one run with one config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub branches: Vec<String>,
    pub revisions: Vec<Revision>,
    pub warnings: Vec<String>,
    pub config: ConfigInfo,
    pub content: Vec<ReportTest>,
    pub unprocessed_iters: Vec<UnprocessedIteration>,
}

impl Report {
    pub fn test(&self, test_name: &str) -> Option<&ReportTest> {
        self.content.iter().find(|t| t.test_name == test_name)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Block of one test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTest {
    pub test_name: String,
    pub common_args: CommonArgs,
    pub table_view: bool,
    pub chart_view: bool,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// The label, or `<label>|<axis y label>` when the label alone is not unique in the test.
    pub id: String,
    pub label: String,
    pub args_vals: OrderedArgs,
    pub axis_x_label: String,
    pub axis_y_label: String,
    pub sequence_group_arg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_base_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_table: Option<Dataset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_chart: Option<Dataset>,
    pub warnings: Vec<String>,
    /// Which observation each plotted value came from, per sequence.
    pub points_metadata: Vec<SequenceMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceMetadata {
    pub sequence: String,
    pub points: Vec<PointMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMetadata {
    pub x: ArgValue,
    #[serde(flatten)]
    pub origin: PointOrigin,
}

/// An observation that could not become a point, with the context it failed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnprocessedIteration {
    pub test_name: String,
    pub common_args: CommonArgs,
    /// Arguments of the iteration that are not common.
    pub args_vals: BTreeMap<String, ArgValue>,
    pub reasons: Vec<String>,
}

/// Values of the named run labels, in the given order, joined with `-`.
///
/// Labels the run does not carry are left out.
pub fn build_report_title(title_content: &[String], labels: &BTreeMap<String, String>) -> String {
    title_content
        .iter()
        .filter_map(|name| labels.get(name))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_follows_configured_order() {
        let labels: BTreeMap<String, String> = [
            ("board".to_string(), "x86".to_string()),
            ("kernel".to_string(), "6.1".to_string()),
        ]
        .into();
        let content = vec!["kernel".to_string(), "missing".to_string(), "board".to_string()];
        assert_eq!(build_report_title(&content, &labels), "6.1-x86");
        assert_eq!(build_report_title(&[], &labels), "");
    }
}
