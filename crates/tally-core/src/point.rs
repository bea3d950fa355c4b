//! Normalized report points.

use crate::common_args::CommonArgs;
use crate::config::TestConfig;
use crate::labels::{axis_y_label, LabelConverter};
use crate::model::{ArgValue, Observation};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Identity of the sequence a point belongs to.
///
/// `token` orders sequences deterministically, `label` is what the datasets show.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceKey {
    pub token: ArgValue,
    pub label: String,
}

/// One x/y sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub x: ArgValue,
    pub y: f64,
}

/// Where a point came from; carried into the record's point metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PointOrigin {
    pub observation_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub test_name: String,
    /// Arguments that are neither common, nor the axis, nor the sequence argument.
    pub args_vals: BTreeMap<String, ArgValue>,
    pub axis_y_label: String,
    pub sequence_key: SequenceKey,
    pub coordinate: Coordinate,
    pub origin: PointOrigin,
}

/// Why an observation could not become a point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PointIssue {
    MissingAxisArgument { arg: String },
    MissingSequenceArgument { arg: String },
}

impl fmt::Display for PointIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointIssue::MissingAxisArgument { arg }
            | PointIssue::MissingSequenceArgument { arg } => {
                write!(f, "The test has no argument {arg}")
            }
        }
    }
}

/// Failed point construction; every problem found on the observation is listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPoint {
    pub reasons: Vec<PointIssue>,
}

/// Builds the points of one test.
pub struct PointBuilder<'a> {
    test: &'a TestConfig,
    common_args: &'a CommonArgs,
    labels: &'a dyn LabelConverter,
}

impl<'a> PointBuilder<'a> {
    pub fn new(
        test: &'a TestConfig,
        common_args: &'a CommonArgs,
        labels: &'a dyn LabelConverter,
    ) -> Self {
        Self {
            test,
            common_args,
            labels,
        }
    }

    pub fn build(&self, obs: &Observation) -> Result<Point, InvalidPoint> {
        let axis_arg = self.test.axis_x.arg.as_str();
        let sequence_arg = self.test.sequences.arg.as_str();

        let mut x = None;
        let mut sequence_key = None;
        let mut args_vals = BTreeMap::new();

        for (name, raw) in &obs.args {
            if name == axis_arg {
                x = Some(ArgValue::parse(raw));
            } else if name == sequence_arg {
                sequence_key = Some(SequenceKey {
                    token: ArgValue::parse(raw),
                    label: self.labels.sequence_label(self.test, raw),
                });
            } else if !self.common_args.contains_key(name) {
                args_vals.insert(name.clone(), ArgValue::parse(raw));
            }
        }

        let mut reasons = Vec::new();
        if x.is_none() {
            reasons.push(PointIssue::MissingAxisArgument {
                arg: axis_arg.to_string(),
            });
        }
        if sequence_key.is_none() {
            reasons.push(PointIssue::MissingSequenceArgument {
                arg: sequence_arg.to_string(),
            });
        }

        match (x, sequence_key) {
            (Some(x), Some(sequence_key)) => Ok(Point {
                test_name: obs.test_name.clone(),
                args_vals,
                axis_y_label: axis_y_label(&obs.metric),
                sequence_key,
                coordinate: Coordinate { x, y: obs.value },
                origin: PointOrigin {
                    observation_id: obs.id,
                    iteration_id: obs.iteration_id,
                    result_id: obs.result_id,
                },
            }),
            _ => Err(InvalidPoint { reasons }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisX, SequencesConfig};
    use crate::labels::ArgValsLabels;
    use crate::model::MetricMeta;

    fn test_config() -> TestConfig {
        TestConfig {
            axis_x: AxisX {
                arg: "size".into(),
                label: None,
            },
            axis_y: vec![],
            sequences: SequencesConfig {
                arg: "impl".into(),
                arg_label: None,
                arg_vals_labels: [("ref".to_string(), "reference".to_string())].into(),
                percentage_base_value: None,
            },
            not_show_args: BTreeMap::new(),
            table_view: true,
            chart_view: true,
            records_order: vec![],
        }
    }

    fn obs(args: &[(&str, &str)]) -> Observation {
        Observation {
            id: 7,
            test_name: "stream".into(),
            iteration_id: Some(70),
            result_id: Some(700),
            args: args
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            value: 12.5,
            metric: MetricMeta {
                kind: "throughput".into(),
                ..MetricMeta::default()
            },
        }
    }

    #[test]
    fn test_build_splits_arguments() {
        let cfg = test_config();
        let common: CommonArgs = [("host".to_string(), ArgValue::Text("a".into()))].into();
        let builder = PointBuilder::new(&cfg, &common, &ArgValsLabels);

        let point = builder
            .build(&obs(&[("size", "64"), ("impl", "ref"), ("host", "a"), ("mode", "tcp")]))
            .unwrap();

        assert_eq!(point.coordinate.x, ArgValue::Int(64));
        assert_eq!(point.coordinate.y, 12.5);
        assert_eq!(point.sequence_key.token, ArgValue::Text("ref".into()));
        assert_eq!(point.sequence_key.label, "reference");
        assert_eq!(point.args_vals.len(), 1);
        assert_eq!(point.args_vals["mode"], ArgValue::Text("tcp".into()));
        assert_eq!(point.axis_y_label, "throughput");
        assert_eq!(point.origin.iteration_id, Some(70));
    }

    #[test]
    fn test_missing_axis_argument() {
        let cfg = test_config();
        let common = CommonArgs::new();
        let builder = PointBuilder::new(&cfg, &common, &ArgValsLabels);

        let err = builder.build(&obs(&[("impl", "ref")])).unwrap_err();
        assert_eq!(
            err.reasons,
            vec![PointIssue::MissingAxisArgument { arg: "size".into() }]
        );
        assert_eq!(err.reasons[0].to_string(), "The test has no argument size");
    }

    #[test]
    fn test_both_problems_reported() {
        let cfg = test_config();
        let common = CommonArgs::new();
        let builder = PointBuilder::new(&cfg, &common, &ArgValsLabels);

        let err = builder.build(&obs(&[("mode", "tcp")])).unwrap_err();
        assert_eq!(err.reasons.len(), 2);
        assert!(matches!(
            err.reasons[1],
            PointIssue::MissingSequenceArgument { .. }
        ));
    }
}
