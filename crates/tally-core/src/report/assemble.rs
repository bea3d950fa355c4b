use super::{
    build_report_title, PointMetadata, Record, Report, ReportTest, SequenceMetadata,
    UnprocessedIteration,
};
use crate::common_args::{common_args, CommonArgs};
use crate::config::{ConfigListing, ReportConfig, TestConfig};
use crate::dataset::build_datasets;
use crate::errors::ReportResult;
use crate::filter::{filter_by_axis_y, filter_by_not_show_args};
use crate::grouping::{group_records, RecordGroup};
use crate::labels::{ArgValsLabels, LabelConverter};
use crate::model::{ArgValue, Observation};
use crate::percentage::{add_gain_columns, baseline_label};
use crate::point::{InvalidPoint, Point, PointBuilder};
use crate::source::{ConfigSource, ObservationSource, RunInfo};
use std::collections::BTreeMap;

/// Builds reports from an observation source and a config source.
///
/// The label converter is shared by point building, datasets and gain columns.
pub struct ReportGenerator<'a> {
    observations: &'a dyn ObservationSource,
    configs: &'a dyn ConfigSource,
    labels: &'a dyn LabelConverter,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(observations: &'a dyn ObservationSource, configs: &'a dyn ConfigSource) -> Self {
        Self {
            observations,
            configs,
            labels: &ArgValsLabels,
        }
    }

    pub fn with_labels(mut self, labels: &'a dyn LabelConverter) -> Self {
        self.labels = labels;
        self
    }

    /// Build the report of `run_id` with config `config_id`.
    ///
    /// Unknown ids and configuration errors fail the whole call. Per-test emptiness and
    /// per-point problems only produce warnings and `unprocessed_iters` entries.
    pub fn generate(&self, run_id: &str, config_id: &str) -> ReportResult<Report> {
        let run = self.observations.run(run_id)?;
        let config = self.configs.config(config_id)?;

        let mut warnings = Vec::new();
        let mut unprocessed: Vec<UnprocessedIteration> = Vec::new();
        let mut content = Vec::new();

        for test_name in test_order(&config, &run) {
            let Some(test) = config.test(&test_name) else {
                continue;
            };
            let observations = self.observations.observations(run_id, &test_name)?;
            if observations.is_empty() {
                continue;
            }
            let block = self.build_test(
                &test_name,
                test,
                observations,
                &mut warnings,
                &mut unprocessed,
            )?;
            content.extend(block);
        }

        tracing::info!(
            run = run_id,
            config = config_id,
            tests = content.len(),
            warnings = warnings.len(),
            unprocessed = unprocessed.len(),
            "report generated"
        );

        Ok(Report {
            title: build_report_title(&config.title_content, &run.labels),
            branches: run.branches,
            revisions: run.revisions,
            warnings,
            config: config.info(),
            content,
            unprocessed_iters: unprocessed,
        })
    }

    fn build_test(
        &self,
        test_name: &str,
        test: &TestConfig,
        observations: Vec<Observation>,
        warnings: &mut Vec<String>,
        unprocessed: &mut Vec<UnprocessedIteration>,
    ) -> ReportResult<Option<ReportTest>> {
        let total = observations.len();
        let observations = filter_by_axis_y(observations, &test.axis_y);
        if observations.is_empty() {
            tracing::warn!(test = test_name, reason = "axis_y", "test skipped");
            warnings.push(format!(
                "No measurements of '{test_name}' test match the axis_y configuration"
            ));
            return Ok(None);
        }
        let mut observations = filter_by_not_show_args(observations, &test.not_show_args);
        if observations.is_empty() {
            tracing::warn!(test = test_name, reason = "not_show_args", "test skipped");
            warnings.push(format!(
                "All iterations of '{test_name}' test are excluded by not_show_args"
            ));
            return Ok(None);
        }
        tracing::debug!(
            test = test_name,
            total,
            kept = observations.len(),
            "filtered observations"
        );

        observations.sort_by_key(|o| o.id);
        let common = common_args(&observations);
        let builder = PointBuilder::new(test, &common, self.labels);

        let mut points: Vec<Point> = Vec::with_capacity(observations.len());
        for obs in &observations {
            match builder.build(obs) {
                Ok(point) => points.push(point),
                Err(invalid) => {
                    tracing::warn!(
                        test = test_name,
                        observation = obs.id,
                        reason = "invalid_point",
                        "iteration not processed"
                    );
                    let entry = unprocessed_entry(test_name, &common, obs, &invalid);
                    if !unprocessed.contains(&entry) {
                        unprocessed.push(entry);
                    }
                }
            }
        }
        if points.is_empty() {
            tracing::warn!(test = test_name, reason = "no_valid_points", "test skipped");
            warnings.push(format!(
                "No iterations of '{test_name}' test could be processed"
            ));
            return Ok(None);
        }

        let baseline = baseline_label(test, self.labels);
        let groups = group_records(test_name, test, points)?;
        let ids = record_ids(&groups);
        let records = groups
            .into_iter()
            .zip(ids)
            .map(|(group, id)| build_record(group, id, test, baseline.as_deref()))
            .collect();

        Ok(Some(ReportTest {
            test_name: test_name.to_string(),
            common_args: common,
            table_view: test.table_view,
            chart_view: test.chart_view,
            records,
        }))
    }
}

/// Build the report of `run_id` with config `config_id`, labelling sequences with the
/// configured `arg_vals_labels`.
pub fn generate_report(
    observations: &dyn ObservationSource,
    configs: &dyn ConfigSource,
    run_id: &str,
    config_id: &str,
) -> ReportResult<Report> {
    ReportGenerator::new(observations, configs).generate(run_id, config_id)
}

/// Active configs whose `test_names_order` mentions a test of the run.
pub fn applicable_configs(run: &RunInfo, configs: &[ReportConfig]) -> Vec<ConfigListing> {
    configs
        .iter()
        .filter(|c| c.is_active)
        .filter(|c| c.test_names_order.iter().any(|t| run.test_names.contains(t)))
        .map(ReportConfig::listing)
        .collect()
}

/// Configured tests present in the run: `test_names_order` first, then discovery order.
fn test_order(config: &ReportConfig, run: &RunInfo) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let listed = config.test_names_order.iter();
    let discovered = run.test_names.iter();
    for name in listed.chain(discovered) {
        if config.tests.contains_key(name)
            && run.test_names.contains(name)
            && !order.contains(name)
        {
            order.push(name.clone());
        }
    }
    order
}

fn unprocessed_entry(
    test_name: &str,
    common: &CommonArgs,
    obs: &Observation,
    invalid: &InvalidPoint,
) -> UnprocessedIteration {
    UnprocessedIteration {
        test_name: test_name.to_string(),
        common_args: common.clone(),
        args_vals: obs
            .args
            .iter()
            .filter(|(name, _)| !common.contains_key(name.as_str()))
            .map(|(name, value)| (name.clone(), ArgValue::parse(value)))
            .collect(),
        reasons: invalid.reasons.iter().map(ToString::to_string).collect(),
    }
}

/// Record ids: the record label, suffixed with `|<axis y label>` when records with the
/// same arguments but different y-axis labels would otherwise share it.
fn record_ids(groups: &[RecordGroup]) -> Vec<String> {
    let labels: Vec<String> = groups.iter().map(RecordGroup::label).collect();
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for label in &labels {
        *seen.entry(label.as_str()).or_default() += 1;
    }
    labels
        .iter()
        .zip(groups)
        .map(|(label, group)| {
            if seen.get(label.as_str()).copied().unwrap_or(0) > 1 {
                format!("{label}|{}", group.axis_y_label)
            } else {
                label.clone()
            }
        })
        .collect()
}

fn build_record(
    group: RecordGroup,
    id: String,
    test: &TestConfig,
    baseline: Option<&str>,
) -> Record {
    let mut datasets = build_datasets(&group, test, baseline);
    if let (Some(table), Some(baseline)) = (datasets.table.as_mut(), baseline) {
        if let Err(warning) = add_gain_columns(table, baseline) {
            datasets.warnings.push(warning);
        }
    }

    let points_metadata = group
        .sequences
        .iter()
        .map(|seq| SequenceMetadata {
            sequence: seq.label().to_string(),
            points: seq
                .points()
                .iter()
                .zip(seq.origins())
                .map(|((x, _), origin)| PointMetadata {
                    x: x.clone(),
                    origin: *origin,
                })
                .collect(),
        })
        .collect();

    Record {
        id,
        label: group.label(),
        args_vals: group.args,
        axis_x_label: test.axis_x.label().to_string(),
        axis_y_label: group.axis_y_label,
        sequence_group_arg: test.sequences.arg_label().to_string(),
        percentage_base_value: baseline.map(str::to_string),
        dataset_table: datasets.table,
        dataset_chart: datasets.chart,
        warnings: datasets.warnings,
        points_metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, ConfigFormat};

    fn config(yaml: &str) -> ReportConfig {
        parse_config(yaml, ConfigFormat::Yaml).unwrap()
    }

    fn run(test_names: &[&str]) -> RunInfo {
        RunInfo {
            id: "1".into(),
            test_names: test_names.iter().map(|s| s.to_string()).collect(),
            ..RunInfo::default()
        }
    }

    const TWO_TESTS: &str = "
id: net
name: Net
test_names_order: [rr]
tests:
  stream:
    axis_x: {arg: size}
    axis_y: [{type: [throughput]}]
    sequences: {arg: impl}
  rr:
    axis_x: {arg: size}
    axis_y: [{type: [latency]}]
    sequences: {arg: impl}
  unused:
    axis_x: {arg: size}
    axis_y: [{type: [latency]}]
    sequences: {arg: impl}
";

    #[test]
    fn test_order_listed_first_then_discovery() {
        let cfg = config(TWO_TESTS);
        let order = test_order(&cfg, &run(&["other", "stream", "rr"]));
        assert_eq!(order, ["rr", "stream"]);
    }

    #[test]
    fn test_applicable_configs_match_test_names_order() {
        let cfg = config(TWO_TESTS);
        let mut inactive = cfg.clone();
        inactive.id = "old".into();
        inactive.is_active = false;
        let configs = vec![cfg, inactive];

        let listed = applicable_configs(&run(&["rr"]), &configs);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "net");

        assert!(applicable_configs(&run(&["stream"]), &configs).is_empty());
    }

    fn group(mode: &str, axis_y_label: &str) -> RecordGroup {
        RecordGroup {
            args: crate::grouping::OrderedArgs(vec![("mode".into(), ArgValue::parse(mode))]),
            axis_y_label: axis_y_label.into(),
            sequences: vec![],
            point_count: 0,
        }
    }

    #[test]
    fn test_record_ids_unique_across_y_labels() {
        let groups = vec![
            group("tcp", "latency"),
            group("tcp", "throughput"),
            group("udp", "throughput"),
        ];
        assert_eq!(
            record_ids(&groups),
            ["tcp|latency", "tcp|throughput", "udp"]
        );
    }
}
