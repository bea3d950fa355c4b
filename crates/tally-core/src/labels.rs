//! Display labels: sequence value conversion and y-axis naming.

use crate::config::TestConfig;
use crate::model::MetricMeta;

/// Converts a sequence argument value into the label shown in datasets.
///
/// The same converter must be used for the sequences of a record and for the configured
/// percentage baseline, otherwise the baseline column is never found.
pub trait LabelConverter {
    fn sequence_label(&self, test: &TestConfig, value: &str) -> String;
}

/// Looks values up in the test's `sequences.arg_vals_labels`; unknown values are shown as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgValsLabels;

impl LabelConverter for ArgValsLabels {
    fn sequence_label(&self, test: &TestConfig, value: &str) -> String {
        test.sequences
            .arg_vals_labels
            .get(value)
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }
}

const PREFIXES: [(f64, &str); 10] = [
    (1e-9, "n"),
    (1e-6, "μ"),
    (1e-3, "m"),
    (1.0, ""),
    (1e3, "k"),
    (1024.0, "Ki"),
    (1e6, "M"),
    (1_048_576.0, "Mi"),
    (1e9, "G"),
    (1_073_741_824.0, "Gi"),
];

/// Numeric value of a multiplier: decimal spellings (`1e+6`, `1000000`) or the binary
/// `0x1p20` / `1x1p10` forms the measurement tools write.
pub fn multiplier_value(multiplier: &str) -> Option<f64> {
    let multiplier = multiplier.trim();
    if let Some((head, exp)) = multiplier.split_once("x1p") {
        if head != "0" && head != "1" {
            return None;
        }
        let exp: i32 = exp.parse().ok()?;
        return Some(2f64.powi(exp));
    }
    multiplier.parse().ok()
}

/// Metric prefix symbol for a multiplier, whichever way its value is spelled.
pub fn metric_prefix(multiplier: &str) -> Option<&'static str> {
    let value = multiplier_value(multiplier)?;
    PREFIXES
        .iter()
        .find(|(factor, _)| *factor == value)
        .map(|(_, prefix)| *prefix)
}

/// Units part of the y-axis label, e.g. `Mbps` or `bps * 1e+4`.
pub fn units_label(metric: &MetricMeta) -> Option<String> {
    match (metric.base_units.as_deref(), metric.multiplier.as_deref()) {
        (Some(base), Some(mult)) if !base.is_empty() && !mult.is_empty() => {
            Some(match metric_prefix(mult) {
                Some(prefix) => format!("{prefix}{base}"),
                None => format!("{base} * {mult}"),
            })
        }
        _ => None,
    }
}

/// `<name or type> - <aggr> - <key>=<value>... (<units>)`
pub fn axis_y_label(metric: &MetricMeta) -> String {
    let mut items = Vec::new();
    match metric.name.as_deref() {
        Some(name) if !name.is_empty() => items.push(name.to_string()),
        _ => items.push(metric.kind.clone()),
    }
    if let Some(aggr) = metric.aggr.as_deref().filter(|a| !a.is_empty()) {
        items.push(aggr.to_string());
    }
    for (key, value) in &metric.keys {
        items.push(format!("{key}={value}"));
    }

    let label = items.join(" - ");
    match units_label(metric) {
        Some(units) => format!("{label} ({units})"),
        None => label,
    }
}
