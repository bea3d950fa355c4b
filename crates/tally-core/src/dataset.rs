//! Table and chart matrices of a record.
//!
//! Row 0 is the header: the x-axis label followed by one label per sequence. Every
//! further row is `[x, y_1, y_2, ...]`. Rows are seeded from the x-values of the first
//! sequence; the other sequences are laid out positionally, by index. Sequences that do not
//! share the first sequence's x-domain get a record warning instead of being realigned.

use crate::config::TestConfig;
use crate::grouping::{RecordGroup, Sequence};
use crate::model::ArgValue;
use serde::Serialize;

/// One dataset cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(n) => Some(*n as f64),
            Cell::Float(v) => Some(*v),
            Cell::Text(_) | Cell::Null => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&ArgValue> for Cell {
    fn from(value: &ArgValue) -> Self {
        match value {
            ArgValue::Int(n) => Cell::Int(*n),
            ArgValue::Text(s) => Cell::Text(s.clone()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// Header row plus data rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    pub rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows below the header.
    pub fn data(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Column index of a header label. Column 0 (the x-axis) is never matched.
    pub fn column(&self, label: &str) -> Option<usize> {
        self.header()
            .iter()
            .skip(1)
            .position(|c| c.as_text() == Some(label))
            .map(|i| i + 1)
    }
}

/// Datasets of one record, plus the warnings raised while building them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDatasets {
    pub table: Option<Dataset>,
    pub chart: Option<Dataset>,
    pub warnings: Vec<String>,
}

/// Build the table and chart datasets of a record.
///
/// `baseline` is the display label of the percentage baseline sequence; when present among
/// the sequences it becomes the first column. The chart is a copy of the base matrix taken
/// before any gain columns are added to the table.
pub fn build_datasets(
    record: &RecordGroup,
    test: &TestConfig,
    baseline: Option<&str>,
) -> RecordDatasets {
    let mut out = RecordDatasets::default();
    if !test.table_view && !test.chart_view {
        return out;
    }

    let sequences = baseline_first(&record.sequences, baseline);
    let base = base_matrix(&sequences, test.axis_x.label());

    if let Some(first) = sequences.first() {
        let misaligned: Vec<&str> = sequences
            .iter()
            .skip(1)
            .filter(|seq| !same_x_domain(first, seq))
            .map(|seq| seq.label())
            .collect();
        if !misaligned.is_empty() {
            out.warnings.push(format!(
                "Sequences {} do not share the x-values of sequence '{}'; values are aligned by position",
                quoted(&misaligned),
                first.label()
            ));
        }
    }

    if test.chart_view {
        let numeric = sequences
            .iter()
            .flat_map(|s| s.points())
            .all(|(x, _)| x.is_numeric());
        if numeric {
            out.chart = Some(base.clone());
        } else {
            out.warnings.push(format!(
                "Chart is not built: values of axis x argument '{}' are not numeric",
                test.axis_x.arg
            ));
        }
    }
    if test.table_view {
        out.table = Some(base);
    }
    out
}

fn baseline_first<'a>(sequences: &'a [Sequence], baseline: Option<&str>) -> Vec<&'a Sequence> {
    let mut ordered: Vec<&Sequence> = sequences.iter().collect();
    if let Some(label) = baseline {
        if let Some(pos) = ordered.iter().position(|s| s.label() == label) {
            let seq = ordered.remove(pos);
            ordered.insert(0, seq);
        }
    }
    ordered
}

fn base_matrix(sequences: &[&Sequence], axis_x_label: &str) -> Dataset {
    let mut header = vec![Cell::from(axis_x_label)];
    header.extend(sequences.iter().map(|s| Cell::from(s.label())));

    let mut rows = vec![header];
    if let Some(first) = sequences.first() {
        for (idx, (x, _)) in first.points().iter().enumerate() {
            let mut row = Vec::with_capacity(sequences.len() + 1);
            row.push(Cell::from(x));
            for seq in sequences {
                row.push(
                    seq.points()
                        .get(idx)
                        .map_or(Cell::Null, |(_, y)| Cell::Float(*y)),
                );
            }
            rows.push(row);
        }
    }
    Dataset { rows }
}

fn same_x_domain(a: &Sequence, b: &Sequence) -> bool {
    a.len() == b.len()
        && a.points()
            .iter()
            .zip(b.points())
            .all(|((xa, _), (xb, _))| xa == xb)
}

fn quoted(labels: &[&str]) -> String {
    labels
        .iter()
        .map(|l| format!("'{l}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisX, SequencesConfig};
    use crate::grouping::OrderedArgs;
    use crate::point::{PointOrigin, SequenceKey};
    use std::collections::BTreeMap;

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
                arg_vals_labels: BTreeMap::new(),
                percentage_base_value: None,
            },
            not_show_args: BTreeMap::new(),
            table_view: true,
            chart_view: true,
            records_order: vec![],
        }
    }

    fn seq(label: &str, points: &[(&str, f64)]) -> Sequence {
        let mut s = Sequence::new(SequenceKey {
            token: ArgValue::parse(label),
            label: label.to_string(),
        });
        for (x, y) in points {
            s.insert(ArgValue::parse(x), *y, PointOrigin::default());
        }
        s
    }

    fn record(sequences: Vec<Sequence>) -> RecordGroup {
        RecordGroup {
            args: OrderedArgs::default(),
            axis_y_label: "throughput".into(),
            point_count: sequences.iter().map(Sequence::len).sum(),
            sequences,
        }
    }

    #[test]
    fn test_matrix_layout() {
        let rec = record(vec![
            seq("a", &[("1", 10.0), ("2", 11.0)]),
            seq("b", &[("1", 20.0), ("2", 21.0)]),
        ]);
        let ds = build_datasets(&rec, &test_config(), None);
        let table = ds.table.unwrap();
        assert_eq!(
            table.rows,
            vec![
                vec![Cell::from("size"), Cell::from("a"), Cell::from("b")],
                vec![Cell::Int(1), Cell::Float(10.0), Cell::Float(20.0)],
                vec![Cell::Int(2), Cell::Float(11.0), Cell::Float(21.0)],
            ]
        );
        assert_eq!(ds.chart, Some(table));
        assert!(ds.warnings.is_empty());
    }

    #[test]
    fn test_baseline_moves_to_first_column() {
        let rec = record(vec![seq("new", &[("1", 20.0)]), seq("ref", &[("1", 10.0)])]);
        let ds = build_datasets(&rec, &test_config(), Some("ref"));
        let table = ds.table.unwrap();
        assert_eq!(table.header()[1], Cell::from("ref"));
        assert_eq!(table.column("new"), Some(2));
    }

    #[test]
    fn test_shorter_sequence_padded_and_warned() {
        let rec = record(vec![
            seq("a", &[("1", 10.0), ("2", 11.0)]),
            seq("b", &[("1", 20.0)]),
        ]);
        let ds = build_datasets(&rec, &test_config(), None);
        let table = ds.table.unwrap();
        assert_eq!(table.data()[1][2], Cell::Null);
        assert_eq!(ds.warnings.len(), 1);
        assert!(ds.warnings[0].contains("'b'"), "{}", ds.warnings[0]);
    }

    #[test]
    fn test_positional_alignment_keeps_first_sequence_rows() {
        let rec = record(vec![
            seq("a", &[("1", 10.0)]),
            seq("b", &[("5", 50.0), ("6", 60.0)]),
        ]);
        let ds = build_datasets(&rec, &test_config(), None);
        let table = ds.table.unwrap();
        assert_eq!(table.data().len(), 1);
        assert_eq!(table.data()[0], vec![Cell::Int(1), Cell::Float(10.0), Cell::Float(50.0)]);
        assert_eq!(ds.warnings.len(), 1);
    }

    #[test]
    fn test_non_numeric_x_skips_chart() {
        let rec = record(vec![seq("a", &[("small", 1.0), ("large", 2.0)])]);
        let ds = build_datasets(&rec, &test_config(), None);
        assert!(ds.chart.is_none());
        assert!(ds.table.is_some());
        assert!(ds.warnings[0].contains("not numeric"));
    }

    #[test]
    fn test_text_x_in_later_sequence_skips_chart() {
        let rec = record(vec![seq("a", &[("1", 1.0)]), seq("b", &[("big", 2.0)])]);
        let ds = build_datasets(&rec, &test_config(), None);
        assert!(ds.chart.is_none());
        assert!(ds.table.is_some());
        assert!(
            ds.warnings.iter().any(|w| w.contains("'size' are not numeric")),
            "{:?}",
            ds.warnings
        );
    }

    #[test]
    fn test_views_disabled() {
        let mut cfg = test_config();
        cfg.table_view = false;
        let rec = record(vec![seq("a", &[("1", 1.0)])]);
        let ds = build_datasets(&rec, &cfg, None);
        assert!(ds.table.is_none());
        assert!(ds.chart.is_some());

        cfg.chart_view = false;
        assert_eq!(build_datasets(&rec, &cfg, None), RecordDatasets::default());
    }
}
