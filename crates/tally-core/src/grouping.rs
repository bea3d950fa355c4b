//! Grouping of points into records and sequences.

use crate::config::{RecordsOrderEntry, TestConfig};
use crate::errors::{ReportError, ReportResult};
use crate::model::ArgValue;
use crate::point::{Point, PointOrigin, SequenceKey};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Record arguments in display order: `records_order` arguments first, the rest by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedArgs(pub Vec<(String, ArgValue)>);

impl OrderedArgs {
    /// Values joined with `-`, used as record label and id.
    pub fn label(&self) -> String {
        self.0
            .iter()
            .map(|(_, v)| v.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

impl Serialize for OrderedArgs {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Points of one record sharing a sequence key, as an x -> y map in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub key: SequenceKey,
    points: Vec<(ArgValue, f64)>,
    origins: Vec<PointOrigin>,
    index: BTreeMap<ArgValue, usize>,
}

impl Sequence {
    pub fn new(key: SequenceKey) -> Self {
        Self {
            key,
            points: Vec::new(),
            origins: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// A repeated x keeps its position and takes the later y and origin.
    pub fn insert(&mut self, x: ArgValue, y: f64, origin: PointOrigin) {
        match self.index.get(&x) {
            Some(&at) => {
                self.points[at].1 = y;
                self.origins[at] = origin;
            }
            None => {
                self.index.insert(x.clone(), self.points.len());
                self.points.push((x, y));
                self.origins.push(origin);
            }
        }
    }

    pub fn label(&self) -> &str {
        &self.key.label
    }

    pub fn points(&self) -> &[(ArgValue, f64)] {
        &self.points
    }

    /// Origins parallel to [`Sequence::points`].
    pub fn origins(&self) -> &[PointOrigin] {
        &self.origins
    }

    pub fn get(&self, x: &ArgValue) -> Option<f64> {
        self.index.get(x).map(|&at| self.points[at].1)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Points sharing argument values and y-axis label.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordGroup {
    pub args: OrderedArgs,
    pub axis_y_label: String,
    pub sequences: Vec<Sequence>,
    pub point_count: usize,
}

impl RecordGroup {
    pub fn label(&self) -> String {
        self.args.label()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RecordKey {
    /// One slot per `records_order` entry: `(rank, value)`, `None` when the point lacks it.
    ordered: Vec<Option<(usize, ArgValue)>>,
    rest: Vec<(String, ArgValue)>,
    axis_y_label: String,
}

impl RecordKey {
    fn new(point: &Point, records_order: &[RecordsOrderEntry]) -> Self {
        let ordered = records_order
            .iter()
            .map(|entry| {
                point.args_vals.get(entry.arg()).map(|value| {
                    let shown = value.to_string();
                    let rank = entry
                        .values()
                        .iter()
                        .position(|v| *v == shown)
                        .unwrap_or(entry.values().len());
                    (rank, value.clone())
                })
            })
            .collect();
        let rest = point
            .args_vals
            .iter()
            .filter(|(name, _)| !records_order.iter().any(|e| e.arg() == name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Self {
            ordered,
            rest,
            axis_y_label: point.axis_y_label.clone(),
        }
    }
}

/// Per test, an argument keeps integer values only if all its values are integers,
/// so one argument is never ordered partly numerically and partly lexically.
pub fn normalize_arg_types(points: &mut [Point]) {
    let mut textual: BTreeSet<String> = BTreeSet::new();
    for point in points.iter() {
        for (name, value) in &point.args_vals {
            if !value.is_numeric() {
                textual.insert(name.clone());
            }
        }
    }
    if textual.is_empty() {
        return;
    }
    for point in points.iter_mut() {
        for name in &textual {
            if let Some(value) = point.args_vals.remove(name) {
                point.args_vals.insert(name.clone(), value.into_text());
            }
        }
    }
}

/// Check `records_order` against the record arguments the points actually carry.
fn check_records_order(test_name: &str, test: &TestConfig, points: &[Point]) -> ReportResult<()> {
    let present: BTreeSet<&str> = points
        .iter()
        .flat_map(|p| p.args_vals.keys().map(String::as_str))
        .collect();
    for entry in &test.records_order {
        if !present.contains(entry.arg()) {
            return Err(ReportError::RecordsOrder {
                test: test_name.to_string(),
                arg: entry.arg().to_string(),
            });
        }
    }
    Ok(())
}

/// Group the points of one test into records, and each record into sequences.
///
/// Records come out ordered by `(argument values per records_order, y-axis label)`,
/// sequences by sequence key. Every point lands in exactly one sequence of one record.
pub fn group_records(
    test_name: &str,
    test: &TestConfig,
    mut points: Vec<Point>,
) -> ReportResult<Vec<RecordGroup>> {
    if points.is_empty() {
        return Ok(Vec::new());
    }
    normalize_arg_types(&mut points);
    check_records_order(test_name, test, &points)?;

    let mut keyed: Vec<(RecordKey, Point)> = points
        .into_iter()
        .map(|p| (RecordKey::new(&p, &test.records_order), p))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut records = Vec::new();
    let mut current: Option<(RecordKey, Vec<Point>)> = None;
    for (key, point) in keyed {
        match current.as_mut() {
            Some((cur_key, members)) if *cur_key == key => members.push(point),
            _ => {
                if let Some((_, members)) = current.take() {
                    records.push(build_record(members, &test.records_order));
                }
                current = Some((key, vec![point]));
            }
        }
    }
    if let Some((_, members)) = current {
        records.push(build_record(members, &test.records_order));
    }

    tracing::debug!(test = test_name, records = records.len(), "grouped points into records");
    Ok(records)
}

fn build_record(mut members: Vec<Point>, records_order: &[RecordsOrderEntry]) -> RecordGroup {
    let point_count = members.len();
    let args = ordered_args(&members[0].args_vals, records_order);
    let axis_y_label = members[0].axis_y_label.clone();

    members.sort_by(|a, b| a.sequence_key.cmp(&b.sequence_key));
    let mut sequences: Vec<Sequence> = Vec::new();
    for point in members {
        match sequences.last_mut() {
            Some(seq) if seq.key == point.sequence_key => {
                seq.insert(point.coordinate.x, point.coordinate.y, point.origin);
            }
            _ => {
                let mut seq = Sequence::new(point.sequence_key);
                seq.insert(point.coordinate.x, point.coordinate.y, point.origin);
                sequences.push(seq);
            }
        }
    }

    RecordGroup {
        args,
        axis_y_label,
        sequences,
        point_count,
    }
}

fn ordered_args(
    args_vals: &BTreeMap<String, ArgValue>,
    records_order: &[RecordsOrderEntry],
) -> OrderedArgs {
    let mut ordered: Vec<(String, ArgValue)> = records_order
        .iter()
        .filter_map(|e| {
            args_vals
                .get(e.arg())
                .map(|v| (e.arg().to_string(), v.clone()))
        })
        .collect();
    for (name, value) in args_vals {
        if !records_order.iter().any(|e| e.arg() == name.as_str()) {
            ordered.push((name.clone(), value.clone()));
        }
    }
    OrderedArgs(ordered)
}
