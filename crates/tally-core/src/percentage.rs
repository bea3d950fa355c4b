//! Relative-gain columns against a baseline sequence.

use crate::config::TestConfig;
use crate::dataset::{Cell, Dataset};
use crate::labels::LabelConverter;

/// Display label of the configured baseline sequence, if any.
///
/// Goes through the same converter as the sequence labels so the two can be compared.
pub fn baseline_label(test: &TestConfig, labels: &dyn LabelConverter) -> Option<String> {
    test.sequences
        .percentage_base_value
        .as_deref()
        .map(|value| labels.sequence_label(test, value))
}

/// `round(100 * (value / base - 1), 2)`
pub fn gain(value: f64, base: f64) -> f64 {
    round2(100.0 * (value / base - 1.0))
}

/// Two decimals from the exact binary value, ties to even: 0.125 -> 0.12, 2.675 -> 2.67.
fn round2(x: f64) -> f64 {
    format!("{x:.2}").parse().unwrap_or(x)
}

fn gain_cell(value: &Cell, base: &Cell) -> Cell {
    let base = match base.as_f64() {
        Some(b) if b != 0.0 => b,
        _ => return Cell::Int(0),
    };
    match value.as_f64() {
        Some(v) => Cell::Float(gain(v, base)),
        None => Cell::Null,
    }
}

/// Append a `"<label> gain"` column for every non-baseline sequence.
///
/// Returns the record warning when the baseline is not among the columns; the dataset is
/// then left untouched.
pub fn add_gain_columns(dataset: &mut Dataset, baseline: &str) -> Result<(), String> {
    let Some(base_col) = dataset.column(baseline) else {
        return Err(format!(
            "Percentage base value '{baseline}' is not found among the sequences"
        ));
    };

    let compared: Vec<usize> = (1..dataset.header().len())
        .filter(|&col| col != base_col)
        .collect();

    let mut rows = dataset.rows.iter_mut();
    if let Some(header) = rows.next() {
        let gain_labels: Vec<Cell> = compared
            .iter()
            .map(|&col| Cell::Text(format!("{} gain", cell_label(&header[col]))))
            .collect();
        header.extend(gain_labels);
    }
    for row in rows {
        let gains: Vec<Cell> = compared
            .iter()
            .map(|&col| gain_cell(&row[col], &row[base_col]))
            .collect();
        row.extend(gains);
    }
    Ok(())
}

fn cell_label(cell: &Cell) -> String {
    match cell {
        Cell::Int(n) => n.to_string(),
        Cell::Float(v) => v.to_string(),
        Cell::Text(label) => label.clone(),
        Cell::Null => String::new(),
    }
}
