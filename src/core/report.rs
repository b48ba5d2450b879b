/// Quick-summary report for a loaded table
///
/// The report is a pure function of the table and the top-N setting: it
/// does no I/O and always renders the same text for the same input.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use polars::prelude::*;

use crate::core::table::{Column, ColumnData, Table};
use crate::error::Result;

/// Field names of the frame returned by `value_counts`
const VALUE_FIELD: &str = "value";
const COUNT_FIELD: &str = "count";

/// Banner printed at the top of every report
pub const REPORT_TITLE: &str = "CSV QUICK SUMMARY";

/// Notice emitted in place of the numeric section
pub const NO_NUMERIC_NOTICE: &str = "No numeric columns detected.";

/// Default number of categories listed per text column
pub const DEFAULT_TOP_N: usize = 5;

/// Descriptive statistics of one numeric column
///
/// `None` marks an undefined value: every statistic of a column without
/// present values, and `std` when fewer than two values are present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    /// Compute statistics over the present values, skipping missing cells
    pub fn from_values(values: &[Option<f64>]) -> Self {
        let ca = Float64Chunked::from_slice_options("values".into(), values);
        let count = ca.len() - ca.null_count();

        Self {
            count,
            mean: ca.mean(),
            std: if count > 1 { ca.std(1) } else { None },
            min: ca.min(),
            max: ca.max(),
        }
    }
}

/// Most frequent text values of a column, highest count first
///
/// Cells are counted in their text form, so missing cells count as `nan`.
/// Ties keep the order in which values were first seen.
///
/// # Errors
///
/// Propagates a polars failure while counting.
pub fn top_categories(column: &Column, top_n: usize) -> Result<Vec<(String, usize)>> {
    let cells = column.text_cells();
    if cells.is_empty() || top_n == 0 {
        return Ok(Vec::new());
    }

    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (position, cell) in cells.iter().enumerate() {
        first_seen.entry(cell.as_ref()).or_insert(position);
    }

    let texts: Vec<&str> = cells.iter().map(|c| c.as_ref()).collect();
    let series = Series::new(VALUE_FIELD.into(), texts);
    let counted = series.value_counts(false, false, COUNT_FIELD.into(), false)?;

    let values = counted.column(VALUE_FIELD)?.as_materialized_series();
    let counts = counted
        .column(COUNT_FIELD)?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;

    let mut ranked: Vec<(usize, String, usize)> = values
        .str()?
        .into_iter()
        .zip(counts.u64()?.into_iter())
        .filter_map(|(value, count)| {
            let value = value?;
            let first = first_seen.get(value).copied().unwrap_or(usize::MAX);
            Some((first, value.to_string(), count? as usize))
        })
        .collect();

    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    Ok(ranked
        .into_iter()
        .map(|(_, value, count)| (value, count))
        .collect())
}

/// Missing-value counts per column, highest first; ties keep column order
pub fn missing_counts(table: &Table) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = table
        .columns()
        .iter()
        .map(|c| (c.name(), c.missing_count()))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Render a statistic with two decimals, `nan` when undefined
pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_nan() => "nan".to_string(),
        Some(v) if v.is_infinite() => {
            if v > 0.0 {
                "inf".to_string()
            } else {
                "-inf".to_string()
            }
        }
        Some(v) => format!("{v:.2}"),
        None => "nan".to_string(),
    }
}

/// A fully materialized report, one entry per output line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The report text, lines joined with `\n`
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Builds the quick-summary report
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    top_n: usize,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl ReportBuilder {
    /// `top_n` bounds the values listed per text column; 0 lists none
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Build the report for `table`
    ///
    /// # Errors
    ///
    /// Only a polars failure while counting categories.
    pub fn build(&self, table: &Table) -> Result<Report> {
        let mut report = Report::default();

        self.write_header(table, &mut report);
        self.write_missing(table, &mut report);
        self.write_numeric(table, &mut report);
        self.write_categorical(table, &mut report)?;

        debug!("Built report with {} lines", report.lines().len());
        Ok(report)
    }

    fn write_header(&self, table: &Table, report: &mut Report) {
        report.push(REPORT_TITLE);
        report.push("=".repeat(60));
        report.push(format!("Rows: {}", table.row_count()));
        report.push(format!("Columns: {}", table.column_count()));
        report.push("");
        report.push("Columns:");
        report.push(table.column_names().join(", "));
        report.push("");
    }

    fn write_missing(&self, table: &Table, report: &mut Report) {
        report.push("Missing values (per column):");
        for (name, count) in missing_counts(table) {
            report.push(format!("  {name}: {count}"));
        }
        report.push("");
    }

    fn write_numeric(&self, table: &Table, report: &mut Report) {
        let numeric: Vec<(&str, ColumnStats)> = table
            .columns()
            .iter()
            .filter_map(|c| match c.data() {
                ColumnData::Numeric(values) => Some((c.name(), ColumnStats::from_values(values))),
                ColumnData::Text(_) => None,
            })
            .collect();

        if numeric.is_empty() {
            report.push(NO_NUMERIC_NOTICE);
            report.push("");
            return;
        }

        report.push("Numeric columns summary:");
        for (name, stats) in numeric {
            report.push(format!(
                "  {}: mean={}, std={}, min={}, max={}",
                name,
                format_stat(stats.mean),
                format_stat(stats.std),
                format_stat(stats.min),
                format_stat(stats.max)
            ));
        }
        report.push("");
    }

    fn write_categorical(&self, table: &Table, report: &mut Report) -> Result<()> {
        let text_columns: Vec<&Column> =
            table.columns().iter().filter(|c| !c.is_numeric()).collect();
        if text_columns.is_empty() {
            return Ok(());
        }

        report.push("Top categories (non-numeric columns):");
        for column in text_columns {
            report.push("");
            report.push(format!("{}:", column.name()));
            for (value, count) in top_categories(column, self.top_n)? {
                report.push(format!("  {value}: {count}"));
            }
        }
        report.push("");
        Ok(())
    }
}

/// Build the report for `table` listing up to `top_n` categories per text column
pub fn build_report(table: &Table, top_n: usize) -> Result<Report> {
    ReportBuilder::new(top_n).build(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    fn sample_table() -> Table {
        Table::new(vec![
            Column::numeric("id", vec![Some(1.0), Some(2.0), Some(3.0)]),
            Column::text("name", text(&["a", "a", "b"])),
        ])
        .expect("Failed to build table")
    }

    #[test]
    fn test_sample_report_text() {
        let report = build_report(&sample_table(), 5).expect("Failed to build report");
        let expected = "\
CSV QUICK SUMMARY
============================================================
Rows: 3
Columns: 2

Columns:
id, name

Missing values (per column):
  id: 0
  name: 0

Numeric columns summary:
  id: mean=2.00, std=1.00, min=1.00, max=3.00

Top categories (non-numeric columns):

name:
  a: 2
  b: 1
";
        assert_eq!(report.render(), expected);
    }

    #[test]
    fn test_report_is_deterministic() {
        let table = Table::new(vec![Column::text(
            "c",
            text(&["z", "y", "x", "y", "z", "w"]),
        )])
        .expect("Failed to build table");
        let first = build_report(&table, 2).expect("report").render();
        for _ in 0..10 {
            assert_eq!(build_report(&table, 2).expect("report").render(), first);
        }
    }

    #[test]
    fn test_no_numeric_notice() {
        let table = Table::new(vec![Column::text("name", text(&["a"]))])
            .expect("Failed to build table");
        let report = build_report(&table, 5).expect("Failed to build report");
        assert!(report.lines().iter().any(|l| l == NO_NUMERIC_NOTICE));
        assert!(!report.lines().iter().any(|l| l.contains("mean=")));
        assert!(!report.lines().iter().any(|l| l == "Numeric columns summary:"));
    }

    #[test]
    fn test_missing_order_is_stable_descending() {
        let table = Table::new(vec![
            Column::numeric("a", vec![Some(1.0), None, Some(3.0)]),
            Column::numeric("b", vec![None, None, Some(1.0)]),
            Column::text("c", vec![None, Some("x".to_string()), Some("y".to_string())]),
            Column::numeric("d", vec![Some(1.0), Some(2.0), Some(3.0)]),
        ])
        .expect("Failed to build table");

        let counts = missing_counts(&table);
        assert_eq!(counts, vec![("b", 2), ("a", 1), ("c", 1), ("d", 0)]);
        assert_eq!(
            counts.iter().map(|(_, n)| n).sum::<usize>(),
            table.missing_total()
        );
    }

    #[test]
    fn test_top_categories_ties_keep_first_seen_order() {
        let column = Column::text("c", text(&["q", "p", "p", "q", "r", "s"]));
        assert_eq!(
            top_categories(&column, 3).expect("Failed to count"),
            vec![("q".to_string(), 2), ("p".to_string(), 2), ("r".to_string(), 1)]
        );
    }

    #[test]
    fn test_top_categories_counts_missing_as_nan() {
        let column = Column::text("c", vec![None, Some("a".to_string()), None]);
        assert_eq!(
            top_categories(&column, 5).expect("Failed to count"),
            vec![("nan".to_string(), 2), ("a".to_string(), 1)]
        );
    }

    #[test]
    fn test_single_value_std_is_undefined() {
        let stats = ColumnStats::from_values(&[Some(4.0), None]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std, None);
        assert_eq!(format_stat(stats.std), "nan");
        assert_eq!(format_stat(stats.mean), "4.00");
    }

    #[test]
    fn test_all_missing_stats_are_undefined() {
        let table = Table::new(vec![Column::numeric("v", vec![None, None])])
            .expect("Failed to build table");
        let report = build_report(&table, 5).expect("Failed to build report");
        assert!(report
            .lines()
            .iter()
            .any(|l| l == "  v: mean=nan, std=nan, min=nan, max=nan"));
    }

    #[test]
    fn test_stats_match_sample_std() {
        let stats = ColumnStats::from_values(&[Some(2.0), Some(4.0), None, Some(4.0), Some(6.0)]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, Some(4.0));
        assert_eq!(format_stat(stats.std), "1.63");
        assert_eq!(stats.min, Some(2.0));
        assert_eq!(stats.max, Some(6.0));
    }

    #[test]
    fn test_top_categories_all_tied_and_empty() {
        let column = Column::text("c", text(&["b", "a", "b", "a", "c", "c"]));
        assert_eq!(
            top_categories(&column, 5).expect("Failed to count"),
            vec![("b".to_string(), 2), ("a".to_string(), 2), ("c".to_string(), 2)]
        );
        assert!(top_categories(&Column::text("e", vec![]), 5)
            .expect("Failed to count")
            .is_empty());
    }

    #[test]
    fn test_format_stat_specials() {
        assert_eq!(format_stat(Some(f64::INFINITY)), "inf");
        assert_eq!(format_stat(Some(f64::NEG_INFINITY)), "-inf");
        assert_eq!(format_stat(Some(f64::NAN)), "nan");
        assert_eq!(format_stat(Some(1.005)), format!("{:.2}", 1.005_f64));
        assert_eq!(format_stat(Some(-2.5)), "-2.50");
    }

    #[test]
    fn test_empty_table_report() {
        let report = build_report(&Table::default(), 5).expect("Failed to build report");
        let rendered = report.render();
        assert!(rendered.contains("Rows: 0"));
        assert!(rendered.contains("Columns: 0"));
        assert!(rendered.contains(NO_NUMERIC_NOTICE));
        assert!(!rendered.contains("Top categories"));
    }

    #[test]
    fn test_zero_top_n_lists_no_values() {
        let report = build_report(&sample_table(), 0).expect("Failed to build report");
        let lines = report.lines();
        let header = lines
            .iter()
            .position(|l| l == "name:")
            .expect("missing categorical header");
        assert_eq!(lines[header + 1], "");
    }
}
