/// In-memory table and the CSV loader that builds it
///
/// Parsing and type inference are done by the polars CSV reader; the frame
/// it returns is then turned into a typed `Table`. A column is either
/// `Numeric` or `Text`, and every cell is an `Option` where `None` is the
/// missing marker.

use std::borrow::Cow;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use log::{debug, info, warn};
use polars::prelude::{
    CsvParseOptions, CsvReadOptions, DataFrame, DataType, NullValues, PlSmallStr, SerReader,
};

use crate::error::{Result, ToolkitError};

/// Raw cell texts that are read as missing values
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Text used for a missing cell once it is coerced to a string
pub const MISSING_TEXT: &str = "nan";

/// Typed cell storage for one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Every present value parsed as a number
    Numeric(Vec<Option<f64>>),
    /// Anything else, kept as the original text
    Text(Vec<Option<String>>),
}

/// A named column of a `Table`
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    /// Number of cells, missing ones included
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cells holding the missing marker
    pub fn missing_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Text(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Cells coerced to their text form, missing cells included as `nan`
    pub fn text_cells(&self) -> Vec<Cow<'_, str>> {
        match &self.data {
            ColumnData::Numeric(values) => values
                .iter()
                .map(|v| match v {
                    Some(n) => Cow::Owned(format!("{n:?}")),
                    None => Cow::Borrowed(MISSING_TEXT),
                })
                .collect(),
            ColumnData::Text(values) => values
                .iter()
                .map(|v| match v {
                    Some(s) => Cow::Borrowed(s.as_str()),
                    None => Cow::Borrowed(MISSING_TEXT),
                })
                .collect(),
        }
    }
}

/// Rows × named columns, every column with the same row count
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from columns, checking that all of them have equal length
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(ToolkitError::ColumnLength {
                column: bad.name().to_string(),
                expected: row_count,
                found: bad.len(),
            });
        }
        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Total number of missing cells across all columns
    pub fn missing_total(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }
}

/// Reads delimited text into a `Table`
#[derive(Debug, Clone)]
pub struct TableLoader {
    delimiter: u8,
    na_values: Vec<String>,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a field delimiter other than `,`
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Treat additional raw texts as missing, on top of the defaults
    pub fn with_na_values<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in extra.into_iter().map(Into::into) {
            if !self.na_values.contains(&value) {
                self.na_values.push(value);
            }
        }
        self
    }

    /// Load a CSV file from disk
    ///
    /// # Errors
    ///
    /// `FileNotFound` if `path` is not an existing file, otherwise any
    /// read or parse error from the CSV layer.
    pub fn load_path(&self, path: &Path) -> Result<Table> {
        if !path.is_file() {
            return Err(ToolkitError::FileNotFound(path.to_path_buf()));
        }
        info!("Loading table from {}", path.display());
        let bytes = fs::read(path)?;
        self.load_bytes(bytes)
    }

    /// Load CSV content from any reader; the first record is the header
    pub fn load_reader<R: Read>(&self, mut reader: R) -> Result<Table> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.load_bytes(bytes)
    }

    fn load_bytes(&self, bytes: Vec<u8>) -> Result<Table> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            warn!("Input has no header line, loading an empty table");
            return Ok(Table::default());
        }

        let null_values: Vec<PlSmallStr> = self.na_values.iter().map(|v| v.as_str().into()).collect();
        let parse_options = CsvParseOptions::default()
            .with_separator(self.delimiter)
            .with_null_values(Some(NullValues::AllColumns(null_values)));

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(parse_options)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        let table = table_from_frame(&df)?;
        debug!(
            "Loaded {} rows x {} columns ({} numeric)",
            table.row_count(),
            table.column_count(),
            table.columns().iter().filter(|c| c.is_numeric()).count()
        );
        Ok(table)
    }
}

/// Typed view over a polars frame
///
/// Numeric dtypes become `Numeric`, everything else `Text`. With zero rows
/// every column is `Text`; a column whose cells are all missing is `Numeric`.
fn table_from_frame(df: &DataFrame) -> Result<Table> {
    let row_count = df.height();
    let mut columns = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let name = series.name().to_string();
        let all_missing = row_count > 0 && series.null_count() == row_count;

        let column = if row_count > 0 && (series.dtype().is_primitive_numeric() || all_missing) {
            let floats = series.cast(&DataType::Float64)?;
            let values = floats
                .f64()?
                .into_iter()
                .map(|v| v.filter(|n| !n.is_nan()))
                .collect();
            Column::numeric(name, values)
        } else {
            let strings = series.cast(&DataType::String)?;
            let values = strings
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect();
            Column::text(name, values)
        };
        columns.push(column);
    }

    Table::new(columns)
}
