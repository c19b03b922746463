use crate::error::{Result, ToolError};

/// Name of the per-table row counter prepended to every sheet.
pub const SEQUENCE_COLUMN: &str = "seqno";
/// Name of the creation timestamp column.
pub const CREATED_COLUMN: &str = "create_ts";
/// Name of the update timestamp column.
pub const UPDATED_COLUMN: &str = "updt_ts";

/// Tokens read as a missing value, mirroring the usual data-frame defaults.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: &[&str] = &["True", "TRUE", "true"];
const FALSE_TOKENS: &[&str] = &["False", "FALSE", "false"];

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value.
    Empty,
    /// Whole number.
    Int(i64),
    /// Finite floating point number.
    Float(f64),
    /// Boolean literal.
    Bool(bool),
    /// Free text, kept exactly as read.
    Text(String),
}

/// Type chosen for a whole column after inspecting every value in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Empty,
    Int,
    Float,
    Bool,
    Text,
}

impl ColumnKind {
    /// Picks the narrowest kind that accepts every non-missing value.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let present: Vec<&str> = values
            .into_iter()
            .filter(|value| !is_missing(value))
            .collect();

        if present.is_empty() {
            ColumnKind::Empty
        } else if present.iter().all(|value| parse_int(value).is_some()) {
            ColumnKind::Int
        } else if present.iter().all(|value| parse_float(value).is_some()) {
            ColumnKind::Float
        } else if present.iter().all(|value| parse_bool(value).is_some()) {
            ColumnKind::Bool
        } else {
            ColumnKind::Text
        }
    }

    fn cell(self, raw: String) -> Cell {
        if is_missing(&raw) {
            return Cell::Empty;
        }
        let parsed = match self {
            ColumnKind::Empty => Some(Cell::Empty),
            ColumnKind::Int => parse_int(&raw).map(Cell::Int),
            ColumnKind::Float => parse_float(&raw).map(Cell::Float),
            ColumnKind::Bool => parse_bool(&raw).map(Cell::Bool),
            ColumnKind::Text => None,
        };
        parsed.unwrap_or(Cell::Text(raw))
    }
}

fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn parse_float(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if TRUE_TOKENS.contains(&value) {
        Some(true)
    } else if FALSE_TOKENS.contains(&value) {
        Some(false)
    } else {
        None
    }
}

/// An ordered set of named columns and the rows beneath them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates a table from already typed rows. Every row must have one cell
    /// per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { columns, rows }
    }

    /// Builds a table from raw text rows, inferring one kind per column.
    /// Short rows are padded with missing values.
    pub fn from_raw(columns: Vec<String>, raw_rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let mut raw_rows = raw_rows;
        for row in &mut raw_rows {
            row.resize(width, String::new());
        }

        let kinds: Vec<ColumnKind> = (0..width)
            .map(|col_idx| ColumnKind::infer(raw_rows.iter().map(|row| row[col_idx].as_str())))
            .collect();

        let rows = raw_rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&kinds)
                    .map(|(raw, kind)| kind.cell(raw))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// A table carrying the bookkeeping columns: `seqno` first, then the source
/// columns in order, then `create_ts` and `updt_ts`.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedTable {
    table: Table,
    timestamp: String,
}

impl AugmentedTable {
    /// Prepends a 1-based sequence column and appends two identical timestamp
    /// text columns.
    pub fn new(source: Table, timestamp: impl Into<String>) -> Result<Self> {
        let timestamp = timestamp.into();

        for reserved in [SEQUENCE_COLUMN, CREATED_COLUMN, UPDATED_COLUMN] {
            if source.columns.iter().any(|column| column == reserved) {
                return Err(ToolError::ReservedColumn {
                    column: reserved.to_string(),
                });
            }
        }

        let mut columns = Vec::with_capacity(source.columns.len() + 3);
        columns.push(SEQUENCE_COLUMN.to_string());
        columns.extend(source.columns);
        columns.push(CREATED_COLUMN.to_string());
        columns.push(UPDATED_COLUMN.to_string());

        let rows = source
            .rows
            .into_iter()
            .zip(1i64..)
            .map(|(cells, seqno)| {
                let mut row = Vec::with_capacity(cells.len() + 3);
                row.push(Cell::Int(seqno));
                row.extend(cells);
                row.push(Cell::Text(timestamp.clone()));
                row.push(Cell::Text(timestamp.clone()));
                row
            })
            .collect();

        Ok(Self {
            table: Table { columns, rows },
            timestamp,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }
}
