use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool discovers, loads, augments, or writes tabular data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the CSV reader rejects the input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the directory to scan does not exist.
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Raised when an input file disappears between discovery and load.
    #[error("input file not found: {0}")]
    FileNotFound(PathBuf),

    /// Raised when an input file has no header row to parse.
    #[error("no columns to parse from file {0}")]
    EmptyInput(PathBuf),

    /// Raised when a data row carries more fields than the header.
    #[error("expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Raised when the source already defines one of the bookkeeping columns.
    #[error("cannot insert {column}, already exists")]
    ReservedColumn { column: String },

    /// Raised when a table does not fit into a single worksheet.
    #[error("table with {rows} rows and {columns} columns exceeds worksheet limits")]
    SheetTooLarge { rows: usize, columns: usize },

    /// Raised when a workbook read back from disk does not look as expected.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
