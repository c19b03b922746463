//! Core library for the csvbook command line application.
//!
//! The library turns a folder of CSV files into one multi-sheet Excel
//! workbook. IO adapters live under [`io`], the in-memory table model in
//! [`table`], file and sheet naming rules in [`naming`], and the orchestration
//! in [`convert`].

pub mod clock;
pub mod convert;
pub mod discovery;
pub mod error;
pub mod io;
pub mod logging;
pub mod naming;
pub mod table;

pub use convert::{ConversionReport, Converter, ConverterConfig, Outcome, convert_folder};
pub use error::{Result, ToolError};
