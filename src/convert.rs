//! Folder-to-workbook conversion.
//!
//! [`Converter::convert`] discovers the CSV files of a directory, keeps the
//! first few in name order, augments each table with a sequence column and two
//! timestamp columns, and writes one sheet per file into a single workbook
//! placed next to the inputs. Problems with individual files are reported and
//! skipped; only a failure to save the finished workbook is returned as an
//! error.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::discovery::list_input_files;
use crate::error::{Result, ToolError};
use crate::io::csv_read::read_table;
use crate::io::excel_write::WorkbookWriter;
use crate::naming::{SheetNameRegistry, base_name, cell_timestamp, workbook_file_name};
use crate::table::AugmentedTable;

/// Knobs for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Extension (without the dot) an input file must carry.
    pub extension: String,
    /// Upper bound on the number of files turned into sheets.
    pub max_files: usize,
    /// Text placed before the timestamp in the workbook file name.
    pub output_prefix: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            extension: "csv".to_string(),
            max_files: 3,
            output_prefix: "test-data-load-".to_string(),
        }
    }
}

impl ConverterConfig {
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files.max(1);
        self
    }

    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }
}

/// A progress line produced while converting.
#[derive(Debug)]
pub enum Progress<'a> {
    MissingDirectory {
        path: &'a Path,
    },
    NoInputFiles {
        directory: &'a Path,
    },
    Discovered {
        files: &'a [PathBuf],
    },
    Capped {
        limit: usize,
        total: usize,
    },
    SheetWritten {
        file: &'a Path,
        sheet: &'a str,
        rows: usize,
        timestamp: &'a str,
    },
    FileSkipped {
        file: &'a Path,
        error: &'a ToolError,
    },
    NothingWritten,
    WorkbookSaved {
        path: &'a Path,
    },
}

impl fmt::Display for Progress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::MissingDirectory { path } => {
                write!(f, "Error: Folder '{}' does not exist", path.display())
            }
            Progress::NoInputFiles { directory } => {
                write!(f, "No CSV files found in folder: {}", directory.display())
            }
            Progress::Discovered { files } => {
                write!(f, "Found {} CSV files:", files.len())?;
                for file in *files {
                    write!(f, "\n  - {}", display_name(file))?;
                }
                Ok(())
            }
            Progress::Capped { limit, total } => {
                write!(f, "Using first {limit} CSV files (found {total} total)")
            }
            Progress::SheetWritten {
                file,
                sheet,
                rows,
                timestamp,
            } => write!(
                f,
                "Successfully added '{}' to sheet '{sheet}' with {rows} rows and timestamp: {timestamp}",
                display_name(file)
            ),
            Progress::FileSkipped { file, error } => match error {
                ToolError::FileNotFound(_) => {
                    write!(f, "Error: File '{}' not found", file.display())
                }
                ToolError::EmptyInput(_) => write!(f, "Error: File '{}' is empty", file.display()),
                other => write!(f, "Error processing '{}': {other}", file.display()),
            },
            Progress::NothingWritten => {
                write!(f, "No sheets were written; workbook not created")
            }
            Progress::WorkbookSaved { path } => {
                write!(f, "Excel file created at: {}", path.display())
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Receives progress lines as the conversion advances.
pub trait Reporter {
    fn report(&mut self, progress: &Progress<'_>);
}

/// Prints each progress line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&mut self, progress: &Progress<'_>) {
        println!("{progress}");
    }
}

impl Reporter for Vec<String> {
    fn report(&mut self, progress: &Progress<'_>) {
        self.push(progress.to_string());
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The directory to scan does not exist.
    MissingDirectory,
    /// No input files matched.
    NoInputFiles,
    /// Every retained file failed, so no workbook was written.
    NothingWritten,
    /// The workbook was saved at this path.
    Written(PathBuf),
}

/// A sheet that made it into the workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub source: PathBuf,
    pub sheet_name: String,
    pub rows: usize,
    pub timestamp: String,
}

/// A retained input file that was left out, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub source: PathBuf,
    pub reason: String,
}

/// Summary of a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub outcome: Outcome,
    /// Matching files found before the cap was applied.
    pub discovered: usize,
    pub sheets: Vec<SheetSummary>,
    pub skipped: Vec<SkippedFile>,
}

impl ConversionReport {
    fn stopped(outcome: Outcome, discovered: usize) -> Self {
        Self {
            outcome,
            discovered,
            sheets: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn output_path(&self) -> Option<&Path> {
        match &self.outcome {
            Outcome::Written(path) => Some(path),
            _ => None,
        }
    }
}

/// Turns a folder of CSV files into one multi-sheet workbook.
#[derive(Debug, Clone, Default)]
pub struct Converter<C = SystemClock> {
    config: ConverterConfig,
    clock: C,
}

impl Converter<SystemClock> {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Converter<C> {
    /// Uses `clock` for both the file name and the per-sheet timestamps.
    pub fn with_clock(config: ConverterConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Converts the matching files in `directory`.
    ///
    /// A missing directory or an empty match set ends the run without
    /// writing anything. Per-file failures are reported and skipped. The only
    /// error returned is a failure to save the workbook.
    #[instrument(level = "info", skip_all, fields(directory = %directory.display()))]
    pub fn convert(
        &self,
        directory: &Path,
        reporter: &mut dyn Reporter,
    ) -> Result<ConversionReport> {
        let mut files = match list_input_files(directory, &self.config.extension) {
            Ok(files) => files,
            Err(ToolError::DirectoryNotFound(_)) => {
                warn!("directory does not exist");
                reporter.report(&Progress::MissingDirectory { path: directory });
                return Ok(ConversionReport::stopped(Outcome::MissingDirectory, 0));
            }
            Err(error) => {
                warn!(%error, "directory could not be listed");
                Vec::new()
            }
        };

        if files.is_empty() {
            reporter.report(&Progress::NoInputFiles { directory });
            return Ok(ConversionReport::stopped(Outcome::NoInputFiles, 0));
        }

        let discovered = files.len();
        reporter.report(&Progress::Discovered { files: &files });

        if discovered > self.config.max_files {
            reporter.report(&Progress::Capped {
                limit: self.config.max_files,
                total: discovered,
            });
            files.truncate(self.config.max_files);
        }

        let output_path =
            directory.join(workbook_file_name(&self.config.output_prefix, self.clock.now()));

        let mut writer = WorkbookWriter::new();
        let mut registry = SheetNameRegistry::default();
        let mut report = ConversionReport::stopped(Outcome::NothingWritten, discovered);

        for file in &files {
            match self.add_file(file, &mut writer, &mut registry) {
                Ok(summary) => {
                    info!(
                        file = %file.display(),
                        sheet = %summary.sheet_name,
                        rows = summary.rows,
                        "sheet written"
                    );
                    reporter.report(&Progress::SheetWritten {
                        file,
                        sheet: &summary.sheet_name,
                        rows: summary.rows,
                        timestamp: &summary.timestamp,
                    });
                    report.sheets.push(summary);
                }
                Err(error) => {
                    warn!(file = %file.display(), %error, "skipping file");
                    reporter.report(&Progress::FileSkipped { file, error: &error });
                    report.skipped.push(SkippedFile {
                        source: file.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        if writer.sheet_count() == 0 {
            reporter.report(&Progress::NothingWritten);
            return Ok(report);
        }

        writer.save(&output_path)?;
        info!(path = %output_path.display(), sheets = report.sheets.len(), "workbook saved");
        reporter.report(&Progress::WorkbookSaved { path: &output_path });
        report.outcome = Outcome::Written(output_path);
        Ok(report)
    }

    fn add_file(
        &self,
        file: &Path,
        writer: &mut WorkbookWriter,
        registry: &mut SheetNameRegistry,
    ) -> Result<SheetSummary> {
        let table = read_table(file)?;
        let timestamp = cell_timestamp(self.clock.now());
        let augmented = AugmentedTable::new(table, timestamp)?;

        let sheet_name = registry.candidate(&base_name(file));
        writer.add_sheet(&sheet_name, &augmented)?;
        registry.claim(&sheet_name);

        Ok(SheetSummary {
            source: file.to_path_buf(),
            sheet_name,
            rows: augmented.row_count(),
            timestamp: augmented.timestamp().to_string(),
        })
    }
}

/// Converts `directory` with the default configuration, the system clock,
/// and progress printed to standard output.
pub fn convert_folder(directory: &Path) -> Result<ConversionReport> {
    Converter::new(ConverterConfig::default()).convert(directory, &mut StdoutReporter)
}
