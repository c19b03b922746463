use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::table::{AugmentedTable, Cell, Table};

/// Rows available in a worksheet, header included.
pub const MAX_ROWS: usize = 1_048_576;
/// Columns available in a worksheet.
pub const MAX_COLUMNS: usize = 16_384;

/// Accumulates worksheets in memory and writes the workbook once at the end.
pub struct WorkbookWriter {
    workbook: Workbook,
    header_format: Format,
    sheet_count: usize,
}

impl WorkbookWriter {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            header_format: Format::new().set_bold(),
            sheet_count: 0,
        }
    }

    /// Adds `table` as a sheet named `name`. The worksheet is assembled in
    /// full before it joins the workbook, so a failure leaves no trace.
    pub fn add_sheet(&mut self, name: &str, table: &AugmentedTable) -> Result<()> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(name)?;
        write_table(&mut worksheet, table.table(), &self.header_format)?;

        self.workbook.push_worksheet(worksheet);
        self.sheet_count += 1;
        debug!(sheet = name, rows = table.row_count(), "worksheet added");
        Ok(())
    }

    pub fn sheet_count(&self) -> usize {
        self.sheet_count
    }

    /// Serialises the workbook to `path`, replacing any existing file.
    pub fn save(mut self, path: &Path) -> Result<()> {
        self.workbook.save(path)?;
        Ok(())
    }
}

impl Default for WorkbookWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_table(worksheet: &mut Worksheet, table: &Table, header_format: &Format) -> Result<()> {
    let too_large = || ToolError::SheetTooLarge {
        rows: table.row_count(),
        columns: table.column_count(),
    };
    if table.row_count() + 1 > MAX_ROWS || table.column_count() > MAX_COLUMNS {
        return Err(too_large());
    }

    for (col_idx, header) in table.columns().iter().enumerate() {
        let col = u16::try_from(col_idx).map_err(|_| too_large())?;
        worksheet.write_string_with_format(0, col, header, header_format)?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let excel_row = u32::try_from(row_idx + 1).map_err(|_| too_large())?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = u16::try_from(col_idx).map_err(|_| too_large())?;
            match cell {
                Cell::Empty => {}
                Cell::Int(value) => {
                    worksheet.write_number(excel_row, col, *value as f64)?;
                }
                Cell::Float(value) => {
                    worksheet.write_number(excel_row, col, *value)?;
                }
                Cell::Bool(value) => {
                    worksheet.write_boolean(excel_row, col, *value)?;
                }
                Cell::Text(value) => {
                    worksheet.write_string(excel_row, col, value)?;
                }
            }
        }
    }

    Ok(())
}
