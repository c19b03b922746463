use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::{Result, ToolError};

/// A worksheet rendered as plain strings, header row first.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetContents {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl SheetContents {
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Rows below the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }
}

/// Reads every sheet of a workbook written by
/// [`WorkbookWriter`](crate::io::excel_write::WorkbookWriter), in workbook order.
pub fn read_workbook(path: &Path) -> Result<Vec<SheetContents>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let names = workbook.sheet_names().to_vec();

    names
        .into_iter()
        .map(|name| {
            let range = read_required_sheet(&mut workbook, &name)?;
            let rows = range
                .rows()
                .map(|row| row.iter().map(|cell| cell_to_string(Some(cell))).collect())
                .collect();
            Ok(SheetContents { name, rows })
        })
        .collect()
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
