use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::table::Table;

/// Loads a comma-separated file whose first record is the header row.
///
/// Blank lines are ignored. Rows shorter than the header are padded with
/// missing values, longer rows are rejected. Column kinds are inferred by
/// [`Table::from_raw`].
pub fn read_table(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|error| match error.kind() {
        ErrorKind::NotFound => ToolError::FileNotFound(path.to_path_buf()),
        _ => ToolError::Io(error),
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(ToolError::EmptyInput(path.to_path_buf())),
    };
    let columns = column_names(&header);

    let mut raw_rows = Vec::new();
    for record in records {
        let record = record?;
        if record.len() > columns.len() {
            return Err(ToolError::RaggedRow {
                line: record.position().map(|pos| pos.line()).unwrap_or_default(),
                expected: columns.len(),
                found: record.len(),
            });
        }
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(
        path = %path.display(),
        columns = columns.len(),
        rows = raw_rows.len(),
        "loaded CSV table"
    );
    Ok(Table::from_raw(columns, raw_rows))
}

/// Blank headers become `Unnamed: <index>` and repeats get `.1`, `.2`, ...
fn column_names(header: &StringRecord) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut repeats: HashMap<String, usize> = HashMap::new();

    header
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let raw = if idx == 0 {
                raw.trim_start_matches('\u{feff}')
            } else {
                raw
            };
            let name = if raw.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                raw.to_string()
            };

            let mut unique = name.clone();
            while used.contains(&unique) {
                let count = repeats.entry(name.clone()).or_insert(0);
                *count += 1;
                unique = format!("{name}.{count}");
            }
            used.insert(unique.clone());
            unique
        })
        .collect()
}
