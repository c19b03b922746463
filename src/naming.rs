use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDateTime;

/// Excel refuses sheet names longer than this many characters.
pub const MAX_SHEET_NAME_LEN: usize = 31;
/// Extension of the workbook written by the converter.
pub const WORKBOOK_EXTENSION: &str = "xlsx";

const FILE_STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
const CELL_STAMP_FORMAT: &str = "%Y-%m-%d %I:%M%p";
const INVALID_SHEET_CHARS: [char; 9] = [':', '\\', '/', '?', '*', '[', ']', '\'', '"'];

/// Formats the instant embedded in the workbook file name, e.g. `20240105-143000`.
pub fn file_timestamp(at: NaiveDateTime) -> String {
    at.format(FILE_STAMP_FORMAT).to_string()
}

/// Formats the value stored in the timestamp columns, e.g. `2024-01-05 02:30PM`.
pub fn cell_timestamp(at: NaiveDateTime) -> String {
    at.format(CELL_STAMP_FORMAT).to_string()
}

/// `<prefix><YYYYMMDD-HHMMSS>.xlsx`
pub fn workbook_file_name(prefix: &str, at: NaiveDateTime) -> String {
    format!("{prefix}{}.{WORKBOOK_EXTENSION}", file_timestamp(at))
}

/// File name with its directory and last extension removed.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Makes a raw name acceptable as a sheet name: invalid characters become
/// `_`, and the result is trimmed and cut to 31 characters.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if INVALID_SHEET_CHARS.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let trimmed = sanitized.trim();
    if trimmed.is_empty() {
        return "Sheet".to_string();
    }

    truncate_chars(trimmed, MAX_SHEET_NAME_LEN).trim_end().to_string()
}

fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &value[..byte_idx],
        None => value,
    }
}

/// Tracks the sheet names already present in a workbook. Names compare
/// case-insensitively, as they do in Excel.
#[derive(Debug, Default)]
pub struct SheetNameRegistry {
    used: HashSet<String>,
}

impl SheetNameRegistry {
    /// Returns the name a sheet derived from `raw` would receive, without
    /// reserving it. Collisions get a `_1`, `_2`, ... suffix.
    pub fn candidate(&self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        if !self.is_used(&base) {
            return base;
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            let max_len = MAX_SHEET_NAME_LEN - suffix.len();
            let prefix = truncate_chars(&base, max_len);
            let candidate = format!("{prefix}{suffix}");
            if !self.is_used(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Reserves a name returned by [`candidate`](Self::candidate).
    pub fn claim(&mut self, name: &str) {
        self.used.insert(name.to_lowercase());
    }

    fn is_used(&self, name: &str) -> bool {
        self.used.contains(&name.to_lowercase())
    }
}
