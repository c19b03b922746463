use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csvbook::clock::FixedClock;
use csvbook::io::excel_read::{self, SheetContents};
use csvbook::{Converter, ConverterConfig, Outcome};
use tempfile::tempdir;

const EMPLOYEES: &str = "Name,Age,City\nAlice,25,New York\nBob,30,Los Angeles\nCharlie,35,Chicago\n";
const PRODUCTS: &str = "Product,Price,Stock\nLaptop,999.99,10\nMouse,25.5,50\nKeyboard,75.0,25\n";
const SALES: &str = "Date,Sales,Region\n2024-01-01,1000,North\n2024-01-02,1500,South\n2024-01-03,1200,East\n";

const STAMP: &str = "2024-01-05 02:30PM";

fn instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 5)
        .and_then(|date| date.and_hms_opt(14, 30, 0))
        .expect("valid instant")
}

fn converter() -> Converter<FixedClock> {
    Converter::with_clock(ConverterConfig::default(), FixedClock(instant()))
}

fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("CSV written");
    path
}

fn workbooks_in(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .expect("directory listed")
        .map(|entry| entry.expect("entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "xlsx"))
        .collect();
    found.sort();
    found
}

fn sheet_names(sheets: &[SheetContents]) -> Vec<&str> {
    sheets.iter().map(|sheet| sheet.name.as_str()).collect()
}

#[test]
fn three_files_become_three_sheets() {
    let temp_dir = tempdir().expect("temporary directory");
    write_csv(temp_dir.path(), "employees.csv", EMPLOYEES);
    write_csv(temp_dir.path(), "products.csv", PRODUCTS);
    write_csv(temp_dir.path(), "sales.csv", SALES);
    let mut lines: Vec<String> = Vec::new();

    let report = converter()
        .convert(temp_dir.path(), &mut lines)
        .expect("conversion succeeds");

    let expected_path = temp_dir.path().join("test-data-load-20240105-143000.xlsx");
    assert_eq!(report.outcome, Outcome::Written(expected_path.clone()));
    assert_eq!(report.discovered, 3);
    assert!(report.skipped.is_empty());
    assert_eq!(workbooks_in(temp_dir.path()), vec![expected_path.clone()]);

    let sheets = excel_read::read_workbook(&expected_path).expect("workbook read");
    assert_eq!(sheet_names(&sheets), vec!["employees", "products", "sales"]);

    let employees = &sheets[0];
    assert_eq!(
        employees.header(),
        ["seqno", "Name", "Age", "City", "create_ts", "updt_ts"]
    );
    assert_eq!(employees.data_rows().len(), 3);
    assert_eq!(
        employees.data_rows()[0],
        vec!["1", "Alice", "25", "New York", STAMP, STAMP]
    );

    assert_eq!(
        lines.last().map(String::as_str),
        Some(format!("Excel file created at: {}", expected_path.display()).as_str())
    );
    assert!(lines.contains(
        &"Successfully added 'employees.csv' to sheet 'employees' with 3 rows and timestamp: 2024-01-05 02:30PM"
            .to_string()
    ));
}

#[test]
fn every_sheet_keeps_column_layout_and_own_sequence() {
    let temp_dir = tempdir().expect("temporary directory");
    write_csv(temp_dir.path(), "a.csv", "x,y\n1,2\n3,4\n");
    write_csv(temp_dir.path(), "b.csv", "only\nfirst\nsecond\nthird\n");
    let mut lines: Vec<String> = Vec::new();

    let report = converter()
        .convert(temp_dir.path(), &mut lines)
        .expect("conversion succeeds");
    let path = report.output_path().expect("workbook written");
    let sheets = excel_read::read_workbook(path).expect("workbook read");

    assert_eq!(sheets[0].header(), ["seqno", "x", "y", "create_ts", "updt_ts"]);
    assert_eq!(sheets[1].header(), ["seqno", "only", "create_ts", "updt_ts"]);
    for sheet in &sheets {
        for (idx, row) in sheet.data_rows().iter().enumerate() {
            assert_eq!(row[0], (idx + 1).to_string());
            let width = row.len();
            assert_eq!(row[width - 2], row[width - 1]);
            assert_eq!(row[width - 1], STAMP);
        }
    }
    assert_eq!(sheets[1].data_rows().len(), 3);
}

#[test]
fn only_first_three_files_are_used() {
    let temp_dir = tempdir().expect("temporary directory");
    for name in ["e.csv", "c.csv", "a.csv", "d.csv", "b.csv"] {
        write_csv(temp_dir.path(), name, "value\n1\n");
    }
    let mut lines: Vec<String> = Vec::new();

    let report = converter()
        .convert(temp_dir.path(), &mut lines)
        .expect("conversion succeeds");

    assert_eq!(report.discovered, 5);
    assert!(lines.contains(&"Using first 3 CSV files (found 5 total)".to_string()));
    assert_eq!(
        lines[0],
        "Found 5 CSV files:\n  - a.csv\n  - b.csv\n  - c.csv\n  - d.csv\n  - e.csv"
    );

    let sheets = excel_read::read_workbook(report.output_path().expect("written"))
        .expect("workbook read");
    assert_eq!(sheet_names(&sheets), vec!["a", "b", "c"]);
}

#[test]
fn configured_limit_is_honoured() {
    let temp_dir = tempdir().expect("temporary directory");
    for name in ["a.csv", "b.csv", "c.csv", "d.csv"] {
        write_csv(temp_dir.path(), name, "value\n1\n");
    }
    let config = ConverterConfig::default()
        .with_max_files(4)
        .with_output_prefix("load-");
    let converter = Converter::with_clock(config, FixedClock(instant()));
    let mut lines: Vec<String> = Vec::new();

    let report = converter
        .convert(temp_dir.path(), &mut lines)
        .expect("conversion succeeds");

    assert_eq!(report.sheets.len(), 4);
    assert!(!lines.iter().any(|line| line.starts_with("Using first")));
    assert_eq!(
        report.output_path(),
        Some(temp_dir.path().join("load-20240105-143000.xlsx").as_path())
    );
}

#[test]
fn empty_file_is_skipped_and_the_rest_written() {
    let temp_dir = tempdir().expect("temporary directory");
    write_csv(temp_dir.path(), "employees.csv", EMPLOYEES);
    let empty = write_csv(temp_dir.path(), "empty.csv", "");
    write_csv(temp_dir.path(), "sales.csv", SALES);
    let mut lines: Vec<String> = Vec::new();

    let report = converter()
        .convert(temp_dir.path(), &mut lines)
        .expect("conversion succeeds");

    assert!(lines.contains(&format!("Error: File '{}' is empty", empty.display())));
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].source, empty);

    let sheets = excel_read::read_workbook(report.output_path().expect("written"))
        .expect("workbook read");
    assert_eq!(sheet_names(&sheets), vec!["employees", "sales"]);
}

#[test]
fn malformed_file_is_reported_with_its_error() {
    let temp_dir = tempdir().expect("temporary directory");
    let broken = write_csv(temp_dir.path(), "broken.csv", "a,b\n1,2,3\n");
    write_csv(temp_dir.path(), "good.csv", "a\n1\n");
    let mut lines: Vec<String> = Vec::new();

    let report = converter()
        .convert(temp_dir.path(), &mut lines)
        .expect("conversion succeeds");

    assert!(lines.contains(&format!(
        "Error processing '{}': expected 2 fields in line 2, saw 3",
        broken.display()
    )));
    assert_eq!(report.sheets.len(), 1);
    assert_eq!(report.sheets[0].sheet_name, "good");
}

#[test]
fn missing_directory_creates_nothing() {
    let temp_dir = tempdir().expect("temporary directory");
    let missing = temp_dir.path().join("non_existent");
    let mut lines: Vec<String> = Vec::new();

    let report = converter()
        .convert(&missing, &mut lines)
        .expect("handled without error");

    assert_eq!(report.outcome, Outcome::MissingDirectory);
    assert_eq!(
        lines,
        vec![format!("Error: Folder '{}' does not exist", missing.display())]
    );
    assert!(!missing.exists());
    assert!(workbooks_in(temp_dir.path()).is_empty());
}

#[test]
fn folder_without_csv_files_creates_nothing() {
    let temp_dir = tempdir().expect("temporary directory");
    fs::write(temp_dir.path().join("notes.txt"), "not tabular").expect("file written");
    let mut lines: Vec<String> = Vec::new();

    let report = converter()
        .convert(temp_dir.path(), &mut lines)
        .expect("handled without error");

    assert_eq!(report.outcome, Outcome::NoInputFiles);
    assert_eq!(
        lines,
        vec![format!(
            "No CSV files found in folder: {}",
            temp_dir.path().display()
        )]
    );
    assert!(workbooks_in(temp_dir.path()).is_empty());
}

#[test]
fn no_workbook_when_every_file_fails() {
    let temp_dir = tempdir().expect("temporary directory");
    write_csv(temp_dir.path(), "one.csv", "");
    write_csv(temp_dir.path(), "two.csv", "seqno,value\n1,2\n");
    let mut lines: Vec<String> = Vec::new();

    let report = converter()
        .convert(temp_dir.path(), &mut lines)
        .expect("handled without error");

    assert_eq!(report.outcome, Outcome::NothingWritten);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(
        lines.last().map(String::as_str),
        Some("No sheets were written; workbook not created")
    );
    assert!(workbooks_in(temp_dir.path()).is_empty());
}

#[test]
fn long_names_are_truncated_and_collisions_suffixed() {
    let temp_dir = tempdir().expect("temporary directory");
    let shared = "quarterly_financial_results_for";
    write_csv(temp_dir.path(), &format!("{shared}_north.csv"), "a\n1\n");
    write_csv(temp_dir.path(), &format!("{shared}_south.csv"), "a\n2\n");
    let mut lines: Vec<String> = Vec::new();

    let report = converter()
        .convert(temp_dir.path(), &mut lines)
        .expect("conversion succeeds");
    let sheets = excel_read::read_workbook(report.output_path().expect("written"))
        .expect("workbook read");

    assert_eq!(shared.chars().count(), 31);
    assert_eq!(sheet_names(&sheets), vec![shared, "quarterly_financial_results_f_1"]);
    assert!(sheets.iter().all(|sheet| sheet.name.chars().count() <= 31));
}

#[test]
fn inputs_are_left_untouched() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = write_csv(temp_dir.path(), "employees.csv", EMPLOYEES);
    let mut lines: Vec<String> = Vec::new();

    converter()
        .convert(temp_dir.path(), &mut lines)
        .expect("conversion succeeds");

    assert_eq!(fs::read_to_string(path).expect("CSV read"), EMPLOYEES);
}
