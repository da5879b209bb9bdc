//! Workbook layout helpers and CSV output on disk

use pretty_assertions::assert_eq;
use test_log::test;

use edgar_workbook::workbook::{offset_cell, sheet_hyperlink, CellValue, Table, Workbook, WorkbookFormat};
use edgar_workbook::EdgarError;

#[test]
fn test_tables_at_offsets_round_out_a_sheet() {
    let mut wb = Workbook::new();
    let mut table = Table::new(["Report Date:", "SEC Form Type:"]);
    table.push_row(vec!["2023-09-30".into(), "10-K".into()]);

    wb.add_table_at("Filings", &table, "A1").unwrap();
    let next = offset_cell("A1", 4, 0).unwrap();
    assert_eq!(next, "E1");
    wb.add_table_at("Filings", &table, &next).unwrap();

    let sheet = wb.sheet("Filings").unwrap();
    assert_eq!(sheet.dimensions(), (2, 6));
    assert_eq!(sheet.get("F2"), Some(&CellValue::Text("10-K".into())));
}

#[test]
fn test_set_cells_errors() {
    let mut wb = Workbook::new();
    let err = wb.set_cells("Missing", &["A1"], vec!["x".into()]).unwrap_err();
    assert!(matches!(err, EdgarError::UnknownSheet(ref name) if name == "Missing"));

    wb.add_sheet_with_table("Sheet", &Table::new(["h"])).unwrap();
    let err = wb.set_cells("Sheet", &["A1", "B1"], vec!["x".into()]).unwrap_err();
    assert!(matches!(err, EdgarError::LengthMismatch { cells: 2, values: 1 }));
}

#[test]
fn test_hyperlinks_quote_names_with_punctuation() {
    assert_eq!(
        sheet_hyperlink("us-gaapSheet1"),
        "=HYPERLINK(\"#'us-gaapSheet1'!A1\", \"us-gaapSheet1\")"
    );
    assert_eq!(sheet_hyperlink("deiSheet1"), "=HYPERLINK(\"#deiSheet1!A1\", \"deiSheet1\")");
}

#[test]
fn test_csv_save_writes_numbers_without_trailing_zero() {
    let mut wb = Workbook::new();
    let mut table = Table::new(["end", "val"]);
    table.push_row(vec!["2023-09-30".into(), 352583000000.0.into()]);
    table.push_row(vec!["2023-06-30".into(), 0.5.into()]);
    wb.add_sheet_with_table("Assets", &table).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("book");
    let path = wb.save(&target, WorkbookFormat::Csv).unwrap();
    assert_eq!(path, target);

    let content = std::fs::read_to_string(path.join("001_Assets.csv")).unwrap();
    assert_eq!(content, "end,val\n2023-09-30,352583000000\n2023-06-30,0.5\n");
}
