//! In-memory workbook of named sheets, saved either as `.xlsx` or as a
//! directory of CSV files.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{EdgarError, EdgarResult};

pub mod cell;
pub use cell::{column_letter, offset_cell, parse_cell};
use cell::{MAX_COLUMNS, MAX_ROWS};

/// Value held by a single cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Formula(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) | CellValue::Formula(s) => f.write_str(s),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Header row plus data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }
}

/// Sparse grid keyed by zero-based (row, column)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    cells: BTreeMap<(u32, u32), CellValue>,
}

impl Sheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: BTreeMap::new(),
        }
    }

    /// Write at a 1-based column/row position
    pub fn set(&mut self, column: u32, row: u32, value: CellValue) -> EdgarResult<()> {
        let (col_i, row_i) = (i64::from(column), i64::from(row));
        if !(1..=MAX_COLUMNS).contains(&col_i) || !(1..=MAX_ROWS).contains(&row_i) {
            return Err(EdgarError::CellOutOfRange { column: col_i, row: row_i });
        }
        let key = (row - 1, column - 1);
        match value {
            CellValue::Empty => {
                self.cells.remove(&key);
            }
            value => {
                self.cells.insert(key, value);
            }
        }
        Ok(())
    }

    /// Read an A1 reference
    pub fn get(&self, cell: &str) -> Option<&CellValue> {
        let (column, row) = parse_cell(cell).ok()?;
        self.cells.get(&(row - 1, column - 1))
    }

    /// Number of used rows and columns, counted from A1
    pub fn dimensions(&self) -> (u32, u32) {
        self.cells
            .keys()
            .fold((0, 0), |(rows, cols), (r, c)| (rows.max(r + 1), cols.max(c + 1)))
    }

    /// Zero-based (row, column, value) triples in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &CellValue)> {
        self.cells.iter().map(|((r, c), v)| (*r, *c, v))
    }

    /// Dense rows for tabular export
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let (rows, cols) = self.dimensions();
        let mut grid = vec![vec![String::new(); cols as usize]; rows as usize];
        for (r, c, value) in self.iter() {
            grid[r as usize][c as usize] = value.to_string();
        }
        grid
    }
}

/// Output format for [`Workbook::save`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WorkbookFormat {
    #[default]
    Xlsx,
    Csv,
}

/// Ordered collection of sheets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    /// Existing sheet of that name, or a new one appended at the end
    pub fn sheet_mut_or_create(&mut self, name: &str) -> &mut Sheet {
        let idx = match self.sheets.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sheets.push(Sheet::new(name));
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[idx]
    }

    /// Write `table` with its header row at A1
    pub fn add_sheet_with_table(&mut self, name: &str, table: &Table) -> EdgarResult<()> {
        self.add_table_at(name, table, "A1")
    }

    /// Write `table` with its header row at `start` and data directly below
    pub fn add_table_at(&mut self, name: &str, table: &Table, start: &str) -> EdgarResult<()> {
        let (start_col, start_row) = parse_cell(start)?;
        // Reject tables that would run off the sheet before touching anything
        if !table.headers.is_empty() || !table.rows.is_empty() {
            let width = table
                .rows
                .iter()
                .map(Vec::len)
                .chain(std::iter::once(table.headers.len()))
                .max()
                .unwrap_or(0) as i64;
            offset_cell(start, (width - 1).max(0), table.rows.len() as i64)?;
        }

        let sheet = self.sheet_mut_or_create(name);
        for (i, header) in table.headers.iter().enumerate() {
            sheet.set(start_col + i as u32, start_row, CellValue::Text(header.clone()))?;
        }
        for (r, row) in table.rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.set(start_col + c as u32, start_row + 1 + r as u32, value.clone())?;
            }
        }
        Ok(())
    }

    /// Write individual values into an existing sheet
    pub fn set_cells(&mut self, name: &str, cells: &[&str], values: Vec<CellValue>) -> EdgarResult<()> {
        if cells.len() != values.len() {
            return Err(EdgarError::LengthMismatch {
                cells: cells.len(),
                values: values.len(),
            });
        }
        let positions = cells
            .iter()
            .map(|c| parse_cell(c))
            .collect::<EdgarResult<Vec<_>>>()?;

        let sheet = self
            .sheets
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| EdgarError::UnknownSheet(name.to_string()))?;

        for ((column, row), value) in positions.into_iter().zip(values) {
            sheet.set(column, row, value)?;
        }
        Ok(())
    }

    /// Save in the requested format; returns the path written
    pub fn save(&self, path: &Path, format: WorkbookFormat) -> Result<PathBuf> {
        match format {
            WorkbookFormat::Xlsx => {
                let file = path.with_extension("xlsx");
                self.save_xlsx(&file)?;
                Ok(file)
            }
            WorkbookFormat::Csv => {
                self.save_csv_dir(path)?;
                Ok(path.to_path_buf())
            }
        }
    }

    /// Write an `.xlsx` file; formulas stay live
    pub fn save_xlsx(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut book = rust_xlsxwriter::Workbook::new();
        for sheet in &self.sheets {
            let worksheet = book.add_worksheet();
            worksheet
                .set_name(sheet.name.as_str())
                .with_context(|| format!("Invalid sheet name {:?}", sheet.name))?;

            for (row, col, value) in sheet.iter() {
                let col = col as u16;
                match value {
                    CellValue::Empty => {}
                    CellValue::Text(s) => {
                        worksheet.write_string(row, col, s.as_str())?;
                    }
                    CellValue::Number(n) => {
                        worksheet.write_number(row, col, *n)?;
                    }
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(row, col, *b)?;
                    }
                    CellValue::Formula(f) => {
                        worksheet.write_formula(row, col, f.as_str())?;
                    }
                }
            }
        }

        book.save(path)
            .with_context(|| format!("Failed to save workbook {}", path.display()))?;
        info!("Saved workbook with {} sheets to {}", self.sheets.len(), path.display());
        Ok(())
    }

    /// Write one CSV per sheet plus a `workbook.csv` manifest of sheet order
    pub fn save_csv_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let mut manifest = csv::Writer::from_path(dir.join("workbook.csv"))?;
        manifest.write_record(["Order", "Sheet Name", "File"])?;

        let mut written = Vec::with_capacity(self.sheets.len());
        for (i, sheet) in self.sheets.iter().enumerate() {
            let file_name = format!("{:03}_{}.csv", i + 1, sanitize_file_name(&sheet.name));
            let path = dir.join(&file_name);

            let mut writer = csv::WriterBuilder::new().flexible(true).from_path(&path)?;
            for row in sheet.to_rows() {
                writer.write_record(&row)?;
            }
            writer.flush()?;

            manifest.write_record([(i + 1).to_string(), sheet.name.clone(), file_name])?;
            written.push(path);
        }
        manifest.flush()?;

        info!("Saved {} sheets as CSV under {}", written.len(), dir.display());
        Ok(written)
    }
}

/// In-workbook link to cell A1 of `sheet_name`.
///
/// Names with anything beyond letters, digits and underscores are quoted.
pub fn sheet_hyperlink(sheet_name: &str) -> String {
    let needs_quotes = sheet_name
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '_'));

    if needs_quotes {
        format!("=HYPERLINK(\"#'{}'!A1\", \"{}\")", sheet_name, sheet_name)
    } else {
        format!("=HYPERLINK(\"#{}!A1\", \"{}\")", sheet_name, sheet_name)
    }
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
