//! A1-style cell references.

use crate::error::{EdgarError, EdgarResult};

pub const MAX_COLUMNS: i64 = 16_384;
pub const MAX_ROWS: i64 = 1_048_576;

/// 1 -> "A", 26 -> "Z", 27 -> "AA", 28 -> "AB"
pub fn column_letter(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// "A" -> 1, "AB" -> 28; case-insensitive
pub fn column_index(letters: &str) -> EdgarResult<u32> {
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(EdgarError::InvalidCell(letters.to_string()));
    }
    letters.chars().try_fold(0u32, |acc, c| {
        let digit = (c.to_ascii_uppercase() as u8 - b'A' + 1) as u32;
        acc.checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| EdgarError::InvalidCell(letters.to_string()))
    })
}

/// Split "AB12" into 1-based (column, row)
pub fn parse_cell(cell: &str) -> EdgarResult<(u32, u32)> {
    let cell = cell.trim();
    let split = cell
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| EdgarError::InvalidCell(cell.to_string()))?;
    let (letters, digits) = cell.split_at(split);

    let column = column_index(letters).map_err(|_| EdgarError::InvalidCell(cell.to_string()))?;
    let row: u32 = digits
        .parse()
        .map_err(|_| EdgarError::InvalidCell(cell.to_string()))?;

    check_bounds(column as i64, row as i64)?;
    Ok((column, row))
}

pub fn cell_ref(column: u32, row: u32) -> String {
    format!("{}{}", column_letter(column), row)
}

fn check_bounds(column: i64, row: i64) -> EdgarResult<()> {
    if !(1..=MAX_COLUMNS).contains(&column) || !(1..=MAX_ROWS).contains(&row) {
        return Err(EdgarError::CellOutOfRange { column, row });
    }
    Ok(())
}

/// Move a reference `dx` columns right and `dy` rows down
pub fn offset_cell(cell: &str, dx: i64, dy: i64) -> EdgarResult<String> {
    let (column, row) = parse_cell(cell)?;
    let new_column = column as i64 + dx;
    let new_row = row as i64 + dy;
    check_bounds(new_column, new_row)?;
    Ok(cell_ref(new_column as u32, new_row as u32))
}
