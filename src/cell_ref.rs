//! Utilities for parsing and formatting A1-style cell references and ranges.

use crate::types::{CellIndex, Rectangle};

/// Parse a cell reference like "A1" into a zero-based [`CellIndex`].
pub fn parse_cell_ref(cell_ref: &str) -> Option<CellIndex> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = ch.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(u32::from(upper) - u32::from('A') + 1)?;
            saw_col = true;
        } else if let Some(digit) = ch.to_digit(10) {
            row = row.checked_mul(10)?.checked_add(digit)?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some(CellIndex::new(row - 1, col - 1))
}

/// Parse a range like "A1:B10" or "A1" into a normalized [`Rectangle`].
pub fn parse_range(range: &str) -> Option<Rectangle> {
    if let Some((start, end)) = range.split_once(':') {
        let start = parse_cell_ref(start)?;
        let end = parse_cell_ref(end)?;
        Some(Rectangle::from_corners(start, end))
    } else {
        parse_cell_ref(range).map(Rectangle::cell)
    }
}

/// Convert a 0-based column index to letters (A, B, ..., Z, AA, AB, ...)
pub fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = u64::from(col) + 1;
    while n > 0 {
        n -= 1;
        let offset = u8::try_from(n % 26).unwrap_or(0);
        result.insert(0, char::from(b'A' + offset));
        n /= 26;
    }
    result
}

/// Format a cell as an A1-style label, e.g. `{r: 2, c: 1}` -> "B3".
pub fn cell_label(cell: CellIndex) -> String {
    format!("{}{}", col_to_letter(cell.c), u64::from(cell.r) + 1)
}

/// Format a rectangle as "A1:B3" (or "A1" for a single cell).
pub fn range_label(rect: Rectangle) -> String {
    let rect = rect.normalized();
    if rect.s == rect.e {
        cell_label(rect.s)
    } else {
        format!("{}:{}", cell_label(rect.s), cell_label(rect.e))
    }
}
