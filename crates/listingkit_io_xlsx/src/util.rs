//! Stateless helpers: A1 references, cell value conversion, part paths.

use calamine::Data;
use listingkit_core::EnumCellValue;

use crate::conf::{N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};

////////////////////////////////////////////////////////////////////////////////
// #region CellReference

/// Column letters for 1-based `col` (`1 -> A`, `27 -> AA`).
pub fn column_letters(col: u32) -> String {
    let mut n_rest = col;
    let mut l_chars = Vec::new();
    while n_rest > 0 {
        let n_rem = (n_rest - 1) % 26;
        l_chars.push(char::from(b'A' + n_rem as u8));
        n_rest = (n_rest - 1) / 26;
    }
    l_chars.iter().rev().collect()
}

/// A1 reference for 1-based `(row, col)`.
pub fn format_cell_ref(row: u32, col: u32) -> String {
    format!("{}{row}", column_letters(col))
}

/// Parse an A1 reference (absolute markers allowed) into 1-based `(row, col)`.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let c_ref = cell_ref.replace('$', "");
    let n_split = c_ref.find(|c: char| c.is_ascii_digit())?;
    let (c_letters, c_digits) = c_ref.split_at(n_split);
    if c_letters.is_empty() || !c_letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let mut n_col: u32 = 0;
    for c in c_letters.chars() {
        let n_digit = u32::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
        n_col = n_col.checked_mul(26)?.checked_add(n_digit)?;
    }
    let n_row: u32 = c_digits.parse().ok()?;

    let if_is_valid =
        (1..=N_NROWS_EXCEL_MAX).contains(&n_row) && (1..=N_NCOLS_EXCEL_MAX).contains(&n_col);
    if_is_valid.then_some((n_row, n_col))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Map a calamine cell to the grid's value model.
///
/// Dates keep their serial number so an untouched date stays equal to its
/// loaded value; booleans become `TRUE`/`FALSE` text.
pub fn convert_data_to_cell_value(data: &Data) -> EnumCellValue {
    match data {
        Data::Empty => EnumCellValue::None,
        Data::String(s) => EnumCellValue::from(s.as_str()),
        Data::Float(f) => EnumCellValue::Number(*f),
        Data::Int(i) => EnumCellValue::Number(*i as f64),
        Data::Bool(b) => EnumCellValue::from(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(dt) => EnumCellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => EnumCellValue::from(s.as_str()),
        Data::Error(e) => EnumCellValue::from(e.to_string()),
    }
}

/// Text written into a `<v>` element for a finite number.
pub fn format_number(value: f64) -> Option<String> {
    value.is_finite().then(|| value.to_string())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PackagePath

/// Resolve a relationship `target` against package directory `dir_base`.
///
/// Absolute targets (`/xl/...`) are taken from the package root; `..`
/// segments are collapsed.
pub fn join_part_path(dir_base: &str, target: &str) -> String {
    let c_joined = match target.strip_prefix('/') {
        Some(c_abs) => c_abs.to_string(),
        None => format!("{dir_base}{target}"),
    };
    let mut l_parts: Vec<&str> = Vec::new();
    for c_part in c_joined.split('/') {
        match c_part {
            "" | "." => {}
            ".." => {
                l_parts.pop();
            }
            other => l_parts.push(other),
        }
    }
    l_parts.join("/")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
