//! Worksheet access capability and the in-memory grid behind it.

use std::collections::BTreeMap;

use crate::spec::EnumCellValue;

/// Read/write access to a 1-based cell grid.
///
/// The pipeline only ever talks to this trait, so any spreadsheet binding can
/// sit behind it.
pub trait WorksheetCells {
    /// Value at `(row, col)`; blank when nothing is stored.
    fn read(&self, row: u32, col: u32) -> EnumCellValue;
    /// Overwrite `(row, col)`.
    fn write(&mut self, row: u32, col: u32, value: EnumCellValue);
    /// Reported last used row (may lag or overshoot the real data extent).
    fn max_row(&self) -> u32;
    /// Reported last used column.
    fn max_column(&self) -> u32;
}

/// Sparse in-memory worksheet that remembers which cells were changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    dict_cells: BTreeMap<(u32, u32), EnumCellValue>,
    dict_cells_loaded: BTreeMap<(u32, u32), EnumCellValue>,
    n_row_max: u32,
    n_col_max: u32,
}

impl SheetGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from row-major text, starting at `A1`.
    ///
    /// Empty strings stay blank. Convenient for fixtures.
    pub fn from_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut grid = Self::new();
        for (n_idx_row, row) in rows.into_iter().enumerate() {
            for (n_idx_col, c_text) in row.into_iter().enumerate() {
                grid.insert_loaded(
                    n_idx_row as u32 + 1,
                    n_idx_col as u32 + 1,
                    EnumCellValue::from(c_text.as_ref()),
                );
            }
        }
        grid
    }

    /// Store a value as part of the loaded baseline (not an edit).
    pub fn insert_loaded(&mut self, row: u32, col: u32, value: EnumCellValue) {
        if row == 0 || col == 0 || value == EnumCellValue::None {
            return;
        }
        self.extend_extent(row, col);
        self.dict_cells.insert((row, col), value);
    }

    /// Cells whose current value differs from the loaded baseline.
    pub fn edits(&self) -> BTreeMap<(u32, u32), EnumCellValue> {
        self.dict_cells_loaded
            .iter()
            .filter_map(|(pos, value_loaded)| {
                let value_now = self.dict_cells.get(pos).cloned().unwrap_or_default();
                if &value_now == value_loaded {
                    None
                } else {
                    Some((*pos, value_now))
                }
            })
            .collect()
    }

    /// Whether any cell differs from the loaded baseline.
    pub fn is_modified(&self) -> bool {
        !self.edits().is_empty()
    }

    /// Grow the reported extent to cover `(row, col)` without storing a value.
    ///
    /// Used by loaders whose used range is wider than the stored values.
    pub fn include_extent(&mut self, row: u32, col: u32) {
        self.extend_extent(row, col);
    }

    fn extend_extent(&mut self, row: u32, col: u32) {
        self.n_row_max = self.n_row_max.max(row);
        self.n_col_max = self.n_col_max.max(col);
    }
}

impl WorksheetCells for SheetGrid {
    fn read(&self, row: u32, col: u32) -> EnumCellValue {
        self.dict_cells.get(&(row, col)).cloned().unwrap_or_default()
    }

    fn write(&mut self, row: u32, col: u32, value: EnumCellValue) {
        if row == 0 || col == 0 {
            return;
        }
        let pos = (row, col);
        if !self.dict_cells_loaded.contains_key(&pos) {
            let value_loaded = self.dict_cells.get(&pos).cloned().unwrap_or_default();
            self.dict_cells_loaded.insert(pos, value_loaded);
        }
        match value {
            EnumCellValue::None => {
                self.dict_cells.remove(&pos);
            }
            other => {
                self.extend_extent(row, col);
                self.dict_cells.insert(pos, other);
            }
        }
    }

    fn max_row(&self) -> u32 {
        self.n_row_max
    }

    fn max_column(&self) -> u32 {
        self.n_col_max
    }
}
