//! Shared listing models, column vocabulary and top-level error types.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Canonical column vocabulary of the listing template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumListingColumn {
    /// Product title; the only required column.
    ProductName,
    VariationTheme,
    PaintType,
    ColorMap,
    Color,
    Size,
    SizeMap,
    Length,
    Weight,
    SearchTerms,
}

impl EnumListingColumn {
    /// Header text as it appears in the template.
    pub fn header(self) -> &'static str {
        match self {
            Self::ProductName => "Product Name",
            Self::VariationTheme => "Variation Theme",
            Self::PaintType => "Paint Type",
            Self::ColorMap => "Color Map",
            Self::Color => "Color",
            Self::Size => "Size",
            Self::SizeMap => "Size Map",
            Self::Length => "Length",
            Self::Weight => "Weight",
            Self::SearchTerms => "Search Terms",
        }
    }

    /// Match a raw header cell (trimmed, case-insensitive).
    pub fn from_header(header: &str) -> Option<Self> {
        let c_header = header.trim();
        if c_header.is_empty() {
            return None;
        }
        crate::conf::TUP_COLUMNS_REQUIRED
            .iter()
            .chain(crate::conf::TUP_COLUMNS_OPTIONAL.iter())
            .copied()
            .find(|col| col.header().eq_ignore_ascii_case(c_header))
    }
}

impl fmt::Display for EnumListingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Aspect-ratio family of one row group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumRatioType {
    /// Square canvases (12x12 … 28x28).
    Square,
    /// 3:2 canvases (08x12 … 24x36).
    ThreeToTwo,
}

impl EnumRatioType {
    /// Short label used in logs and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::ThreeToTwo => "3:2",
        }
    }
}

impl fmt::Display for EnumRatioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cell value held by a worksheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumCellValue {
    /// Missing/blank value.
    #[default]
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl EnumCellValue {
    /// Blank cells and empty strings count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::String(s) => s.is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Text rendering; empty for blank cells.
    pub fn to_text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }

    /// Borrow the text of a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::None
        } else {
            Self::String(value.to_string())
        }
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Self::None
        } else {
            Self::String(value)
        }
    }
}

impl From<Option<f64>> for EnumCellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::None, Self::Number)
    }
}

impl From<Option<u32>> for EnumCellValue {
    fn from(value: Option<u32>) -> Self {
        value.map_or(Self::None, |n| Self::Number(f64::from(n)))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutModels

/// Canonical column name -> 1-based column index.
///
/// Always contains [`EnumListingColumn::ProductName`]; built by
/// [`crate::layout::locate_columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnMap {
    dict_cols: BTreeMap<EnumListingColumn, u32>,
    n_col_product_name: u32,
}

impl SpecColumnMap {
    pub(crate) fn new(dict_cols: BTreeMap<EnumListingColumn, u32>, n_col_product_name: u32) -> Self {
        Self {
            dict_cols,
            n_col_product_name,
        }
    }

    /// Column of `Product Name`.
    pub fn product_name(&self) -> u32 {
        self.n_col_product_name
    }

    /// Column of `column`, if the header row had it.
    pub fn get(&self, column: EnumListingColumn) -> Option<u32> {
        self.dict_cols.get(&column).copied()
    }

    /// Located columns sorted by physical position.
    pub fn iter_by_position(&self) -> Vec<(EnumListingColumn, u32)> {
        let mut l_cols: Vec<(EnumListingColumn, u32)> =
            self.dict_cols.iter().map(|(k, v)| (*k, *v)).collect();
        l_cols.sort_by_key(|(_, n_col)| *n_col);
        l_cols
    }

    /// Number of located columns.
    pub fn len(&self) -> usize {
        self.dict_cols.len()
    }

    /// Never true for a successfully built map.
    pub fn is_empty(&self) -> bool {
        self.dict_cols.is_empty()
    }
}

/// One parent listing plus its ten variants, as ascending 1-based rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRowGroup {
    rows: Vec<u32>,
}

impl SpecRowGroup {
    pub(crate) fn from_start(n_row_start: u32) -> Self {
        let n_len = crate::conf::N_ROWS_PER_GROUP as u32;
        Self {
            rows: (n_row_start..n_row_start + n_len).collect(),
        }
    }

    /// Rows in group order (index 0 is the parent).
    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    /// `(group-local index, sheet row)` pairs.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.rows.iter().copied().enumerate()
    }

    /// Parent row.
    pub fn row_first(&self) -> u32 {
        self.rows[0]
    }

    /// Last variant row.
    pub fn row_last(&self) -> u32 {
        self.rows[self.rows.len() - 1]
    }
}

/// Result of partitioning a sheet's data rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecRowGrouping {
    /// Complete groups in ascending row order.
    pub groups: Vec<SpecRowGroup>,
    /// Data rows found from the data-start row to the last data row.
    pub n_rows_data: usize,
    /// Trailing rows that did not fill a complete group.
    pub n_rows_dropped: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Structural failures that abort processing of a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// A required column is absent from the header row.
    #[error("Required column '{column}' not found in header row {row}")]
    MissingRequiredColumn {
        /// Canonical name of the missing column.
        column: String,
        /// Header row that was scanned.
        row: u32,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
