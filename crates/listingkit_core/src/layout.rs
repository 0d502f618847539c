//! Header-row column discovery and fixed-size row grouping.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::conf::{
    N_COLS_DATA_SCAN, N_ROW_DATA_START, N_ROW_HEADER, N_ROWS_EXTENT_MARGIN, N_ROWS_PER_GROUP,
    TUP_COLUMNS_OPTIONAL, TUP_COLUMNS_REQUIRED,
};
use crate::sheet::WorksheetCells;
use crate::spec::{EnumListingColumn, ProcessError, SpecColumnMap, SpecRowGroup, SpecRowGrouping};

////////////////////////////////////////////////////////////////////////////////
// #region ColumnLocator

/// Map the template's header row to canonical columns.
pub fn locate_columns<W: WorksheetCells + ?Sized>(
    sheet: &W,
) -> Result<SpecColumnMap, ProcessError> {
    locate_columns_in_row(sheet, N_ROW_HEADER)
}

/// Map header row `row_header` to canonical columns.
///
/// The first column carrying a name wins; unknown headers are ignored.
pub fn locate_columns_in_row<W: WorksheetCells + ?Sized>(
    sheet: &W,
    row_header: u32,
) -> Result<SpecColumnMap, ProcessError> {
    let mut dict_cols: BTreeMap<EnumListingColumn, u32> = BTreeMap::new();

    for n_col in 1..=sheet.max_column() {
        let value = sheet.read(row_header, n_col);
        if value.is_empty() {
            continue;
        }
        if let Some(column) = EnumListingColumn::from_header(&value.to_text()) {
            dict_cols.entry(column).or_insert(n_col);
        }
    }

    for column in TUP_COLUMNS_REQUIRED {
        if !dict_cols.contains_key(&column) {
            return Err(ProcessError::MissingRequiredColumn {
                column: column.header().to_string(),
                row: row_header,
            });
        }
    }
    let n_col_product_name = dict_cols[&EnumListingColumn::ProductName];

    let l_missing: Vec<&str> = TUP_COLUMNS_OPTIONAL
        .iter()
        .filter(|col| !dict_cols.contains_key(*col))
        .map(|col| col.header())
        .collect();
    if !l_missing.is_empty() {
        info!("Optional columns not found (skipped): {}", l_missing.join(", "));
    }

    let map_cols = SpecColumnMap::new(dict_cols, n_col_product_name);
    let c_located = map_cols
        .iter_by_position()
        .iter()
        .map(|(col, n_col)| format!("{col}(col {n_col})"))
        .collect::<Vec<_>>()
        .join(", ");
    info!("Located columns: {c_located}");

    Ok(map_cols)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RowGrouper

/// Whether any of the leading scanned columns of `row` holds a value.
fn is_row_with_data<W: WorksheetCells + ?Sized>(sheet: &W, row: u32) -> bool {
    (1..=N_COLS_DATA_SCAN).any(|n_col| !sheet.read(row, n_col).is_empty())
}

/// Last row at or after the data-start row holding data, scanning upward from
/// the reported extent plus a margin.
///
/// Cost is up to `(max_row + margin) * N_COLS_DATA_SCAN` reads, so a sheet
/// whose used range was stretched to the Excel row limit by blank formatted
/// rows costs tens of seconds in debug builds.
pub fn find_last_data_row<W: WorksheetCells + ?Sized>(sheet: &W) -> Option<u32> {
    let n_row_scan_from = sheet.max_row().saturating_add(N_ROWS_EXTENT_MARGIN);
    (N_ROW_DATA_START..=n_row_scan_from)
        .rev()
        .find(|n_row| is_row_with_data(sheet, *n_row))
}

/// Partition the data rows into complete groups of [`N_ROWS_PER_GROUP`].
///
/// A trailing partial group is dropped and reported as a warning.
pub fn group_rows<W: WorksheetCells + ?Sized>(sheet: &W) -> SpecRowGrouping {
    let mut spec_grouping = SpecRowGrouping::default();

    let Some(n_row_last) = find_last_data_row(sheet) else {
        let c_msg = "Template sheet has no data rows".to_string();
        warn!("{c_msg}");
        spec_grouping.warnings.push(c_msg);
        return spec_grouping;
    };

    let n_rows_data = (n_row_last - N_ROW_DATA_START + 1) as usize;
    let n_groups = n_rows_data / N_ROWS_PER_GROUP;
    let n_rows_dropped = n_rows_data % N_ROWS_PER_GROUP;

    spec_grouping.n_rows_data = n_rows_data;
    spec_grouping.n_rows_dropped = n_rows_dropped;
    spec_grouping.groups = (0..n_groups)
        .map(|n_idx| {
            SpecRowGroup::from_start(N_ROW_DATA_START + (n_idx * N_ROWS_PER_GROUP) as u32)
        })
        .collect();

    if n_rows_dropped > 0 {
        let c_msg = format!(
            "Data row count {n_rows_data} is not a multiple of {N_ROWS_PER_GROUP}; \
             trailing {n_rows_dropped} row(s) skipped"
        );
        warn!("{c_msg}");
        spec_grouping.warnings.push(c_msg);
    }
    debug!(
        "Data rows {N_ROW_DATA_START}-{n_row_last}: {n_groups} group(s), {n_rows_dropped} dropped"
    );

    spec_grouping
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
