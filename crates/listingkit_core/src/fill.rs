//! Positional attribute filling for one row group.

use crate::conf::{
    N_ROWS_PER_GROUP, TUP_COLOR_SEQUENCE, TUP_SIMPLE_FIELDS, TUP_SIZE_MAP_SEQUENCE,
    TUP_WEIGHT_SEQUENCE, select_length_sequence, select_size_sequence,
};
use crate::sheet::WorksheetCells;
use crate::spec::{EnumCellValue, EnumListingColumn, EnumRatioType, SpecColumnMap, SpecRowGroup};

/// Write `sequence[idx]` into `column` for every row of `group`.
///
/// No-op when the column was not located.
fn fill_sequence<W, T>(
    sheet: &mut W,
    group: &SpecRowGroup,
    map_cols: &SpecColumnMap,
    column: EnumListingColumn,
    sequence: &[T; N_ROWS_PER_GROUP],
) where
    W: WorksheetCells + ?Sized,
    T: Copy + Into<EnumCellValue>,
{
    let Some(n_col) = map_cols.get(column) else {
        return;
    };
    for (n_idx, n_row) in group.iter_indexed() {
        sheet.write(n_row, n_col, sequence[n_idx].into());
    }
}

/// `Variation Theme`, `Paint Type` and `Color Map` constants on every row.
pub fn fill_simple_fields<W: WorksheetCells + ?Sized>(
    sheet: &mut W,
    group: &SpecRowGroup,
    map_cols: &SpecColumnMap,
) {
    for (column, c_value) in TUP_SIMPLE_FIELDS {
        fill_sequence(sheet, group, map_cols, column, &[c_value; N_ROWS_PER_GROUP]);
    }
}

pub fn fill_color<W: WorksheetCells + ?Sized>(
    sheet: &mut W,
    group: &SpecRowGroup,
    map_cols: &SpecColumnMap,
) {
    fill_sequence(sheet, group, map_cols, EnumListingColumn::Color, &TUP_COLOR_SEQUENCE);
}

pub fn fill_size<W: WorksheetCells + ?Sized>(
    sheet: &mut W,
    group: &SpecRowGroup,
    map_cols: &SpecColumnMap,
    ratio: EnumRatioType,
) {
    fill_sequence(
        sheet,
        group,
        map_cols,
        EnumListingColumn::Size,
        select_size_sequence(ratio),
    );
}

pub fn fill_size_map<W: WorksheetCells + ?Sized>(
    sheet: &mut W,
    group: &SpecRowGroup,
    map_cols: &SpecColumnMap,
) {
    fill_sequence(
        sheet,
        group,
        map_cols,
        EnumListingColumn::SizeMap,
        &TUP_SIZE_MAP_SEQUENCE,
    );
}

pub fn fill_length<W: WorksheetCells + ?Sized>(
    sheet: &mut W,
    group: &SpecRowGroup,
    map_cols: &SpecColumnMap,
    ratio: EnumRatioType,
) {
    fill_sequence(
        sheet,
        group,
        map_cols,
        EnumListingColumn::Length,
        select_length_sequence(ratio),
    );
}

pub fn fill_weight<W: WorksheetCells + ?Sized>(
    sheet: &mut W,
    group: &SpecRowGroup,
    map_cols: &SpecColumnMap,
) {
    fill_sequence(
        sheet,
        group,
        map_cols,
        EnumListingColumn::Weight,
        &TUP_WEIGHT_SEQUENCE,
    );
}

/// Replace underscores with spaces in non-empty `Search Terms` text cells.
pub fn clean_search_terms<W: WorksheetCells + ?Sized>(
    sheet: &mut W,
    group: &SpecRowGroup,
    map_cols: &SpecColumnMap,
) {
    let Some(n_col) = map_cols.get(EnumListingColumn::SearchTerms) else {
        return;
    };
    for n_row in group.rows() {
        let value = sheet.read(*n_row, n_col);
        let Some(c_terms) = value.as_str() else {
            continue;
        };
        if c_terms.contains('_') {
            sheet.write(*n_row, n_col, EnumCellValue::String(c_terms.replace('_', " ")));
        }
    }
}

/// Fill every attribute column of `group` for `ratio`.
pub fn fill_group<W: WorksheetCells + ?Sized>(
    sheet: &mut W,
    group: &SpecRowGroup,
    map_cols: &SpecColumnMap,
    ratio: EnumRatioType,
) {
    fill_simple_fields(sheet, group, map_cols);
    fill_color(sheet, group, map_cols);
    fill_size(sheet, group, map_cols, ratio);
    fill_size_map(sheet, group, map_cols);
    fill_length(sheet, group, map_cols, ratio);
    fill_weight(sheet, group, map_cols);
    clean_search_terms(sheet, group, map_cols);
}
