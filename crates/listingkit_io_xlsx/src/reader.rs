//! Workbook loading: extension check, template lookup, cell import.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{Reader, Xlsx};
use listingkit_core::{SheetGrid, WorksheetCells};
use listingkit_core::conf::C_SHEET_NAME_TEMPLATE;
use tracing::{debug, info};

use crate::spec::{EnumWorkbookFormat, SpecXlsxDocument, XlsxIoError};
use crate::util::convert_data_to_cell_value;

/// Workbook format implied by the extension of `path`.
pub fn detect_workbook_format(path: &Path) -> Result<EnumWorkbookFormat, XlsxIoError> {
    let c_extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_default();
    EnumWorkbookFormat::from_extension(&c_extension).ok_or(XlsxIoError::UnsupportedFormat {
        extension: if c_extension.is_empty() {
            c_extension
        } else {
            format!(".{c_extension}")
        },
    })
}

/// First sheet whose name equals `template` ignoring case.
pub fn find_template_sheet(sheet_names: &[String]) -> Option<&str> {
    sheet_names
        .iter()
        .find(|name| name.eq_ignore_ascii_case(C_SHEET_NAME_TEMPLATE))
        .map(String::as_str)
}

/// Open `path_input` and load its template sheet into a [`SheetGrid`].
///
/// The package bytes are kept on the document so saving never depends on
/// the input file still being in place.
pub fn load_document(path_input: &Path) -> Result<SpecXlsxDocument, XlsxIoError> {
    let format = detect_workbook_format(path_input)?;
    info!("Reading: {}", path_input.display());
    let bytes_src = fs::read(path_input)?;

    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes_src.as_slice()))?;
    let l_sheet_names = workbook.sheet_names();
    let sheet_name = find_template_sheet(&l_sheet_names)
        .ok_or_else(|| XlsxIoError::SheetNotFound {
            available: l_sheet_names.clone(),
        })?
        .to_string();

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut grid = SheetGrid::new();
    if let (Some((n_row_start, n_col_start)), Some((n_row_end, n_col_end))) =
        (range.start(), range.end())
    {
        for (n_row_rel, n_col_rel, data) in range.cells() {
            grid.insert_loaded(
                n_row_start + n_row_rel as u32 + 1,
                n_col_start + n_col_rel as u32 + 1,
                convert_data_to_cell_value(data),
            );
        }
        grid.include_extent(n_row_end + 1, n_col_end + 1);
    }
    drop(workbook);

    debug!(
        "Sheet '{sheet_name}': {} row(s) x {} column(s)",
        grid.max_row(),
        grid.max_column()
    );

    Ok(SpecXlsxDocument {
        path_input: path_input.to_path_buf(),
        sheet_name,
        format,
        grid,
        bytes_src,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_workbook_format_checks_extension() {
        assert_eq!(
            detect_workbook_format(Path::new("a/b.XLSX")).expect("format"),
            EnumWorkbookFormat::Xlsx
        );
        assert_eq!(
            detect_workbook_format(Path::new("b.xlsm")).expect("format"),
            EnumWorkbookFormat::Xlsm
        );
        match detect_workbook_format(Path::new("b.csv")) {
            Err(XlsxIoError::UnsupportedFormat { extension }) => assert_eq!(extension, ".csv"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            detect_workbook_format(Path::new("noext")),
            Err(XlsxIoError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn find_template_sheet_ignores_case() {
        let l_names = vec!["Instructions".to_string(), "TEMPLATE".to_string()];
        assert_eq!(find_template_sheet(&l_names), Some("TEMPLATE"));
        assert_eq!(find_template_sheet(&l_names[..1]), None);
    }
}
