//! XLSX package constants.

/// Workbook part listing sheets and their relationship ids.
pub const C_PART_WORKBOOK: &str = "xl/workbook.xml";
/// Relationships of the workbook part.
pub const C_PART_WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
/// Directory relative worksheet targets are resolved against.
pub const C_DIR_WORKBOOK: &str = "xl/";

/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: u32 = 16_384;
/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: u32 = 1_048_576;
