//! Document models and top-level error types.

use std::fmt;
use std::path::PathBuf;

use listingkit_core::{ProcessError, ReportProcess, SheetGrid};
use listingkit_io_fs::OutputPathError;
use thiserror::Error;

/// Container flavor of a loaded workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumWorkbookFormat {
    /// Plain workbook.
    Xlsx,
    /// Macro-enabled workbook; `vbaProject.bin` is carried through on save.
    Xlsm,
}

impl EnumWorkbookFormat {
    /// Format from a file extension with or without leading dot, any case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "xlsx" => Some(Self::Xlsx),
            "xlsm" => Some(Self::Xlsm),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => ".xlsx",
            Self::Xlsm => ".xlsm",
        }
    }
}

impl fmt::Display for EnumWorkbookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A loaded workbook: original package bytes plus the template sheet grid.
#[derive(Debug, Clone)]
pub struct SpecXlsxDocument {
    /// Path the document was loaded from.
    pub path_input: PathBuf,
    /// Actual name of the template sheet (original casing).
    pub sheet_name: String,
    /// Container flavor.
    pub format: EnumWorkbookFormat,
    /// Template sheet cells; edits are tracked against the loaded values.
    pub grid: SheetGrid,
    /// Raw package bytes as read from `path_input`.
    pub(crate) bytes_src: Vec<u8>,
}

/// Result of processing one file.
#[derive(Debug, Clone)]
pub struct SpecProcessOutcome {
    /// Per-run counters and warnings.
    pub report: ReportProcess,
    /// Where the processed workbook was written.
    pub path_output: PathBuf,
}

/// Load/save failures.
#[derive(Debug, Error)]
pub enum XlsxIoError {
    /// Input extension is not `.xlsx`/`.xlsm`.
    #[error("Unsupported file format '{extension}': only .xlsx and .xlsm are supported")]
    UnsupportedFormat {
        /// Offending extension (may be empty).
        extension: String,
    },
    /// No sheet is named `template` (case-insensitive).
    #[error("Sheet 'template' not found. Available sheets: {}", available.join(", "))]
    SheetNotFound {
        /// Sheet names present in the workbook.
        available: Vec<String>,
    },
    /// Workbook part does not reference a worksheet part for the sheet.
    #[error("Worksheet part for sheet '{sheet}' not found in package")]
    SheetPartMissing {
        /// Sheet name.
        sheet: String,
    },
    /// Workbook could not be parsed.
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),
    /// Package container error.
    #[error("Failed to process workbook package: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// Package part XML could not be parsed or written.
    #[error("Invalid package XML in '{part}': {message}")]
    Xml {
        /// Package part path.
        part: String,
        /// Parser or writer message.
        message: String,
    },
    /// Filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Template structure error.
    #[error(transparent)]
    Process(#[from] ProcessError),
    /// Output path could not be claimed.
    #[error(transparent)]
    OutputPath(#[from] OutputPathError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbook_format_from_extension_ignores_case() {
        assert_eq!(
            EnumWorkbookFormat::from_extension(".XLSM"),
            Some(EnumWorkbookFormat::Xlsm)
        );
        assert_eq!(
            EnumWorkbookFormat::from_extension("xlsx"),
            Some(EnumWorkbookFormat::Xlsx)
        );
        assert_eq!(EnumWorkbookFormat::from_extension(".xls"), None);
        assert_eq!(EnumWorkbookFormat::from_extension(""), None);
    }

    #[test]
    fn sheet_not_found_lists_available_sheets() {
        let err = XlsxIoError::SheetNotFound {
            available: vec!["Sheet1".to_string(), "Data".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Sheet 'template' not found. Available sheets: Sheet1, Data"
        );
    }
}
