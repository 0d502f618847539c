//! `listingkit_io_xlsx` v1:
//! Workbook I/O around the listing kernel.
//!
//! - `conf`     : package part constants
//! - `spec`     : document models and errors
//! - `util`     : A1 references and value conversion
//! - `reader`   : calamine-backed template loading
//! - `patch`    : OOXML worksheet cell patching
//! - `writer`   : package rewrite and output persistence
//! - `pipeline` : load, process, save
pub mod conf;
pub mod patch;
pub mod pipeline;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use pipeline::{process_file, process_file_with};
pub use reader::{detect_workbook_format, find_template_sheet, load_document};
pub use spec::{EnumWorkbookFormat, SpecProcessOutcome, SpecXlsxDocument, XlsxIoError};
pub use writer::save_document;
