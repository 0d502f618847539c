//! `listingkit_core` v1:
//! Row-group transformation kernel for marketplace listing templates.
//!
//! Module layout:
//! - `conf`      : template constants and positional sequence tables
//! - `spec`      : column vocabulary, cell/group models, errors
//! - `sheet`     : worksheet access trait and in-memory grid
//! - `util`      : pure title-cleaning helpers
//! - `layout`    : column locator and row grouper
//! - `normalize` : ratio classifier and title normalizer
//! - `fill`      : attribute column filler
//! - `process`   : per-sheet orchestration
//! - `report`    : run report model
pub mod conf;
pub mod fill;
pub mod layout;
pub mod normalize;
pub mod process;
pub mod report;
pub mod sheet;
pub mod spec;
pub mod util;

pub use conf::{N_ROW_DATA_START, N_ROW_HEADER, N_ROWS_PER_GROUP};
pub use fill::fill_group;
pub use layout::{find_last_data_row, group_rows, locate_columns};
pub use normalize::{
    detect_ratio_type, detect_ratio_type_from_titles, normalize_group, normalize_title,
};
pub use process::{process_groups, process_sheet};
pub use report::{ReportProcess, ReportProcessBuilder, SpecGroupOutcome};
pub use sheet::{SheetGrid, WorksheetCells};
pub use spec::{
    EnumCellValue, EnumListingColumn, EnumRatioType, ProcessError, SpecColumnMap, SpecRowGroup,
    SpecRowGrouping,
};
pub use util::{
    clean_title, collapse_spaces, deduplicate_words, extract_base_title, remove_numeric_suffix,
    replace_hyphens, replace_underscores,
};
