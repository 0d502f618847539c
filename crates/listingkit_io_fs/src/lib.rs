//! `listingkit_io_fs` v1:
//! Output-path resolution and temp-file persistence.
//!
//! - `output` : output path resolution and temp-file persistence
//! - `spec`   : options/errors
//! - `util`   : shared path helpers
pub mod output;
pub mod spec;
mod util;

pub use output::{derive_temp_path, persist_file, resolve_output_path, resolve_output_path_with};
pub use spec::{OutputPathError, SpecOutputOptions};
