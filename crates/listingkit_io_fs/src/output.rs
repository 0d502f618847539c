//! Output path resolution and temp-file persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::spec::{OutputPathError, SpecOutputOptions};
use crate::util::{can_write, derive_default_output_path, derive_numbered_path};

/// Resolve a writable output path for `path_input`.
///
/// The preferred path is `path_output` when given, else
/// `{stem}{suffix_processed}{.ext}` next to the input. When the preferred
/// path cannot be claimed, `{stem}_2{.ext}` .. `{stem}_{n_attempts_max}{.ext}`
/// are tried in order and a warning is logged for the fallback.
///
/// An existing file at the returned path has already been removed.
pub fn resolve_output_path(
    path_input: &Path,
    path_output: Option<&Path>,
    options: &SpecOutputOptions,
) -> Result<PathBuf, OutputPathError> {
    resolve_output_path_with(path_input, path_output, options, can_write)
}

/// [`resolve_output_path`] with a caller-supplied writability check.
pub fn resolve_output_path_with<F>(
    path_input: &Path,
    path_output: Option<&Path>,
    options: &SpecOutputOptions,
    mut is_writable: F,
) -> Result<PathBuf, OutputPathError>
where
    F: FnMut(&Path) -> bool,
{
    let path_preferred = match path_output {
        Some(path) => path.to_path_buf(),
        None => derive_default_output_path(path_input, &options.suffix_processed),
    };
    if is_writable(&path_preferred) {
        debug!("Output path: {}", path_preferred.display());
        return Ok(path_preferred);
    }

    for n_attempt in 2..=options.n_attempts_max {
        let path_candidate = derive_numbered_path(&path_preferred, n_attempt);
        if is_writable(&path_candidate) {
            warn!(
                "{} is in use, writing to {} instead",
                path_preferred.display(),
                path_candidate.display()
            );
            return Ok(path_candidate);
        }
    }

    Err(OutputPathError::OutputLocked {
        path: path_preferred,
        n_attempts: options.n_attempts_max,
    })
}

/// Move a fully written temporary file onto `path_dst`.
///
/// Falls back to remove-then-rename on platforms where `rename` does not
/// replace an existing file. The temporary file is removed on failure.
pub fn persist_file(path_tmp: &Path, path_dst: &Path) -> Result<(), OutputPathError> {
    if fs::rename(path_tmp, path_dst).is_ok() {
        return Ok(());
    }
    let _ = fs::remove_file(path_dst);
    fs::rename(path_tmp, path_dst).map_err(|source| {
        let _ = fs::remove_file(path_tmp);
        OutputPathError::PersistFailed {
            path_src: path_tmp.to_path_buf(),
            path_dst: path_dst.to_path_buf(),
            source,
        }
    })
}

/// Sibling temporary path used while building `path_dst`.
pub fn derive_temp_path(path_dst: &Path) -> PathBuf {
    let mut c_name = path_dst
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    c_name.push(".tmp");
    path_dst.with_file_name(c_name)
}
