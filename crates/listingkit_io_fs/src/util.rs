use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Whether `path` can be claimed for writing.
///
/// Absent paths are free. Existing files are removed so the writer recreates
/// them; a removal failure (e.g. a file held open by a spreadsheet
/// application on Windows) means the path is locked.
pub(crate) fn can_write(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => true,
        Err(_) => false,
        Ok(meta) if meta.is_dir() => false,
        Ok(_) => fs::remove_file(path).is_ok(),
    }
}

/// `{dir}/{stem}{suffix}{.ext}` next to `path_input`.
pub(crate) fn derive_default_output_path(path_input: &Path, suffix_processed: &str) -> PathBuf {
    derive_suffixed_path(path_input, suffix_processed)
}

/// `{stem}_{n}{.ext}` alongside `path_base`.
pub(crate) fn derive_numbered_path(path_base: &Path, n_attempt: usize) -> PathBuf {
    derive_suffixed_path(path_base, &format!("_{n_attempt}"))
}

fn derive_suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let c_stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let c_name = match path.extension() {
        Some(ext) => format!("{c_stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{c_stem}{suffix}"),
    };
    path.with_file_name(c_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_default_output_path_keeps_extension() {
        assert_eq!(
            derive_default_output_path(Path::new("/in/listing.XLSM"), "_processed"),
            PathBuf::from("/in/listing_processed.XLSM")
        );
        assert_eq!(
            derive_numbered_path(Path::new("out/listing_processed.xlsx"), 3),
            PathBuf::from("out/listing_processed_3.xlsx")
        );
    }

    #[test]
    fn test_can_write_removes_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("a.xlsx");
        assert!(can_write(&path));
        std::fs::write(&path, b"old").expect("write");
        assert!(can_write(&path));
        assert!(!path.exists());
        assert!(!can_write(dir.path()));
    }
}
