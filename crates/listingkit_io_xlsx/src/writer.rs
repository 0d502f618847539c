//! Package writer: patched worksheet part plus raw copy of every other entry.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use listingkit_io_fs::{SpecOutputOptions, derive_temp_path, persist_file, resolve_output_path};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::conf::{C_PART_WORKBOOK, C_PART_WORKBOOK_RELS};
use crate::patch::{patch_sheet_xml, resolve_sheet_part};
use crate::spec::{SpecXlsxDocument, XlsxIoError};

/// Read package part `part` as UTF-8 text.
fn read_zip_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    part: &str,
) -> Result<String, XlsxIoError> {
    let mut entry = archive.by_name(part)?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

/// Build the patched bytes of the template worksheet part.
///
/// Returns an empty map when the grid has no edits.
fn plan_part_patches(doc: &SpecXlsxDocument) -> Result<HashMap<String, Vec<u8>>, XlsxIoError> {
    let dict_edits = doc.grid.edits();
    let mut dict_patches = HashMap::new();
    if dict_edits.is_empty() {
        debug!("No cell changes, package copied unchanged");
        return Ok(dict_patches);
    }

    let mut archive = ZipArchive::new(Cursor::new(doc.bytes_src.as_slice()))?;
    let workbook_xml = read_zip_part(&mut archive, C_PART_WORKBOOK)?;
    let rels_xml = read_zip_part(&mut archive, C_PART_WORKBOOK_RELS)?;
    let c_part = resolve_sheet_part(&workbook_xml, &rels_xml, &doc.sheet_name)?;

    let sheet_xml = read_zip_part(&mut archive, &c_part)?;
    let patched = patch_sheet_xml(&sheet_xml, &c_part, &dict_edits)?;
    debug!("Patched {} cell(s) in {c_part}", dict_edits.len());
    dict_patches.insert(c_part, patched.into_bytes());
    Ok(dict_patches)
}

/// Write `bytes_src` to `path_dst` as a zip package, substituting the
/// entries named in `dict_patches`. Unpatched entries are copied raw.
fn write_patched_package(
    bytes_src: &[u8],
    path_dst: &Path,
    dict_patches: &HashMap<String, Vec<u8>>,
) -> Result<(), XlsxIoError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes_src))?;
    let mut out = ZipWriter::new(BufWriter::new(File::create(path_dst)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for n_idx in 0..archive.len() {
        let entry = archive.by_index_raw(n_idx)?;
        let c_name = entry.name().to_string();
        match dict_patches.get(&c_name) {
            Some(bytes) => {
                drop(entry);
                out.start_file(c_name, options)?;
                out.write_all(bytes)?;
            }
            None => out.raw_copy_file(entry)?,
        }
    }

    let mut buf = out.finish()?;
    buf.flush()?;
    Ok(())
}

/// Save `doc` to a resolved output path and return that path.
///
/// The output is built from the bytes captured at load time, never from
/// the input file's metadata, and is written through a sibling temp file.
pub fn save_document(
    doc: &SpecXlsxDocument,
    path_output: Option<&Path>,
    options: &SpecOutputOptions,
) -> Result<PathBuf, XlsxIoError> {
    let dict_patches = plan_part_patches(doc)?;
    let path_dst = resolve_output_path(&doc.path_input, path_output, options)?;
    let path_tmp = derive_temp_path(&path_dst);

    if let Err(err) = write_patched_package(&doc.bytes_src, &path_tmp, &dict_patches) {
        let _ = fs::remove_file(&path_tmp);
        return Err(err);
    }
    persist_file(&path_tmp, &path_dst)?;

    info!("Saved to: {}", path_dst.display());
    Ok(path_dst)
}
