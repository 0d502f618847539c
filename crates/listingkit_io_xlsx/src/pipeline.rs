//! Load, process and save one workbook.

use std::path::Path;

use listingkit_core::process_sheet;
use listingkit_io_fs::SpecOutputOptions;
use tracing::info;

use crate::reader::load_document;
use crate::spec::{SpecProcessOutcome, XlsxIoError};
use crate::writer::save_document;

/// Normalize the template sheet of `path_input` and save the result.
///
/// `path_output` defaults to `{stem}_processed{ext}` beside the input. The
/// document is saved even when it holds no complete group. Nothing is
/// written when the template structure is invalid.
pub fn process_file(
    path_input: &Path,
    path_output: Option<&Path>,
) -> Result<SpecProcessOutcome, XlsxIoError> {
    process_file_with(path_input, path_output, &SpecOutputOptions::default())
}

/// [`process_file`] with explicit output options.
pub fn process_file_with(
    path_input: &Path,
    path_output: Option<&Path>,
    options: &SpecOutputOptions,
) -> Result<SpecProcessOutcome, XlsxIoError> {
    let mut doc = load_document(path_input)?;
    info!("Template sheet: '{}' ({})", doc.sheet_name, doc.format);

    let report = process_sheet(&mut doc.grid)?;
    let path_output = save_document(&doc, path_output, options)?;

    Ok(SpecProcessOutcome {
        report,
        path_output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx, open_workbook};
    use listingkit_core::conf::{TUP_SIZE_32, TUP_SIZE_SQUARE};
    use listingkit_core::{EnumCellValue, EnumRatioType};
    use quick_xml::Reader as XmlReader;
    use quick_xml::events::Event;
    use rust_xlsxwriter::{Format, Workbook};
    use std::fs::File;
    use std::io::{Cursor, Read, Write};
    use std::path::PathBuf;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipArchive, ZipWriter};

    use crate::conf::{C_PART_WORKBOOK, C_PART_WORKBOOK_RELS};
    use crate::patch::resolve_sheet_part;

    const TUP_HEADERS: [&str; 10] = [
        "Product Name",
        "Color",
        "Size",
        "Size Map",
        "Length",
        "Weight",
        "Variation Theme",
        "Paint Type",
        "Color Map",
        "Search Terms",
    ];
    const C_PARENT_32: &str = "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art-1";
    const C_PARENT_SQUARE: &str = "Moon_Lake Poster-2";

    fn create_group_titles(c_parent: &str, c_size: &str) -> Vec<String> {
        let mut l_titles = vec![c_parent.to_string()];
        for _ in 0..10 {
            l_titles.push(format!("{c_parent} Frame-x {c_size}"));
        }
        l_titles
    }

    /// Workbook with an `Instructions` sheet and a `Template` sheet holding
    /// `titles` from row 4 on. `B5` carries an italic stale value.
    fn create_workbook(path: &Path, headers: &[&str], titles: &[String]) {
        let mut workbook = Workbook::new();
        let format_header = Format::new().set_bold();
        let format_stale = Format::new().set_italic();

        let sheet_info = workbook.add_worksheet();
        sheet_info.set_name("Instructions").expect("name");
        sheet_info.write_string(0, 0, "keep me").expect("write");

        let sheet = workbook.add_worksheet();
        sheet.set_name("Template").expect("name");
        sheet.write_string(0, 0, "settings=v1").expect("write");
        for (n_idx, c_header) in headers.iter().enumerate() {
            sheet
                .write_string_with_format(1, n_idx as u16, *c_header, &format_header)
                .expect("write");
        }
        sheet.write_string(2, 0, "item_name").expect("write");
        for (n_offset, c_title) in titles.iter().enumerate() {
            sheet.write_string(3 + n_offset as u32, 0, c_title).expect("write");
        }
        sheet
            .write_string(3, 9, "wall_art canvas_print")
            .expect("write");
        sheet
            .write_string_with_format(4, 1, "stale color", &format_stale)
            .expect("write");
        workbook.save(path).expect("save");
    }

    /// Append a stored `xl/vbaProject.bin` entry to the package at `path`.
    fn inject_vba_project(path: &Path) {
        let bytes = std::fs::read(path).expect("read");
        let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("zip");
        let mut out = ZipWriter::new(File::create(path).expect("create"));
        for n_idx in 0..archive.len() {
            let entry = archive.by_index_raw(n_idx).expect("entry");
            out.raw_copy_file(entry).expect("copy");
        }
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        out.start_file("xl/vbaProject.bin", options).expect("start");
        out.write_all(b"\xd0\xcf\x11\xe0 macro payload").expect("write");
        out.finish().expect("finish");
    }

    /// `(name, uncompressed bytes)` of every package entry, in order.
    fn read_zip_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(File::open(path).expect("open")).expect("zip");
        (0..archive.len())
            .map(|n_idx| {
                let mut entry = archive.by_index(n_idx).expect("entry");
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes).expect("read");
                (entry.name().to_string(), bytes)
            })
            .collect()
    }

    fn read_entry<'a>(entries: &'a [(String, Vec<u8>)], name: &str) -> &'a str {
        entries
            .iter()
            .find(|(c_name, _)| c_name == name)
            .map(|(_, bytes)| std::str::from_utf8(bytes).expect("utf-8"))
            .expect("entry present")
    }

    /// Style index `s` of cell `cell_ref` in worksheet XML.
    fn read_cell_style(xml: &str, cell_ref: &str) -> Option<String> {
        let mut reader = XmlReader::from_str(xml);
        loop {
            match reader.read_event().expect("xml") {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                    let read = |key: &[u8]| {
                        e.attributes()
                            .filter_map(Result::ok)
                            .find(|attr| attr.key.as_ref() == key)
                            .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
                    };
                    if read(b"r").as_deref() == Some(cell_ref) {
                        return read(b"s");
                    }
                }
                Event::Eof => return None,
                _ => {}
            }
        }
    }

    fn read_sheet(path: &Path, sheet_name: &str) -> calamine::Range<Data> {
        let mut workbook: Xlsx<_> = open_workbook(path).expect("open output");
        workbook.worksheet_range(sheet_name).expect("range")
    }

    /// Value at 1-based `(row, col)`.
    fn read_value(range: &calamine::Range<Data>, row: u32, col: u32) -> EnumCellValue {
        range
            .get_value((row - 1, col - 1))
            .map(crate::util::convert_data_to_cell_value)
            .unwrap_or_default()
    }

    fn create_listing(dir: &Path, c_name: &str) -> PathBuf {
        let mut l_titles = create_group_titles(C_PARENT_32, "08x12inch(20x30cm)");
        l_titles.extend(create_group_titles(C_PARENT_SQUARE, "16x16inch(40x40cm)"));
        l_titles.push("orphan".to_string());
        let path = dir.join(c_name);
        create_workbook(&path, &TUP_HEADERS, &l_titles);
        path
    }

    #[test]
    fn process_file_normalizes_template_sheet() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_input = create_listing(dir.path(), "listing.xlsx");
        let bytes_before = std::fs::read(&path_input).expect("read input");

        let outcome = process_file(&path_input, None).expect("process");

        assert_eq!(outcome.path_output, dir.path().join("listing_processed.xlsx"));
        assert_eq!(outcome.report.cnt_groups, 2);
        assert_eq!(outcome.report.cnt_rows_dropped, 1);
        assert_eq!(outcome.report.groups[0].ratio, EnumRatioType::ThreeToTwo);
        assert_eq!(outcome.report.groups[1].ratio, EnumRatioType::Square);
        assert_eq!(std::fs::read(&path_input).expect("read input"), bytes_before);

        let range = read_sheet(&outcome.path_output, "Template");
        assert_eq!(
            read_value(&range, 4, 1).to_text(),
            "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art"
        );
        assert_eq!(
            read_value(&range, 5, 1).to_text(),
            "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art \
             Frame-style 08x12inch(20x30cm)"
        );
        assert_eq!(
            read_value(&range, 25, 1).to_text(),
            "Moon Lake Poster Unframe-style 28x28inch(70x70cm)"
        );
        assert_eq!(read_value(&range, 4, 2), EnumCellValue::None);
        assert_eq!(read_value(&range, 5, 2).to_text(), "Frame-style");
        assert_eq!(read_value(&range, 10, 3).to_text(), TUP_SIZE_32[6]);
        assert_eq!(read_value(&range, 16, 3).to_text(), TUP_SIZE_SQUARE[1]);
        assert_eq!(read_value(&range, 5, 5), EnumCellValue::Number(20.0));
        assert_eq!(read_value(&range, 16, 5), EnumCellValue::Number(30.0));
        assert_eq!(read_value(&range, 14, 6), EnumCellValue::Number(0.25));
        assert_eq!(read_value(&range, 20, 7).to_text(), "color-size");
        assert_eq!(read_value(&range, 4, 10).to_text(), "wall art canvas print");

        // header block and trailing partial group stay as loaded
        assert_eq!(read_value(&range, 1, 1).to_text(), "settings=v1");
        assert_eq!(read_value(&range, 2, 1).to_text(), "Product Name");
        assert_eq!(read_value(&range, 26, 1).to_text(), "orphan");
        assert_eq!(read_value(&range, 26, 2), EnumCellValue::None);

        let range_info = read_sheet(&outcome.path_output, "Instructions");
        assert_eq!(read_value(&range_info, 1, 1).to_text(), "keep me");
    }

    #[test]
    fn process_file_can_overwrite_its_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_input = create_listing(dir.path(), "listing.XLSM");

        let outcome = process_file(&path_input, Some(&path_input)).expect("process");

        assert_eq!(outcome.path_output, path_input);
        let range = read_sheet(&path_input, "Template");
        assert_eq!(read_value(&range, 6, 2).to_text(), "Frame-style");
        assert!(!dir.path().join("listing.XLSM.tmp").exists());
    }

    #[test]
    fn process_file_keeps_macros_and_untouched_parts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_input = create_listing(dir.path(), "listing.xlsm");
        inject_vba_project(&path_input);

        let outcome = process_file(&path_input, None).expect("process");
        assert_eq!(outcome.path_output, dir.path().join("listing_processed.xlsm"));

        let l_entries_in = read_zip_entries(&path_input);
        let l_entries_out = read_zip_entries(&outcome.path_output);
        let workbook_xml = read_entry(&l_entries_in, C_PART_WORKBOOK);
        let rels_xml = read_entry(&l_entries_in, C_PART_WORKBOOK_RELS);
        let c_part_template =
            resolve_sheet_part(workbook_xml, rels_xml, "Template").expect("template part");
        let c_part_info =
            resolve_sheet_part(workbook_xml, rels_xml, "Instructions").expect("info part");

        let l_names_in: Vec<&str> = l_entries_in.iter().map(|(c, _)| c.as_str()).collect();
        let l_names_out: Vec<&str> = l_entries_out.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(l_names_in, l_names_out);
        for c_name in ["xl/styles.xml", "xl/vbaProject.bin", c_part_info.as_str()] {
            assert!(l_names_in.contains(&c_name), "{c_name} missing from fixture");
        }

        for ((c_name, bytes_in), (_, bytes_out)) in l_entries_in.iter().zip(&l_entries_out) {
            if *c_name == c_part_template {
                assert_ne!(bytes_in, bytes_out, "{c_name} should be patched");
            } else {
                assert_eq!(bytes_in, bytes_out, "{c_name} changed");
            }
        }

        // rewritten cell keeps the style it was loaded with
        let c_style_in = read_cell_style(read_entry(&l_entries_in, &c_part_template), "B5");
        let c_style_out = read_cell_style(read_entry(&l_entries_out, &c_part_template), "B5");
        assert!(c_style_in.as_deref().is_some_and(|c| c != "0"));
        assert_eq!(c_style_out, c_style_in);
        let range = read_sheet(&outcome.path_output, "Template");
        assert_eq!(read_value(&range, 5, 2).to_text(), "Frame-style");
    }

    #[test]
    fn process_file_saves_when_no_group_is_complete() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_input = dir.path().join("short.xlsx");
        create_workbook(
            &path_input,
            &TUP_HEADERS,
            &create_group_titles("Poster", "08x12inch(20x30cm)")[..5],
        );

        let outcome = process_file(&path_input, None).expect("process");

        assert_eq!(outcome.report.cnt_groups, 0);
        assert_eq!(outcome.report.cnt_rows_dropped, 5);
        assert_eq!(outcome.report.warning_count(), 1);
        let range = read_sheet(&outcome.path_output, "Template");
        assert_eq!(read_value(&range, 5, 1).to_text(), "Poster Frame-x 08x12inch(20x30cm)");
    }

    #[test]
    fn process_file_rejects_missing_title_column_without_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_input = dir.path().join("listing.xlsx");
        create_workbook(
            &path_input,
            &["Title", "Color"],
            &create_group_titles("Poster", "08x12inch(20x30cm)"),
        );

        let err = process_file(&path_input, None).expect_err("missing column");

        assert!(matches!(err, XlsxIoError::Process(_)));
        assert!(err.to_string().contains("Product Name"));
        assert!(!dir.path().join("listing_processed.xlsx").exists());
    }

    #[test]
    fn process_file_requires_template_sheet() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_input = dir.path().join("book.xlsx");
        let mut workbook = Workbook::new();
        workbook
            .add_worksheet()
            .set_name("Sheet1")
            .expect("name")
            .write_string(0, 0, "x")
            .expect("write");
        workbook.save(&path_input).expect("save");

        match process_file(&path_input, None) {
            Err(XlsxIoError::SheetNotFound { available }) => {
                assert_eq!(available, vec!["Sheet1".to_string()]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn process_file_rejects_unsupported_extension() {
        let err = process_file(Path::new("listing.csv"), None).expect_err("format");
        assert!(matches!(err, XlsxIoError::UnsupportedFormat { .. }));
    }
}
