//! OOXML part parsing and in-place worksheet cell patching.
//!
//! Only edited cells are rewritten; every other byte of the worksheet part is
//! streamed through unchanged, so formulas, styles and layout survive.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use listingkit_core::EnumCellValue;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader as XmlReader, Writer as XmlWriter};

use crate::conf::C_DIR_WORKBOOK;
use crate::spec::XlsxIoError;
use crate::util::{format_cell_ref, format_number, join_part_path, parse_cell_ref};

type DictCellEdits<'a> = BTreeMap<u32, &'a EnumCellValue>;

fn map_xml_error<E: Display>(part: &str, err: E) -> XlsxIoError {
    XlsxIoError::Xml {
        part: part.to_string(),
        message: err.to_string(),
    }
}

////////////////////////////////////////////////////////////////////////////////
// #region WorkbookParts

/// `(sheet name, relationship id)` pairs from `xl/workbook.xml`, in order.
pub fn parse_workbook_sheets(xml: &str, part: &str) -> Result<Vec<(String, String)>, XlsxIoError> {
    let mut reader = XmlReader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut l_sheets = Vec::new();

    loop {
        match reader.read_event().map_err(|e| map_xml_error(part, e))? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut rid = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| map_xml_error(part, e))?;
                    let value = attr
                        .decode_and_unescape_value(reader.decoder())
                        .map_err(|e| map_xml_error(part, e))?
                        .to_string();
                    match attr.key.local_name().as_ref() {
                        b"name" => name = Some(value),
                        b"id" => rid = Some(value),
                        _ => {}
                    }
                }
                if let (Some(name), Some(rid)) = (name, rid) {
                    l_sheets.push((name, rid));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(l_sheets)
}

/// Relationship id to target from a `.rels` part.
pub fn parse_relationship_targets(
    xml: &str,
    part: &str,
) -> Result<HashMap<String, String>, XlsxIoError> {
    let mut reader = XmlReader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut dict_targets = HashMap::new();

    loop {
        match reader.read_event().map_err(|e| map_xml_error(part, e))? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| map_xml_error(part, e))?;
                    match attr.key.as_ref() {
                        b"Id" => {
                            id = Some(
                                attr.decode_and_unescape_value(reader.decoder())
                                    .map_err(|e| map_xml_error(part, e))?
                                    .to_string(),
                            )
                        }
                        b"Target" => {
                            target = Some(
                                attr.decode_and_unescape_value(reader.decoder())
                                    .map_err(|e| map_xml_error(part, e))?
                                    .to_string(),
                            )
                        }
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    dict_targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(dict_targets)
}

/// Package path of the worksheet part behind `sheet_name`.
pub fn resolve_sheet_part(
    workbook_xml: &str,
    rels_xml: &str,
    sheet_name: &str,
) -> Result<String, XlsxIoError> {
    let l_sheets = parse_workbook_sheets(workbook_xml, crate::conf::C_PART_WORKBOOK)?;
    let dict_targets = parse_relationship_targets(rels_xml, crate::conf::C_PART_WORKBOOK_RELS)?;

    l_sheets
        .iter()
        .find(|(name, _)| name == sheet_name)
        .and_then(|(_, rid)| dict_targets.get(rid))
        .map(|target| join_part_path(C_DIR_WORKBOOK, target))
        .ok_or_else(|| XlsxIoError::SheetPartMissing {
            sheet: sheet_name.to_string(),
        })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetPatch

struct SheetXmlWriter<'a> {
    writer: XmlWriter<Vec<u8>>,
    part: &'a str,
    c_prefix: String,
}

impl SheetXmlWriter<'_> {
    fn emit(&mut self, event: Event<'_>) -> Result<(), XlsxIoError> {
        self.writer
            .write_event(event)
            .map_err(|e| map_xml_error(self.part, e))
    }

    fn qualify(&self, local: &str) -> String {
        format!("{}{local}", self.c_prefix)
    }

    fn emit_start(&mut self, local: &str, attrs: &[(&str, &str)]) -> Result<(), XlsxIoError> {
        let mut elem = BytesStart::new(self.qualify(local));
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        self.emit(Event::Start(elem))
    }

    fn emit_end(&mut self, local: &str) -> Result<(), XlsxIoError> {
        let c_name = self.qualify(local);
        self.emit(Event::End(BytesEnd::new(c_name)))
    }

    /// Write one cell. A blank cell without style is omitted.
    fn emit_cell(
        &mut self,
        row: u32,
        col: u32,
        style: Option<&str>,
        value: &EnumCellValue,
    ) -> Result<(), XlsxIoError> {
        let c_ref = format_cell_ref(row, col);
        let mut l_attrs: Vec<(&str, &str)> = vec![("r", c_ref.as_str())];
        if let Some(c_style) = style {
            l_attrs.push(("s", c_style));
        }

        let c_number = match value {
            EnumCellValue::Number(n) => format_number(*n),
            _ => None,
        };
        match (value, c_number) {
            (EnumCellValue::None, _) => {
                if style.is_none() {
                    return Ok(());
                }
                let mut elem = BytesStart::new(self.qualify("c"));
                for attr in &l_attrs {
                    elem.push_attribute(*attr);
                }
                self.emit(Event::Empty(elem))?;
            }
            (EnumCellValue::Number(_), Some(c_number)) => {
                self.emit_start("c", &l_attrs)?;
                self.emit_start("v", &[])?;
                self.emit(Event::Text(BytesText::new(&c_number)))?;
                self.emit_end("v")?;
                self.emit_end("c")?;
            }
            (other, _) => {
                l_attrs.push(("t", "inlineStr"));
                self.emit_start("c", &l_attrs)?;
                self.emit_start("is", &[])?;
                self.emit_start("t", &[("xml:space", "preserve")])?;
                self.emit(Event::Text(BytesText::new(&other.to_text())))?;
                self.emit_end("t")?;
                self.emit_end("is")?;
                self.emit_end("c")?;
            }
        }
        Ok(())
    }

    fn emit_new_cells(&mut self, row: u32, dict_cells: DictCellEdits<'_>) -> Result<(), XlsxIoError> {
        for (n_col, value) in dict_cells {
            self.emit_cell(row, n_col, None, value)?;
        }
        Ok(())
    }

    /// Write rows absent from the part. Rows whose cells are all blank are
    /// omitted.
    fn emit_new_rows(
        &mut self,
        dict_rows: BTreeMap<u32, DictCellEdits<'_>>,
    ) -> Result<(), XlsxIoError> {
        for (n_row, dict_cells) in dict_rows {
            if dict_cells.values().all(|value| value.is_empty()) {
                continue;
            }
            let c_row = n_row.to_string();
            self.emit_start("row", &[("r", c_row.as_str())])?;
            self.emit_new_cells(n_row, dict_cells)?;
            self.emit_end("row")?;
        }
        Ok(())
    }

    /// Re-emit an existing `<row>` start tag without its `spans` hint, which
    /// may no longer match the row's cells.
    fn emit_row_start(&mut self, e: &BytesStart<'_>) -> Result<(), XlsxIoError> {
        let mut elem = BytesStart::new(String::from_utf8_lossy(e.name().as_ref()).to_string());
        for attr in e.attributes() {
            let attr = attr.map_err(|err| map_xml_error(self.part, err))?;
            if attr.key.as_ref() == b"spans" {
                continue;
            }
            elem.push_attribute(attr);
        }
        self.emit(Event::Start(elem))
    }
}

/// Raw value of attribute `key` on `e`, when present and UTF-8.
fn read_attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(Result::ok)
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| String::from_utf8(attr.value.into_owned()).ok())
}

fn split_prefix(name: &[u8]) -> String {
    let c_name = String::from_utf8_lossy(name);
    match c_name.rfind(':') {
        Some(n_idx) => c_name[..=n_idx].to_string(),
        None => String::new(),
    }
}

/// Take every entry with key below `key` out of `dict`.
fn take_before<V>(dict: &mut BTreeMap<u32, V>, key: u32) -> BTreeMap<u32, V> {
    let dict_rest = dict.split_off(&key);
    std::mem::replace(dict, dict_rest)
}

struct SheetPatcher<'a> {
    out: SheetXmlWriter<'a>,
    dict_rows_pending: BTreeMap<u32, DictCellEdits<'a>>,
    // Some(..) while inside an existing row that has pending edits
    dict_cells_row: Option<DictCellEdits<'a>>,
    n_row_prev: u32,
    n_row_current: u32,
    n_col_prev: u32,
}

impl SheetPatcher<'_> {
    fn on_row(&mut self, e: BytesStart<'_>, if_is_empty: bool) -> Result<(), XlsxIoError> {
        let n_row = read_attr(&e, b"r")
            .and_then(|c| c.parse().ok())
            .unwrap_or(self.n_row_prev + 1);
        self.n_row_prev = n_row;

        let dict_rows_before = take_before(&mut self.dict_rows_pending, n_row);
        self.out.emit_new_rows(dict_rows_before)?;

        let Some(dict_cells) = self.dict_rows_pending.remove(&n_row) else {
            return self.out.emit(if if_is_empty {
                Event::Empty(e)
            } else {
                Event::Start(e)
            });
        };
        self.out.emit_row_start(&e)?;
        if if_is_empty {
            self.out.emit_new_cells(n_row, dict_cells)?;
            let c_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
            return self.out.emit(Event::End(BytesEnd::new(c_name)));
        }
        self.dict_cells_row = Some(dict_cells);
        self.n_row_current = n_row;
        self.n_col_prev = 0;
        Ok(())
    }

    fn on_row_end(&mut self, e: BytesEnd<'_>) -> Result<(), XlsxIoError> {
        if let Some(dict_cells) = self.dict_cells_row.take() {
            self.out.emit_new_cells(self.n_row_current, dict_cells)?;
        }
        self.out.emit(Event::End(e))
    }

    /// Handle a `<c>` inside an edited row. Returns `true` when the original
    /// cell's children must be skipped.
    fn on_cell(&mut self, e: BytesStart<'_>, if_is_empty: bool) -> Result<bool, XlsxIoError> {
        let n_col = read_attr(&e, b"r")
            .and_then(|c| parse_cell_ref(&c))
            .map(|(_, n_col)| n_col)
            .unwrap_or(self.n_col_prev + 1);
        self.n_col_prev = n_col;

        let Some(dict_cells) = self.dict_cells_row.as_mut() else {
            self.out.emit(if if_is_empty {
                Event::Empty(e)
            } else {
                Event::Start(e)
            })?;
            return Ok(false);
        };
        let dict_cells_before = take_before(dict_cells, n_col);
        let value_edit = dict_cells.remove(&n_col);
        self.out.emit_new_cells(self.n_row_current, dict_cells_before)?;

        match value_edit {
            Some(value) => {
                let c_style = read_attr(&e, b"s");
                self.out
                    .emit_cell(self.n_row_current, n_col, c_style.as_deref(), value)?;
                Ok(!if_is_empty)
            }
            None => {
                self.out.emit(if if_is_empty {
                    Event::Empty(e)
                } else {
                    Event::Start(e)
                })?;
                Ok(false)
            }
        }
    }
}

/// Rewrite the cells listed in `edits` inside worksheet part XML `xml`.
///
/// Edited cells keep their `s` style attribute. Text is written as an inline
/// string, numbers as `<v>`, blanks as value-less cells. Rows and cells that
/// do not exist yet are inserted in reference order.
pub fn patch_sheet_xml(
    xml: &str,
    part: &str,
    edits: &BTreeMap<(u32, u32), EnumCellValue>,
) -> Result<String, XlsxIoError> {
    let mut dict_rows_pending: BTreeMap<u32, DictCellEdits<'_>> = BTreeMap::new();
    for ((n_row, n_col), value) in edits {
        dict_rows_pending.entry(*n_row).or_default().insert(*n_col, value);
    }

    let mut reader = XmlReader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut patcher = SheetPatcher {
        out: SheetXmlWriter {
            writer: XmlWriter::new(Vec::new()),
            part,
            c_prefix: String::new(),
        },
        dict_rows_pending,
        dict_cells_row: None,
        n_row_prev: 0,
        n_row_current: 0,
        n_col_prev: 0,
    };

    let mut if_in_sheet_data = false;
    let mut if_seen_sheet_data = false;
    let mut n_depth_skip: usize = 0;

    loop {
        let event = reader.read_event().map_err(|e| map_xml_error(part, e))?;

        if n_depth_skip > 0 {
            match event {
                Event::Start(_) => n_depth_skip += 1,
                Event::End(_) => n_depth_skip -= 1,
                Event::Eof => return Err(map_xml_error(part, "unexpected end of document")),
                _ => {}
            }
            continue;
        }

        let if_in_edited_row = patcher.dict_cells_row.is_some();
        match event {
            Event::Eof => break,

            Event::Start(e) if !if_in_sheet_data && e.local_name().as_ref() == b"sheetData" => {
                patcher.out.c_prefix = split_prefix(e.name().as_ref());
                if_in_sheet_data = true;
                if_seen_sheet_data = true;
                patcher.out.emit(Event::Start(e))?;
            }
            Event::Empty(e) if !if_in_sheet_data && e.local_name().as_ref() == b"sheetData" => {
                if_seen_sheet_data = true;
                if patcher.dict_rows_pending.is_empty() {
                    patcher.out.emit(Event::Empty(e))?;
                    continue;
                }
                patcher.out.c_prefix = split_prefix(e.name().as_ref());
                let c_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                patcher.out.emit(Event::Start(e))?;
                let dict_rows = std::mem::take(&mut patcher.dict_rows_pending);
                patcher.out.emit_new_rows(dict_rows)?;
                patcher.out.emit(Event::End(BytesEnd::new(c_name)))?;
            }
            Event::End(e) if if_in_sheet_data && e.local_name().as_ref() == b"sheetData" => {
                let dict_rows = std::mem::take(&mut patcher.dict_rows_pending);
                patcher.out.emit_new_rows(dict_rows)?;
                if_in_sheet_data = false;
                patcher.out.emit(Event::End(e))?;
            }

            Event::Start(e)
                if if_in_sheet_data && !if_in_edited_row && e.local_name().as_ref() == b"row" =>
            {
                patcher.on_row(e, false)?;
            }
            Event::Empty(e)
                if if_in_sheet_data && !if_in_edited_row && e.local_name().as_ref() == b"row" =>
            {
                patcher.on_row(e, true)?;
            }
            Event::End(e) if if_in_edited_row && e.local_name().as_ref() == b"row" => {
                patcher.on_row_end(e)?;
            }

            Event::Start(e) if if_in_edited_row && e.local_name().as_ref() == b"c" => {
                if patcher.on_cell(e, false)? {
                    n_depth_skip = 1;
                }
            }
            Event::Empty(e) if if_in_edited_row && e.local_name().as_ref() == b"c" => {
                patcher.on_cell(e, true)?;
            }

            other => patcher.out.emit(other)?,
        }
    }

    if !if_seen_sheet_data && !patcher.dict_rows_pending.is_empty() {
        return Err(map_xml_error(part, "worksheet has no sheetData element"));
    }
    String::from_utf8(patcher.out.writer.into_inner()).map_err(|e| map_xml_error(part, e))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
