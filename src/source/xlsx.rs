use crate::error::ContourGridError;
use crate::for_each_xml_event;
use crate::source::xml::{push_entity, XmlNodeHelper, XmlReader};
use crate::source::SourceError;
use crate::table::{RawTable, Value};
use quick_xml::events::Event;
use quick_xml::name::QName;
use regex::Regex;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Seek};
use std::sync::LazyLock;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

// XML tag names of the SpreadsheetML parts this reader touches
const TAG_RELATIONSHIP: &[u8] = b"Relationship";
const TAG_SHEET: QName = QName(b"sheet"); // Worksheet definition in workbook.xml
const TAG_ROW: QName = QName(b"row"); // Row in a worksheet
const TAG_CELL: QName = QName(b"c"); // Cell in a worksheet
const TAG_VALUE: QName = QName(b"v"); // Cell value content
const TAG_INLINE_STRING: QName = QName(b"is"); // Inline string value
const TAG_TEXT: QName = QName(b"t"); // Text content within strings
const TAG_SHARED_STRING_ITEM: QName = QName(b"si"); // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh"); // Phonetic annotation, skipped

/// How a cell's `t` attribute says its value should be interpreted.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
enum CellKind {
    #[default]
    Number,
    SharedString,
    InlineString,
    Boolean,
    Error,
}

/// One positioned cell as parsed from the worksheet XML.
#[derive(Debug)]
struct ParsedCell {
    row: usize,
    col: usize,
    value: Value,
}

/// Reads the first worksheet of an xlsx archive into a [`RawTable`].
///
/// Generic over the underlying reader so tests can feed an in-memory
/// archive. `file_label` only decorates error messages.
///
/// The first populated row becomes the header; header positions left blank
/// by merged cells synthesize the `Unnamed: {col}` placeholder the group
/// splitter expects. Error cells (`t="e"`) read as missing values.
pub fn read_workbook<RS: Read + Seek>(
    reader: RS,
    file_label: &str,
) -> Result<RawTable, ContourGridError> {
    let mut zip = ZipArchive::new(reader)?;
    let relationships = load_relationships(&mut zip)?;
    let sheets = load_sheet_list(&mut zip, &relationships)?;
    let (sheet_name, sheet_path) = sheets
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::EmptyWorkbook(file_label.to_owned()))?;
    log::debug!("reading worksheet '{sheet_name}' from '{file_label}'");

    let shared_strings = load_shared_strings(&mut zip)?;
    let cells = load_cells(&mut zip, &sheet_path, &shared_strings)?;
    if cells.is_empty() {
        Err(SourceError::EmptySheet {
            file: file_label.to_owned(),
            sheet: sheet_name,
        })?;
    }
    Ok(materialize(cells))
}

/// Maps relationship ids to worksheet paths inside the archive.
fn load_relationships<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
) -> Result<HashMap<String, String>, ContourGridError> {
    let path = "xl/_rels/workbook.xml.rels";
    let mut reader = xml_entry(zip, path)?
        .ok_or_else(|| SourceError::MissingArchiveEntry(path.to_owned()))?;
    let mut relationships = HashMap::new();
    for_each_xml_event!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.attribute_value("Id")?;
            let kind = event.attribute_value("Type")?;
            let target = event.attribute_value("Target")?;
            // Only worksheet relationships matter here
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_archive_path(&target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Lists worksheets as (name, archive path) pairs in workbook order.
fn load_sheet_list<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    relationships: &HashMap<String, String>,
) -> Result<Vec<(String, String)>, ContourGridError> {
    let path = "xl/workbook.xml";
    let mut reader = xml_entry(zip, path)?
        .ok_or_else(|| SourceError::MissingArchiveEntry(path.to_owned()))?;
    let mut sheets = Vec::new();
    for_each_xml_event!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None;
            let mut id = None;
            // The id attribute is namespaced (r:id), so match on local names
            for result in event.attributes() {
                let attribute = result?;
                match attribute.key.local_name().as_ref() {
                    b"name" => name = Some(attribute.unescape_value()?.to_string()),
                    b"id" => id = Some(attribute.unescape_value()?.to_string()),
                    _ => (),
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(target) = relationships.get(&id) {
                    sheets.push((name, target.to_owned()));
                }
            }
        }
    });
    Ok(sheets)
}

/// Loads the shared string table, or an empty one if the part is absent.
fn load_shared_strings<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
) -> Result<Vec<String>, ContourGridError> {
    let mut shared_strings = Vec::new();
    let mut reader = match xml_entry(zip, "xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };
    for_each_xml_event!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            shared_strings.push(read_string(&mut reader, TAG_SHARED_STRING_ITEM, false)?);
        }
    });
    Ok(shared_strings)
}

/// Streams one worksheet's cells in document order.
fn load_cells<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    sheet_path: &str,
    shared_strings: &[String],
) -> Result<Vec<ParsedCell>, ContourGridError> {
    let mut reader = xml_entry(zip, sheet_path)?
        .ok_or_else(|| SourceError::MissingArchiveEntry(sheet_path.to_owned()))?;
    let mut cells = Vec::new();
    let mut row_count = 0usize;
    let mut col_count = 0usize;
    let mut row = 0usize;
    let mut col = 0usize;
    let mut kind = CellKind::default();
    let mut value = String::new();
    let mut has_value = false;
    for_each_xml_event!(reader => {
        Event::End(event) if event.name() == TAG_ROW => {
            row_count += 1;
            col_count = 0;
        }
        Event::Start(event) if event.name() == TAG_CELL => {
            // Position comes from the reference attribute when present,
            // otherwise from the running row/column counters
            (row, col) = event.attribute_value("r")?
                .and_then(|reference| reference_to_index(&reference))
                .unwrap_or((row_count, col_count));
            col_count += 1;
            kind = event.attribute_value("t")?.map(|t| match t.as_ref() {
                "s" => CellKind::SharedString,
                "inlineStr" | "str" => CellKind::InlineString,
                "b" => CellKind::Boolean,
                "e" => CellKind::Error,
                _ => CellKind::Number,
            }).unwrap_or_default();
            value.clear();
            has_value = false;
        }
        Event::Start(event) if event.name() == TAG_INLINE_STRING => {
            value = read_string(&mut reader, TAG_INLINE_STRING, false)?;
            has_value = true;
        }
        Event::Start(event) if event.name() == TAG_VALUE => {
            value = read_string(&mut reader, TAG_VALUE, true)?;
            has_value = true;
        }
        Event::End(event) if has_value && event.name() == TAG_CELL => {
            let cell = to_value(kind, &value, shared_strings, row, col)?;
            cells.push(ParsedCell { row, col, value: cell });
        }
    });
    Ok(cells)
}

/// Converts one raw cell payload into a typed [`Value`].
fn to_value(
    kind: CellKind,
    value: &str,
    shared_strings: &[String],
    row: usize,
    col: usize,
) -> Result<Value, ContourGridError> {
    let cell = match kind {
        CellKind::SharedString => {
            let index = value.parse::<usize>()?;
            let text = shared_strings.get(index).ok_or_else(|| {
                SourceError::SharedStringOutOfBounds {
                    index,
                    reference: index_to_reference(row, col),
                }
            })?;
            Value::Text(text.to_owned())
        }
        CellKind::InlineString => Value::Text(value.to_owned()),
        CellKind::Boolean => Value::Bool(value == "1"),
        // Error cells surface as missing values, the same way pandas
        // reads #N/A and friends back as NaN
        CellKind::Error => Value::Missing,
        CellKind::Number => value
            .parse::<f64>()
            .map(Value::Number)
            .unwrap_or_else(|_| Value::Text(value.to_owned())),
    };
    Ok(cell)
}

/// Builds the raw table: first populated row is the header, blanks in it
/// become `Unnamed: {col}` placeholders, later rows form the body with
/// absent cells as missing values.
fn materialize(cells: Vec<ParsedCell>) -> RawTable {
    let row_lower = cells.iter().map(|cell| cell.row).min().unwrap_or(0);
    let row_upper = cells.iter().map(|cell| cell.row).max().unwrap_or(0);
    let col_lower = cells.iter().map(|cell| cell.col).min().unwrap_or(0);
    let col_upper = cells.iter().map(|cell| cell.col).max().unwrap_or(0);
    let width = col_upper - col_lower + 1;

    let mut header: Vec<Option<String>> = vec![None; width];
    let mut rows: Vec<Vec<Value>> =
        vec![vec![Value::Missing; width]; row_upper.saturating_sub(row_lower)];
    for cell in cells {
        let col = cell.col - col_lower;
        if cell.row == row_lower {
            let label = cell.value.to_string();
            header[col] = (!label.trim().is_empty()).then_some(label);
        } else {
            rows[cell.row - row_lower - 1][col] = cell.value;
        }
    }
    let columns = header
        .into_iter()
        .enumerate()
        .map(|(col, label)| label.unwrap_or_else(|| format!("Unnamed: {col}")))
        .collect();
    RawTable::new(columns, rows)
}

/// Opens an archive entry as an XML reader; entry lookup ignores case.
fn xml_entry<'a, RS: Read + Seek>(
    zip: &'a mut ZipArchive<RS>,
    name: &str,
) -> Result<Option<XmlReader<BufReader<ZipFile<'a, RS>>>>, ContourGridError> {
    let entry = zip
        .file_names()
        .find(|file_name| file_name.eq_ignore_ascii_case(name))
        .map(str::to_owned);
    match entry.map(|file_name| zip.by_name(&file_name)).transpose() {
        Ok(Some(file)) => Ok(Some(XmlReader::new(BufReader::new(file)))),
        Ok(None) | Err(ZipError::FileNotFound) => Ok(None),
        Err(error) => Err(error)?,
    }
}

/// Reads text content up to `end_tag`, skipping phonetic annotations.
fn read_string<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, ContourGridError> {
    let mut is_phonetic = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    for_each_xml_event!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic = false,
        Event::Start(event) if !is_phonetic && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => push_entity(&mut text, &event)?,
    });
    Ok(text)
}

/// Normalizes a relationship target to an archive path under `xl/`.
fn to_archive_path(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix("/xl/") {
        format!("xl/{absolute}")
    } else if target.starts_with("xl/") {
        target.to_owned()
    } else {
        format!("xl/{target}")
    }
}

static REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)(\d+)$").expect("hardcoded regex pattern"));

/// Parses an A1-style cell reference into 0-based (row, col).
fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let captures = REFERENCE_PATTERN.captures(reference)?;
    let col = captures[1]
        .bytes()
        .fold(0usize, |index, letter| index * 26 + (letter - b'A' + 1) as usize)
        - 1;
    let row = captures[2].parse::<usize>().ok()? - 1;
    Some((row, col))
}

/// Formats 0-based (row, col) back into an A1-style reference.
fn index_to_reference(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut remainder = col + 1;
    while remainder > 0 {
        remainder -= 1;
        letters.push(b'A' + (remainder % 26) as u8);
        remainder /= 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

    const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst count="3" uniqueCount="3">
  <si><t>Flat</t></si>
  <si><t>F1</t></si>
  <si><t>F2</t></si>
</sst>"#;

    // Merged "Flat" header over two columns: B1 stays empty in the file
    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c></row>
    <row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2" t="s"><v>2</v></c></row>
    <row r="3"><c r="A3"><v>1</v></c><c r="B3"><v>2.5</v></c></row>
    <row r="4"><c r="A4"><v>2</v></c><c r="B4" t="e"><v>#N/A</v></c></row>
  </sheetData>
</worksheet>"#;

    fn archive(entries: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap()
    }

    fn sample_workbook() -> Cursor<Vec<u8>> {
        archive(&[
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/workbook.xml", WORKBOOK),
            ("xl/sharedStrings.xml", SHARED_STRINGS),
            ("xl/worksheets/sheet1.xml", SHEET),
        ])
    }

    #[test]
    fn reference_round_trip() {
        assert_eq!(reference_to_index("A1"), Some((0, 0)));
        assert_eq!(reference_to_index("B3"), Some((2, 1)));
        assert_eq!(reference_to_index("AA10"), Some((9, 26)));
        assert_eq!(reference_to_index("bogus"), None);
        assert_eq!(index_to_reference(9, 26), "AA10");
    }

    #[test]
    fn merged_header_gap_becomes_placeholder() {
        let table = read_workbook(sample_workbook(), "sample.xlsx").unwrap();
        assert_eq!(table.columns(), &["Flat".to_owned(), "Unnamed: 1".to_owned()]);
    }

    #[test]
    fn body_rows_carry_typed_cells() {
        let table = read_workbook(sample_workbook(), "sample.xlsx").unwrap();
        assert_eq!(table.height(), 3);
        assert_eq!(table.rows()[0][0], Value::Text("F1".to_owned()));
        assert_eq!(table.rows()[1][1], Value::Number(2.5));
    }

    #[test]
    fn error_cells_read_as_missing() {
        let table = read_workbook(sample_workbook(), "sample.xlsx").unwrap();
        assert_eq!(table.rows()[2][1], Value::Missing);
    }

    #[test]
    fn workbook_without_sheets_is_rejected() {
        let empty = archive(&[
            ("xl/_rels/workbook.xml.rels", RELS),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0"?><workbook><sheets/></workbook>"#,
            ),
        ]);
        let error = read_workbook(empty, "empty.xlsx").unwrap_err();
        assert!(error.to_string().contains("no worksheets"));
    }
}
