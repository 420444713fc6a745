//! Minimal workbook reader
//!
//! Sheets written by this bot are plain single-worksheet files of string
//! cells, so reading one back only needs the shared strings table and the
//! first worksheet part out of the OOXML package. Handles shared (`t="s"`),
//! inline (`t="inlineStr"`), and cached formula (`t="str"`) string cells;
//! anything else is taken as the raw `<v>` text.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::classify::Row;
use crate::core::{AppError, AppResult};

/// Fixed column layout: A through D.
pub const COLUMN_COUNT: usize = 4;

/// Read every row of the first worksheet in `path`.
pub fn read_rows(path: &Path) -> AppResult<Vec<Row>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let shared = match read_entry(&mut archive, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };
    let sheet_xml = read_entry(&mut archive, "xl/worksheets/sheet1.xml")?
        .ok_or_else(|| AppError::SheetParse("missing xl/worksheets/sheet1.xml".to_string()))?;

    parse_worksheet(&sheet_xml, &shared)
}

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> AppResult<Option<String>> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut xml = String::new();
            entry.read_to_string(&mut xml)?;
            Ok(Some(xml))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::SheetParse(e.to_string())
}

/// Collect the `<si>` entries of the shared strings table. Rich-text runs
/// are flattened by concatenating every `<t>` inside the entry.
fn parse_shared_strings(xml: &str) -> AppResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match reader.read_event().map_err(parse_err)? {
            Event::Start(e) => match e.name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Event::Text(t) if in_t => current.push_str(&t.unescape().map_err(parse_err)?),
            Event::End(e) => match e.name().as_ref() {
                b"t" => in_t = false,
                b"si" => {
                    in_si = false;
                    strings.push(std::mem::take(&mut current));
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(strings)
}

/// Column index and cell type out of a `<c>` element's attributes.
fn cell_attrs(e: &BytesStart<'_>) -> AppResult<(Option<usize>, String)> {
    let mut col = None;
    let mut cell_type = String::new();
    for attr in e.attributes() {
        let attr = attr.map_err(parse_err)?;
        match attr.key.as_ref() {
            b"r" => col = Some(column_index(&attr.unescape_value().map_err(parse_err)?)),
            b"t" => cell_type = attr.unescape_value().map_err(parse_err)?.into_owned(),
            _ => {}
        }
    }
    Ok((col, cell_type))
}

/// 0-based column index from a cell reference like `B7`.
fn column_index(cell_ref: &str) -> usize {
    let mut idx = 0usize;
    for ch in cell_ref.chars().take_while(|c| c.is_ascii_alphabetic()) {
        idx = idx * 26 + (ch.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    idx.saturating_sub(1)
}

fn parse_worksheet(xml: &str, shared: &[String]) -> AppResult<Vec<Row>> {
    let mut reader = Reader::from_str(xml);
    let mut rows: Vec<Row> = Vec::new();
    let mut cells: Vec<(usize, String)> = Vec::new();
    let mut cell_col: Option<usize> = None;
    let mut cell_type = String::new();
    let mut value = String::new();
    let mut capture = false;

    loop {
        match reader.read_event().map_err(parse_err)? {
            Event::Start(e) => match e.name().as_ref() {
                b"row" => cells.clear(),
                b"c" => {
                    let (col, ty) = cell_attrs(&e)?;
                    cell_col = col;
                    cell_type = ty;
                    value.clear();
                }
                // <v> holds shared indices and cached values, <t> holds
                // inline string text inside <is>
                b"v" | b"t" => capture = true,
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"c" => {
                let (col, _) = cell_attrs(&e)?;
                cells.push((col.unwrap_or(cells.len()), String::new()));
            }
            Event::Text(t) if capture => value.push_str(&t.unescape().map_err(parse_err)?),
            Event::End(e) => match e.name().as_ref() {
                b"v" | b"t" => capture = false,
                b"c" => {
                    let resolved = if cell_type == "s" {
                        let idx: usize = value
                            .trim()
                            .parse()
                            .map_err(|_| AppError::SheetParse(format!("bad shared string index: {:?}", value)))?;
                        shared
                            .get(idx)
                            .cloned()
                            .ok_or_else(|| AppError::SheetParse(format!("shared string index out of range: {}", idx)))?
                    } else {
                        value.clone()
                    };
                    cells.push((cell_col.take().unwrap_or(cells.len()), resolved));
                }
                b"row" => {
                    let mut row = Row::default();
                    for (col, v) in cells.drain(..) {
                        if col < COLUMN_COUNT {
                            row[col] = v;
                        }
                    }
                    rows.push(row);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rows)
}
