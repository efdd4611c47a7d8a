//! XLSX import and export.
//!
//! Import: one-way conversion into the string-cell workbook model. The first
//! row of each sheet becomes the header row, matching how the upload host
//! presents tabular data. Export: corrected sheets written to an in-memory
//! buffer, one worksheet per sheet, no row-index column.

use crate::error::{CorrectorError, Result};
use crate::workbook::{Sheet, Workbook};
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

/// Extra display width added to autofitted columns.
const AUTOFIT_PADDING: f64 = 2.0;

pub fn read_workbook(path: &Path) -> Result<Workbook> {
    let bytes = std::fs::read(path)?;
    read_workbook_bytes(bytes)
}

/// Parses an uploaded spreadsheet, fully in memory.
pub fn read_workbook_bytes(bytes: Vec<u8>) -> Result<Workbook> {
    let mut source: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| CorrectorError::InputRead(e.to_string()))?;

    let sheet_names: Vec<String> = source.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(CorrectorError::InputRead(
            "spreadsheet contains no sheets".to_string(),
        ));
    }

    let mut workbook = Workbook::new();
    for sheet_name in &sheet_names {
        let range = source.worksheet_range(sheet_name).map_err(|e| {
            CorrectorError::InputRead(format!("failed to read sheet '{}': {}", sheet_name, e))
        })?;

        let (height, width) = range.get_size();
        if height == 0 || width == 0 {
            workbook.push(sheet_name, Sheet::new(Vec::new(), Vec::new()));
            continue;
        }

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(cell_to_string).collect())
            .unwrap_or_default();

        let body: Vec<Vec<String>> = rows
            .map(|row| {
                let mut cells: Vec<String> = row.iter().map(cell_to_string).collect();
                // The calamine range is dense per sheet, but keep rows padded
                // to the header width so the model stays rectangular.
                cells.resize(headers.len(), String::new());
                cells
            })
            .collect();

        info!(
            "Read sheet '{}': {} rows x {} columns",
            sheet_name,
            body.len(),
            headers.len()
        );
        workbook.push(sheet_name, Sheet::new(headers, body));
    }

    Ok(workbook)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => format_datetime(naive),
            None => format!("{}", dt.as_f64()),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

fn format_datetime(naive: chrono::NaiveDateTime) -> String {
    naive.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Writes the corrected workbook to an xlsx byte buffer, preserving sheet
/// order and names. Autofit is cosmetic only: each column's width becomes the
/// longest stringified cell (header included) plus padding.
pub fn write_workbook(workbook: &Workbook, autofit: bool) -> Result<Vec<u8>> {
    let mut output = XlsxWorkbook::new();

    for (name, sheet) in workbook.iter() {
        let worksheet = output.add_worksheet();
        worksheet
            .set_name(name)
            .map_err(|e| CorrectorError::Export(e.to_string()))?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet
                .write_string(0, col as u16, header)
                .map_err(|e| CorrectorError::Export(e.to_string()))?;
        }
        for (row, cells) in sheet.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                worksheet
                    .write_string(row as u32 + 1, col as u16, cell)
                    .map_err(|e| CorrectorError::Export(e.to_string()))?;
            }
        }

        if autofit {
            for (col, header) in sheet.headers.iter().enumerate() {
                let longest = sheet
                    .rows
                    .iter()
                    .map(|row| row.get(col).map_or(0, |cell| cell.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .max(header.chars().count());
                worksheet
                    .set_column_width(col as u16, longest as f64 + AUTOFIT_PADDING)
                    .map_err(|e| CorrectorError::Export(e.to_string()))?;
            }
        }
    }

    output
        .save_to_buffer()
        .map_err(|e| CorrectorError::Export(e.to_string()))
}
