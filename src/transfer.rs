//! CSV transfer format between the workbook model and the oracle.
//!
//! Values cross the oracle boundary as comma-separated text with a header
//! row. Parsing is strict: normalized response text that is not rectangular
//! CSV of the expected shape is a `ResponseParse` error carrying the
//! offending text, since the pipeline has no way to realign on mismatch.

use crate::error::{CorrectorError, Result};
use crate::workbook::Sheet;

pub fn sheet_to_csv(sheet: &Sheet) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        writer.write_record(row)?;
    }
    into_string(writer)
}

pub fn column_to_csv(header: &str, values: &[String]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([header])?;
    for value in values {
        writer.write_record([value.as_str()])?;
    }
    into_string(writer)
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.error().to_string()))?;
    String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
        .map_err(CorrectorError::from)
}

/// Parses normalized oracle text into headers plus rows.
pub fn parse_sheet(text: &str) -> Result<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| parse_error(e.to_string(), text))?;
        records.push(record.iter().map(|field| field.to_string()).collect::<Vec<_>>());
    }

    let mut records = records.into_iter();
    let headers = records
        .next()
        .ok_or_else(|| parse_error("response contained no rows".to_string(), text))?;
    Ok(Sheet::new(headers, records.collect()))
}

/// Parses normalized oracle text into a single column: header plus values.
pub fn parse_column(text: &str) -> Result<(String, Vec<String>)> {
    let sheet = parse_sheet(text)?;
    if sheet.column_count() != 1 {
        return Err(parse_error(
            format!("expected 1 column, got {}", sheet.column_count()),
            text,
        ));
    }
    let header = sheet.headers[0].clone();
    let values = sheet.rows.into_iter().map(|mut row| row.remove(0)).collect();
    Ok((header, values))
}

fn parse_error(reason: String, text: &str) -> CorrectorError {
    CorrectorError::ResponseParse {
        reason,
        text: text.to_string(),
    }
}
