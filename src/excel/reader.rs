use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::types::*;

/// Load every worksheet of a workbook into cell grids.
///
/// Grids are anchored at A1 so row 0 is always spreadsheet row 1, whatever the used range
/// looks like. At most `max_rows` rows are kept per sheet.
pub fn load_workbook(path: &Path, max_rows: u32) -> Result<Workbook, ExcelError> {
    if !path.is_file() {
        return Err(ExcelError::file_not_found(&path.display().to_string()));
    }

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ExcelError::load_error(format!("Failed to open workbook: {}", e)))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| ExcelError::load_error(format!("Failed to read sheet '{}': {}", name, e)))?;
        sheets.push(read_sheet(name, &range, max_rows));
    }

    if sheets.is_empty() {
        return Err(ExcelError::load_error(format!(
            "Workbook has no worksheets: {}",
            path.display()
        )));
    }

    Ok(Workbook { sheets })
}

/// Copy a calamine range into a sheet grid anchored at A1
fn read_sheet(name: &str, range: &Range<Data>, max_rows: u32) -> Sheet {
    let Some((end_row, end_col)) = range.end() else {
        return Sheet {
            name: name.to_string(),
            rows: Vec::new(),
            total_rows: 0,
        };
    };

    let total_rows = end_row + 1;
    let kept_rows = total_rows.min(max_rows);

    let rows = (0..kept_rows)
        .map(|row| {
            (0..=end_col)
                .map(|col| Cell::new(convert_cell_value(range.get_value((row, col)))))
                .collect()
        })
        .collect();

    Sheet {
        name: name.to_string(),
        rows,
        total_rows,
    }
}

/// Convert calamine Data to our CellValue
fn convert_cell_value(cell: Option<&Data>) -> CellValue {
    match cell {
        None => CellValue::Empty,
        Some(data) => match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Data::DateTime(dt) => CellValue::Text(format_excel_datetime(dt.as_f64())),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        },
    }
}

/// Format Excel datetime (days since 1899-12-30) to ISO 8601
fn format_excel_datetime(value: f64) -> String {
    let Some(epoch) = chrono::NaiveDate::from_ymd_opt(1899, 12, 30) else {
        return value.to_string();
    };

    let days = value.floor() as i64;
    let total_seconds = (value.fract() * 86400.0).round() as u32;
    let date = epoch + chrono::Duration::days(days);
    let time = chrono::NaiveTime::from_num_seconds_from_midnight_opt(total_seconds.min(86399), 0)
        .unwrap_or_default();

    chrono::NaiveDateTime::new(date, time)
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

/// Compute SHA-256 checksum of a file
pub fn compute_checksum(path: &Path) -> Result<String, ExcelError> {
    let mut file = File::open(path)
        .map_err(|e| ExcelError::load_error(format!("Failed to open file for checksum: {}", e)))?;

    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| ExcelError::load_error(format!("Failed to read file for checksum: {}", e)))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
