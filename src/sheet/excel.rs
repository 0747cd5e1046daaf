use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::NaiveDateTime;
use log::debug;

use super::{Cell, ReadError, Row, SheetSource};

/// An open `.xlsx` workbook. The file handle is released on drop.
pub struct ExcelWorkbook {
    workbook: Xlsx<BufReader<File>>,
    sheets: Vec<String>,
}

impl ExcelWorkbook {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let path = path.as_ref();
        let workbook = open_workbook::<Xlsx<_>, _>(path).map_err(|e| ReadError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let sheets = workbook.sheet_names().to_owned();
        debug!("Opened workbook {} with sheets {:?}", path.display(), sheets);

        Ok(Self { workbook, sheets })
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheets
    }
}

impl SheetSource for ExcelWorkbook {
    fn rows(&mut self, sheet: &str) -> Result<Vec<Row>, ReadError> {
        if !self.sheets.iter().any(|name| name == sheet) {
            return Err(ReadError::MissingSheet(sheet.to_string()));
        }

        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|e| ReadError::Sheet {
                sheet: sheet.to_string(),
                reason: e.to_string(),
            })?;

        // The range starts at the first used cell, not at A1
        let (start_row, start_col) = match range.start() {
            Some(start) => (start.0 as usize, start.1 as usize),
            None => return Ok(Vec::new()),
        };

        let rows: Vec<Row> = range
            .rows()
            .enumerate()
            .filter(|(index, _)| start_row + index > 0)
            .map(|(_, cells)| {
                let mut row = vec![Cell::Empty; start_col];
                row.extend(cells.iter().map(convert_cell));
                Row::new(row)
            })
            .collect();

        debug!("Read {} rows from sheet '{}'", rows.len(), sheet);
        Ok(rows)
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::String(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        // as_datetime honours the workbook's 1904 date system
        Data::DateTime(dt) if dt.is_duration() => Cell::Number(dt.as_f64()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::String(s.clone())),
        Data::DurationIso(s) => Cell::String(s.clone()),
        Data::Error(e) => {
            debug!("Treating cell error {:?} as empty", e);
            Cell::Empty
        }
    }
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
