//! Spreadsheet access
//!
//! The loader reads rows through `SheetSource`; `ExcelWorkbook` is the
//! calamine-backed implementation used by the binary.

pub mod cell;
pub mod excel;

use thiserror::Error;

pub use cell::{Cell, Row, excel_serial_to_datetime};
pub use excel::ExcelWorkbook;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("could not open workbook {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("could not read sheet '{sheet}': {reason}")]
    Sheet { sheet: String, reason: String },
}

/// A source of worksheet rows
pub trait SheetSource {
    /// All rows of `sheet` after its header row, in sheet order
    fn rows(&mut self, sheet: &str) -> Result<Vec<Row>, ReadError>;
}

/// In-memory sheets, keyed by sheet name
impl SheetSource for std::collections::HashMap<String, Vec<Row>> {
    fn rows(&mut self, sheet: &str) -> Result<Vec<Row>, ReadError> {
        self.get(sheet)
            .cloned()
            .ok_or_else(|| ReadError::MissingSheet(sheet.to_string()))
    }
}
