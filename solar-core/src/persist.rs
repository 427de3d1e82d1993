use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::model::Table;

pub const SPREADSHEET_FILE: &str = "solar_intensity_and_temperature.xlsx";

/// Header row, in column order.
pub const COLUMNS: [&str; 4] = ["Solar Intensity (W/m²)", "Temperature (°C)", "Date", "12-Hour Format"];

/// Destination for a finished table.
pub trait TableSink {
    /// Writes the whole table and returns where it went.
    fn write(&self, table: &Table) -> Result<PathBuf>;
}

/// Writes the table as a single-sheet workbook, replacing any existing file.
#[derive(Debug, Clone)]
pub struct XlsxSink {
    path: PathBuf,
}

impl XlsxSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for XlsxSink {
    fn default() -> Self {
        Self::new(SPREADSHEET_FILE)
    }
}

impl TableSink for XlsxSink {
    fn write(&self, table: &Table) -> Result<PathBuf> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let header = Format::new().set_bold();

        for (col, title) in COLUMNS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &header)?;
        }

        for (i, record) in table.records().iter().enumerate() {
            let row = i as u32 + 1;

            // Missing readings stay as empty cells.
            if let Some(v) = record.solar_intensity {
                sheet.write_number(row, 0, v)?;
            }
            if let Some(v) = record.temperature {
                sheet.write_number(row, 1, v)?;
            }
            sheet.write_string(row, 2, record.date.as_str())?;
            sheet.write_string(row, 3, record.time.as_str())?;
        }

        sheet.set_column_width(0, 24)?;
        sheet.set_column_width(1, 18)?;
        sheet.set_column_width(2, 14)?;
        sheet.set_column_width(3, 16)?;

        workbook
            .save(&self.path)
            .with_context(|| format!("Failed to write spreadsheet: {}", self.path.display()))?;

        info!(path = %self.path.display(), rows = table.len(), "spreadsheet written");

        Ok(self.path.clone())
    }
}
