//! Excel importer implementation - Excel (.xlsx) → order lines

use crate::error::{ReportError, ReportResult};
use crate::types::{CellValue, OrderLine, REQUIRED_COLUMNS};
use calamine::{Data, Range, Reader, Xlsx};
use chrono::{Days, NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Text layouts accepted for date cells that arrive as strings
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Index of "Extended Price" within [`REQUIRED_COLUMNS`]
const EXTENDED_PRICE: usize = 10;

/// Where the source workbook comes from
#[derive(Debug, Clone)]
pub enum WorkbookSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl From<PathBuf> for WorkbookSource {
    fn from(path: PathBuf) -> Self {
        WorkbookSource::Path(path)
    }
}

impl From<Vec<u8>> for WorkbookSource {
    fn from(bytes: Vec<u8>) -> Self {
        WorkbookSource::Bytes(bytes)
    }
}

/// Reads every sheet of an order book workbook into one combined table
pub struct OrderLineImporter {
    source: WorkbookSource,
}

impl OrderLineImporter {
    pub fn new(source: impl Into<WorkbookSource>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Import all sheets, concatenated in sheet order
    pub fn import(&self) -> ReportResult<Vec<OrderLine>> {
        match &self.source {
            WorkbookSource::Path(path) => {
                info!(path = %path.display(), "reading workbook");
                let file = File::open(path)?;
                Self::import_from_reader(BufReader::new(file))
            }
            WorkbookSource::Bytes(bytes) => {
                info!(bytes = bytes.len(), "reading workbook from memory");
                Self::import_from_reader(Cursor::new(bytes.as_slice()))
            }
        }
    }

    /// Import from any seekable byte stream
    pub fn import_from_reader<RS: Read + Seek>(reader: RS) -> ReportResult<Vec<OrderLine>> {
        let mut workbook: Xlsx<RS> = Xlsx::new(reader)
            .map_err(|e| ReportError::Workbook(format!("Failed to open Excel file: {}", e)))?;

        let mut lines = Vec::new();
        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                ReportError::Workbook(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;
            let sheet_lines = process_sheet(&sheet_name, &range)?;
            debug!(sheet = %sheet_name, rows = sheet_lines.len(), "sheet loaded");
            lines.extend(sheet_lines);
        }

        info!(rows = lines.len(), "combined order lines");
        Ok(lines)
    }
}

/// Project one sheet onto the required columns
fn process_sheet(sheet_name: &str, range: &Range<Data>) -> ReportResult<Vec<OrderLine>> {
    let mut rows = range.rows();

    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(|c| data_to_cell(c).as_text()).collect())
        .unwrap_or_default();

    // Position of each required column within the sheet
    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| ReportError::Schema {
                sheet: sheet_name.to_string(),
                column: column.to_string(),
            })?;
    }

    // Excel row number of the header, for error messages
    let header_row = range.start().map_or(1, |(row, _)| row as usize + 1);

    let mut lines = Vec::with_capacity(range.height().saturating_sub(1));
    let mut unreadable_prices = 0usize;
    for (offset, cells) in rows.enumerate() {
        let excel_row = header_row + offset + 1;
        let line = build_line(sheet_name, excel_row, cells, &positions)?;
        if line.extended_price.is_none()
            && cells
                .get(positions[EXTENDED_PRICE])
                .is_some_and(|cell| !is_blank(cell))
        {
            unreadable_prices += 1;
        }
        lines.push(line);
    }

    if unreadable_prices > 0 {
        warn!(
            sheet = %sheet_name,
            count = unreadable_prices,
            "non-numeric Extended Price values counted as 0"
        );
    }

    Ok(lines)
}

/// Build one order line from a sheet row; `positions` follows [`REQUIRED_COLUMNS`]
fn build_line(
    sheet_name: &str,
    excel_row: usize,
    cells: &[Data],
    positions: &[usize; REQUIRED_COLUMNS.len()],
) -> ReportResult<OrderLine> {
    let get = |idx: usize| cells.get(positions[idx]).unwrap_or(&Data::Empty);
    let date = |idx: usize| {
        parse_date_cell(get(idx)).map_err(|value| ReportError::Parse {
            sheet: sheet_name.to_string(),
            row: excel_row,
            column: REQUIRED_COLUMNS[idx].to_string(),
            value,
        })
    };

    Ok(OrderLine {
        order: data_to_cell(get(0)),
        line: data_to_cell(get(1)),
        item: data_to_cell(get(2)),
        order_date: date(3)?,
        name: data_to_cell(get(4)),
        item_description: data_to_cell(get(5)),
        customer_item: data_to_cell(get(6)),
        qty_ordered: data_to_cell(get(7)),
        unit_of_measure: data_to_cell(get(8)),
        unit_price: data_to_cell(get(9)),
        extended_price: parse_amount(get(EXTENDED_PRICE)),
        dock_date: date(11)?,
    })
}

/// Convert a calamine cell into a carried-through value
fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) if f.is_finite() => CellValue::Number(*f),
        Data::Float(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map_or(CellValue::Number(dt.as_f64()), CellValue::Date),
        Data::DateTimeIso(s) => {
            parse_date_text(s).map_or_else(|| CellValue::Text(s.clone()), CellValue::Date)
        }
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Normalize a date cell, discarding time-of-day.
///
/// Returns the offending text on failure.
fn parse_date_cell(data: &Data) -> Result<Option<NaiveDate>, String> {
    match data {
        Data::Empty | Data::Error(_) => Ok(None),
        Data::String(s) if s.trim().is_empty() => Ok(None),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(Some)
            .ok_or_else(|| dt.as_f64().to_string()),
        Data::Float(f) => excel_serial_to_date(*f).map(Some).ok_or_else(|| f.to_string()),
        Data::Int(i) => excel_serial_to_date(*i as f64)
            .map(Some)
            .ok_or_else(|| i.to_string()),
        Data::String(s) | Data::DateTimeIso(s) => {
            parse_date_text(s).map(Some).ok_or_else(|| s.clone())
        }
        other => Err(data_to_cell(other).as_text()),
    }
}

/// Parse a textual date or date-time
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Convert an Excel serial day number (1900 date system) to a date
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days = serial.floor() as u64;
    // Serials below 60 precede Excel's phantom 1900-02-29
    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    epoch.checked_add_days(Days::new(days))
}

fn is_blank(data: &Data) -> bool {
    match data {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Read a monetary cell; anything non-numeric is missing
fn parse_amount(data: &Data) -> Option<f64> {
    let value = match data {
        Data::Int(i) => *i as f64,
        Data::Float(f) => *f,
        Data::String(s) => s.trim().replace([',', '$'], "").parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}
