//! Fixture workbooks for integration tests

#![allow(dead_code)]

use calamine::{Data, Range, Reader, Xlsx};
use chrono::{Datelike, NaiveDate};
use orderbook_report::types::REQUIRED_COLUMNS;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::io::{self, Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One source row; unlisted columns get fixed filler values
#[derive(Debug, Clone)]
pub struct FixtureRow {
    pub order: f64,
    pub item: String,
    pub name: String,
    pub extended_price: Option<f64>,
    pub order_date: NaiveDate,
    pub dock_date: NaiveDate,
}

pub fn row(item: &str, name: &str, price: Option<f64>, dock: NaiveDate) -> FixtureRow {
    FixtureRow {
        order: 1000.0,
        item: item.to_string(),
        name: name.to_string(),
        extended_price: price,
        order_date: date(2024, 1, 1),
        dock_date: dock,
    }
}

fn excel_date(d: NaiveDate) -> ExcelDateTime {
    ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8).unwrap()
}

/// Build an order book workbook with one sheet per entry
pub fn order_book(sheets: &[(&str, Vec<FixtureRow>)]) -> Workbook {
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let mut workbook = Workbook::new();

    for (sheet_name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*sheet_name).unwrap();
        for (col, header) in REQUIRED_COLUMNS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        for (idx, fixture) in rows.iter().enumerate() {
            let r = (idx + 1) as u32;
            worksheet
                .write_number(r, 0, fixture.order + idx as f64)
                .unwrap();
            worksheet.write_number(r, 1, 1).unwrap();
            worksheet.write_string(r, 2, &fixture.item).unwrap();
            worksheet
                .write_datetime_with_format(r, 3, &excel_date(fixture.order_date), &date_format)
                .unwrap();
            if !fixture.name.is_empty() {
                worksheet.write_string(r, 4, &fixture.name).unwrap();
            }
            worksheet.write_string(r, 5, "Widget").unwrap();
            worksheet.write_string(r, 6, "CUST-1").unwrap();
            worksheet.write_number(r, 7, 1).unwrap();
            worksheet.write_string(r, 8, "EA").unwrap();
            if let Some(price) = fixture.extended_price {
                worksheet.write_number(r, 9, price).unwrap();
                worksheet.write_number(r, 10, price).unwrap();
            }
            worksheet
                .write_datetime_with_format(r, 11, &excel_date(fixture.dock_date), &date_format)
                .unwrap();
        }
    }
    workbook
}

pub fn order_book_bytes(sheets: &[(&str, Vec<FixtureRow>)]) -> Vec<u8> {
    order_book(sheets).save_to_buffer().unwrap()
}

pub fn write_order_book(path: &Path, sheets: &[(&str, Vec<FixtureRow>)]) {
    order_book(sheets).save(path).unwrap();
}

/// A single sheet of plain strings under arbitrary headers
pub fn text_sheet_bytes(headers: &[&str], rows: &[Vec<&str>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (idx, cells) in rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if !cell.is_empty() {
                worksheet
                    .write_string((idx + 1) as u32, col as u16, *cell)
                    .unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Open rendered xlsx bytes for inspection
pub fn open_report(bytes: &[u8]) -> Xlsx<Cursor<Vec<u8>>> {
    Xlsx::new(Cursor::new(bytes.to_vec())).unwrap()
}

pub fn sheet(report: &mut Xlsx<Cursor<Vec<u8>>>, name: &str) -> Range<Data> {
    report.worksheet_range(name).unwrap()
}

pub fn as_f64(cell: Option<&Data>) -> f64 {
    match cell {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        Some(Data::DateTime(dt)) => dt.as_f64(),
        other => panic!("expected number, got {:?}", other),
    }
}

pub fn as_string(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.clone(),
        other => panic!("expected string, got {:?}", other),
    }
}

/// Shared sink for formatted log output
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with warnings and above captured; returns its result and the log text
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}
