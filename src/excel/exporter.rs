//! Excel exporter implementation - categorized order lines → report workbook

use super::charts;
use crate::error::{ReportError, ReportResult};
use crate::types::{
    CategoryTables, CellValue, Category, OrderLine, ProjectionTable, ProjectionTables,
    PROJECTION_HEADERS, REQUIRED_COLUMNS,
};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{
    ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError,
};
use std::path::Path;
use tracing::{debug, info};

/// Background fill of overdue data rows
pub const OVERDUE_FILL: u32 = 0xFFC7CE;

/// Number format of date cells
pub const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";

/// Map a writer error into an export error with context
pub(crate) fn export_err(context: &'static str) -> impl Fn(XlsxError) -> ReportError {
    move |e| ReportError::Export(format!("{}: {}", context, e))
}

/// Convert a calendar date into an Excel date
pub(crate) fn excel_date(date: NaiveDate) -> ReportResult<ExcelDateTime> {
    let year = u16::try_from(date.year())
        .map_err(|_| ReportError::Export(format!("Date out of range: {}", date)))?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)
        .map_err(export_err("Failed to convert date"))
}

/// Cell formats shared across the report
pub(crate) struct ReportFormats {
    pub header: Format,
    pub date: Format,
    pub overdue: Format,
    pub overdue_date: Format,
    pub money: Format,
}

impl ReportFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center),
            date: Format::new().set_num_format(DATE_NUM_FORMAT),
            overdue: Format::new().set_background_color(OVERDUE_FILL),
            overdue_date: Format::new()
                .set_background_color(OVERDUE_FILL)
                .set_num_format(DATE_NUM_FORMAT),
            money: Format::new().set_num_format("#,##0.00"),
        }
    }

    /// Fill and date format for a data row; the fill is set only on overdue rows
    fn for_row(&self, overdue: bool) -> (Option<&Format>, &Format) {
        if overdue {
            (Some(&self.overdue), &self.overdue_date)
        } else {
            (None, &self.date)
        }
    }
}

/// Renders category tables and their projections into one workbook
pub struct ReportExporter {
    as_of: NaiveDate,
    charts: bool,
}

impl ReportExporter {
    /// Create an exporter; rows docking before `as_of` are highlighted
    pub fn new(as_of: NaiveDate) -> Self {
        Self { as_of, charts: true }
    }

    /// Enable or disable the ENG chart sheet
    pub fn with_charts(mut self, charts: bool) -> Self {
        self.charts = charts;
        self
    }

    /// Build the report workbook in memory
    pub fn build(
        &self,
        tables: &CategoryTables,
        projections: &ProjectionTables,
    ) -> ReportResult<Workbook> {
        let formats = ReportFormats::new();
        let mut workbook = Workbook::new();

        for (&category, lines) in tables {
            self.export_data_sheet(&mut workbook, &formats, category, lines)?;
            if let Some(projection) = projections.get(&category) {
                export_projection_sheet(&mut workbook, &formats, category, projection)?;
            }
        }

        if self.charts {
            if let Some(eng) = tables.get(&Category::Eng) {
                charts::export_eng_graphs(&mut workbook, &formats, eng, self.as_of)?;
            }
        }

        Ok(workbook)
    }

    /// Render the report into xlsx bytes
    pub fn export_to_buffer(
        &self,
        tables: &CategoryTables,
        projections: &ProjectionTables,
    ) -> ReportResult<Vec<u8>> {
        let mut workbook = self.build(tables, projections)?;
        let bytes = workbook
            .save_to_buffer()
            .map_err(export_err("Failed to render Excel file"))?;
        info!(bytes = bytes.len(), "report rendered");
        Ok(bytes)
    }

    /// Render the report and save it to `output_path`
    pub fn export(
        &self,
        tables: &CategoryTables,
        projections: &ProjectionTables,
        output_path: &Path,
    ) -> ReportResult<()> {
        let mut workbook = self.build(tables, projections)?;
        workbook
            .save(output_path)
            .map_err(export_err("Failed to save Excel file"))?;
        info!(path = %output_path.display(), "report saved");
        Ok(())
    }

    /// Write the raw rows of one category, highlighting overdue rows
    fn export_data_sheet(
        &self,
        workbook: &mut Workbook,
        formats: &ReportFormats,
        category: Category,
        lines: &[OrderLine],
    ) -> ReportResult<()> {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(category.data_sheet_name())
            .map_err(export_err("Failed to set worksheet name"))?;

        write_header(worksheet, &formats.header, &REQUIRED_COLUMNS)?;
        for (col, width) in DATA_COLUMN_WIDTHS.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width).ok();
        }

        let mut overdue_rows = 0usize;
        for (idx, line) in lines.iter().enumerate() {
            let row = (idx + 1) as u32;
            let overdue = line.is_overdue(self.as_of);
            if overdue {
                overdue_rows += 1;
            }
            let (fill, date_format) = formats.for_row(overdue);

            for (col, value) in line.cells().iter().enumerate() {
                write_cell(worksheet, row, col as u16, value, fill, date_format)?;
            }
        }

        debug!(
            category = %category,
            rows = lines.len(),
            overdue = overdue_rows,
            "data sheet written"
        );
        Ok(())
    }
}

/// Column widths of the data sheet, in [`REQUIRED_COLUMNS`] order
const DATA_COLUMN_WIDTHS: [f64; 12] = [
    10.0, 6.0, 16.0, 12.0, 24.0, 32.0, 16.0, 12.0, 6.0, 12.0, 14.0, 12.0,
];

/// Write the 12-month projection table of one category
fn export_projection_sheet(
    workbook: &mut Workbook,
    formats: &ReportFormats,
    category: Category,
    projection: &ProjectionTable,
) -> ReportResult<()> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(category.projection_sheet_name())
        .map_err(export_err("Failed to set worksheet name"))?;

    write_header(worksheet, &formats.header, &PROJECTION_HEADERS)?;
    worksheet.set_column_width(0, 16).ok();
    worksheet.set_column_width(1, 12).ok();

    for (idx, month) in projection.rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet
            .write_number(row, 0, month.total)
            .map_err(export_err("Failed to write number"))?;
        worksheet
            .write_string(row, 1, &month.label)
            .map_err(export_err("Failed to write text"))?;
        worksheet
            .write_number(row, 2, month.month)
            .map_err(export_err("Failed to write number"))?;
    }

    debug!(category = %category, total = projection.grand_total(), "projection sheet written");
    Ok(())
}

/// Write a bold header row at row 0
pub(crate) fn write_header(
    worksheet: &mut Worksheet,
    format: &Format,
    headers: &[&str],
) -> ReportResult<()> {
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, format)
            .map_err(export_err("Failed to write header"))?;
    }
    Ok(())
}

/// Write one data cell.
///
/// `fill` is applied to every cell of a highlighted row, including blanks;
/// dates always carry `date_format`.
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    fill: Option<&Format>,
    date_format: &Format,
) -> ReportResult<()> {
    match (value, fill) {
        (CellValue::Date(date), _) => {
            let datetime = excel_date(*date)?;
            worksheet
                .write_datetime_with_format(row, col, &datetime, date_format)
                .map_err(export_err("Failed to write date"))?;
        }
        (CellValue::Number(n), Some(format)) if n.is_finite() => {
            worksheet
                .write_number_with_format(row, col, *n, format)
                .map_err(export_err("Failed to write number"))?;
        }
        (CellValue::Number(n), None) if n.is_finite() => {
            worksheet
                .write_number(row, col, *n)
                .map_err(export_err("Failed to write number"))?;
        }
        (CellValue::Text(s), Some(format)) => {
            worksheet
                .write_string_with_format(row, col, s, format)
                .map_err(export_err("Failed to write text"))?;
        }
        (CellValue::Text(s), None) => {
            worksheet
                .write_string(row, col, s)
                .map_err(export_err("Failed to write text"))?;
        }
        (CellValue::Bool(b), Some(format)) => {
            worksheet
                .write_boolean_with_format(row, col, *b, format)
                .map_err(export_err("Failed to write boolean"))?;
        }
        (CellValue::Bool(b), None) => {
            worksheet
                .write_boolean(row, col, *b)
                .map_err(export_err("Failed to write boolean"))?;
        }
        // Empty or non-finite: a blank cell, kept only when it carries the fill
        (_, Some(format)) => {
            worksheet
                .write_blank(row, col, format)
                .map_err(export_err("Failed to write blank"))?;
        }
        (_, None) => {}
    }
    Ok(())
}
