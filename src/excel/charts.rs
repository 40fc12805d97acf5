//! ENG chart sheet: counterparty pie and monthly per-item line chart

use super::exporter::{excel_date, export_err, write_header, ReportFormats};
use crate::core::aggregate::{
    monthly_item_pivot, totals_by_counterparty, CounterpartyTotal, ItemPivot,
};
use crate::error::ReportResult;
use crate::types::OrderLine;
use chrono::NaiveDate;
use rust_xlsxwriter::{
    Chart, ChartAxisDateUnitType, ChartDataLabel, ChartLegendPosition, ChartType, Format,
    Workbook, Worksheet,
};
use tracing::debug;

pub const CHART_SHEET: &str = "ENG_Graphs";

/// Columns between a backing table and its pie chart
const PIE_COLUMN_OFFSET: u16 = 3;
/// Columns between the pivot table and its line chart
const LINE_COLUMN_OFFSET: u16 = 2;
/// Rows covered by a default-size chart
const CHART_HEIGHT_ROWS: u32 = 16;
/// Blank rows between the counterparty block and the pivot
const BLOCK_GAP_ROWS: u32 = 2;

const MONTH_NUM_FORMAT: &str = "mmm yyyy";
const MONEY_AXIS_FORMAT: &str = "$#,##0";

/// Write the ENG chart sheet.
///
/// Charts are skipped when their backing table has no rows.
pub fn export_eng_graphs(
    workbook: &mut Workbook,
    formats: &ReportFormats,
    lines: &[OrderLine],
    as_of: NaiveDate,
) -> ReportResult<()> {
    let totals = totals_by_counterparty(lines);
    let pivot = monthly_item_pivot(lines, as_of);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(CHART_SHEET)
        .map_err(export_err("Failed to set worksheet name"))?;
    worksheet.set_column_width(0, 24).ok();

    write_counterparty_table(worksheet, formats, &totals)?;
    if !totals.is_empty() {
        insert_pie_chart(worksheet, totals.len() as u32)?;
    }

    let pivot_row = (totals.len() as u32 + 1).max(1 + CHART_HEIGHT_ROWS) + BLOCK_GAP_ROWS;
    write_pivot_table(worksheet, formats, &pivot, pivot_row)?;
    if !pivot.is_empty() {
        insert_line_chart(worksheet, &pivot, pivot_row)?;
    }

    debug!(
        counterparties = totals.len(),
        items = pivot.series.len(),
        "chart sheet written"
    );
    Ok(())
}

fn write_counterparty_table(
    worksheet: &mut Worksheet,
    formats: &ReportFormats,
    totals: &[CounterpartyTotal],
) -> ReportResult<()> {
    write_header(worksheet, &formats.header, &["Name", "Extended Price"])?;
    worksheet.set_column_width(1, 16).ok();

    for (idx, entry) in totals.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet
            .write_string(row, 0, &entry.name)
            .map_err(export_err("Failed to write text"))?;
        worksheet
            .write_number_with_format(row, 1, entry.total, &formats.money)
            .map_err(export_err("Failed to write number"))?;
    }
    Ok(())
}

fn insert_pie_chart(worksheet: &mut Worksheet, rows: u32) -> ReportResult<()> {
    let mut chart = Chart::new(ChartType::Pie);
    chart.title().set_name("ENG Extended Price by Name");
    chart
        .add_series()
        .set_name("Extended Price")
        .set_categories((CHART_SHEET, 1u32, 0u16, rows, 0u16))
        .set_values((CHART_SHEET, 1u32, 1u16, rows, 1u16))
        .set_data_label(ChartDataLabel::new().show_percentage().show_category_name());

    worksheet
        .insert_chart(1, PIE_COLUMN_OFFSET, &chart)
        .map_err(export_err("Failed to insert pie chart"))?;
    Ok(())
}

/// Month column plus one column per item, header at `top`
fn write_pivot_table(
    worksheet: &mut Worksheet,
    formats: &ReportFormats,
    pivot: &ItemPivot,
    top: u32,
) -> ReportResult<()> {
    let month_format = Format::new().set_num_format(MONTH_NUM_FORMAT);

    worksheet
        .write_string_with_format(top, 0, "Month", &formats.header)
        .map_err(export_err("Failed to write header"))?;
    for (idx, series) in pivot.series.iter().enumerate() {
        let col = (idx + 1) as u16;
        worksheet
            .write_string_with_format(top, col, series.label(), &formats.header)
            .map_err(export_err("Failed to write header"))?;
        worksheet.set_column_width(col, 18).ok();
    }

    for (idx, month) in pivot.months.iter().enumerate() {
        let row = top + 1 + idx as u32;
        worksheet
            .write_datetime_with_format(row, 0, &excel_date(*month)?, &month_format)
            .map_err(export_err("Failed to write date"))?;
        for (series_idx, series) in pivot.series.iter().enumerate() {
            worksheet
                .write_number_with_format(
                    row,
                    (series_idx + 1) as u16,
                    series.values[idx],
                    &formats.money,
                )
                .map_err(export_err("Failed to write number"))?;
        }
    }
    Ok(())
}

fn insert_line_chart(worksheet: &mut Worksheet, pivot: &ItemPivot, top: u32) -> ReportResult<()> {
    let first = top + 1;
    let last = top + pivot.months.len() as u32;

    let title = format!("ENG Monthly Extended Price {}", pivot.year);
    let mut chart = Chart::new(ChartType::Line);
    chart.title().set_name(&title);

    for idx in 0..pivot.series.len() {
        let col = (idx + 1) as u16;
        chart
            .add_series()
            .set_name((CHART_SHEET, top, col))
            .set_categories((CHART_SHEET, first, 0u16, last, 0u16))
            .set_values((CHART_SHEET, first, col, last, col));
    }

    chart
        .x_axis()
        .set_name("Month")
        .set_date_axis(true)
        .set_num_format(MONTH_NUM_FORMAT)
        .set_major_unit(1)
        .set_major_unit_date_type(ChartAxisDateUnitType::Months);
    chart
        .y_axis()
        .set_name("Extended Price")
        .set_num_format(MONEY_AXIS_FORMAT);
    chart.legend().set_position(ChartLegendPosition::Bottom);
    chart.set_width(720).set_height(400);

    let anchor_col = pivot.series.len() as u16 + 1 + LINE_COLUMN_OFFSET;
    worksheet
        .insert_chart(top, anchor_col, &chart)
        .map_err(export_err("Failed to insert line chart"))?;
    Ok(())
}
