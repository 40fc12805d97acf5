//! Twelve-month projection of extended price by dock date

use crate::types::{MonthlyProjection, OrderLine, ProjectionTable};
use chrono::{Datelike, NaiveDate};

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// "Mon - YYYY" label of a month (1-12)
pub fn month_label(month: u32, year: i32) -> String {
    let abbr = MONTH_ABBREVIATIONS
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("???");
    format!("{} - {:04}", abbr, year)
}

/// Bucket extended prices into the months of the year of `as_of`.
///
/// Lines docking in any other year, or without a dock date, land in no bucket.
pub fn project(lines: &[OrderLine], as_of: NaiveDate) -> ProjectionTable {
    let year = as_of.year();
    let mut totals = [0.0f64; 12];

    for line in lines {
        if let Some(dock) = line.dock_date.filter(|d| d.year() == year) {
            totals[dock.month0() as usize] += line.amount();
        }
    }

    let rows = totals
        .iter()
        .zip(1u32..)
        .map(|(&total, month)| MonthlyProjection {
            total,
            label: month_label(month, year),
            month,
        })
        .collect();

    ProjectionTable { year, rows }
}
