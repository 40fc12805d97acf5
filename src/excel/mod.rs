//! Excel import/export for order book reports
//!
//! - Import: source workbook (.xlsx, all sheets) → combined order lines
//! - Export: categorized lines + projections → report workbook (.xlsx)

mod charts;
mod exporter;
mod importer;

pub use charts::CHART_SHEET;
pub use exporter::{ReportExporter, DATE_NUM_FORMAT, OVERDUE_FILL};
pub use importer::{excel_serial_to_date, parse_date_text, OrderLineImporter, WorkbookSource};
