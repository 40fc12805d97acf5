//! Order book report - classify order lines and project monthly totals
//!
//! This library reads every sheet of an order-line workbook, splits the rows
//! into item-prefix categories (`999`, `NRE`, `ENG`), projects each
//! category's extended price over the twelve months of the reference year,
//! and renders an Excel report with overdue rows highlighted.
//!
//! # Features
//!
//! - Multi-sheet import with exact-match column projection
//! - Date normalization from Excel serials, ISO and common text layouts
//! - Per-category data and projection sheets
//! - Optional ENG chart sheet (counterparty pie, per-item monthly lines)
//!
//! # Example
//!
//! ```no_run
//! use orderbook_report::{process, ReportConfig};
//! use chrono::NaiveDate;
//! use std::path::PathBuf;
//!
//! let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//! let output = process(PathBuf::from("orders.xlsx"), &ReportConfig::new(as_of))?;
//!
//! println!("Categories: {}", output.categories.len());
//! std::fs::write("Processed_Report.xlsx", &output.document)?;
//! # Ok::<(), orderbook_report::error::ReportError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use config::ReportConfig;
pub use error::{ReportError, ReportResult};
pub use pipeline::{analyze, load, process, Analysis, ReportOutput};
pub use types::{Category, CellValue, MonthlyProjection, OrderLine, ProjectionTable};
