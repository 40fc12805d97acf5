use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

//==============================================================================
// Source Columns
//==============================================================================

pub const COL_ORDER: &str = "Order";
pub const COL_LINE: &str = "Line";
pub const COL_ITEM: &str = "Item";
pub const COL_ORDER_DATE: &str = "Order Date";
pub const COL_NAME: &str = "Name";
pub const COL_ITEM_DESCRIPTION: &str = "Item Description";
pub const COL_CUSTOMER_ITEM: &str = "Customer Item";
pub const COL_QTY_ORDERED: &str = "Qty Ordered";
pub const COL_UNIT_OF_MEASURE: &str = "U/M";
pub const COL_UNIT_PRICE: &str = "Unit Price";
pub const COL_EXTENDED_PRICE: &str = "Extended Price";
pub const COL_DOCK_DATE: &str = "Dock Date";

/// The columns every source sheet must expose, in output order.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    COL_ORDER,
    COL_LINE,
    COL_ITEM,
    COL_ORDER_DATE,
    COL_NAME,
    COL_ITEM_DESCRIPTION,
    COL_CUSTOMER_ITEM,
    COL_QTY_ORDERED,
    COL_UNIT_OF_MEASURE,
    COL_UNIT_PRICE,
    COL_EXTENDED_PRICE,
    COL_DOCK_DATE,
];

//==============================================================================
// Cell Values
//==============================================================================

/// A single cell carried through from the source workbook
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the value as plain text.
    ///
    /// Integral numbers are printed without a fractional part so that an item
    /// code stored as `999123.0` reads as `999123`.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<Option<NaiveDate>> for CellValue {
    fn from(d: Option<NaiveDate>) -> Self {
        d.map_or(CellValue::Empty, CellValue::Date)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(n: Option<f64>) -> Self {
        n.map_or(CellValue::Empty, CellValue::Number)
    }
}

/// Format a number for display, dropping a zero fractional part
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

//==============================================================================
// Order Lines
//==============================================================================

/// One order-line record, projected onto the required columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderLine {
    pub order: CellValue,
    pub line: CellValue,
    pub item: CellValue,
    pub order_date: Option<NaiveDate>,
    pub name: CellValue,
    pub item_description: CellValue,
    pub customer_item: CellValue,
    pub qty_ordered: CellValue,
    pub unit_of_measure: CellValue,
    pub unit_price: CellValue,
    /// Finite monetary value; `None` when absent or not numeric
    pub extended_price: Option<f64>,
    pub dock_date: Option<NaiveDate>,
}

impl OrderLine {
    /// Item code as text, the input to classification
    pub fn item_code(&self) -> String {
        self.item.as_text()
    }

    /// Extended price with missing values counted as zero
    pub fn amount(&self) -> f64 {
        self.extended_price.unwrap_or(0.0)
    }

    /// Whether the dock date has passed relative to `as_of`.
    ///
    /// Rows without a dock date are never overdue.
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.dock_date.is_some_and(|d| d < as_of)
    }

    /// Cell values in [`REQUIRED_COLUMNS`] order
    pub fn cells(&self) -> [CellValue; 12] {
        [
            self.order.clone(),
            self.line.clone(),
            self.item.clone(),
            self.order_date.into(),
            self.name.clone(),
            self.item_description.clone(),
            self.customer_item.clone(),
            self.qty_ordered.clone(),
            self.unit_of_measure.clone(),
            self.unit_price.clone(),
            self.extended_price.into(),
            self.dock_date.into(),
        ]
    }
}

//==============================================================================
// Categories
//==============================================================================

/// Item-code category.
///
/// Variants are declared in label sort order, which is also the sheet order of
/// the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Code999,
    Eng,
    Nre,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Code999, Category::Eng, Category::Nre];

    pub fn label(self) -> &'static str {
        match self {
            Category::Code999 => "999",
            Category::Eng => "ENG",
            Category::Nre => "NRE",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn data_sheet_name(self) -> String {
        format!("{}_Data", self.label())
    }

    pub fn projection_sheet_name(self) -> String {
        format!("{}_Projection", self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Rows partitioned by category, each in source row order
pub type CategoryTables = BTreeMap<Category, Vec<OrderLine>>;

//==============================================================================
// Projections
//==============================================================================

pub const PROJECTION_HEADERS: [&str; 3] = ["Projected Below", "Month", "Month #"];

/// Total extended price of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyProjection {
    pub total: f64,
    pub label: String,
    pub month: u32,
}

/// Twelve monthly rows, January first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionTable {
    pub year: i32,
    pub rows: Vec<MonthlyProjection>,
}

impl ProjectionTable {
    pub fn grand_total(&self) -> f64 {
        self.rows.iter().map(|r| r.total).sum()
    }
}

pub type ProjectionTables = BTreeMap<Category, ProjectionTable>;
