//! Derived tables backing the ENG chart sheet

use crate::types::OrderLine;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Extended price summed over one counterparty
#[derive(Debug, Clone, PartialEq)]
pub struct CounterpartyTotal {
    pub name: String,
    pub total: f64,
}

/// Totals grouped by counterparty name, largest first.
///
/// Lines without a name are skipped. Equal totals are ordered by name.
pub fn totals_by_counterparty(lines: &[OrderLine]) -> Vec<CounterpartyTotal> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for line in lines {
        let name = line.name.as_text();
        if name.trim().is_empty() {
            continue;
        }
        *totals.entry(name).or_insert(0.0) += line.amount();
    }

    let mut result: Vec<CounterpartyTotal> = totals
        .into_iter()
        .map(|(name, total)| CounterpartyTotal { name, total })
        .collect();
    result.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    result
}

/// Monthly extended price of a single item code
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSeries {
    pub item: String,
    /// First counterparty seen for the item
    pub name: String,
    pub values: [f64; 12],
}

impl ItemSeries {
    /// Column heading, "<Name> (<Item>)"
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.item.clone()
        } else {
            format!("{} ({})", self.name, self.item)
        }
    }
}

/// Month × item pivot for one calendar year
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPivot {
    pub year: i32,
    /// First day of each month, January first
    pub months: Vec<NaiveDate>,
    /// One series per item code, ordered by item code
    pub series: Vec<ItemSeries>,
}

impl ItemPivot {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Pivot extended price by dock month and item, restricted to the year of `as_of`
pub fn monthly_item_pivot(lines: &[OrderLine], as_of: NaiveDate) -> ItemPivot {
    let year = as_of.year();
    let mut by_item: BTreeMap<String, ItemSeries> = BTreeMap::new();

    for line in lines {
        let Some(dock) = line.dock_date.filter(|d| d.year() == year) else {
            continue;
        };
        let item = line.item_code();
        let series = by_item.entry(item.clone()).or_insert_with(|| ItemSeries {
            item,
            name: String::new(),
            values: [0.0; 12],
        });
        if series.name.is_empty() {
            series.name = line.name.as_text().trim().to_string();
        }
        series.values[dock.month0() as usize] += line.amount();
    }

    let months = (1..=12)
        .filter_map(|m| NaiveDate::from_ymd_opt(year, m, 1))
        .collect();

    ItemPivot {
        year,
        months,
        series: by_item.into_values().collect(),
    }
}
