//! Item-prefix classification of order lines

use crate::error::ReportResult;
use crate::types::{Category, CategoryTables, OrderLine};
use regex::Regex;
use tracing::{debug, warn};

/// Splits order lines into categories by the leading characters of the item code
pub struct Classifier {
    prefix_pattern: Regex,
}

impl Classifier {
    pub fn new() -> ReportResult<Self> {
        let alternatives: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        let prefix_pattern = Regex::new(&format!("^({})", alternatives.join("|")))?;
        Ok(Self { prefix_pattern })
    }

    /// Category of an item code, if it starts with a known prefix
    pub fn categorize(&self, item_code: &str) -> Option<Category> {
        self.prefix_pattern
            .captures(item_code)
            .and_then(|caps| caps.get(1))
            .and_then(|m| Category::from_label(m.as_str()))
    }

    /// Partition lines by category, preserving row order; unmatched lines are dropped
    pub fn classify(&self, lines: &[OrderLine]) -> CategoryTables {
        let mut tables = CategoryTables::new();
        let mut dropped = 0usize;

        for line in lines {
            match self.categorize(&line.item_code()) {
                Some(category) => tables.entry(category).or_default().push(line.clone()),
                None => dropped += 1,
            }
        }

        for (category, rows) in &tables {
            debug!(category = %category, rows = rows.len(), "classified");
        }
        if dropped > 0 {
            warn!(dropped, "order lines without a 999, ENG or NRE item prefix were dropped");
        }

        tables
    }
}
