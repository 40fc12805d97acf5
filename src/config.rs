//! Run configuration: defaults, optional YAML file, command-line overrides

use crate::error::{ReportError, ReportResult};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the rendered workbook
pub const DEFAULT_OUTPUT: &str = "Processed_Report.xlsx";

/// Settings for a single pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Reference date for overdue highlighting and the projection year
    pub as_of: NaiveDate,
    /// Whether to add the ENG chart sheet
    pub charts: bool,
}

impl ReportConfig {
    pub fn new(as_of: NaiveDate) -> Self {
        Self { as_of, charts: true }
    }

    pub fn with_charts(mut self, charts: bool) -> Self {
        self.charts = charts;
        self
    }
}

/// Optional YAML config file
///
/// ```yaml
/// as_of: 2025-06-01
/// charts: false
/// output: reports/orders.xlsx
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub as_of: Option<NaiveDate>,
    pub charts: Option<bool>,
    pub output: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> ReportResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Resolve the run config; explicit values win over the file, the file over `today`
    pub fn resolve(
        &self,
        today: NaiveDate,
        as_of: Option<NaiveDate>,
        no_charts: bool,
    ) -> ReportConfig {
        let charts = !no_charts && self.charts.unwrap_or(true);
        ReportConfig::new(as_of.or(self.as_of).unwrap_or(today)).with_charts(charts)
    }

    /// Output path; explicit value wins over the file
    pub fn output_path(&self, output: Option<PathBuf>) -> PathBuf {
        output
            .or_else(|| self.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}

/// Parse a `YYYY-MM-DD` reference date from the command line
pub fn parse_as_of(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_config_file() {
        let file = ConfigFile::from_yaml_str("as_of: 2025-06-01\ncharts: false\n").unwrap();
        assert_eq!(file.as_of, Some(date(2025, 6, 1)));
        assert_eq!(file.charts, Some(false));
        assert_eq!(file.output, None);
    }

    #[test]
    fn test_empty_config_file() {
        assert_eq!(ConfigFile::from_yaml_str("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ConfigFile::from_yaml_str("colour: red\n").is_err());
    }

    #[test]
    fn test_resolve_precedence() {
        let today = date(2025, 10, 1);
        let file = ConfigFile {
            as_of: Some(date(2025, 6, 1)),
            charts: Some(true),
            output: Some(PathBuf::from("from_file.xlsx")),
        };

        assert_eq!(file.resolve(today, None, false).as_of, date(2025, 6, 1));
        assert_eq!(
            file.resolve(today, Some(date(2024, 1, 1)), false).as_of,
            date(2024, 1, 1)
        );
        assert!(!file.resolve(today, None, true).charts);
        assert_eq!(ConfigFile::default().resolve(today, None, false).as_of, today);

        assert_eq!(file.output_path(None), PathBuf::from("from_file.xlsx"));
        assert_eq!(
            ConfigFile::default().output_path(None),
            PathBuf::from(DEFAULT_OUTPUT)
        );
    }

    #[test]
    fn test_parse_as_of() {
        assert_eq!(parse_as_of("2025-06-01"), Ok(date(2025, 6, 1)));
        assert!(parse_as_of("06/01/2025").is_err());
    }
}
