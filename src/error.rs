use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet '{sheet}' is missing required column '{column}'")]
    Schema { sheet: String, column: String },

    #[error("Sheet '{sheet}' row {row}: cannot read '{value}' in column '{column}' as a date")]
    Parse {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("No rows matched any item category (999, NRE, ENG)")]
    EmptyResult,

    #[error("Export error: {0}")]
    Export(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}
