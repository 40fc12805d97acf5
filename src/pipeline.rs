//! One synchronous run: load → classify → project → render

use crate::config::ReportConfig;
use crate::core::{project, Classifier};
use crate::error::{ReportError, ReportResult};
use crate::excel::{OrderLineImporter, ReportExporter, WorkbookSource};
use crate::types::{CategoryTables, OrderLine, ProjectionTables};
use chrono::NaiveDate;
use tracing::info;

/// Everything a run produces
#[derive(Debug)]
pub struct ReportOutput {
    /// All loaded rows, in sheet order
    pub combined: Vec<OrderLine>,
    pub categories: CategoryTables,
    pub projections: ProjectionTables,
    /// The rendered xlsx document
    pub document: Vec<u8>,
}

/// Categorized rows and their projections
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub categories: CategoryTables,
    pub projections: ProjectionTables,
}

/// Classify rows and project every present category.
///
/// Fails with [`ReportError::EmptyResult`] when no row has a known item prefix.
pub fn analyze(lines: &[OrderLine], as_of: NaiveDate) -> ReportResult<Analysis> {
    let categories = Classifier::new()?.classify(lines);
    if categories.is_empty() {
        return Err(ReportError::EmptyResult);
    }

    let projections: ProjectionTables = categories
        .iter()
        .map(|(&category, rows)| (category, project(rows, as_of)))
        .collect();

    Ok(Analysis {
        categories,
        projections,
    })
}

/// Load the source workbook without rendering
pub fn load(source: impl Into<WorkbookSource>) -> ReportResult<Vec<OrderLine>> {
    OrderLineImporter::new(source).import()
}

/// Run the whole pipeline; any error aborts the run and no document is produced
pub fn process(
    source: impl Into<WorkbookSource>,
    config: &ReportConfig,
) -> ReportResult<ReportOutput> {
    info!(as_of = %config.as_of, charts = config.charts, "starting report run");

    let combined = load(source)?;
    let Analysis {
        categories,
        projections,
    } = analyze(&combined, config.as_of)?;

    let document = ReportExporter::new(config.as_of)
        .with_charts(config.charts)
        .export_to_buffer(&categories, &projections)?;

    Ok(ReportOutput {
        combined,
        categories,
        projections,
        document,
    })
}
