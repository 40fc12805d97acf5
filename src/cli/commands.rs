use crate::config::{ConfigFile, ReportConfig};
use crate::error::{ReportError, ReportResult};
use crate::pipeline::{self, Analysis};
use crate::types::{format_number, Category, OrderLine, ProjectionTable};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// Columns shown in the terminal preview of the combined table
const PREVIEW_COLUMNS: [&str; 5] = ["Order", "Item", "Name", "Extended Price", "Dock Date"];

/// Wall-clock date, read once per run
fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn load_config(config: Option<&PathBuf>) -> ReportResult<ConfigFile> {
    match config {
        Some(path) => ConfigFile::load(path),
        None => Ok(ConfigFile::default()),
    }
}

/// Format a monetary amount with two decimals
fn format_money(n: f64) -> String {
    format!("{:.2}", n)
}

/// Execute the report command
pub fn report(
    input: PathBuf,
    output: Option<PathBuf>,
    as_of: Option<NaiveDate>,
    no_charts: bool,
    config: Option<PathBuf>,
    verbose: bool,
) -> ReportResult<()> {
    let file = load_config(config.as_ref())?;
    let run = file.resolve(today(), as_of, no_charts);
    let output = file.output_path(output);

    println!("{}", "📊 Order Book Report".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}", output.display());
    println!("   As of:  {}\n", run.as_of);

    let result = pipeline::process(input, &run)?;

    if verbose {
        println!("   Loaded {} rows", result.combined.len());
        println!();
    }

    for (category, lines) in &result.categories {
        let overdue = lines.iter().filter(|l| l.is_overdue(run.as_of)).count();
        let projected = result
            .projections
            .get(category)
            .map_or(0.0, ProjectionTable::grand_total);
        println!(
            "   {} {} rows, {} overdue, {} projected in {}",
            format!("{:<4}", category.label()).bright_blue().bold(),
            lines.len(),
            overdue.to_string().red(),
            format_money(projected).bold(),
            run.as_of.format("%Y"),
        );
    }
    if run.charts && result.categories.contains_key(&Category::Eng) {
        println!("   {} chart sheet added", "ENG".bright_blue().bold());
    }
    println!();

    fs::write(&output, &result.document)?;

    println!("{}", "✅ Analysis complete!".bold().green());
    println!("   Excel file: {}\n", output.display());
    Ok(())
}

/// Execute the preview command
pub fn preview(
    input: PathBuf,
    category: Option<String>,
    rows: usize,
    as_of: Option<NaiveDate>,
    json: bool,
) -> ReportResult<()> {
    let run = ReportConfig::new(as_of.unwrap_or_else(today));
    let combined = pipeline::load(input)?;
    let analysis = pipeline::analyze(&combined, run.as_of)?;

    if json {
        let text = serde_json::to_string_pretty(&analysis.projections)
            .map_err(|e| ReportError::Export(format!("Failed to serialize projections: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    let selected = select_category(&analysis, category.as_deref())?;

    println!("{}", "📋 Preview: Cleaned Combined Data".bold().green());
    print_lines(&combined, rows, run.as_of);
    println!();

    println!(
        "{}",
        format!("📈 Preview: Monthly Projection for {}", selected)
            .bold()
            .green()
    );
    if let Some(projection) = analysis.projections.get(&selected) {
        print_projection(projection);
    }
    println!();
    Ok(())
}

/// Pick the requested category, or the first present one
fn select_category(analysis: &Analysis, requested: Option<&str>) -> ReportResult<Category> {
    let present: Vec<&str> = analysis.categories.keys().map(|c| c.label()).collect();
    let unknown = |label: &str| {
        ReportError::Config(format!(
            "Category '{}' not present; available: {}",
            label,
            present.join(", ")
        ))
    };

    match requested {
        Some(label) => Category::from_label(label)
            .filter(|c| analysis.categories.contains_key(c))
            .ok_or_else(|| unknown(label)),
        None => analysis
            .categories
            .keys()
            .next()
            .copied()
            .ok_or(ReportError::EmptyResult),
    }
}

fn print_lines(lines: &[OrderLine], limit: usize, as_of: NaiveDate) {
    println!(
        "   {:<10} {:<16} {:<24} {:>14} {:<10}",
        PREVIEW_COLUMNS[0],
        PREVIEW_COLUMNS[1],
        PREVIEW_COLUMNS[2],
        PREVIEW_COLUMNS[3],
        PREVIEW_COLUMNS[4],
    );
    for line in lines.iter().take(limit) {
        let dock = line
            .dock_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        let price = line.extended_price.map(format_money).unwrap_or_default();
        let row = format!(
            "   {:<10} {:<16} {:<24} {:>14} {:<10}",
            line.order.as_text(),
            line.item_code(),
            truncate(&line.name.as_text(), 24),
            price,
            dock,
        );
        if line.is_overdue(as_of) {
            println!("{} {}", row.red(), "overdue".red());
        } else {
            println!("{}", row);
        }
    }
    if lines.len() > limit {
        println!("   … {} more rows", lines.len() - limit);
    }
}

fn print_projection(projection: &ProjectionTable) {
    println!("   {:>16} {:<12} {:>7}", "Projected Below", "Month", "Month #");
    for row in &projection.rows {
        println!(
            "   {:>16} {:<12} {:>7}",
            format_money(row.total),
            row.label,
            format_number(row.month as f64)
        );
    }
    println!(
        "   {:>16} {}",
        format_money(projection.grand_total()).bold(),
        "total".bold()
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CategoryTables;

    fn analysis_with(categories: &[Category]) -> Analysis {
        let mut tables = CategoryTables::new();
        for category in categories {
            tables.insert(*category, vec![OrderLine::default()]);
        }
        Analysis {
            categories: tables,
            projections: Default::default(),
        }
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(500.0), "500.00");
        assert_eq!(format_money(12.346), "12.35");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Acme", 10), "Acme");
        assert_eq!(truncate("Acme Corporation", 5), "Acme…");
    }

    #[test]
    fn test_select_category_defaults_to_first() {
        let analysis = analysis_with(&[Category::Nre, Category::Eng]);
        assert_eq!(select_category(&analysis, None).unwrap(), Category::Eng);
    }

    #[test]
    fn test_select_category_requested() {
        let analysis = analysis_with(&[Category::Nre, Category::Eng]);
        assert_eq!(select_category(&analysis, Some("NRE")).unwrap(), Category::Nre);
    }

    #[test]
    fn test_select_category_missing() {
        let analysis = analysis_with(&[Category::Eng]);
        let err = select_category(&analysis, Some("999")).unwrap_err();
        assert!(err.to_string().contains("available: ENG"));
    }
}
