use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use orderbook_report::cli;
use orderbook_report::config::parse_as_of;
use orderbook_report::error::ReportResult;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orderbook")]
#[command(about = "Categorize order lines and build a monthly projection workbook.")]
#[command(long_about = "Orderbook - order line report generator

Reads every sheet of an order-line workbook, keeps rows whose Item starts
with 999, NRE or ENG, projects Extended Price by Dock Date month for the
current year, and writes an Excel report with overdue rows highlighted.

COMMANDS:
  report   - Build the report workbook
  preview  - Show the combined table and a projection in the terminal

EXAMPLES:
  orderbook report orders.xlsx                      # Writes Processed_Report.xlsx
  orderbook report orders.xlsx -o out.xlsx --as-of 2025-06-01
  orderbook preview orders.xlsx --category NRE

LOGGING:
  RUST_LOG=orderbook_report=debug orderbook report orders.xlsx")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Build the report workbook.

Writes one <Category>_Data sheet (overdue rows highlighted) and one
<Category>_Projection sheet per category present, plus an ENG_Graphs
chart sheet when ENG rows exist.

CONFIG FILE (YAML, all keys optional):
  as_of: 2025-06-01
  charts: false
  output: reports/orders.xlsx

Command-line options override the config file.")]
    /// Build the report workbook
    Report {
        /// Path to the source workbook (.xlsx)
        input: PathBuf,

        /// Output Excel file path [default: Processed_Report.xlsx]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reference date (YYYY-MM-DD) instead of today
        #[arg(long, env = "ORDERBOOK_AS_OF", value_parser = parse_as_of)]
        as_of: Option<NaiveDate>,

        /// Skip the ENG chart sheet
        #[arg(long)]
        no_charts: bool,

        /// YAML config file
        #[arg(short, long, env = "ORDERBOOK_CONFIG")]
        config: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Preview the combined table and one category's projection
    Preview {
        /// Path to the source workbook (.xlsx)
        input: PathBuf,

        /// Category to show (999, NRE, ENG) [default: first present]
        #[arg(short, long)]
        category: Option<String>,

        /// Number of combined rows to show
        #[arg(short, long, default_value = "20")]
        rows: usize,

        /// Reference date (YYYY-MM-DD) instead of today
        #[arg(long, env = "ORDERBOOK_AS_OF", value_parser = parse_as_of)]
        as_of: Option<NaiveDate>,

        /// Print all projections as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "orderbook_report=debug"
    } else {
        "orderbook_report=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> ReportResult<()> {
    match command {
        Commands::Report {
            input,
            output,
            as_of,
            no_charts,
            config,
            verbose,
        } => cli::report(input, output, as_of, no_charts, config, verbose),

        Commands::Preview {
            input,
            category,
            rows,
            as_of,
            json,
        } => cli::preview(input, category, rows, as_of, json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Report { verbose: true, .. });
    init_tracing(verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("❌ Error processing file: {}", e).red());
            ExitCode::FAILURE
        }
    }
}
