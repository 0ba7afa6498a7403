//! # xlstable
//!
//! Command-line front end: prints the header and body rows of a worksheet table.

use anyhow::{bail, Context, Result};
use clap::Parser;
use glob::Pattern;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xlstable::{CellAddress, ReadOptions, RowContext, SheetSelector, TableExtractor, TableResult};

/// xlstable - print the table of an xlsx worksheet
#[derive(Parser)]
#[command(name = "xlstable")]
#[command(author, version, about = "Streams a header row and its body rows out of an xlsx sheet", long_about = None)]
struct Cli {
    /// Workbook to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Sheet to read, by 1-based number or exact name (default: first sheet)
    #[arg(short, long, value_name = "NAME|NUMBER", conflicts_with = "sheets")]
    sheet: Option<String>,

    /// Read every sheet whose name matches the glob pattern
    #[arg(long, value_name = "GLOB")]
    sheets: Option<String>,

    /// Address of the first header cell
    #[arg(long, value_name = "ADDRESS", default_value = "A1")]
    start: CellAddress,

    /// End the table at the first empty row
    #[arg(long)]
    stop_at_empty_row: bool,

    /// End every row before this column
    #[arg(long, value_name = "LETTERS")]
    stop_at_column: Option<String>,

    /// List the sheets of the workbook and exit
    #[arg(short, long)]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let mut extractor = TableExtractor::open(&cli.file)
        .with_context(|| format!("Failed to open workbook: {}", cli.file.display()))?;

    if cli.list {
        for sheet in extractor.sheets() {
            println!("{}\t{}", sheet.number(), sheet.name());
        }
        return Ok(());
    }

    extractor.set_options(read_options(&cli)?);
    let result = if let Some(pattern) = &cli.sheets {
        let pattern = Pattern::new(pattern)
            .with_context(|| format!("Invalid sheet pattern: '{pattern}'"))?;
        extractor.read_tables(
            |sheet| pattern.matches(sheet.name()),
            |header| println!("Header: {}", format_row(header)),
            |row| println!("Body: {}", format_row(row)),
        )?
    } else {
        read_sheet(&mut extractor, cli.sheet.as_deref())?
    };

    println!();
    println!("{}", result.body_row_count());
    Ok(())
}

/// Builds the read options from the command line flags.
fn read_options(cli: &Cli) -> Result<ReadOptions> {
    let mut options = ReadOptions::new().start_at(cli.start.clone());
    if cli.stop_at_empty_row {
        options = options.stop_at_empty_row();
    }
    if let Some(letters) = &cli.stop_at_column {
        let stop = match xlstable::column_index(letters) {
            Some(index) => index,
            None => bail!("Invalid column letters: '{letters}'"),
        };
        options = options.terminate_columns_when(move |_, cell| cell.column_index() >= stop);
    }
    Ok(options)
}

fn read_sheet(extractor: &mut TableExtractor, sheet: Option<&str>) -> Result<TableResult> {
    let selector = match sheet {
        Some(sheet) => match sheet.parse::<usize>() {
            Ok(number) => SheetSelector::Number(number),
            Err(_) => SheetSelector::Name(sheet.to_string()),
        },
        None => SheetSelector::Number(1),
    };
    let description = format!("{selector:?}");
    let result = extractor
        .read_sheet_table(
            selector,
            |header| println!("Header: {}", format_row(header)),
            |row| println!("Body: {}", format_row(row)),
        )
        .with_context(|| format!("Failed to read table from sheet {description}"))?;
    Ok(result)
}

/// Formats a row as `<count> <column>|<value>,...`.
fn format_row(row: &RowContext) -> String {
    let cells: Vec<String> = row
        .cells()
        .map(|cell| format!("{}|{}", cell.column_reference(), cell.value().unwrap_or_default()))
        .collect();
    format!("{} {}", row.count(), cells.join(","))
}
