//! Extract command - line items from a single token dump.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use billscan_core::layout::{RowReconstructor, guess_column_positions};
use billscan_core::models::bill::ExtractionResult;
use billscan_core::models::config::BillscanConfig;
use billscan_core::{BillExtractor, BillParser, JsonTokenSource, OcrPage, TokenSource};

use super::output::{OutputFormat, format_result};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input token dump (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print guessed column positions for the given number of columns
    #[arg(long)]
    columns: Option<usize>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if args.pretty {
        config.output.pretty = true;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );

    pb.set_message("Loading tokens...");
    let pages = JsonTokenSource::new(&args.input).pages()?;
    debug!("Loaded {} pages", pages.len());

    pb.set_message("Extracting line items...");
    let result = extract(&pages, &config);
    pb.finish_and_clear();

    if let Some(n_columns) = args.columns {
        print_columns(&pages, &config, n_columns);
    }

    let output = format_result(&result, args.format, &config.output)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub(crate) fn extract(pages: &[OcrPage], config: &BillscanConfig) -> ExtractionResult {
    BillExtractor::from_config(config).parse(pages)
}

fn print_columns(pages: &[OcrPage], config: &BillscanConfig, n_columns: usize) {
    let reconstructor = RowReconstructor::from_config(&config.extraction);

    for page in pages {
        let rows = reconstructor.reconstruct(&page.tokens);
        let positions = guess_column_positions(&rows, n_columns);
        let formatted: Vec<String> = positions.iter().map(|x| format!("{:.1}", x)).collect();

        eprintln!(
            "{} Page {} columns: [{}]",
            style("ℹ").blue(),
            page.page_no,
            formatted.join(", ")
        );
    }
}
