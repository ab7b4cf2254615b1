// src/main.rs
mod archive;
mod extractors;
mod mapping;
mod processor;
mod report;
mod storage;
mod utils;

use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use extractors::LopdfExtractor;
use mapping::CompanyMapping;
use storage::StorageManager;
use utils::AppError;

/// Installment-plan (parcelamento) checker for batches of fiscal situation reports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ZIP archive with the PDF reports
    #[arg(short, long)]
    zip: PathBuf,

    /// Company mapping, one "name<TAB>CNPJ" per line ("-" reads stdin)
    #[arg(short, long)]
    mapping: String,

    /// Output directory for the CSV, PDF and organized ZIP
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Debug mode - save extracted report text with section markers
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Build the company mapping
    let mapping_text = read_mapping_text(&args.mapping)?;
    let mapping = CompanyMapping::parse(&mapping_text);
    if mapping.is_empty() {
        tracing::warn!("No 'name<TAB>CNPJ' lines found in mapping '{}'; every report goes to review", args.mapping);
    }
    tracing::info!("Loaded {} company mappings", mapping.len());

    // 4. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;
    let debug_dir = args.debug.then(|| storage.debug_dir());

    // 5. Read the reports from the archive
    let zip_bytes = std::fs::read(&args.zip)?;
    let entries = archive::read_pdf_entries(&zip_bytes)?;
    tracing::info!("Found {} PDF reports in {}", entries.len(), args.zip.display());

    // 6. Resolve, extract and classify each report
    let extractor = LopdfExtractor::new();
    let outcome = processor::process_reports(entries, &mapping, &extractor, debug_dir.as_deref());
    let known = outcome.known_results();

    // 7. Show and save the outputs
    println!("{}", report::table::render_table(&known));

    report::write_outputs(&storage, &args.zip, &outcome, report::pdf::render_summary)?;

    tracing::info!("Processing finished. Known: {}, Review: {}, Extraction failures: {}",
        known.len(),
        outcome.review_files.len(),
        outcome.failures.len());

    Ok(())
}

fn read_mapping_text(source: &str) -> Result<String, AppError> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    let path = Path::new(source);
    if !path.exists() {
        return Err(AppError::Config(format!("Mapping file not found: {}", path.display())));
    }
    Ok(std::fs::read_to_string(path)?)
}
