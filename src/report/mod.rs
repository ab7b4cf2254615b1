// src/report/mod.rs
pub mod csv;
pub mod pdf;
pub mod table;

/// Column headers shared by the table, the CSV and the PDF summary.
pub const HEADERS: [&str; 3] = ["Empresa", "Parcelamento RF", "Parcelamento PGFN"];

pub const REPORT_TITLE: &str = "Relatório de Parcelamento";

use crate::extractors::{yes_no, ClassificationResult};
use crate::processor::BatchOutcome;
use crate::storage::StorageManager;
use crate::utils::error::RenderError;
use crate::utils::AppError;
use std::path::Path;

/// Row cells in header order.
pub fn row_cells(result: &ClassificationResult) -> [&str; 3] {
    [
        result.company.as_str(),
        yes_no(result.rf_installment),
        yes_no(result.pgfn_installment),
    ]
}

/// Saves the CSV, the PDF summary, the organized ZIP and the run metadata.
///
/// A failure to render or save the PDF is logged and returned as the message
/// recorded in the metadata; the other outputs are still written.
pub fn write_outputs<F>(
    storage: &StorageManager,
    input_zip: &Path,
    outcome: &BatchOutcome,
    render_pdf: F,
) -> Result<Option<String>, AppError>
where
    F: FnOnce(&[ClassificationResult]) -> Result<Vec<u8>, RenderError>,
{
    let known = outcome.known_results();

    storage.save_csv(&self::csv::render_csv(&known)?)?;

    let pdf_result = render_pdf(&known)
        .map_err(AppError::from)
        .and_then(|bytes| storage.save_pdf(&bytes).map_err(AppError::from));
    let pdf_error = match pdf_result {
        Ok(_) => None,
        Err(e) => {
            tracing::error!("Erro ao gerar PDF: {}", e);
            Some(e.to_string())
        }
    };

    storage.save_archive(&outcome.archive.to_zip_bytes()?)?;
    storage.save_run_metadata(input_zip, outcome, &known, pdf_error.as_deref())?;

    Ok(pdf_error)
}
