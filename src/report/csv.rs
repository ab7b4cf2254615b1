// src/report/csv.rs
use crate::extractors::ClassificationResult;
use crate::report::{row_cells, HEADERS};
use crate::utils::error::StorageError;

/// UTF-8 CSV of the analysis table. The header row is always written.
pub fn render_csv(results: &[ClassificationResult]) -> Result<Vec<u8>, StorageError> {
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(HEADERS)
        .map_err(|e| StorageError::Csv(e.to_string()))?;
    for result in results {
        writer
            .write_record(row_cells(result))
            .map_err(|e| StorageError::Csv(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| StorageError::Csv(e.to_string()))
}
