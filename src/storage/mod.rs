// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::extractors::ClassificationResult;
use crate::processor::BatchOutcome;
use crate::utils::error::StorageError;

pub const CSV_FILENAME: &str = "resultado_parcelamento.csv";
pub const PDF_FILENAME: &str = "resultado_parcelamento.pdf";
pub const ZIP_FILENAME: &str = "relatorios_organizados.zip";
pub const METADATA_FILENAME: &str = "resultado_parcelamento_meta.json";
pub const DEBUG_DIRNAME: &str = "debug";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn debug_dir(&self) -> PathBuf {
        self.base_dir.join(DEBUG_DIRNAME)
    }

    pub fn save_csv(&self, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        self.save_bytes(CSV_FILENAME, bytes)
    }

    pub fn save_pdf(&self, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        self.save_bytes(PDF_FILENAME, bytes)
    }

    pub fn save_archive(&self, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        self.save_bytes(ZIP_FILENAME, bytes)
    }

    fn save_bytes(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(filename);
        fs::write(&file_path, bytes)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved {} ({} bytes)", file_path.display(), bytes.len());
        Ok(file_path)
    }

    /// Saves a JSON summary of the run next to the other outputs
    pub fn save_run_metadata(
        &self,
        input_zip: &Path,
        outcome: &BatchOutcome,
        known: &[ClassificationResult],
        pdf_error: Option<&str>,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(METADATA_FILENAME);

        let metadata = serde_json::json!({
            "input_zip": input_zip.display().to_string(),
            "total_reports": outcome.total_reports,
            "classified_reports": outcome.results.len(),
            "known_companies": known.len(),
            "results": known,
            "review_files": outcome.review_files,
            "extraction_failures": outcome.failures,
            "archive_entries": outcome.archive.paths().collect::<Vec<_>>(),
            "pdf_error": pdf_error,
            "processed_at": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::ExtractionFailure;

    #[test]
    fn test_creates_missing_base_dir_and_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("nested").join("out");

        let storage = StorageManager::new(&base).unwrap();
        let csv_path = storage.save_csv(b"Empresa\n").unwrap();

        assert_eq!(csv_path, base.join(CSV_FILENAME));
        assert_eq!(fs::read(&csv_path).unwrap(), b"Empresa\n");
    }

    #[test]
    fn test_metadata_lists_results_and_review_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();

        let mut outcome = BatchOutcome::default();
        outcome.total_reports = 2;
        outcome.review_files.push("sem_cnpj.pdf".to_string());
        outcome.failures.push(ExtractionFailure {
            filename: "sem_cnpj.pdf".to_string(),
            company: "Unknown".to_string(),
            reason: "Failed to load PDF: bad header".to_string(),
        });
        outcome.archive.add_for_review("sem_cnpj.pdf", Vec::new());
        let known = vec![ClassificationResult {
            company: "Acme Corp".to_string(),
            rf_installment: true,
            pgfn_installment: false,
        }];

        let path = storage.save_run_metadata(Path::new("in.zip"), &outcome, &known, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(value["total_reports"], 2);
        assert_eq!(value["results"][0]["company"], "Acme Corp");
        assert_eq!(value["results"][0]["rf_installment"], true);
        assert_eq!(value["review_files"][0], "sem_cnpj.pdf");
        assert_eq!(value["archive_entries"][0], "nao_encontrados/sem_cnpj.pdf");
        assert!(value["pdf_error"].is_null());
    }
}
