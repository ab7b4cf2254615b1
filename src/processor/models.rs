// src/processor/models.rs
use crate::archive::OrganizedArchive;
use crate::extractors::ClassificationResult;
use crate::mapping::UNKNOWN_COMPANY;
use serde::Serialize;

/// A single PDF taken from the input archive, with its resolved company.
#[derive(Debug, Clone)]
pub struct FiscalReport {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub identifier: Option<String>,
    pub company: String,
}

impl FiscalReport {
    pub fn is_known(&self) -> bool {
        self.company != UNKNOWN_COMPANY
    }
}

/// A report whose text could not be extracted.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionFailure {
    pub filename: String,
    pub company: String,
    pub reason: String,
}

/// Everything one run produces before serialization.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Classification of every extracted report, unknown companies included, in archive order.
    pub results: Vec<ClassificationResult>,
    /// Original filenames routed to manual review.
    pub review_files: Vec<String>,
    pub failures: Vec<ExtractionFailure>,
    pub archive: OrganizedArchive,
    pub total_reports: usize,
}

impl BatchOutcome {
    /// Results for companies present in the mapping; the only rows of the analytical outputs.
    pub fn known_results(&self) -> Vec<ClassificationResult> {
        self.results
            .iter()
            .filter(|r| r.company != UNKNOWN_COMPANY)
            .cloned()
            .collect()
    }
}
