// src/extractors/mod.rs
pub mod pdf_text;
pub mod section;

use serde::Serialize;

// Re-export key extraction types for convenience
pub use pdf_text::{LopdfExtractor, TextExtractor};
#[allow(unused_imports)]
pub use section::{classify_text, split_sections, SectionStatus, PGFN_TITLE, RF_TITLE};

/// Per-report outcome consumed by the table, CSV and PDF outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub company: String,
    pub rf_installment: bool,
    pub pgfn_installment: bool,
}

impl ClassificationResult {
    pub fn new(company: impl Into<String>, status: SectionStatus) -> Self {
        Self {
            company: company.into(),
            rf_installment: status.rf_installment,
            pgfn_installment: status.pgfn_installment,
        }
    }
}

/// "Sim"/"Não" as shown in every output.
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Sim" } else { "Não" }
}
