// src/processor/mod.rs
pub mod models;

#[allow(unused_imports)]
pub use models::{BatchOutcome, ExtractionFailure, FiscalReport};

use crate::archive::PdfEntry;
use crate::extractors::{classify_text, ClassificationResult, TextExtractor, PGFN_TITLE, RF_TITLE};
use crate::mapping::CompanyMapping;
use crate::utils::text_debug;
use std::path::Path;

/// Resolves, extracts, classifies and routes every report, sequentially and in archive order.
///
/// An extraction failure only affects its own report, which goes to the review folder.
pub fn process_reports(
    entries: Vec<PdfEntry>,
    mapping: &CompanyMapping,
    extractor: &dyn TextExtractor,
    debug_dir: Option<&Path>,
) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        total_reports: entries.len(),
        ..Default::default()
    };

    for entry in entries {
        let (identifier, company) = mapping.resolve(&entry.filename);
        let report = FiscalReport {
            filename: entry.filename,
            bytes: entry.bytes,
            identifier,
            company,
        };
        tracing::info!("Processing '{}' (CNPJ: {}, company: {})",
            report.filename,
            report.identifier.as_deref().unwrap_or("-"),
            report.company);

        let text = match extractor.extract_text(&report.bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to extract text from '{}': {}", report.filename, e);
                outcome.failures.push(ExtractionFailure {
                    filename: report.filename.clone(),
                    company: report.company.clone(),
                    reason: e.to_string(),
                });
                outcome.review_files.push(report.filename.clone());
                outcome.archive.add_for_review(&report.filename, report.bytes);
                continue;
            }
        };

        if let Some(dir) = debug_dir {
            let stem = debug_stem(&report.filename);
            if let Err(e) = text_debug::create_debug_text(&text, dir, &stem, &[(RF_TITLE, "rf"), (PGFN_TITLE, "pgfn")]) {
                tracing::warn!("Failed to write debug text for '{}': {}", report.filename, e);
            }
        }

        let status = classify_text(&text);
        tracing::info!("'{}' -> RF: {}, PGFN: {}", report.filename, status.rf_installment, status.pgfn_installment);
        outcome.results.push(ClassificationResult::new(report.company.as_str(), status));

        if report.is_known() {
            outcome.archive.add_renamed(&report.company, report.bytes);
        } else {
            outcome.review_files.push(report.filename.clone());
            outcome.archive.add_for_review(&report.filename, report.bytes);
        }
    }

    tracing::info!("Processed {} reports: {} classified, {} for review, {} extraction failures",
        outcome.total_reports,
        outcome.results.len(),
        outcome.review_files.len(),
        outcome.failures.len());

    outcome
}

// Flattens an archive path into a single file stem for the debug folder
fn debug_stem(filename: &str) -> String {
    let base = filename.strip_suffix(".pdf").or_else(|| filename.strip_suffix(".PDF")).unwrap_or(filename);
    base.chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::utils::error::ExtractError;

    /// Treats the entry bytes as already-extracted UTF-8 text.
    pub(crate) struct PlainTextExtractor;

    impl TextExtractor for PlainTextExtractor {
        fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
            String::from_utf8(bytes.to_vec()).map_err(|e| ExtractError::PdfLoad(e.to_string()))
        }
    }

    fn entry(name: &str, text: &[u8]) -> PdfEntry {
        PdfEntry { filename: name.to_string(), bytes: text.to_vec() }
    }

    fn report_text(rf_body: &str, pgfn_body: &str) -> String {
        format!("{}\n{}\n{}\n{}\n", RF_TITLE, rf_body, PGFN_TITLE, pgfn_body)
    }

    #[test]
    fn test_acme_scenario() {
        let mapping = CompanyMapping::parse("Acme Corp\t11.222.333/0001-44");
        let text = report_text("Débito EM PARCELAMENTO", "Nada consta");
        let entries = vec![entry("11222333000144_report.pdf", text.as_bytes())];

        let outcome = process_reports(entries, &mapping, &PlainTextExtractor, None);

        assert_eq!(outcome.known_results(), vec![ClassificationResult {
            company: "Acme Corp".to_string(),
            rf_installment: true,
            pgfn_installment: false,
        }]);
        assert_eq!(outcome.archive.get("renomeados/Acme Corp.pdf"), Some(text.as_bytes()));
        assert!(outcome.review_files.is_empty());
    }

    #[test]
    fn test_unknown_reports_only_go_to_review() {
        let mapping = CompanyMapping::parse("Acme Corp\t11222333000144");
        let entries = vec![
            entry("11222333000144.pdf", report_text("", "Pendência - Parcelamento").as_bytes()),
            entry("99888777000166.pdf", report_text("EM PARCELAMENTO", "").as_bytes()),
            entry("sem_identificador.pdf", b"texto"),
        ];

        let outcome = process_reports(entries, &mapping, &PlainTextExtractor, None);

        assert_eq!(outcome.total_reports, 3);
        assert_eq!(outcome.results.len(), 3);
        let known = outcome.known_results();
        assert_eq!(known.len(), 1);
        assert!(known[0].pgfn_installment);

        let paths: Vec<&str> = outcome.archive.paths().collect();
        assert_eq!(paths, vec![
            "nao_encontrados/99888777000166.pdf",
            "nao_encontrados/sem_identificador.pdf",
            "renomeados/Acme Corp.pdf",
        ]);
        assert_eq!(outcome.review_files, vec!["99888777000166.pdf", "sem_identificador.pdf"]);
    }

    #[test]
    fn test_extraction_failure_is_isolated() {
        let mapping = CompanyMapping::parse("Acme Corp\t11222333000144\nBeta\t55666777000188");
        let entries = vec![
            entry("11222333000144.pdf", &[0xff, 0xfe, 0x00]),
            entry("55666777000188.pdf", report_text("EM PARCELAMENTO", "").as_bytes()),
        ];

        let outcome = process_reports(entries, &mapping, &PlainTextExtractor, None);

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].company, "Acme Corp");
        assert_eq!(outcome.known_results().len(), 1);
        assert_eq!(outcome.known_results()[0].company, "Beta");
        assert!(outcome.archive.get("nao_encontrados/11222333000144.pdf").is_some());
        assert!(outcome.archive.get("renomeados/Beta.pdf").is_some());
    }

    #[test]
    fn test_debug_dir_receives_text_dumps() {
        let dir = tempfile::tempdir().unwrap();
        let mapping = CompanyMapping::parse("Acme Corp\t11222333000144");
        let entries = vec![entry("lote/11222333000144.pdf", report_text("x", "y").as_bytes())];

        process_reports(entries, &mapping, &PlainTextExtractor, Some(dir.path()));

        assert!(dir.path().join("lote_11222333000144.txt").exists());
        assert!(dir.path().join("lote_11222333000144_annotated.txt").exists());
    }
}
