// src/archive/mod.rs
pub mod reader;
pub mod writer;

pub use reader::read_pdf_entries;
#[allow(unused_imports)]
pub use writer::{OrganizedArchive, RENAMED_DIR, REVIEW_DIR};

/// One PDF entry read from the input archive.
#[derive(Debug, Clone)]
pub struct PdfEntry {
    pub filename: String,
    pub bytes: Vec<u8>,
}
