// src/archive/writer.rs
use crate::utils::error::ArchiveError;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Folder for reports matched to a company, renamed to `{company}.pdf`.
pub const RENAMED_DIR: &str = "renomeados";
/// Folder for reports left for manual review, original filename kept.
pub const REVIEW_DIR: &str = "nao_encontrados";

/// Layout of the reorganized output archive.
///
/// Entry paths are unique: adding a path that already exists replaces its bytes.
#[derive(Debug, Default)]
pub struct OrganizedArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl OrganizedArchive {
    pub fn add_renamed(&mut self, company: &str, bytes: Vec<u8>) {
        self.insert(format!("{}/{}.pdf", RENAMED_DIR, company), bytes);
    }

    pub fn add_for_review(&mut self, original_name: &str, bytes: Vec<u8>) {
        self.insert(format!("{}/{}", REVIEW_DIR, original_name), bytes);
    }

    fn insert(&mut self, path: String, bytes: Vec<u8>) {
        if self.entries.contains_key(&path) {
            tracing::warn!("Archive path '{}' already written; keeping the latest report", path);
        }
        self.entries.insert(path, bytes);
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Serializes the layout into ZIP bytes.
    pub fn to_zip_bytes(&self) -> Result<Vec<u8>, ArchiveError> {
        let mut zip_writer = ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (path, data) in &self.entries {
            zip_writer.start_file(path.as_str(), opts)?;
            zip_writer.write_all(data)?;
        }

        let cursor = zip_writer.finish()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
impl OrganizedArchive {
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }
}
