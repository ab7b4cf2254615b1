// src/archive/reader.rs
use crate::archive::PdfEntry;
use crate::utils::error::ArchiveError;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Reads every `.pdf` entry (case-insensitive) of an in-memory ZIP, in archive order.
pub fn read_pdf_entries(zip_bytes: &[u8]) -> Result<Vec<PdfEntry>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(zip_bytes))?;
    tracing::debug!("Archive opened with {} entries", archive.len());

    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();

        if file.is_dir() || !name.to_lowercase().ends_with(".pdf") {
            tracing::trace!("Skipping archive entry '{}'", name);
            continue;
        }

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        tracing::debug!("Read '{}' ({} bytes)", name, bytes.len());

        entries.push(PdfEntry { filename: name, bytes });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default();
        for (name, data) in files {
            writer.start_file(*name, opts).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_reads_only_pdf_entries_in_order() {
        let zip_bytes = build_zip(&[
            ("b_11222333000144.pdf", b"first"),
            ("notes.txt", b"ignored"),
            ("lote/A_55666777000188.PDF", b"second"),
            ("fake.pdf.bak", b"ignored"),
        ]);

        let entries = read_pdf_entries(&zip_bytes).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["b_11222333000144.pdf", "lote/A_55666777000188.PDF"]);
        assert_eq!(entries[1].bytes, b"second");
    }

    #[test]
    fn test_inflated_declared_size_does_not_drive_allocation() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file("11222333000144.pdf", opts).unwrap();
        writer.write_all(b"report").unwrap();
        let mut zip_bytes = writer.finish().unwrap().into_inner();

        // Central directory header: uncompressed size lives at offset 24
        let cd = zip_bytes.windows(4).position(|w| w == b"PK\x01\x02").unwrap();
        zip_bytes[cd + 24..cd + 28].copy_from_slice(&0x7FFF_FFF0u32.to_le_bytes());

        match read_pdf_entries(&zip_bytes) {
            Ok(entries) => assert_eq!(entries[0].bytes, b"report"),
            Err(e) => assert!(!e.to_string().is_empty()),
        }
    }

    #[test]
    fn test_corrupt_archive_is_an_error() {
        assert!(read_pdf_entries(b"not a zip").is_err());
    }
}
