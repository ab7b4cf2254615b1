// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to load PDF: {0}")]
    PdfLoad(String),

    #[error("Failed to extract text from page {page}: {message}")]
    PageText { page: u32, message: String },
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError), // Automatically convert zip errors

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("CSV error: {0}")]
    Csv(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF content encoding failed: {0}")]
    Content(String),

    #[error("PDF serialization failed: {0}")]
    Save(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Archive handling failed: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Report rendering failed: {0}")]
    Render(#[from] RenderError),
}
