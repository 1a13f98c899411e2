use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for imgbook-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Upload validation (extensions, MIME types)
/// - Store operations (saving, deleting, directory creation)
/// - PDF assembly (image decoding, page building, saving)
/// - Configuration loading
/// - General I/O operations
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Validation Errors
    // ==========================================================================
    /// Uploaded file has an extension outside the allow-list
    #[error("only png and jpg files are accepted (got '{0}')")]
    UnsupportedExtension(String),

    /// MIME type does not map to a storable image extension
    #[error("unsupported image MIME type: {0}")]
    UnsupportedMimeType(String),

    // ==========================================================================
    // Store Errors
    // ==========================================================================
    /// Failed to create a store directory
    #[error("failed to create store directory {dir}: {reason}")]
    StoreCreate { dir: PathBuf, reason: String },

    /// A filename referenced by the session no longer exists on disk
    #[error("stale reference: {0} does not exist in the image store")]
    StaleReference(String),

    /// One or more files in a batch deletion failed
    #[error("failed to delete {failed} of {total} files")]
    DeleteBatch { failed: usize, total: usize },

    // ==========================================================================
    // PDF Errors
    // ==========================================================================
    /// Failed to decode an image for embedding
    #[error("failed to decode image {name}: {reason}")]
    ImageDecode { name: String, reason: String },

    /// Failed to save the assembled PDF
    #[error("failed to save PDF: {0}")]
    PdfSave(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
