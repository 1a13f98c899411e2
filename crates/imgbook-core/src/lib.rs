//! imgbook Core Library
//!
//! Core functionality for the image-to-PDF workflow:
//! - Image Store and PDF Store filesystem layers
//! - Upload filename/MIME validation
//! - PDF assembly from raster images (one A4 page per image)
//! - Configuration loading

pub mod config;
pub mod error;
pub mod pdf;
pub mod store;
pub mod util;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use pdf::{build_pdf, PdfBuilder};
pub use store::{
    extension_for_mime, validate_extension, DeleteReport, ImageStore, PdfStore,
    ALLOWED_EXTENSIONS,
};

use tracing::info;

/// Assemble a PDF from the named images and write it into the PDF store.
///
/// Returns the generated filename (`pdf-{unixMillis}.pdf`). An empty name
/// list produces a zero-page document; that is not an error.
pub async fn export_pdf(
    images: &ImageStore,
    pdfs: &PdfStore,
    names: &[String],
) -> Result<String> {
    let bytes = pdf::build_pdf(images, names).await?;
    let name = pdfs.write(&bytes).await?;
    info!("Exported {} ({} pages)", name, names.len());
    Ok(name)
}
