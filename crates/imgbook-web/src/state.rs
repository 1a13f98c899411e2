use imgbook_core::{AppConfig, ImageStore, PdfStore, Result};

/// Session key holding the ordered list of uploaded image filenames.
///
/// Two states matter: absent (no session yet, serve the static landing
/// page) and present (render the gallery). An empty list is still present.
pub const IMAGE_FILES_KEY: &str = "imagefiles";

/// Global application state: the two filesystem stores.
///
/// Per-client state lives in the cookie-backed session, not here; the only
/// thing requests share are the store directories.
pub struct AppState {
    pub images: ImageStore,
    pub pdfs: PdfStore,
}

impl AppState {
    /// Build state from configuration, creating the image directory up
    /// front. The PDF directory is created lazily at export time.
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            images: ImageStore::create(&config.image_dir)?,
            pdfs: PdfStore::new(&config.pdf_dir),
        })
    }
}
