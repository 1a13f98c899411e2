//! PDF assembly: one A4 page per uploaded image.

pub mod builder;
pub mod embed;

pub use builder::{build_pdf, PdfBuilder, A4_HEIGHT, A4_WIDTH, MAX_IMAGE_WIDTH, PAGE_MARGIN};
pub use embed::DecodedImage;
