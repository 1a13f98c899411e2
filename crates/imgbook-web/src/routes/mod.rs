//! HTTP route handlers for the imgbook web application.
//!
//! The surface is four routes plus static file serving: the landing page
//! (`GET /`), image upload (`POST /upload`), PDF export (`POST /pdf` with
//! `GET /pdf/{name}` retrieval), and session reset (`GET /new`).

mod export;
mod pages;
mod reset;
mod upload;

pub use export::{download_pdf, export_pdf};
pub use pages::index;
pub use reset::reset;
pub use upload::upload_images;
