//! Landing route - static page or gallery depending on session state.

use axum::response::{IntoResponse, Response};
use tower_sessions::Session;

use crate::helpers::{ResultExt, RouteResult};
use crate::state::IMAGE_FILES_KEY;
use crate::templates::{GalleryTemplate, IndexTemplate};

/// Landing page.
///
/// An absent `imagefiles` key means "no session yet" and serves the static
/// upload page; a present key (even an empty list) renders the gallery.
pub async fn index(session: Session) -> RouteResult<Response> {
    let images: Option<Vec<String>> = session
        .get(IMAGE_FILES_KEY)
        .await
        .or_internal_error()?;

    match images {
        None => Ok(IndexTemplate.into_response()),
        Some(images) => Ok(GalleryTemplate { images }.into_response()),
    }
}
