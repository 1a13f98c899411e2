//! Export routes - PDF assembly and retrieval.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::helpers::{CoreResultExt, ResultExt, RouteResult};
use crate::state::AppState;

/// Assemble a PDF from the posted filename list, one A4 page per image in
/// list order.
///
/// Responds with the web path of the generated file as plain text; the
/// caller retrieves the bytes with a follow-up `GET /pdf/{name}`. An empty
/// list is not an error and produces a zero-page document. A listed file
/// that no longer exists fails the whole export with 500.
pub async fn export_pdf(
    State(state): State<Arc<AppState>>,
    Json(names): Json<Vec<String>>,
) -> RouteResult<String> {
    let name = imgbook_core::export_pdf(&state.images, &state.pdfs, &names)
        .await
        .or_error_response()?;

    info!("Exported {} from {} images", name, names.len());
    Ok(format!("/pdf/{name}"))
}

/// Serve a generated PDF by name.
///
/// Names are server-generated, so anything with path components is simply
/// not found.
pub async fn download_pdf(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> RouteResult<Response> {
    if name.contains(['/', '\\']) {
        return Err((StatusCode::NOT_FOUND, "PDF not found".to_string()));
    }

    let data = tokio::fs::read(state.pdfs.dir().join(&name))
        .await
        .map_err(|_| (StatusCode::NOT_FOUND, "PDF not found".to_string()))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .body(Body::from(data))
        .or_internal_error()
}
