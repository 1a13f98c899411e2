//! Upload route - multipart image upload handling.

use axum::extract::State;
use axum::response::Redirect;
use axum_extra::extract::Multipart;
use bytes::Bytes;
use imgbook_core::{extension_for_mime, validate_extension};
use std::sync::Arc;
use tracing::info;

use crate::helpers::{CoreResultExt, ResultExt, RouteResult};
use crate::state::{AppState, IMAGE_FILES_KEY};
use tower_sessions::Session;

struct PendingFile {
    field_name: String,
    ext: &'static str,
    data: Bytes,
}

/// Upload images - redirects to the landing page (POST-Redirect-GET).
///
/// Validation is all-or-nothing and runs ahead of storage: every part under
/// the `images` field must carry a `.png` or `.jpg` original filename
/// (case-sensitive) and an image MIME type that maps to a stored extension,
/// or the whole request fails with 400 before anything is written. A
/// malformed multipart body fails the same way. Accepted files replace the
/// session's image list wholesale; files from a previous list stay on disk.
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut multipart: Multipart,
) -> RouteResult<Redirect> {
    // Phase 1: drain and validate every part before touching the store
    let mut pending = Vec::new();
    while let Some(field) = multipart.next_field().await.or_bad_request()? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "images" {
            continue;
        }

        let original = field.file_name().unwrap_or("").to_string();
        validate_extension(&original).or_error_response()?;

        // Browsers always send a part content type; fall back to guessing
        // from the (already validated) filename when one is missing
        let mime = field.content_type().map_or_else(
            || {
                mime_guess::from_path(&original)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            },
            str::to_string,
        );
        let ext = extension_for_mime(&mime).or_error_response()?;

        let data = field.bytes().await.or_bad_request()?;
        pending.push(PendingFile {
            field_name,
            ext,
            data,
        });
    }

    // Phase 2: persist, then replace the session list in receive order
    let mut stored = Vec::with_capacity(pending.len());
    for file in pending {
        let name = state
            .images
            .save(&file.field_name, file.ext, &file.data)
            .await
            .or_error_response()?;
        stored.push(name);
    }

    info!("Stored {} uploaded images", stored.len());

    session
        .insert(IMAGE_FILES_KEY, &stored)
        .await
        .or_internal_error()?;

    Ok(Redirect::to("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use imgbook_core::AppConfig;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    const BOUNDARY: &str = "test-boundary";

    fn app(tmp: &tempfile::TempDir) -> Router {
        let config = AppConfig {
            image_dir: tmp.path().join("images"),
            pdf_dir: tmp.path().join("pdf"),
            ..AppConfig::default()
        };
        let state = Arc::new(AppState::new(&config).unwrap());
        Router::new()
            .route("/upload", post(upload_images))
            .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
            .with_state(state)
    }

    fn part(filename: &str, content_type: &str, data: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{data}\r\n"
        )
    }

    fn upload_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn image_count(tmp: &tempfile::TempDir) -> usize {
        std::fs::read_dir(tmp.path().join("images")).unwrap().count()
    }

    #[tokio::test]
    async fn test_valid_upload_stores_and_redirects() {
        let tmp = tempfile::tempdir().unwrap();
        let body = format!(
            "{}{}--{BOUNDARY}--\r\n",
            part("a.png", "image/png", "first"),
            part("b.jpg", "image/jpeg", "second"),
        );

        let response = app(&tmp).oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(image_count(&tmp), 2);
    }

    #[tokio::test]
    async fn test_bad_mime_in_later_part_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        // First part is fine; the second has an allowed filename but a
        // non-image content type. Nothing may hit the disk.
        let body = format!(
            "{}{}--{BOUNDARY}--\r\n",
            part("a.png", "image/png", "first"),
            part("b.png", "image/gif", "second"),
        );

        let response = app(&tmp).oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(image_count(&tmp), 0);
    }

    #[tokio::test]
    async fn test_bad_extension_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let body = format!(
            "{}{}--{BOUNDARY}--\r\n",
            part("a.png", "image/png", "first"),
            part("b.gif", "image/gif", "second"),
        );

        let response = app(&tmp).oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(image_count(&tmp), 0);
    }

    #[tokio::test]
    async fn test_truncated_body_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        // One complete part, then the stream dies mid-headers. The request
        // must fail instead of quietly persisting the partial set.
        let body = format!(
            "{}--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"im",
            part("a.png", "image/png", "first"),
        );

        let response = app(&tmp).oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(image_count(&tmp), 0);
    }
}
