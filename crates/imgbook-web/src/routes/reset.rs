//! Reset route - delete the session's images and clear its list.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::error;

use crate::helpers::{ResultExt, RouteResult};
use crate::state::{AppState, IMAGE_FILES_KEY};

/// Delete every file the session references, then clear the session.
///
/// Deletions are issued together and every outcome is tracked; any failure
/// yields a 500 with a fixed message and leaves the session list in place,
/// even though some files may already be gone (accepted inconsistency).
/// On success the key is removed entirely - absent, not empty - so the
/// landing page falls back to the static upload form. An absent or empty
/// list is a successful no-op, which makes a repeated reset harmless.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> RouteResult<Redirect> {
    let names: Vec<String> = session
        .get(IMAGE_FILES_KEY)
        .await
        .or_internal_error()?
        .unwrap_or_default();

    let report = state.images.delete_all(&names).await;
    if !report.is_ok() {
        error!(
            "Reset deleted {} of {} files, {} failed",
            report.deleted.len(),
            names.len(),
            report.failed.len()
        );
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error deleting files".to_string(),
        ));
    }

    let _removed: Option<Vec<String>> = session
        .remove(IMAGE_FILES_KEY)
        .await
        .or_internal_error()?;

    Ok(Redirect::to("/"))
}
