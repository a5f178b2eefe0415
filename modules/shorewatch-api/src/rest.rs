use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use shorewatch_harvester::store::FEATURE_COLLECTION_KEY;

use crate::AppState;

/// Serve the cached GeoJSON verbatim. GET only — anything else is forbidden.
/// 404 until a harvest has ever succeeded.
pub async fn serve_feature_collection(
    method: Method,
    State(state): State<Arc<AppState>>,
) -> Response {
    if method != Method::GET {
        return StatusCode::FORBIDDEN.into_response();
    }

    match state.store.get(FEATURE_COLLECTION_KEY).await {
        Ok(Some(payload)) => {
            ([(header::CONTENT_TYPE, "application/json")], payload).into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to load feature collection");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
