use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::web::AppState;

/// Shared-secret gate: every API route requires `?key=...` matching the
/// configured value. Runs before any parameter validation.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .uri()
        .query()
        .and_then(|query| query.split('&').find_map(|pair| pair.strip_prefix("key=")));

    match provided {
        Some(key) if !key.is_empty() && key == state.config.api_key => next.run(request).await,
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "message": "Invalid API key",
                "error_code": "INVALID_API_KEY",
            })),
        )
            .into_response(),
    }
}
