use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{errors::AppError, state::AppState};

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Reject any request whose `X-API-Key` header is absent or differs from the
/// configured key. Layered over every `/api` route and the `/api` fallback,
/// so unknown paths and methods are rejected the same way.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided != Some(state.config.api_key.as_str()) {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            key_present = provided.is_some(),
            "Rejected request with invalid API key"
        );
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
