use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use pcs_core::{AdminIdentity, AppError};
use tower_sessions::Session;
use tracing::{debug, warn};

use crate::error::ApiResult;
use crate::state::AppState;

/// Session key under which the console's auth flow stores the operator identity.
pub const SESSION_ADMIN_KEY: &str = "admin_identity";

/// Resolves the signed-in operator and hands it to migration handlers.
pub async fn require_admin_session(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let Some(operator) = session
        .get::<AdminIdentity>(SESSION_ADMIN_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read admin session: {error}")))?
    else {
        debug!(path = %request.uri().path(), "migration request without admin session");
        return Err(AppError::Unauthorized("authentication required".to_owned()).into());
    };

    request.extensions_mut().insert(operator);
    Ok(next.run(request).await)
}

/// Rejects repair and recalculation calls that do not come from the console front end.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if !is_state_changing_method(request.method()) {
        return Ok(next.run(request).await);
    }

    if let Err(reason) = check_request_origin(request.headers(), state.frontend_url.as_str()) {
        warn!(
            path = %request.uri().path(),
            method = %request.method(),
            reason,
            "mutation rejected by origin check"
        );
        return Err(AppError::Unauthorized(reason.to_owned()).into());
    }

    Ok(next.run(request).await)
}

fn check_request_origin(headers: &HeaderMap, frontend_url: &str) -> Result<(), &'static str> {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    };

    if header_text(header::HeaderName::from_static("sec-fetch-site")) == "cross-site" {
        return Err("cross-site request blocked");
    }

    let origin = header_text(header::ORIGIN);
    let referer = header_text(header::REFERER);
    if origin == frontend_url || referer.starts_with(frontend_url) {
        return Ok(());
    }

    Err("origin validation failed")
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
