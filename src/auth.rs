use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::{routes::error::ApiError, state::AppState};

/// Guards writes when an admin token is configured. Reads stay public.
pub async fn require_token(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if is_read_only(req.method()) || !state.requires_token() {
        return next.run(req).await;
    }

    let Some(token) = extract_token(req.headers()) else {
        return ApiError::Unauthorized("Falta encabezado Authorization o X-Api-Key").into_response();
    };

    if state.is_token_valid(&token) {
        debug!(method = %req.method(), path = %req.uri().path(), "Token válido recibido");
        next.run(req).await
    } else {
        warn!(method = %req.method(), path = %req.uri().path(), "Intento de escritura con token inválido");
        ApiError::Unauthorized("Token inválido").into_response()
    }
}

fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let non_empty = |value: &str| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| non_empty(raw.strip_prefix("Bearer ").unwrap_or(raw)))
        .or_else(|| {
            headers
                .get("x-api-key")
                .and_then(|value| value.to_str().ok())
                .and_then(non_empty)
        })
}
