use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::{routes::structs::ErrorResponse, schema::ValidationError, store::StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Registro no encontrado")]
    NotFound,
    #[error("No autorizado: {0}")]
    Unauthorized(&'static str),
    #[error("Cuerpo de solicitud inválido: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label) = match &self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Registro no encontrado"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "No autorizado"),
            ApiError::InvalidBody(_) | ApiError::Validation(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Datos inválidos")
            }
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Error del servidor"),
        };

        if let ApiError::Store(err) = &self {
            error!(error = %err, "Fallo al acceder a la base de documentos");
        }

        let message = match self {
            ApiError::NotFound => None,
            other => Some(other.to_string()),
        };

        (
            status,
            Json(ErrorResponse {
                error: label.to_string(),
                message,
            }),
        )
            .into_response()
    }
}
