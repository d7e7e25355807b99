//! HTTP-facing error type. Every handler failure ends up here and is
//! rendered as `{ "error": ... }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{models::announcement::ValidationError, services::announcements::StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The body could not be decoded at all.
    #[error("Cuerpo de la solicitud inválido: {0}")]
    Body(String),

    #[error("Anuncio no encontrado")]
    NotFound,

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        source: StoreError,
        expose: bool,
    },
}

impl AppError {
    /// Classify a store failure. `context` is the generic message the caller
    /// always sees; the driver text is appended only when `expose` is set.
    pub fn store(context: &'static str, source: StoreError, expose: bool) -> Self {
        match source {
            StoreError::NotFound(_) => AppError::NotFound,
            source => AppError::Store {
                context,
                source,
                expose,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Body(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Store {
                context,
                expose: false,
                ..
            } => context.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}: {}", status, self);
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_closed() -> StoreError {
        StoreError::Database(sqlx::Error::PoolClosed)
    }

    #[test]
    fn test_not_found_is_404_regardless_of_context() {
        let err = AppError::store("Error al eliminar el anuncio", StoreError::NotFound(9), true);
        assert!(matches!(err, AppError::NotFound));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Anuncio no encontrado");
    }

    #[test]
    fn test_store_error_exposes_driver_text() {
        let err = AppError::store("Error al crear anuncio", pool_closed(), true);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.public_message(),
            format!("Error al crear anuncio: {}", sqlx::Error::PoolClosed)
        );
    }

    #[test]
    fn test_store_error_hides_driver_text() {
        let err = AppError::store("Error al crear anuncio", pool_closed(), false);
        assert_eq!(err.public_message(), "Error al crear anuncio");
        // The log line still carries the detail.
        assert!(err.to_string().starts_with("Error al crear anuncio: "));
    }

    #[test]
    fn test_validation_messages() {
        let err = AppError::from(ValidationError::MissingId);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "ID es requerido");
    }
}
