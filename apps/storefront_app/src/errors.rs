// apps/storefront_app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use orderflow::LifecycleError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Lifecycle(#[from] LifecycleError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Malformed request body: {0}")]
  MalformedBody(#[from] serde_json::Error),
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Lifecycle(err) => match err {
        LifecycleError::NotFound(_) => StatusCode::NOT_FOUND,
        LifecycleError::InvalidInput(_) | LifecycleError::AlreadyTerminal { .. } => StatusCode::BAD_REQUEST,
        LifecycleError::Conflict(_) => StatusCode::CONFLICT,
        LifecycleError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        LifecycleError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = ?self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Rejecting request");
    }

    let body = match self {
      AppError::Lifecycle(LifecycleError::StoreUnavailable(_)) => json!({"error": "Storage is unavailable"}),
      AppError::Lifecycle(LifecycleError::Pipeline(e)) => {
        json!({"error": "Order processing error", "detail": e.to_string()})
      }
      AppError::Lifecycle(LifecycleError::NotFound(m)) => json!({"error": m}),
      AppError::Lifecycle(e) => json!({"error": e.to_string()}),
      AppError::Sqlx(_) | AppError::Migrate(_) => json!({"error": "Database operation failed"}),
      AppError::Config(m) => json!({"error": "Configuration issue", "detail": m}),
      AppError::MalformedBody(e) => json!({"error": "Malformed request body", "detail": e.to_string()}),
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
