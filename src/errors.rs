use actix_web::{http::header, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  /// Browser-navigation requests get bounced to the login page instead of a
  /// bare 401. Carries the redirect target.
  #[error("Authentication required, redirecting to {0}")]
  LoginRedirect(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response; storage and
    // internal causes stay server-side only.
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"message": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"message": m})),
      AppError::LoginRedirect(target) => HttpResponse::SeeOther()
        .insert_header((header::LOCATION, target.as_str()))
        .finish(),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"message": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"message": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"message": "Database operation failed"})),
      AppError::Internal(_) => HttpResponse::InternalServerError().json(json!({"message": "Internal server error"})),
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
