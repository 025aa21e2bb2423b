// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use qsat_core::{CoreError, FieldError};
use serde::Serialize;
use thiserror::Error;

/// Message returned in place of internal failure details outside debug builds.
const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Core(#[from] CoreError),

  /// Body, query string or path segment that could not be decoded.
  #[error("{0}")]
  BadRequest(String),

  #[error("Configuration Error: {0}")]
  Config(String),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Serialize)]
struct ErrorBody<'a> {
  success: bool,
  message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  errors: Option<&'a [FieldError]>,
}

impl AppError {
  fn public_message(&self) -> String {
    if self.status_code().is_server_error() && !cfg!(debug_assertions) {
      INTERNAL_MESSAGE.to_string()
    } else {
      self.to_string()
    }
  }

  fn field_errors(&self) -> Option<&[FieldError]> {
    match self {
      AppError::Core(CoreError::Validation { errors, .. }) if !errors.is_empty() => Some(errors),
      _ => None,
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Core(core) => match core {
        CoreError::Validation { .. } => StatusCode::BAD_REQUEST,
        CoreError::Auth(_) => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        // Duplicate email has always been reported as a plain bad request.
        CoreError::Conflict(_) => StatusCode::BAD_REQUEST,
        CoreError::Unavailable(_) => StatusCode::BAD_REQUEST,
        CoreError::Store { .. } | CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::info!(status = status.as_u16(), application_error = %self, "Responding with client error");
    }

    HttpResponse::build(status).json(ErrorBody {
      success: false,
      message: self.public_message(),
      errors: self.field_errors(),
    })
  }
}
