// core/src/error.rs
use anyhow::Error as AnyhowError;
use serde::Serialize;
use thiserror::Error;

/// One failing input field, reported back to the client as `{path, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub path: String,
  pub message: String,
}

impl FieldError {
  pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      message: message.into(),
    }
  }
}

#[derive(Debug, Error)]
pub enum CoreError {
  #[error("{message}")]
  Validation { message: String, errors: Vec<FieldError> },

  /// Missing, malformed or expired credential, or a failed login.
  #[error("{0}")]
  Auth(String),

  /// Authenticated, but the caller's role does not grant the capability.
  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  /// A unique key is already taken (e.g. an email address).
  #[error("{0}")]
  Conflict(String),

  /// The referenced record exists but cannot be used (e.g. an inactive kit).
  #[error("{0}")]
  Unavailable(String),

  #[error("Store operation failed: {source:#}")]
  Store {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal error: {0}")]
  Internal(String),
}

impl CoreError {
  /// A validation failure on a single field.
  pub fn invalid_field(path: impl Into<String>, message: impl Into<String>) -> Self {
    let error = FieldError::new(path, message);
    CoreError::Validation {
      message: "Validation error".to_string(),
      errors: vec![error],
    }
  }

  pub fn store(source: impl Into<AnyhowError>) -> Self {
    CoreError::Store { source: source.into() }
  }
}

impl From<validator::ValidationErrors> for CoreError {
  fn from(errs: validator::ValidationErrors) -> Self {
    let mut errors = Vec::new();
    collect_field_errors("", &errs, &mut errors);
    errors.sort_by(|a, b| a.path.cmp(&b.path));
    CoreError::Validation {
      message: "Validation error".to_string(),
      errors,
    }
  }
}

fn collect_field_errors(prefix: &str, errs: &validator::ValidationErrors, out: &mut Vec<FieldError>) {
  use validator::ValidationErrorsKind;

  for (field, kind) in errs.errors() {
    let field = camel_case(field);
    let path = if prefix.is_empty() {
      field
    } else {
      format!("{}.{}", prefix, field)
    };
    match kind {
      ValidationErrorsKind::Field(field_errors) => {
        for e in field_errors {
          let message = e
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid value ({})", e.code));
          out.push(FieldError::new(path.clone(), message));
        }
      }
      ValidationErrorsKind::Struct(nested) => collect_field_errors(&path, nested, out),
      ValidationErrorsKind::List(items) => {
        for (idx, nested) in items {
          collect_field_errors(&format!("{}.{}", path, idx), nested, out);
        }
      }
    }
  }
}

/// Request payloads are camelCase on the wire, so error paths are too.
fn camel_case(field: &str) -> String {
  let mut out = String::with_capacity(field.len());
  let mut upper_next = false;
  for ch in field.chars() {
    if ch == '_' {
      upper_next = true;
    } else if upper_next {
      out.extend(ch.to_uppercase());
      upper_next = false;
    } else {
      out.push(ch);
    }
  }
  out
}

impl From<sqlx::Error> for CoreError {
  fn from(err: sqlx::Error) -> Self {
    CoreError::Store { source: err.into() }
  }
}

pub type CoreResult<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn field_paths_are_camel_cased() {
    assert_eq!(camel_case("zip_code"), "zipCode");
    assert_eq!(camel_case("email"), "email");
    assert_eq!(camel_case("shipping_address"), "shippingAddress");
  }
}
