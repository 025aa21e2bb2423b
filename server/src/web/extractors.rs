// server/src/web/extractors.rs

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use qsat_core::CoreError;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The caller's user id, taken from a verified `Authorization: Bearer` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

impl AuthenticatedUser {
  pub fn id(&self) -> Uuid {
    self.0
  }
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req))
  }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| CoreError::Internal("Application state is not registered".to_string()))?;

  let token = bearer_token(req).ok_or_else(|| CoreError::Auth("Missing authorization token".to_string()))?;
  let claims = state.tokens.verify(token)?;
  tracing::debug!(user_id = %claims.user_id, "Request authenticated.");
  Ok(AuthenticatedUser(claims.user_id))
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
  req
    .headers()
    .get(AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|t| !t.is_empty())
}
