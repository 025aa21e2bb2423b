// server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use qsat_core::identity::{self, LoginRequest, RegisterRequest};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::response;

#[instrument(
    name = "handler::register",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
  let session = identity::register(app_state.store.as_ref(), &app_state.tokens, req_payload.into_inner()).await?;
  info!(user_id = %session.user.id, "Registration successful.");

  Ok(response::created(
    "User registered successfully",
    json!({ "user": session.user, "token": session.token }),
  ))
}

#[instrument(
    name = "handler::login",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
  let session = identity::login(app_state.store.as_ref(), &app_state.tokens, req_payload.into_inner()).await?;

  Ok(response::ok_with_message(
    "Login successful",
    json!({ "user": session.user, "token": session.token }),
  ))
}

#[instrument(name = "handler::profile", skip(app_state), fields(user_id = %auth_user.id()))]
pub async fn profile_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = identity::profile(app_state.store.as_ref(), auth_user.id()).await?;
  Ok(response::ok(json!({ "user": user })))
}
