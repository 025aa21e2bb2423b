// server/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpResponse};
use qsat_core::dashboard;
use qsat_core::identity::{self, ProfileUpdateRequest};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::response;

#[instrument(name = "handler::dashboard", skip(app_state, auth_user), fields(user_id = %auth_user.id()))]
pub async fn dashboard_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let view = dashboard::dashboard(app_state.store.as_ref(), auth_user.id()).await?;
  Ok(response::ok(view))
}

#[instrument(name = "handler::update_profile", skip(app_state, auth_user, req_payload), fields(user_id = %auth_user.id()))]
pub async fn update_profile_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<ProfileUpdateRequest>,
) -> Result<HttpResponse, AppError> {
  let user = identity::update_profile(app_state.store.as_ref(), auth_user.id(), req_payload.into_inner()).await?;
  info!("Profile updated.");

  Ok(response::ok_with_message(
    "Profile updated successfully",
    json!({ "user": user }),
  ))
}
