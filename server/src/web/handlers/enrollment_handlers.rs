// server/src/web/handlers/enrollment_handlers.rs

use actix_web::{web, HttpResponse};
use qsat_core::enrollments::{self, EnrollRequest, UpdateProgressRequest};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::response;

#[instrument(
    name = "handler::enroll",
    skip(app_state, auth_user, req_payload),
    fields(user_id = %auth_user.id(), course_id = %req_payload.course_id)
)]
pub async fn enroll_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<EnrollRequest>,
) -> Result<HttpResponse, AppError> {
  let enrollment = enrollments::enroll(app_state.store.as_ref(), auth_user.id(), req_payload.into_inner()).await?;
  Ok(response::created("Enrolled successfully", json!({ "enrollment": enrollment })))
}

#[instrument(name = "handler::my_enrollments", skip(app_state, auth_user), fields(user_id = %auth_user.id()))]
pub async fn my_enrollments_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let items = enrollments::my_enrollments(app_state.store.as_ref(), auth_user.id()).await?;
  Ok(response::ok(json!({ "enrollments": items })))
}

#[instrument(name = "handler::get_enrollment", skip(app_state, auth_user), fields(user_id = %auth_user.id(), course_id = %course_id))]
pub async fn get_enrollment_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  course_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let enrollment = enrollments::get_enrollment(app_state.store.as_ref(), auth_user.id(), course_id.into_inner()).await?;
  Ok(response::ok(json!({ "enrollment": enrollment })))
}

#[instrument(
    name = "handler::update_progress",
    skip(app_state, auth_user, req_payload),
    fields(user_id = %auth_user.id(), course_id = %course_id, progress = req_payload.progress)
)]
pub async fn update_progress_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  course_id: web::Path<Uuid>,
  req_payload: web::Json<UpdateProgressRequest>,
) -> Result<HttpResponse, AppError> {
  let enrollment = enrollments::update_progress(
    app_state.store.as_ref(),
    auth_user.id(),
    course_id.into_inner(),
    req_payload.into_inner(),
  )
  .await?;

  Ok(response::ok_with_message(
    "Progress updated successfully",
    json!({ "enrollment": enrollment }),
  ))
}
