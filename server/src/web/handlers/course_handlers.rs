// server/src/web/handlers/course_handlers.rs

use actix_web::{web, HttpResponse};
use qsat_core::catalog::{self, CatalogParams, CatalogQuery};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::response;

#[instrument(name = "handler::list_courses", skip(app_state))]
pub async fn list_courses_handler(
  app_state: web::Data<AppState>,
  params: web::Query<CatalogParams>,
) -> Result<HttpResponse, AppError> {
  let query = CatalogQuery::from_params(params.into_inner())?;
  let page = catalog::list_courses(app_state.store.as_ref(), &query).await?;

  Ok(response::ok(json!({
      "courses": page.items,
      "pagination": page.pagination,
  })))
}

#[instrument(name = "handler::course_categories", skip(app_state))]
pub async fn course_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = catalog::course_categories(app_state.store.as_ref()).await?;
  Ok(response::ok(json!({ "categories": categories })))
}

#[instrument(name = "handler::get_course", skip(app_state), fields(course_id = %course_id))]
pub async fn get_course_handler(
  app_state: web::Data<AppState>,
  course_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let view = catalog::get_course(app_state.store.as_ref(), course_id.into_inner()).await?;
  Ok(response::ok(view))
}

#[instrument(name = "handler::delete_course", skip(app_state), fields(course_id = %course_id, user_id = %auth_user.id()))]
pub async fn delete_course_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  course_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let course_id = course_id.into_inner();
  catalog::deactivate_course(app_state.store.as_ref(), auth_user.id(), course_id).await?;
  info!("Course deactivated.");

  Ok(response::ok_with_message(
    "Course deactivated successfully",
    json!({ "id": course_id }),
  ))
}
