// server/src/web/handlers/kit_handlers.rs

use actix_web::{web, HttpResponse};
use qsat_core::catalog::{self, CatalogParams, CatalogQuery};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::response;

#[instrument(name = "handler::list_kits", skip(app_state))]
pub async fn list_kits_handler(
  app_state: web::Data<AppState>,
  params: web::Query<CatalogParams>,
) -> Result<HttpResponse, AppError> {
  let query = CatalogQuery::from_params(params.into_inner())?;
  let page = catalog::list_kits(app_state.store.as_ref(), &query).await?;

  Ok(response::ok(json!({
      "kits": page.items,
      "pagination": page.pagination,
  })))
}

#[instrument(name = "handler::kit_categories", skip(app_state))]
pub async fn kit_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = catalog::kit_categories(app_state.store.as_ref()).await?;
  Ok(response::ok(json!({ "categories": categories })))
}

#[instrument(name = "handler::get_kit", skip(app_state), fields(kit_id = %kit_id))]
pub async fn get_kit_handler(
  app_state: web::Data<AppState>,
  kit_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let view = catalog::get_kit(app_state.store.as_ref(), kit_id.into_inner()).await?;
  Ok(response::ok(view))
}

#[instrument(name = "handler::delete_kit", skip(app_state), fields(kit_id = %kit_id, user_id = %auth_user.id()))]
pub async fn delete_kit_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  kit_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let kit_id = kit_id.into_inner();
  catalog::deactivate_kit(app_state.store.as_ref(), auth_user.id(), kit_id).await?;
  info!("Kit deactivated.");

  Ok(response::ok_with_message("Kit deactivated successfully", json!({ "id": kit_id })))
}
