// server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use qsat_core::orders::{self, CreateOrderRequest, ListOrdersParams, UpdateOrderStatusRequest};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::response;

#[instrument(
    name = "handler::create_order",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.id(), kit_id = %req_payload.kit_id, quantity = req_payload.quantity)
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let receipt = orders::create_order(app_state.store.as_ref(), auth_user.id(), req_payload.into_inner()).await?;
  info!(order_id = %receipt.id, "Order placed.");

  Ok(response::created("Order created successfully", json!({ "order": receipt })))
}

#[instrument(name = "handler::list_orders", skip(app_state, auth_user), fields(user_id = %auth_user.id()))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  params: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
  let page = orders::list_orders(app_state.store.as_ref(), auth_user.id(), params.into_inner()).await?;

  Ok(response::ok(json!({
      "orders": page.items,
      "pagination": page.pagination,
  })))
}

#[instrument(name = "handler::get_order", skip(app_state, auth_user), fields(user_id = %auth_user.id(), order_id = %order_id))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  order_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order = orders::get_order(app_state.store.as_ref(), auth_user.id(), order_id.into_inner()).await?;
  Ok(response::ok(json!({ "order": order })))
}

#[instrument(
    name = "handler::update_order_status",
    skip(app_state, auth_user, req_payload),
    fields(user_id = %auth_user.id(), order_id = %order_id)
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  order_id: web::Path<Uuid>,
  req_payload: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
  let order = orders::update_order_status(
    app_state.store.as_ref(),
    auth_user.id(),
    order_id.into_inner(),
    req_payload.into_inner(),
  )
  .await?;

  Ok(response::ok_with_message(
    "Order status updated successfully",
    json!({ "order": order }),
  ))
}
