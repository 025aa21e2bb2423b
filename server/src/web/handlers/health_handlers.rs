// server/src/web/handlers/health_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use qsat_core::CoreError;
use serde_json::json;

use crate::errors::AppError;
use crate::state::AppState;

const ENDPOINTS: [&str; 8] = [
  "/api/health",
  "/api/kits",
  "/api/courses",
  "/api/orders",
  "/api/enrollments",
  "/api/users",
  "/api/auth/register",
  "/api/auth/login",
];

pub async fn index_handler(app_state: web::Data<AppState>) -> HttpResponse {
  HttpResponse::Ok().json(json!({
      "ok": true,
      "name": "QSAT LMS API",
      "version": env!("CARGO_PKG_VERSION"),
      "env": app_state.config.app_env,
      "endpoints": ENDPOINTS,
  }))
}

pub async fn health_check_handler(app_state: web::Data<AppState>) -> HttpResponse {
  HttpResponse::Ok().json(json!({ "ok": true, "env": app_state.config.app_env }))
}

/// Fallback for every unmatched route.
pub async fn route_not_found_handler(req: HttpRequest) -> Result<HttpResponse, AppError> {
  Err(CoreError::NotFound(format!("Route not found: {} {}", req.method(), req.uri())).into())
}
