// server/src/web/routes.rs

use actix_web::{web, HttpRequest};

use crate::errors::AppError;
use crate::web::handlers::{
  auth_handlers, course_handlers, enrollment_handlers, health_handlers, kit_handlers, order_handlers, user_handlers,
};

/// Undecodable bodies, query strings and path segments all become 400 envelopes.
fn configure_extractors(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
      AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
      AppError::BadRequest(format!("Invalid query parameters: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
      AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
    }));
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  configure_extractors(cfg);

  cfg
    .route("/", web::get().to(health_handlers::index_handler))
    .route("/health", web::get().to(health_handlers::health_check_handler))
    .service(
      web::scope("/api")
        .route("/health", web::get().to(health_handlers::health_check_handler))
        .service(
          web::scope("/auth")
            .route("/register", web::post().to(auth_handlers::register_handler))
            .route("/login", web::post().to(auth_handlers::login_handler))
            .route("/profile", web::get().to(auth_handlers::profile_handler)),
        )
        .service(
          web::scope("/kits")
            .route("", web::get().to(kit_handlers::list_kits_handler))
            .route("/meta/categories", web::get().to(kit_handlers::kit_categories_handler))
            .route("/{kit_id}", web::get().to(kit_handlers::get_kit_handler))
            .route("/{kit_id}", web::delete().to(kit_handlers::delete_kit_handler)),
        )
        .service(
          web::scope("/courses")
            .route("", web::get().to(course_handlers::list_courses_handler))
            .route("/meta/categories", web::get().to(course_handlers::course_categories_handler))
            .route("/{course_id}", web::get().to(course_handlers::get_course_handler))
            .route("/{course_id}", web::delete().to(course_handlers::delete_course_handler)),
        )
        .service(
          web::scope("/orders")
            .route("", web::post().to(order_handlers::create_order_handler))
            .route("", web::get().to(order_handlers::list_orders_handler))
            .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
            .route("/{order_id}/status", web::patch().to(order_handlers::update_order_status_handler)),
        )
        .service(
          web::scope("/enrollments")
            .route("", web::post().to(enrollment_handlers::enroll_handler))
            // Before `/{course_id}`, which would also match "me".
            .route("/me", web::get().to(enrollment_handlers::my_enrollments_handler))
            .route("/{course_id}", web::get().to(enrollment_handlers::get_enrollment_handler))
            .route(
              "/{course_id}/progress",
              web::patch().to(enrollment_handlers::update_progress_handler),
            ),
        )
        .service(
          web::scope("/users")
            .route("/dashboard", web::get().to(user_handlers::dashboard_handler))
            .route("/profile", web::put().to(user_handlers::update_profile_handler)),
        ),
    );
}

/// Shared with `main` and the integration tests so both serve the same unmatched-route body.
pub fn not_found_service() -> actix_web::Route {
  web::to(health_handlers::route_not_found_handler)
}
