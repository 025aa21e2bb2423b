// server/src/web/handlers/mod.rs

pub mod auth_handlers;
pub mod course_handlers;
pub mod enrollment_handlers;
pub mod health_handlers;
pub mod kit_handlers;
pub mod order_handlers;
pub mod user_handlers;
