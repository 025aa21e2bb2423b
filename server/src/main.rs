// server/src/main.rs

use actix_cors::Cors;
use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use qsat_core::store::postgres::seed_demo_data;
use qsat_core::PgStore;
use qsat_server::config::AppConfig;
use qsat_server::state::AppState;
use qsat_server::{telemetry, web};
use std::sync::Arc;

fn cors(config: &AppConfig) -> Cors {
  config
    .cors_origins
    .iter()
    .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    .allow_any_method()
    .allow_any_header()
    .supports_credentials()
    .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  telemetry::init_tracing(app_config.log_format);
  tracing::info!(config = ?app_config, "Starting QSAT API server...");

  let store = PgStore::connect(&app_config.database_url)
    .await
    .context("Database connection error")?;
  store.migrate().await.context("Failed to run database migrations")?;
  tracing::info!("Database connected and migrations applied.");

  if app_config.seed_db {
    seed_demo_data(&store).await.context("Failed to seed database")?;
  }

  let server_address = app_config.bind_address();
  let app_state = AppState::new(Arc::new(store), app_config);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(cors(&app_state.config))
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
      .default_service(web::not_found_service())
  })
  .bind(&server_address)?
  .run()
  .await?;

  tracing::info!("Server stopped.");
  Ok(())
}
