// server/src/lib.rs

//! HTTP surface of the QSAT platform: configuration, error envelopes, the bearer
//! extractor and the actix-web routes over `qsat_core`.

pub mod config;
pub mod errors;
pub mod state;
pub mod telemetry;
pub mod web;

pub use crate::config::AppConfig;
pub use crate::errors::AppError;
pub use crate::state::AppState;
