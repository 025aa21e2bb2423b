// server/src/state.rs
use crate::config::AppConfig;
use qsat_core::{Store, TokenIssuer};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  /// Postgres in production, the in-process store in tests.
  pub store: Arc<dyn Store>,
  pub tokens: Arc<TokenIssuer>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
    let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.jwt_expires_in);
    Self {
      store,
      tokens: Arc::new(tokens),
      config: Arc::new(config),
    }
  }
}
