// server/tests/common/mod.rs
#![allow(dead_code)]

use qsat_core::models::{Difficulty, Kit, Role, User};
use qsat_core::{MemoryStore, Store};
use qsat_server::{AppConfig, AppState};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::Level;

pub const PASSWORD: &str = "Password123!";

/// A state over a fresh memory store; the store handle is returned for fixtures.
pub fn test_state() -> (AppState, Arc<MemoryStore>) {
  let config = AppConfig::from_lookup(|name| match name {
    "DATABASE_URL" => Some("postgres://unused".to_string()),
    "JWT_SECRET" => Some("api-test-secret-0123456789".to_string()),
    _ => None,
  })
  .expect("test config should load");
  let store = Arc::new(MemoryStore::new());
  let shared: Arc<dyn Store> = store.clone();
  (AppState::new(shared, config), store)
}

pub fn bearer(state: &AppState, user: &User) -> (&'static str, String) {
  let token = state.tokens.issue(user.id).expect("token should sign");
  ("Authorization", format!("Bearer {}", token))
}

pub fn admin(store: &MemoryStore) -> User {
  store.add_user("Root", "Admin", "admin@example.com", Role::Admin)
}

pub fn student(store: &MemoryStore, email: &str) -> User {
  store.add_user("Sam", "Student", email, Role::Student)
}

pub fn kit(store: &MemoryStore, name: &str, price: i64) -> Kit {
  store.add_kit(name, "Astronomy", Difficulty::Beginner, Decimal::from(price))
}

// --- Helper for Tracing Setup ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
