// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset of these helpers

use chrono::Duration;
use qsat_core::identity::{self, AuthSession, RegisterRequest};
use qsat_core::models::{Difficulty, Kit, Role, ShippingAddress, User};
use qsat_core::{MemoryStore, TokenIssuer};
use rust_decimal::Decimal;
use tracing::Level;

pub const PASSWORD: &str = "Password123!";

// --- Fixtures ---
pub fn dec(value: i64) -> Decimal {
  Decimal::from(value)
}

pub fn tokens() -> TokenIssuer {
  TokenIssuer::new(b"integration-test-secret-0123456789", Duration::days(7))
}

pub fn address() -> ShippingAddress {
  ShippingAddress {
    street: "123 Street".into(),
    city: "Bengaluru".into(),
    state: "KA".into(),
    zip_code: "560001".into(),
    country: "IN".into(),
  }
}

pub fn register_request(email: &str) -> RegisterRequest {
  RegisterRequest {
    first_name: "Ada".into(),
    last_name: "Lovelace".into(),
    email: email.into(),
    password: PASSWORD.into(),
  }
}

/// Registers through the real identity flow, so the user can log in afterwards.
pub async fn register(store: &MemoryStore, email: &str) -> AuthSession {
  identity::register(store, &tokens(), register_request(email))
    .await
    .expect("registration should succeed")
}

pub fn admin(store: &MemoryStore) -> User {
  store.add_user("Root", "Admin", "admin@example.com", Role::Admin)
}

pub fn student(store: &MemoryStore, email: &str) -> User {
  store.add_user("Sam", "Student", email, Role::Student)
}

pub fn kit(store: &MemoryStore, name: &str, price: i64) -> Kit {
  store.add_kit(name, "Astronomy", Difficulty::Beginner, dec(price))
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
