// core/src/identity/password.rs

//! Password policy, plus argon2 hashing and verification.
//!
//! Hashing is deliberately slow, so the async entry points move the work onto
//! tokio's blocking pool instead of stalling the request thread.

use std::borrow::Cow;

use argon2::{
  password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use rand_core::OsRng;
use tracing::{debug, error, instrument};
use validator::ValidationError;

use crate::error::{CoreError, CoreResult};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

/// Returns every rule the password breaks, in a fixed order.
pub fn password_policy_failures(password: &str) -> Vec<&'static str> {
  let mut failures = Vec::new();
  if password.chars().count() < MIN_PASSWORD_LEN {
    failures.push("be at least 8 characters long");
  }
  if !password.chars().any(|c| c.is_ascii_lowercase()) {
    failures.push("contain a lowercase letter");
  }
  if !password.chars().any(|c| c.is_ascii_uppercase()) {
    failures.push("contain an uppercase letter");
  }
  if !password.chars().any(|c| c.is_ascii_digit()) {
    failures.push("contain a digit");
  }
  if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
    failures.push("contain a special character (!@#$%^&*)");
  }
  failures
}

/// `validator` hook for the registration payload.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
  let failures = password_policy_failures(password);
  if failures.is_empty() {
    return Ok(());
  }
  let mut err = ValidationError::new("password_policy");
  err.message = Some(Cow::Owned(format!("Password must {}", failures.join(", "))));
  Err(err)
}

#[instrument(name = "password::hash_blocking", skip(password), err(Display))]
pub fn hash_password_blocking(password: &str) -> CoreResult<String> {
  if password.is_empty() {
    return Err(CoreError::invalid_field("password", "Password cannot be empty"));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| {
      debug!("Password hashed successfully.");
      hash.to_string()
    })
    .map_err(|argon_err| {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      CoreError::Internal(format!("Password hashing process failed: {}", argon_err))
    })
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
#[instrument(name = "password::verify_blocking", skip_all, err(Display))]
pub fn verify_password_blocking(stored_hash: &str, candidate: &str) -> CoreResult<bool> {
  let parsed = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    CoreError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(other) => {
      error!(error = %other, "Argon2 password verification process encountered an error.");
      Err(CoreError::Internal(format!("Password verification process failed: {}", other)))
    }
  }
}

pub async fn hash_password(password: String) -> CoreResult<String> {
  tokio::task::spawn_blocking(move || hash_password_blocking(&password))
    .await
    .map_err(|join_err| CoreError::Internal(format!("Password hashing task failed: {}", join_err)))?
}

pub async fn verify_password(stored_hash: String, candidate: String) -> CoreResult<bool> {
  tokio::task::spawn_blocking(move || verify_password_blocking(&stored_hash, &candidate))
    .await
    .map_err(|join_err| CoreError::Internal(format!("Password verification task failed: {}", join_err)))?
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strong_password_passes() {
    assert!(password_policy_failures("Password123!").is_empty());
    assert!(validate_password_strength("Sup3r$ecret").is_ok());
  }

  #[test]
  fn every_failing_rule_is_reported() {
    assert_eq!(
      password_policy_failures("abc"),
      vec![
        "be at least 8 characters long",
        "contain an uppercase letter",
        "contain a digit",
        "contain a special character (!@#$%^&*)",
      ]
    );
    assert_eq!(password_policy_failures("PASSWORD123!"), vec!["contain a lowercase letter"]);
  }

  #[test]
  fn symbols_outside_the_allowed_set_do_not_count() {
    assert_eq!(
      password_policy_failures("Password123?"),
      vec!["contain a special character (!@#$%^&*)"]
    );
  }

  #[test]
  fn policy_message_names_the_rules() {
    let err = validate_password_strength("password").unwrap_err();
    let message = err.message.unwrap();
    assert!(message.contains("uppercase"));
    assert!(message.contains("digit"));
    assert!(!message.contains("lowercase"));
  }

  #[test]
  fn hash_then_verify() {
    let hash = hash_password_blocking("Password123!").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password_blocking(&hash, "Password123!").unwrap());
    assert!(!verify_password_blocking(&hash, "Password123?").unwrap());
  }

  #[test]
  fn corrupt_stored_hash_is_internal() {
    assert!(matches!(
      verify_password_blocking("not-a-hash", "whatever"),
      Err(CoreError::Internal(_))
    ));
  }
}
