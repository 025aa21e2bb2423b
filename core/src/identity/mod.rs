// core/src/identity/mod.rs

//! Registration, login, profile reads/edits and the role gate.

pub mod access;
pub mod password;
pub mod token;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{CoreError, CoreResult};
use crate::models::{NewUser, UserProfile};
use crate::store::{ProfileChanges, UserStore};

pub use access::require_role;
pub use password::validate_password_strength;
pub use token::{Claims, TokenIssuer};

/// Shared by unknown-email and wrong-password failures so neither leaks which factor was wrong.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
  #[validate(length(min = 2, max = 50, message = "First name must be 2-50 characters"))]
  pub first_name: String,
  #[validate(length(min = 2, max = 50, message = "Last name must be 2-50 characters"))]
  pub last_name: String,
  #[validate(email(message = "A valid email is required"))]
  pub email: String,
  #[validate(custom(function = "validate_password_strength"))]
  pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  #[validate(email(message = "A valid email is required"))]
  pub email: String,
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
  #[validate(length(min = 2, max = 50, message = "First name must be 2-50 characters"))]
  pub first_name: Option<String>,
  #[validate(length(min = 2, max = 50, message = "Last name must be 2-50 characters"))]
  pub last_name: Option<String>,
  #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
  pub bio: Option<String>,
  #[validate(custom(function = "validate_phone"))]
  pub phone: Option<String>,
}

/// `+` optional, then 1-16 digits with no leading zero.
pub fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
  let digits = phone.strip_prefix('+').unwrap_or(phone);
  let valid = !digits.is_empty()
    && digits.len() <= 16
    && digits.chars().all(|c| c.is_ascii_digit())
    && !digits.starts_with('0');
  if valid {
    Ok(())
  } else {
    let mut err = validator::ValidationError::new("phone");
    err.message = Some("Phone must be digits with an optional leading +".into());
    Err(err)
  }
}

/// A user plus a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
  pub user: UserProfile,
  pub token: String,
}

pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

/// # Arguments
/// * `store`: Where the account is persisted.
/// * `tokens`: Signs the session token returned on success.
/// * `req`: Names, email and plain-text password as submitted.
///
/// # Returns
/// The new user's profile and a bearer token, or `CoreError::Validation` for bad
/// fields and `CoreError::Conflict` when the email is already registered.
#[instrument(name = "identity::register", skip(store, tokens, req), fields(email = %req.email))]
pub async fn register<S>(store: &S, tokens: &TokenIssuer, req: RegisterRequest) -> CoreResult<AuthSession>
where
  S: UserStore + ?Sized,
{
  req.validate()?;
  let email = normalize_email(&req.email);

  if store.find_user_by_email(&email).await?.is_some() {
    warn!("Attempt to register with existing email.");
    return Err(CoreError::Conflict("User with this email already exists".to_string()));
  }

  let password_hash = password::hash_password(req.password).await?;
  let user = store
    .insert_user(NewUser {
      first_name: req.first_name,
      last_name: req.last_name,
      email,
      password_hash,
    })
    .await?;

  let token = tokens.issue(user.id)?;
  info!(user_id = %user.id, "User registered.");
  Ok(AuthSession {
    user: user.into(),
    token,
  })
}

/// # Arguments
/// * `store`: Looks up the account by normalized email.
/// * `tokens`: Signs the session token returned on success.
/// * `req`: Email and plain-text password as submitted.
///
/// # Returns
/// The profile (with `last_login` set to now) and a bearer token. An unknown email
/// and a wrong password both yield the same `CoreError::Auth`.
#[instrument(name = "identity::login", skip(store, tokens, req), fields(email = %req.email))]
pub async fn login<S>(store: &S, tokens: &TokenIssuer, req: LoginRequest) -> CoreResult<AuthSession>
where
  S: UserStore + ?Sized,
{
  req.validate()?;
  let email = normalize_email(&req.email);

  let Some(mut user) = store.find_user_by_email(&email).await? else {
    warn!("Login attempt for unknown email.");
    return Err(CoreError::Auth(INVALID_CREDENTIALS.to_string()));
  };

  if !password::verify_password(user.password_hash.clone(), req.password).await? {
    warn!(user_id = %user.id, "Login attempt with wrong password.");
    return Err(CoreError::Auth(INVALID_CREDENTIALS.to_string()));
  }

  let now = Utc::now();
  store.record_login(user.id, now).await?;
  user.last_login = Some(now);

  let token = tokens.issue(user.id)?;
  info!(user_id = %user.id, "Login successful.");
  Ok(AuthSession {
    user: user.into(),
    token,
  })
}

#[instrument(name = "identity::profile", skip(store))]
pub async fn profile<S>(store: &S, user_id: Uuid) -> CoreResult<UserProfile>
where
  S: UserStore + ?Sized,
{
  store
    .find_user(user_id)
    .await?
    .map(UserProfile::from)
    .ok_or_else(|| CoreError::NotFound("User not found".to_string()))
}

#[instrument(name = "identity::update_profile", skip(store, req))]
pub async fn update_profile<S>(store: &S, user_id: Uuid, req: ProfileUpdateRequest) -> CoreResult<UserProfile>
where
  S: UserStore + ?Sized,
{
  req.validate()?;
  let changes = ProfileChanges {
    first_name: req.first_name,
    last_name: req.last_name,
    bio: req.bio,
    phone: req.phone,
  };
  store
    .update_profile(user_id, &changes)
    .await?
    .map(UserProfile::from)
    .ok_or_else(|| CoreError::NotFound("User not found".to_string()))
}
