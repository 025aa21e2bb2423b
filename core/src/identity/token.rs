// core/src/identity/token.rs

//! HS256 bearer tokens carrying only the user id.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

pub const DEFAULT_TOKEN_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  #[serde(rename = "userId")]
  pub user_id: Uuid,
  pub iat: i64,
  pub exp: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
  encoding: EncodingKey,
  decoding: DecodingKey,
  validation: Validation,
  lifetime: Duration,
}

impl fmt::Debug for TokenIssuer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TokenIssuer")
      .field("secret", &"[REDACTED]")
      .field("lifetime", &self.lifetime)
      .finish()
  }
}

impl TokenIssuer {
  pub fn new(secret: &[u8], lifetime: Duration) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation,
      lifetime,
    }
  }

  pub fn lifetime(&self) -> Duration {
    self.lifetime
  }

  /// Signs a token for `user_id` that expires `lifetime` from now.
  ///
  /// # Errors
  ///
  /// `CoreError::Internal` when the expiry is not representable or signing fails.
  pub fn issue(&self, user_id: Uuid) -> CoreResult<String> {
    let now = Utc::now();
    let expires_at = now
      .checked_add_signed(self.lifetime)
      .ok_or_else(|| CoreError::Internal("Token lifetime is out of range".to_string()))?;
    let claims = Claims {
      user_id,
      iat: now.timestamp(),
      exp: expires_at.timestamp(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(|e| CoreError::Internal(format!("Failed to sign token: {}", e)))
  }

  /// Signature and expiry both checked. Every failure reads the same to the caller.
  pub fn verify(&self, token: &str) -> CoreResult<Claims> {
    decode::<Claims>(token, &self.decoding, &self.validation)
      .map(|data| data.claims)
      .map_err(|e| {
        debug!(error = %e, "Bearer token rejected.");
        CoreError::Auth("Invalid or expired token".to_string())
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn issuer(lifetime: Duration) -> TokenIssuer {
    TokenIssuer::new(b"test-secret-that-is-long-enough", lifetime)
  }

  #[test]
  fn issued_token_verifies_to_the_same_user() {
    let tokens = issuer(Duration::days(7));
    let user_id = Uuid::new_v4();
    let claims = tokens.verify(&tokens.issue(user_id).unwrap()).unwrap();
    assert_eq!(claims.user_id, user_id);
    assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
  }

  #[test]
  fn expired_token_is_rejected() {
    let tokens = issuer(Duration::hours(-1));
    let token = tokens.issue(Uuid::new_v4()).unwrap();
    assert!(matches!(tokens.verify(&token), Err(CoreError::Auth(_))));
  }

  #[test]
  fn token_from_another_secret_is_rejected() {
    let ours = issuer(Duration::days(1));
    let theirs = TokenIssuer::new(b"some-other-secret-entirely-here", Duration::days(1));
    let token = theirs.issue(Uuid::new_v4()).unwrap();
    assert!(matches!(ours.verify(&token), Err(CoreError::Auth(_))));
  }

  #[test]
  fn unrepresentable_expiry_is_an_error() {
    let tokens = issuer(Duration::days(100_000_000));
    assert!(matches!(tokens.issue(Uuid::new_v4()), Err(CoreError::Internal(_))));
  }

  #[test]
  fn garbage_is_rejected() {
    assert!(matches!(issuer(Duration::days(1)).verify("not.a.jwt"), Err(CoreError::Auth(_))));
  }

  #[test]
  fn debug_output_hides_the_secret() {
    let rendered = format!("{:?}", issuer(Duration::days(1)));
    assert!(rendered.contains("REDACTED"));
    assert!(!rendered.contains("test-secret"));
  }
}
