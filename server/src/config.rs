// server/src/config.rs

use crate::errors::{AppError, Result};
use chrono::Duration;
use dotenvy::dotenv;
use std::{env, fmt};

/// Shortest accepted `JWT_SECRET`, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 16;

/// Longest accepted `JWT_EXPIRES_IN`, in days.
pub const MAX_JWT_LIFETIME_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub jwt_secret: String,
  pub jwt_expires_in: Duration,
  pub cors_origins: Vec<String>,
  pub app_env: String,
  pub seed_db: bool,
  pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &"[REDACTED]")
      .field("jwt_secret", &"[REDACTED]")
      .field("jwt_expires_in", &self.jwt_expires_in)
      .field("cors_origins", &self.cors_origins)
      .field("app_env", &self.app_env)
      .field("seed_db", &self.seed_db)
      .field("log_format", &self.log_format)
      .finish()
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any key lookup; `from_env` passes the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let server_port = get_env("PORT")
      .unwrap_or_else(|_| "4000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let jwt_secret = get_env("JWT_SECRET")?;
    if jwt_secret.len() < MIN_JWT_SECRET_LEN {
      return Err(AppError::Config(format!(
        "JWT_SECRET must be at least {} bytes",
        MIN_JWT_SECRET_LEN
      )));
    }
    let jwt_expires_in = match get_env("JWT_EXPIRES_IN") {
      Ok(raw) => parse_lifetime(&raw)
        .ok_or_else(|| AppError::Config(format!("Invalid JWT_EXPIRES_IN value: '{}'", raw)))?,
      Err(_) => Duration::days(7),
    };
    if jwt_expires_in > Duration::days(MAX_JWT_LIFETIME_DAYS) {
      return Err(AppError::Config(format!(
        "JWT_EXPIRES_IN must not exceed {} days",
        MAX_JWT_LIFETIME_DAYS
      )));
    }

    let cors_origins = get_env("CORS_ORIGIN")
      .map(|raw| split_origins(&raw))
      .unwrap_or_else(|_| vec!["http://localhost:3000".to_string()]);
    let app_env = get_env("APP_ENV").unwrap_or_else(|_| "development".to_string());

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;
    let log_format = match get_env("LOG_FORMAT").as_deref() {
      Ok("json") => LogFormat::Json,
      Ok("pretty") | Err(_) => LogFormat::Pretty,
      Ok(other) => return Err(AppError::Config(format!("Invalid LOG_FORMAT value: '{}'", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      database_url,
      jwt_secret,
      jwt_expires_in,
      cors_origins,
      app_env,
      seed_db,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

/// Accepts `<n>s`, `<n>m`, `<n>h`, `<n>d` or a bare number of seconds.
///
/// Returns `None` for zero, unknown units, and values too large for a `Duration`.
pub fn parse_lifetime(raw: &str) -> Option<Duration> {
  let raw = raw.trim();
  let (digits, unit) = match raw.char_indices().last()? {
    (idx, c) if c.is_ascii_alphabetic() => (&raw[..idx], Some(c)),
    _ => (raw, None),
  };
  let n: i64 = digits.parse().ok().filter(|n| *n > 0)?;
  match unit {
    None | Some('s') => Duration::try_seconds(n),
    Some('m') => Duration::try_minutes(n),
    Some('h') => Duration::try_hours(n),
    Some('d') => Duration::try_days(n),
    Some(_) => None,
  }
}

fn split_origins(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|o| !o.is_empty())
    .map(String::from)
    .collect()
}
