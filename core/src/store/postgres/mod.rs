// core/src/store/postgres/mod.rs

//! PostgreSQL store. Runtime-checked queries only, so the crate builds without a live database.

mod catalog;
mod enrollments;
mod orders;
pub mod seed;
mod users;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::error::{CoreError, CoreResult};

pub use seed::seed_demo_data;

const MAX_CONNECTIONS: u32 = 10;

#[derive(Clone, Debug)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub async fn connect(database_url: &str) -> CoreResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(MAX_CONNECTIONS)
      .connect(database_url)
      .await
      .map_err(db_err("connect to database"))?;
    info!("Successfully connected to the database.");
    Ok(Self { pool })
  }

  pub fn from_pool(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  /// Applies the embedded migrations under `core/migrations`.
  pub async fn migrate(&self) -> CoreResult<()> {
    sqlx::migrate!("./migrations")
      .run(&self.pool)
      .await
      .map_err(|e| CoreError::store(anyhow::Error::new(e).context("run migrations")))?;
    info!("Database migrations applied.");
    Ok(())
  }
}

/// Wraps a driver error with the operation that produced it.
pub(crate) fn db_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> CoreError {
  move |e| CoreError::store(anyhow::Error::new(e).context(operation))
}

/// `%`, `_` and `\` match literally inside an ILIKE pattern.
pub(crate) fn like_pattern(search: &str) -> String {
  let mut escaped = String::with_capacity(search.len() + 2);
  escaped.push('%');
  for ch in search.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(ch);
  }
  escaped.push('%');
  escaped
}
