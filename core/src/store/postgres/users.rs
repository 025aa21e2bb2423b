// core/src/store/postgres/users.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{db_err, PgStore};
use crate::error::{CoreError, CoreResult};
use crate::models::{NewUser, User};
use crate::store::{ProfileChanges, UserStore};

#[async_trait]
impl UserStore for PgStore {
  async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
      .bind(email)
      .fetch_optional(self.pool())
      .await
      .map_err(db_err("find user by email"))
  }

  async fn find_user(&self, id: Uuid) -> CoreResult<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
      .bind(id)
      .fetch_optional(self.pool())
      .await
      .map_err(db_err("find user"))
  }

  async fn insert_user(&self, user: NewUser) -> CoreResult<User> {
    let result = sqlx::query_as::<_, User>(
      "INSERT INTO users (id, first_name, last_name, email, password_hash) \
       VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .fetch_one(self.pool())
    .await;

    match result {
      Ok(user) => Ok(user),
      // Two registrations racing past the pre-check.
      Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
        Err(CoreError::Conflict("User with this email already exists".to_string()))
      }
      Err(e) => Err(db_err("insert user")(e)),
    }
  }

  async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> CoreResult<()> {
    sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
      .bind(id)
      .bind(at)
      .execute(self.pool())
      .await
      .map_err(db_err("record login"))?;
    Ok(())
  }

  async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> CoreResult<Option<User>> {
    sqlx::query_as::<_, User>(
      "UPDATE users SET \
         first_name = COALESCE($2, first_name), \
         last_name = COALESCE($3, last_name), \
         bio = COALESCE($4, bio), \
         phone = COALESCE($5, phone), \
         updated_at = NOW() \
       WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(changes.first_name.as_deref())
    .bind(changes.last_name.as_deref())
    .bind(changes.bio.as_deref())
    .bind(changes.phone.as_deref())
    .fetch_optional(self.pool())
    .await
    .map_err(db_err("update profile"))
  }
}
