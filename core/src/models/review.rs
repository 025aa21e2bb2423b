// core/src/models/review.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// What a review is about. Exactly one target, never both and never neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewSubject {
  Kit(Uuid),
  Course(Uuid),
}

#[derive(Debug, Clone)]
pub struct Review {
  pub id: Uuid,
  pub user_id: Uuid,
  pub subject: ReviewSubject,
  /// 1..=5
  pub rating: i16,
  pub comment: Option<String>,
  pub is_verified: bool,
  pub created_at: DateTime<Utc>,
}

/// A review joined with the reviewer's display fields, as shown on detail pages.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewWithAuthor {
  pub id: Uuid,
  pub rating: i16,
  pub comment: Option<String>,
  pub created_at: DateTime<Utc>,
  pub first_name: String,
  pub last_name: String,
  pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
  pub name: String,
  pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
  pub id: Uuid,
  pub rating: i16,
  pub comment: Option<String>,
  pub created_at: DateTime<Utc>,
  pub user: ReviewAuthor,
}

impl From<ReviewWithAuthor> for ReviewView {
  fn from(r: ReviewWithAuthor) -> Self {
    Self {
      id: r.id,
      rating: r.rating,
      comment: r.comment,
      created_at: r.created_at,
      user: ReviewAuthor {
        name: format!("{} {}", r.first_name, r.last_name),
        avatar_url: r.avatar_url,
      },
    }
  }
}
