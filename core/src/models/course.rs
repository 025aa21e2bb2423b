// core/src/models/course.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::kit::Difficulty;

#[derive(Debug, Clone, FromRow)]
pub struct Course {
  pub id: Uuid,
  pub slug: String,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub category: String,
  pub difficulty: Difficulty,
  pub duration: Option<String>,
  pub modules: i32,
  pub image_url: Option<String>,
  pub is_premium: bool,
  pub what_you_learn: Vec<String>,
  pub requirements: Vec<String>,
  pub instructor_id: Option<Uuid>,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// One lesson of a course, ordered by `order_index`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CourseModule {
  pub id: Uuid,
  #[serde(skip_serializing)]
  pub course_id: Uuid,
  pub title: String,
  pub description: Option<String>,
  pub duration: Option<String>,
  pub video_url: Option<String>,
  pub order_index: i32,
  pub is_free: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct Instructor {
  pub id: Uuid,
  pub user_id: Uuid,
  pub first_name: String,
  pub last_name: String,
  pub bio: Option<String>,
  pub avatar_url: Option<String>,
  pub expertise: Vec<String>,
}
