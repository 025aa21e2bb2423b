// core/src/models/enrollment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

use super::kit::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "enrollment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
  Active,
  Completed,
  Dropped,
}

/// At most one row per (user_id, course_id).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
  pub id: Uuid,
  pub user_id: Uuid,
  pub course_id: Uuid,
  pub status: EnrollmentStatus,
  /// 0..=100
  pub progress: i16,
  pub enrolled_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// The course summary attached to an enrollment listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
  pub id: Uuid,
  pub title: String,
  pub slug: String,
  pub image_cover_url: Option<String>,
  pub level: Difficulty,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWithCourse {
  #[serde(flatten)]
  pub enrollment: Enrollment,
  pub course: EnrolledCourse,
}
