// core/src/store/postgres/enrollments.rs

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::{db_err, PgStore};
use crate::dashboard::EnrollmentStats;
use crate::error::CoreResult;
use crate::models::{Difficulty, EnrolledCourse, Enrollment, EnrollmentStatus, EnrollmentWithCourse};
use crate::store::EnrollmentStore;

const ENROLLMENT_WITH_COURSE: &str = "SELECT e.*, c.name AS course_title, c.slug AS course_slug, \
   c.image_url AS course_image_url, c.difficulty AS course_level \
   FROM enrollments e JOIN courses c ON c.id = e.course_id";

#[derive(FromRow)]
struct EnrollmentRow {
  #[sqlx(flatten)]
  enrollment: Enrollment,
  course_title: String,
  course_slug: String,
  course_image_url: Option<String>,
  course_level: Difficulty,
}

impl From<EnrollmentRow> for EnrollmentWithCourse {
  fn from(row: EnrollmentRow) -> Self {
    Self {
      course: EnrolledCourse {
        id: row.enrollment.course_id,
        title: row.course_title,
        slug: row.course_slug,
        image_cover_url: row.course_image_url,
        level: row.course_level,
      },
      enrollment: row.enrollment,
    }
  }
}

#[async_trait]
impl EnrollmentStore for PgStore {
  async fn upsert_enrollment(&self, user_id: Uuid, course_id: Uuid) -> CoreResult<Enrollment> {
    sqlx::query_as::<_, Enrollment>(
      "INSERT INTO enrollments (id, user_id, course_id, status) VALUES ($1, $2, $3, $4) \
       ON CONFLICT (user_id, course_id) DO UPDATE SET status = EXCLUDED.status, updated_at = NOW() \
       RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(course_id)
    .bind(EnrollmentStatus::Active)
    .fetch_one(self.pool())
    .await
    .map_err(db_err("upsert enrollment"))
  }

  async fn find_enrollments(&self, user_id: Uuid, limit: Option<i64>) -> CoreResult<Vec<EnrollmentWithCourse>> {
    // LIMIT NULL is no limit.
    let sql = format!("{ENROLLMENT_WITH_COURSE} WHERE e.user_id = $1 ORDER BY e.enrolled_at DESC, e.id LIMIT $2");
    let rows = sqlx::query_as::<_, EnrollmentRow>(&sql)
      .bind(user_id)
      .bind(limit)
      .fetch_all(self.pool())
      .await
      .map_err(db_err("list enrollments"))?;
    Ok(rows.into_iter().map(EnrollmentWithCourse::from).collect())
  }

  async fn find_enrollment(&self, user_id: Uuid, course_id: Uuid) -> CoreResult<Option<EnrollmentWithCourse>> {
    let sql = format!("{ENROLLMENT_WITH_COURSE} WHERE e.user_id = $1 AND e.course_id = $2");
    let row = sqlx::query_as::<_, EnrollmentRow>(&sql)
      .bind(user_id)
      .bind(course_id)
      .fetch_optional(self.pool())
      .await
      .map_err(db_err("find enrollment"))?;
    Ok(row.map(EnrollmentWithCourse::from))
  }

  async fn update_progress(
    &self,
    user_id: Uuid,
    course_id: Uuid,
    progress: i16,
    status: Option<EnrollmentStatus>,
  ) -> CoreResult<Option<Enrollment>> {
    sqlx::query_as::<_, Enrollment>(
      "UPDATE enrollments SET progress = $3, status = COALESCE($4, status), updated_at = NOW() \
       WHERE user_id = $1 AND course_id = $2 RETURNING *",
    )
    .bind(user_id)
    .bind(course_id)
    .bind(progress)
    .bind(status)
    .fetch_optional(self.pool())
    .await
    .map_err(db_err("update enrollment progress"))
  }

  async fn enrollment_stats(&self, user_id: Uuid) -> CoreResult<EnrollmentStats> {
    sqlx::query_as::<_, EnrollmentStats>(
      "SELECT COUNT(*) AS total, \
         COUNT(*) FILTER (WHERE status = 'completed') AS completed, \
         COUNT(*) FILTER (WHERE status = 'active') AS active, \
         AVG(progress)::FLOAT8 AS avg_progress \
       FROM enrollments WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(self.pool())
    .await
    .map_err(db_err("aggregate enrollments"))
  }
}
