// core/src/enrollments.rs

//! Linking users to courses.

use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{CoreError, CoreResult};
use crate::models::{Enrollment, EnrollmentStatus, EnrollmentWithCourse};
use crate::store::{CatalogStore, EnrollmentStore};

/// Progress value that closes out an enrollment.
pub const COMPLETE_PROGRESS: i16 = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
  pub course_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
  #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
  pub progress: i16,
}

/// Idempotent: a second call for the same course leaves a single `active` row.
///
/// # Arguments
/// * `user_id`: The authenticated learner.
/// * `req`: The course to join; it must be active.
///
/// # Returns
/// The enrollment row. Joining again returns the same row, set back to `active`.
#[instrument(name = "enrollments::enroll", skip(store), fields(course_id = %req.course_id))]
pub async fn enroll<S>(store: &S, user_id: Uuid, req: EnrollRequest) -> CoreResult<Enrollment>
where
  S: CatalogStore + EnrollmentStore + ?Sized,
{
  let course = store
    .find_course(req.course_id)
    .await?
    .filter(|c| c.is_active)
    .ok_or_else(|| CoreError::NotFound("Course not found".to_string()))?;

  let enrollment = store.upsert_enrollment(user_id, course.id).await?;
  info!(enrollment_id = %enrollment.id, "User enrolled.");
  Ok(enrollment)
}

pub async fn my_enrollments<S>(store: &S, user_id: Uuid) -> CoreResult<Vec<EnrollmentWithCourse>>
where
  S: EnrollmentStore + ?Sized,
{
  store.find_enrollments(user_id, None).await
}

pub async fn get_enrollment<S>(store: &S, user_id: Uuid, course_id: Uuid) -> CoreResult<EnrollmentWithCourse>
where
  S: EnrollmentStore + ?Sized,
{
  store
    .find_enrollment(user_id, course_id)
    .await?
    .ok_or_else(|| CoreError::NotFound("Enrollment not found".to_string()))
}

#[instrument(name = "enrollments::update_progress", skip(store, req), fields(progress = req.progress))]
pub async fn update_progress<S>(
  store: &S,
  user_id: Uuid,
  course_id: Uuid,
  req: UpdateProgressRequest,
) -> CoreResult<Enrollment>
where
  S: EnrollmentStore + ?Sized,
{
  req.validate()?;
  let status = (req.progress == COMPLETE_PROGRESS).then_some(EnrollmentStatus::Completed);

  let enrollment = store
    .update_progress(user_id, course_id, req.progress, status)
    .await?
    .ok_or_else(|| CoreError::NotFound("Enrollment not found".to_string()))?;

  if enrollment.status == EnrollmentStatus::Completed {
    info!(enrollment_id = %enrollment.id, "Course completed.");
  }
  Ok(enrollment)
}
