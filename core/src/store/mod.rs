// core/src/store/mod.rs

//! Persistence seams.
//!
//! Every component operation takes its store explicitly. The HTTP layer holds one
//! `Arc<dyn Store>`; tests hand the same operations a `memory::MemoryStore`, which
//! is compiled only with the `test-util` feature.

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::{CatalogFilter, CatalogQuery, CategoryCount, CourseListing, KitListing, PageRequest};
use crate::dashboard::{EnrollmentStats, StatusTotal};
use crate::error::CoreResult;
use crate::models::{
  Course, CourseModule, Enrollment, EnrollmentStatus, EnrollmentWithCourse, Kit, NewUser, Order, OrderStatus,
  OrderWithKit, ReviewSubject, ReviewWithAuthor, User,
};
use crate::pricing::NewOrder;

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Partial profile edit. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub bio: Option<String>,
  pub phone: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
  /// `email` must already be normalized.
  async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>>;
  async fn find_user(&self, id: Uuid) -> CoreResult<Option<User>>;
  /// Fails with `CoreError::Conflict` when the email is taken.
  async fn insert_user(&self, user: NewUser) -> CoreResult<User>;
  async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> CoreResult<()>;
  async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> CoreResult<Option<User>>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
  /// One page of active kits matching the query.
  async fn find_kits(&self, query: &CatalogQuery) -> CoreResult<Vec<KitListing>>;
  async fn count_kits(&self, filter: &CatalogFilter) -> CoreResult<i64>;
  async fn kit_categories(&self) -> CoreResult<Vec<CategoryCount>>;
  async fn find_active_kit(&self, id: Uuid) -> CoreResult<Option<KitListing>>;
  /// Regardless of the soft-delete flag.
  async fn find_kit(&self, id: Uuid) -> CoreResult<Option<Kit>>;
  /// Returns false when no active kit had that id.
  async fn deactivate_kit(&self, id: Uuid) -> CoreResult<bool>;

  async fn find_courses(&self, query: &CatalogQuery) -> CoreResult<Vec<CourseListing>>;
  async fn count_courses(&self, filter: &CatalogFilter) -> CoreResult<i64>;
  async fn course_categories(&self) -> CoreResult<Vec<CategoryCount>>;
  async fn find_active_course(&self, id: Uuid) -> CoreResult<Option<CourseListing>>;
  /// Regardless of the soft-delete flag.
  async fn find_course(&self, id: Uuid) -> CoreResult<Option<Course>>;
  async fn deactivate_course(&self, id: Uuid) -> CoreResult<bool>;
  /// Ascending by `order_index`.
  async fn course_modules(&self, course_id: Uuid) -> CoreResult<Vec<CourseModule>>;

  /// Newest first.
  async fn recent_reviews(&self, subject: ReviewSubject, limit: i64) -> CoreResult<Vec<ReviewWithAuthor>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  async fn insert_order(&self, order: NewOrder) -> CoreResult<Order>;
  /// Newest first, scoped to `user_id`.
  async fn find_orders(
    &self,
    user_id: Uuid,
    status: Option<OrderStatus>,
    page: PageRequest,
  ) -> CoreResult<Vec<OrderWithKit>>;
  async fn count_orders(&self, user_id: Uuid, status: Option<OrderStatus>) -> CoreResult<i64>;
  /// Matches on `(order_id, user_id)` together.
  async fn find_order(&self, user_id: Uuid, order_id: Uuid) -> CoreResult<Option<OrderWithKit>>;
  /// Never touches the money columns. `tracking_number: None` keeps the current one.
  async fn update_order_status(
    &self,
    order_id: Uuid,
    status: OrderStatus,
    tracking_number: Option<String>,
  ) -> CoreResult<Option<Order>>;
  async fn order_totals_by_status(&self, user_id: Uuid) -> CoreResult<Vec<StatusTotal>>;
}

#[async_trait]
pub trait EnrollmentStore: Send + Sync {
  /// Creates the (user, course) row or flips an existing one back to `active`.
  async fn upsert_enrollment(&self, user_id: Uuid, course_id: Uuid) -> CoreResult<Enrollment>;
  /// Newest first. `limit: None` returns everything.
  async fn find_enrollments(&self, user_id: Uuid, limit: Option<i64>) -> CoreResult<Vec<EnrollmentWithCourse>>;
  async fn find_enrollment(&self, user_id: Uuid, course_id: Uuid) -> CoreResult<Option<EnrollmentWithCourse>>;
  /// `status: None` keeps the current status.
  async fn update_progress(
    &self,
    user_id: Uuid,
    course_id: Uuid,
    progress: i16,
    status: Option<EnrollmentStatus>,
  ) -> CoreResult<Option<Enrollment>>;
  async fn enrollment_stats(&self, user_id: Uuid) -> CoreResult<EnrollmentStats>;
}

/// Everything the HTTP surface needs from persistence.
pub trait Store: UserStore + CatalogStore + OrderStore + EnrollmentStore {}

impl<T> Store for T where T: UserStore + CatalogStore + OrderStore + EnrollmentStore {}
