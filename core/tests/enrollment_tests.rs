// tests/enrollment_tests.rs
mod common;
use common::*;
use qsat_core::dashboard;
use qsat_core::enrollments::{self, EnrollRequest, UpdateProgressRequest};
use qsat_core::models::{Difficulty, EnrollmentStatus, OrderStatus};
use qsat_core::orders::{self, CreateOrderRequest};
use qsat_core::{CoreError, MemoryStore};
use serial_test::serial;
use uuid::Uuid;

fn enroll_in(course_id: Uuid) -> EnrollRequest {
  EnrollRequest { course_id }
}

#[tokio::test]
#[serial]
async fn test_enrolling_twice_keeps_one_active_row() {
  setup_tracing();
  let store = MemoryStore::new();
  let user = student(&store, "sam@example.com");
  let course = store.add_course("Astronomy 101", "Astronomy", Difficulty::Beginner, dec(1999));

  let first = enrollments::enroll(&store, user.id, enroll_in(course.id)).await.unwrap();
  enrollments::update_progress(&store, user.id, course.id, UpdateProgressRequest { progress: 100 })
    .await
    .unwrap();
  let second = enrollments::enroll(&store, user.id, enroll_in(course.id)).await.unwrap();

  assert_eq!(first.id, second.id);
  assert_eq!(second.status, EnrollmentStatus::Active);

  let mine = enrollments::my_enrollments(&store, user.id).await.unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].course.title, "Astronomy 101");
  assert_eq!(mine[0].course.slug, "astronomy-101");
  assert_eq!(mine[0].course.level, Difficulty::Beginner);
}

#[tokio::test]
#[serial]
async fn test_missing_or_inactive_course_cannot_be_joined() {
  setup_tracing();
  let store = MemoryStore::new();
  let user = student(&store, "sam@example.com");
  let course = store.add_course("Retired", "Astronomy", Difficulty::Beginner, dec(1));
  store.update_course(course.id, |c| c.is_active = false);

  for course_id in [course.id, Uuid::new_v4()] {
    let err = enrollments::enroll(&store, user.id, enroll_in(course_id)).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
  }
  assert!(enrollments::my_enrollments(&store, user.id).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_progress_updates_and_completion() {
  setup_tracing();
  let store = MemoryStore::new();
  let user = student(&store, "sam@example.com");
  let course = store.add_course("Astronomy 101", "Astronomy", Difficulty::Beginner, dec(1999));

  let err = enrollments::update_progress(&store, user.id, course.id, UpdateProgressRequest { progress: 10 })
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::NotFound(_)));

  enrollments::enroll(&store, user.id, enroll_in(course.id)).await.unwrap();
  let partial = enrollments::update_progress(&store, user.id, course.id, UpdateProgressRequest { progress: 40 })
    .await
    .unwrap();
  assert_eq!(partial.progress, 40);
  assert_eq!(partial.status, EnrollmentStatus::Active);

  let done = enrollments::update_progress(&store, user.id, course.id, UpdateProgressRequest { progress: 100 })
    .await
    .unwrap();
  assert_eq!(done.status, EnrollmentStatus::Completed);

  let err = enrollments::update_progress(&store, user.id, course.id, UpdateProgressRequest { progress: 101 })
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Validation { .. }));

  let fetched = enrollments::get_enrollment(&store, user.id, course.id).await.unwrap();
  assert_eq!(fetched.enrollment.progress, 100);
  assert!(matches!(
    enrollments::get_enrollment(&store, user.id, Uuid::new_v4()).await,
    Err(CoreError::NotFound(_))
  ));
}

#[tokio::test]
#[serial]
async fn test_dashboard_aggregates_orders_and_enrollments() {
  setup_tracing();
  let store = MemoryStore::new();
  let user = student(&store, "sam@example.com");
  let other = student(&store, "other@example.com");

  let courses: Vec<_> = (0..3)
    .map(|i| store.add_course(&format!("Course {i}"), "Astronomy", Difficulty::Beginner, dec(10)))
    .collect();
  for course in &courses {
    enrollments::enroll(&store, user.id, enroll_in(course.id)).await.unwrap();
  }
  enrollments::update_progress(&store, user.id, courses[0].id, UpdateProgressRequest { progress: 100 })
    .await
    .unwrap();
  enrollments::update_progress(&store, user.id, courses[1].id, UpdateProgressRequest { progress: 50 })
    .await
    .unwrap();

  let item = kit(&store, "Telescope", 1500);
  let mut order_ids = Vec::new();
  for _ in 0..7 {
    let receipt = orders::create_order(
      &store,
      user.id,
      CreateOrderRequest {
        kit_id: item.id,
        quantity: 1,
        shipping_address: address(),
      },
    )
    .await
    .unwrap();
    order_ids.push(receipt.id);
  }
  store.set_order_status(order_ids[0], OrderStatus::Delivered);
  // Another user's order never leaks into the summary.
  orders::create_order(
    &store,
    other.id,
    CreateOrderRequest {
      kit_id: item.id,
      quantity: 1,
      shipping_address: address(),
    },
  )
  .await
  .unwrap();

  let view = dashboard::dashboard(&store, user.id).await.unwrap();
  let enrollments = &view.stats.enrollments;
  assert_eq!(enrollments.total, 3);
  assert_eq!(enrollments.completed, 1);
  assert_eq!(enrollments.active, 2);
  assert_eq!(enrollments.avg_progress, 50.0);

  let orders = &view.stats.orders;
  assert_eq!(orders.total, 7);
  assert_eq!(orders.delivered, 1);
  assert_eq!(orders.pending, 6);
  assert_eq!(orders.total_spent, dec(1920 * 7));

  assert_eq!(view.recent_activity.enrollments.len(), 3);
  assert_eq!(view.recent_activity.enrollments[0].course_name, "Course 2");
  assert_eq!(view.recent_activity.orders.len(), 5);
  assert_eq!(view.recent_activity.orders[0].kit_name, "Telescope");

  let json = serde_json::to_value(&view).unwrap();
  assert_eq!(json["stats"]["orders"]["totalSpent"], serde_json::json!(13440.0));
  assert!(json["recentActivity"]["orders"][0].get("kit_name").is_some());
}

#[tokio::test]
#[serial]
async fn test_dashboard_for_new_user_is_empty() {
  setup_tracing();
  let store = MemoryStore::new();
  let user = student(&store, "sam@example.com");

  let view = dashboard::dashboard(&store, user.id).await.unwrap();
  assert_eq!(view.stats.enrollments.total, 0);
  assert_eq!(view.stats.enrollments.avg_progress, 0.0);
  assert_eq!(view.stats.orders.total, 0);
  assert!(view.recent_activity.orders.is_empty());
}
