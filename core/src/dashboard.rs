// core/src/dashboard.rs

//! Per-user summary of enrollments and orders. Read-only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use tracing::instrument;
use uuid::Uuid;

use crate::catalog::shape::round_to;
use crate::catalog::PageRequest;
use crate::error::CoreResult;
use crate::models::{EnrollmentWithCourse, OrderStatus, OrderWithKit};
use crate::store::{EnrollmentStore, OrderStore};

/// How many items each recent-activity feed carries.
pub const RECENT_ACTIVITY_LIMIT: u32 = 5;

/// Raw enrollment aggregate as computed by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow)]
pub struct EnrollmentStats {
  pub total: i64,
  pub completed: i64,
  pub active: i64,
  /// `None` when the user has no enrollments.
  pub avg_progress: Option<f64>,
}

/// Order count and summed totals for one status.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StatusTotal {
  pub status: OrderStatus,
  pub count: i64,
  pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSummary {
  pub total: i64,
  pub completed: i64,
  pub active: i64,
  pub avg_progress: f64,
}

impl From<EnrollmentStats> for EnrollmentSummary {
  fn from(stats: EnrollmentStats) -> Self {
    Self {
      total: stats.total,
      completed: stats.completed,
      active: stats.active,
      avg_progress: round_to(stats.avg_progress.unwrap_or(0.0), 1),
    }
  }
}

/// Sum of order totals rounded to cents.
fn total_spent(totals: impl IntoIterator<Item = Decimal>) -> Decimal {
  totals.into_iter().sum::<Decimal>().round_dp(2)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
  pub total: i64,
  pub delivered: i64,
  pub pending: i64,
  #[serde(with = "rust_decimal::serde::float")]
  pub total_spent: Decimal,
}

impl OrderSummary {
  pub fn from_status_totals(totals: &[StatusTotal]) -> Self {
    let count_of = |status: OrderStatus| {
      totals
        .iter()
        .filter(|t| t.status == status)
        .map(|t| t.count)
        .sum::<i64>()
    };
    Self {
      total: totals.iter().map(|t| t.count).sum(),
      delivered: count_of(OrderStatus::Delivered),
      pending: count_of(OrderStatus::Pending),
      total_spent: total_spent(totals.iter().map(|t| t.total)),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
  pub enrollments: EnrollmentSummary,
  pub orders: OrderSummary,
}

// Activity items keep snake_case keys; existing dashboard clients read them that way.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentActivity {
  pub enrolled_at: DateTime<Utc>,
  pub course_name: String,
  pub image_url: Option<String>,
}

impl From<EnrollmentWithCourse> for EnrollmentActivity {
  fn from(e: EnrollmentWithCourse) -> Self {
    Self {
      enrolled_at: e.enrollment.enrolled_at,
      course_name: e.course.title,
      image_url: e.course.image_cover_url,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderActivity {
  pub created_at: DateTime<Utc>,
  pub kit_name: String,
  pub image_url: Option<String>,
  pub status: OrderStatus,
}

impl From<OrderWithKit> for OrderActivity {
  fn from(o: OrderWithKit) -> Self {
    Self {
      created_at: o.order.created_at,
      kit_name: o.kit_name,
      image_url: o.kit_image_url,
      status: o.order.status,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentActivity {
  pub enrollments: Vec<EnrollmentActivity>,
  pub orders: Vec<OrderActivity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
  pub stats: DashboardStats,
  pub recent_activity: RecentActivity,
}

/// Builds the per-user dashboard.
///
/// # Arguments
/// * `store`: Provides enrollment and order aggregates.
/// * `user_id`: Whose activity to summarize.
///
/// # Returns
/// Enrollment and order statistics plus the five most recent of each. A user with
/// no activity gets zeroes and empty lists.
#[instrument(name = "dashboard::load", skip(store))]
pub async fn dashboard<S>(store: &S, user_id: Uuid) -> CoreResult<Dashboard>
where
  S: EnrollmentStore + OrderStore + ?Sized,
{
  let recent = PageRequest::new(1, RECENT_ACTIVITY_LIMIT);
  let (enrollment_stats, status_totals, recent_enrollments, recent_orders) = tokio::try_join!(
    store.enrollment_stats(user_id),
    store.order_totals_by_status(user_id),
    store.find_enrollments(user_id, Some(recent.limit())),
    store.find_orders(user_id, None, recent),
  )?;

  Ok(Dashboard {
    stats: DashboardStats {
      enrollments: EnrollmentSummary::from(enrollment_stats),
      orders: OrderSummary::from_status_totals(&status_totals),
    },
    recent_activity: RecentActivity {
      enrollments: recent_enrollments.into_iter().map(EnrollmentActivity::from).collect(),
      orders: recent_orders.into_iter().map(OrderActivity::from).collect(),
    },
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn total(status: OrderStatus, count: i64, sum: i64) -> StatusTotal {
    StatusTotal {
      status,
      count,
      total: Decimal::from(sum),
    }
  }

  #[test]
  fn order_summary_folds_status_groups() {
    let summary = OrderSummary::from_status_totals(&[
      total(OrderStatus::Pending, 2, 3840),
      total(OrderStatus::Delivered, 1, 2832),
      total(OrderStatus::Cancelled, 1, 100),
    ]);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.pending, 2);
    assert_eq!(summary.delivered, 1);
    assert_eq!(summary.total_spent, Decimal::from(6772));
  }

  #[test]
  fn empty_history_is_all_zero() {
    let orders = OrderSummary::from_status_totals(&[]);
    assert_eq!(orders.total, 0);
    assert_eq!(orders.total_spent, Decimal::ZERO);

    let enrollments = EnrollmentSummary::from(EnrollmentStats::default());
    assert_eq!(enrollments.avg_progress, 0.0);
  }

  #[test]
  fn average_progress_is_rounded_to_one_decimal() {
    let summary = EnrollmentSummary::from(EnrollmentStats {
      total: 3,
      completed: 1,
      active: 2,
      avg_progress: Some(100.0 / 3.0),
    });
    assert_eq!(summary.avg_progress, 33.3);
  }

  #[test]
  fn activity_keys_stay_snake_case() {
    let item = EnrollmentActivity {
      enrolled_at: Utc::now(),
      course_name: "Astronomy 101".into(),
      image_url: None,
    };
    let json = serde_json::to_value(item).unwrap();
    assert!(json.get("course_name").is_some());
    assert!(json.get("enrolled_at").is_some());
  }
}
