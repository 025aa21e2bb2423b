// core/src/catalog/shape.rs

//! JSON views over catalog listings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::review::ReviewView;
use crate::models::{Course, CourseModule, Difficulty, Instructor, Kit, KitImage};

/// Review aggregate for one kit or course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewStats {
  pub count: i64,
  pub sum: i64,
}

impl ReviewStats {
  pub fn from_ratings(ratings: &[i16]) -> Self {
    Self {
      count: ratings.len() as i64,
      sum: ratings.iter().map(|r| i64::from(*r)).sum(),
    }
  }

  /// Mean rating rounded to one decimal, `0.0` when there are no reviews.
  pub fn average(&self) -> f64 {
    if self.count == 0 {
      return 0.0;
    }
    round_to(self.sum as f64 / self.count as f64, 1)
  }
}

pub fn round_to(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round() / factor
}

/// Explicit `image_url` first, then the image flagged primary, else nothing.
pub fn primary_image_url(image_url: Option<&str>, images: &[KitImage]) -> Option<String> {
  image_url
    .map(str::to_string)
    .or_else(|| images.iter().find(|i| i.is_primary).map(|i| i.url.clone()))
}

/// A kit row as returned by the store, with its joined aggregates.
#[derive(Debug, Clone)]
pub struct KitListing {
  pub kit: Kit,
  /// Ascending by `sort_order`.
  pub images: Vec<KitImage>,
  pub tags: Vec<String>,
  pub reviews: ReviewStats,
  pub total_orders: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KitSummary {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  #[serde(with = "rust_decimal::serde::float_option")]
  pub original_price: Option<Decimal>,
  pub category: String,
  pub difficulty: Difficulty,
  pub duration: Option<String>,
  pub modules: i32,
  pub image_url: Option<String>,
  pub features: Vec<String>,
  pub rating: f64,
  pub total_orders: i64,
  pub tags: Vec<String>,
  pub member_count: i32,
  /// Alias of `member_count` kept for older clients.
  pub members: i32,
  pub created_at: DateTime<Utc>,
}

impl From<&KitListing> for KitSummary {
  fn from(listing: &KitListing) -> Self {
    let kit = &listing.kit;
    Self {
      id: kit.id,
      name: kit.name.clone(),
      description: kit.description.clone(),
      price: kit.price,
      original_price: kit.original_price,
      category: kit.category.clone(),
      difficulty: kit.difficulty,
      duration: kit.duration.clone(),
      modules: kit.modules,
      image_url: primary_image_url(kit.image_url.as_deref(), &listing.images),
      features: kit.features.clone(),
      rating: listing.reviews.average(),
      total_orders: listing.total_orders,
      tags: listing.tags.clone(),
      member_count: kit.member_count,
      members: kit.member_count,
      created_at: kit.created_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KitDetail {
  #[serde(flatten)]
  pub summary: KitSummary,
  pub specifications: serde_json::Value,
  pub what_includes: Vec<String>,
  pub images: Vec<KitImage>,
  pub stock: i32,
  pub review_count: i64,
}

impl From<KitListing> for KitDetail {
  fn from(listing: KitListing) -> Self {
    let summary = KitSummary::from(&listing);
    Self {
      summary,
      specifications: listing.kit.specifications.0,
      what_includes: listing.kit.what_includes,
      images: listing.images,
      stock: listing.kit.stock,
      review_count: listing.reviews.count,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct KitDetailView {
  pub kit: KitDetail,
  pub reviews: Vec<ReviewView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorView {
  pub name: String,
  pub bio: Option<String>,
  pub avatar_url: Option<String>,
}

impl InstructorView {
  pub fn new(first_name: &str, last_name: &str, bio: Option<String>, avatar_url: Option<String>) -> Self {
    Self {
      name: format!("{} {}", first_name, last_name),
      bio,
      avatar_url,
    }
  }
}

impl From<&Instructor> for InstructorView {
  fn from(i: &Instructor) -> Self {
    Self::new(&i.first_name, &i.last_name, i.bio.clone(), i.avatar_url.clone())
  }
}

/// A course row as returned by the store, with its joined aggregates.
#[derive(Debug, Clone)]
pub struct CourseListing {
  pub course: Course,
  pub instructor: Option<InstructorView>,
  pub tags: Vec<String>,
  pub reviews: ReviewStats,
  pub total_enrollments: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
  pub id: Uuid,
  pub slug: String,
  pub name: String,
  pub description: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub category: String,
  pub difficulty: Difficulty,
  pub duration: Option<String>,
  pub modules: i32,
  pub image_url: Option<String>,
  pub is_premium: bool,
  pub rating: f64,
  pub total_enrollments: i64,
  pub instructor: Option<InstructorView>,
  pub tags: Vec<String>,
  pub created_at: DateTime<Utc>,
}

impl From<&CourseListing> for CourseSummary {
  fn from(listing: &CourseListing) -> Self {
    let c = &listing.course;
    Self {
      id: c.id,
      slug: c.slug.clone(),
      name: c.name.clone(),
      description: c.description.clone(),
      price: c.price,
      category: c.category.clone(),
      difficulty: c.difficulty,
      duration: c.duration.clone(),
      modules: c.modules,
      image_url: c.image_url.clone(),
      is_premium: c.is_premium,
      rating: listing.reviews.average(),
      total_enrollments: listing.total_enrollments,
      instructor: listing.instructor.clone(),
      tags: listing.tags.clone(),
      created_at: c.created_at,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
  #[serde(flatten)]
  pub summary: CourseSummary,
  pub what_you_learn: Vec<String>,
  pub requirements: Vec<String>,
  pub review_count: i64,
}

impl From<CourseListing> for CourseDetail {
  fn from(listing: CourseListing) -> Self {
    let summary = CourseSummary::from(&listing);
    Self {
      summary,
      what_you_learn: listing.course.what_you_learn,
      requirements: listing.course.requirements,
      review_count: listing.reviews.count,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseDetailView {
  pub course: CourseDetail,
  pub modules: Vec<CourseModule>,
  pub reviews: Vec<ReviewView>,
}

/// One row of the category aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CategoryCount {
  pub category: String,
  pub count: i64,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn image(url: &str, is_primary: bool, sort_order: i32) -> KitImage {
    KitImage {
      id: Uuid::new_v4(),
      kit_id: Uuid::nil(),
      url: url.to_string(),
      is_primary,
      sort_order,
    }
  }

  #[test]
  fn rating_is_rounded_mean() {
    assert_eq!(ReviewStats::from_ratings(&[5, 4, 3]).average(), 4.0);
    assert_eq!(ReviewStats::from_ratings(&[5, 4]).average(), 4.5);
    assert_eq!(ReviewStats::from_ratings(&[5, 5, 4]).average(), 4.7);
    assert_eq!(ReviewStats::from_ratings(&[1, 2, 2]).average(), 1.7);
  }

  #[test]
  fn instructor_name_joins_first_and_last() {
    let view = InstructorView::new("Sarah", "Johnson", None, Some("a.png".into()));
    assert_eq!(view.name, "Sarah Johnson");
    assert_eq!(view.avatar_url.as_deref(), Some("a.png"));
  }

  #[test]
  fn rating_without_reviews_is_zero() {
    assert_eq!(ReviewStats::default().average(), 0.0);
    assert_eq!(ReviewStats::from_ratings(&[]).average(), 0.0);
  }

  #[test]
  fn explicit_image_url_wins() {
    let images = vec![image("a.png", false, 0), image("b.png", true, 1)];
    assert_eq!(primary_image_url(Some("x.png"), &images).as_deref(), Some("x.png"));
  }

  #[test]
  fn primary_image_is_the_fallback() {
    let images = vec![image("a.png", false, 0), image("b.png", true, 1)];
    assert_eq!(primary_image_url(None, &images).as_deref(), Some("b.png"));
  }

  #[test]
  fn no_image_at_all_is_none() {
    let images = vec![image("a.png", false, 0)];
    assert_eq!(primary_image_url(None, &images), None);
    assert_eq!(primary_image_url(None, &[]), None);
  }
}
