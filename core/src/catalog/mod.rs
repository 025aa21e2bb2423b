// core/src/catalog/mod.rs

//! Filtered, sorted and paginated views over kits and courses.
//!
//! Both listings share one algorithm:
//!  - [`CatalogParams`] is the raw query string, validated into a [`CatalogQuery`].
//!  - [`CatalogFilter`] restricts to active rows plus the optional search/category/difficulty/tag predicates.
//!  - [`SortBy`] resolves to a list of [`OrderKey`]s the store renders as `ORDER BY`.
//!  - The store returns one page of listings plus a total count under the same filter.
//!  - [`shape`] turns store listings into the JSON views, deriving ratings and image URLs.
//!
//! The `rating` and `popular` sorts are proxies (recency, member count). A true ranking would
//! need per-row aggregates in the ORDER BY; until then they stay approximations.

pub mod service;
pub mod shape;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CoreError, CoreResult};
use crate::models::{Course, Difficulty, Kit};

pub use service::{
  course_categories, deactivate_course, deactivate_kit, get_course, get_kit, kit_categories, list_courses, list_kits,
};
pub use shape::{
  CategoryCount, CourseDetail, CourseDetailView, CourseListing, CourseSummary, InstructorView, KitDetail, KitDetailView,
  KitListing, KitSummary, ReviewStats,
};

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 50;

/// How many reviews a detail page embeds.
pub const DETAIL_REVIEW_LIMIT: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
  #[default]
  Popular,
  PriceLow,
  PriceHigh,
  Rating,
  Newest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
  Kit,
  Course,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
  Price,
  CreatedAt,
  UpdatedAt,
  /// Kits only.
  MemberCount,
}

impl SortColumn {
  pub fn column_name(&self) -> &'static str {
    match self {
      SortColumn::Price => "price",
      SortColumn::CreatedAt => "created_at",
      SortColumn::UpdatedAt => "updated_at",
      SortColumn::MemberCount => "member_count",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
  pub column: SortColumn,
  pub descending: bool,
}

impl OrderKey {
  const fn asc(column: SortColumn) -> Self {
    Self {
      column,
      descending: false,
    }
  }

  const fn desc(column: SortColumn) -> Self {
    Self {
      column,
      descending: true,
    }
  }
}

impl SortBy {
  /// Ordering keys for this sort. Stores append `id ASC` as the final tie-breaker.
  pub fn order_keys(self, kind: CatalogKind) -> Vec<OrderKey> {
    match (self, kind) {
      (SortBy::PriceLow, _) => vec![OrderKey::asc(SortColumn::Price)],
      (SortBy::PriceHigh, _) => vec![OrderKey::desc(SortColumn::Price)],
      (SortBy::Newest, _) => vec![OrderKey::desc(SortColumn::CreatedAt)],
      (SortBy::Rating, _) => vec![OrderKey::desc(SortColumn::UpdatedAt)],
      (SortBy::Popular, CatalogKind::Kit) => vec![
        OrderKey::desc(SortColumn::MemberCount),
        OrderKey::desc(SortColumn::UpdatedAt),
      ],
      (SortBy::Popular, CatalogKind::Course) => vec![OrderKey::desc(SortColumn::UpdatedAt)],
    }
  }
}

/// The raw catalog query string.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CatalogParams {
  pub search: Option<String>,
  pub category: Option<String>,
  pub difficulty: Option<String>,
  pub sort_by: Option<SortBy>,
  #[validate(range(min = 1, message = "page must be a positive integer"))]
  pub page: Option<u32>,
  #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
  pub limit: Option<u32>,
  /// Comma-separated tag names.
  pub tags: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page: u32,
  pub limit: u32,
}

impl PageRequest {
  pub fn new(page: u32, limit: u32) -> Self {
    Self { page, limit }
  }

  pub fn offset(&self) -> i64 {
    (i64::from(self.page) - 1) * i64::from(self.limit)
  }

  pub fn limit(&self) -> i64 {
    i64::from(self.limit)
  }
}

/// Pagination envelope returned by every list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
  pub current_page: u32,
  pub total_pages: i64,
  pub total_items: i64,
  pub items_per_page: u32,
}

impl PageInfo {
  pub fn new(page: PageRequest, total_items: i64) -> Self {
    let per_page = i64::from(page.limit.max(1));
    Self {
      current_page: page.page,
      total_pages: (total_items + per_page - 1) / per_page,
      total_items,
      items_per_page: page.limit,
    }
  }
}

/// One page of items plus its pagination envelope.
#[derive(Debug, Clone)]
pub struct Paged<T> {
  pub items: Vec<T>,
  pub pagination: PageInfo,
}

/// Row predicate shared by the list and count queries. `is_active` is always implied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
  pub search: Option<String>,
  pub category: Option<String>,
  pub difficulty: Option<Difficulty>,
  pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
  pub filter: CatalogFilter,
  pub sort_by: SortBy,
  pub page: PageRequest,
}

impl Default for CatalogQuery {
  fn default() -> Self {
    Self {
      filter: CatalogFilter::default(),
      sort_by: SortBy::default(),
      page: PageRequest::new(1, DEFAULT_PAGE_SIZE),
    }
  }
}

/// "All" and the empty string both mean "no restriction".
fn non_trivial(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty() && v != "All")
}

pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
  raw
    .map(|s| {
      s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
    })
    .unwrap_or_default()
}

impl CatalogQuery {
  pub fn from_params(params: CatalogParams) -> CoreResult<Self> {
    params.validate()?;

    let difficulty = match non_trivial(params.difficulty) {
      Some(d) => Some(
        d.parse::<Difficulty>()
          .map_err(|msg| CoreError::invalid_field("difficulty", msg))?,
      ),
      None => None,
    };
    let search = params
      .search
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty());
    let tags = parse_tags(params.tags.as_deref());

    Ok(Self {
      filter: CatalogFilter {
        search,
        category: non_trivial(params.category),
        difficulty,
        tags,
      },
      sort_by: params.sort_by.unwrap_or_default(),
      page: PageRequest::new(
        params.page.unwrap_or(1),
        params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
      ),
    })
  }
}

/// Field access the in-process store needs to evaluate filters and orderings.
pub trait CatalogItem {
  fn id(&self) -> Uuid;
  fn name(&self) -> &str;
  fn description(&self) -> &str;
  fn category(&self) -> &str;
  fn difficulty(&self) -> Difficulty;
  fn is_active(&self) -> bool;
  fn price(&self) -> Decimal;
  fn created_at(&self) -> DateTime<Utc>;
  fn updated_at(&self) -> DateTime<Utc>;
  fn member_count(&self) -> i32 {
    0
  }
}

impl CatalogItem for Kit {
  fn id(&self) -> Uuid {
    self.id
  }
  fn name(&self) -> &str {
    &self.name
  }
  fn description(&self) -> &str {
    &self.description
  }
  fn category(&self) -> &str {
    &self.category
  }
  fn difficulty(&self) -> Difficulty {
    self.difficulty
  }
  fn is_active(&self) -> bool {
    self.is_active
  }
  fn price(&self) -> Decimal {
    self.price
  }
  fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }
  fn updated_at(&self) -> DateTime<Utc> {
    self.updated_at
  }
  fn member_count(&self) -> i32 {
    self.member_count
  }
}

impl CatalogItem for Course {
  fn id(&self) -> Uuid {
    self.id
  }
  fn name(&self) -> &str {
    &self.name
  }
  fn description(&self) -> &str {
    &self.description
  }
  fn category(&self) -> &str {
    &self.category
  }
  fn difficulty(&self) -> Difficulty {
    self.difficulty
  }
  fn is_active(&self) -> bool {
    self.is_active
  }
  fn price(&self) -> Decimal {
    self.price
  }
  fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }
  fn updated_at(&self) -> DateTime<Utc> {
    self.updated_at
  }
}

impl CatalogFilter {
  /// In-process evaluation of the same predicate the SQL store renders.
  pub fn matches<I: CatalogItem>(&self, item: &I, item_tags: &[String]) -> bool {
    if !item.is_active() {
      return false;
    }
    if let Some(search) = &self.search {
      let needle = search.to_lowercase();
      if !item.name().to_lowercase().contains(&needle) && !item.description().to_lowercase().contains(&needle) {
        return false;
      }
    }
    if let Some(category) = &self.category {
      if item.category() != category {
        return false;
      }
    }
    if let Some(difficulty) = self.difficulty {
      if item.difficulty() != difficulty {
        return false;
      }
    }
    if !self.tags.is_empty() && !item_tags.iter().any(|t| self.tags.contains(t)) {
      return false;
    }
    true
  }
}

/// Compares two items under `keys`, falling back to ascending id.
pub fn compare_items<I: CatalogItem>(keys: &[OrderKey], a: &I, b: &I) -> Ordering {
  for key in keys {
    let ord = match key.column {
      SortColumn::Price => a.price().cmp(&b.price()),
      SortColumn::CreatedAt => a.created_at().cmp(&b.created_at()),
      SortColumn::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
      SortColumn::MemberCount => a.member_count().cmp(&b.member_count()),
    };
    let ord = if key.descending { ord.reverse() } else { ord };
    if ord != Ordering::Equal {
      return ord;
    }
  }
  a.id().cmp(&b.id())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params() -> CatalogParams {
    CatalogParams::default()
  }

  #[test]
  fn defaults_apply_when_params_are_absent() {
    let q = CatalogQuery::from_params(params()).unwrap();
    assert_eq!(q, CatalogQuery::default());
    assert_eq!(q.page.offset(), 0);
    assert_eq!(q.page.limit(), 12);
  }

  #[test]
  fn all_and_empty_values_do_not_filter() {
    let q = CatalogQuery::from_params(CatalogParams {
      search: Some("   ".into()),
      category: Some("All".into()),
      difficulty: Some("All".into()),
      ..params()
    })
    .unwrap();
    assert_eq!(q.filter, CatalogFilter::default());
  }

  #[test]
  fn tags_are_trimmed_and_empties_dropped() {
    assert_eq!(parse_tags(Some(" Telescope, ,Astronomy ,,")), vec!["Telescope", "Astronomy"]);
    assert!(parse_tags(Some("")).is_empty());
    assert!(parse_tags(None).is_empty());
  }

  #[test]
  fn limit_out_of_range_is_rejected() {
    for limit in [0, 51] {
      let err = CatalogQuery::from_params(CatalogParams {
        limit: Some(limit),
        ..params()
      })
      .unwrap_err();
      match err {
        CoreError::Validation { errors, .. } => assert_eq!(errors[0].path, "limit"),
        other => panic!("unexpected error: {other:?}"),
      }
    }
  }

  #[test]
  fn page_zero_is_rejected() {
    assert!(CatalogQuery::from_params(CatalogParams {
      page: Some(0),
      ..params()
    })
    .is_err());
  }

  #[test]
  fn unknown_difficulty_is_rejected() {
    let err = CatalogQuery::from_params(CatalogParams {
      difficulty: Some("Expert".into()),
      ..params()
    })
    .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
  }

  #[test]
  fn page_info_rounds_total_pages_up() {
    let info = PageInfo::new(PageRequest::new(1, 12), 25);
    assert_eq!(info.total_pages, 3);
    assert_eq!(info.total_items, 25);
    assert_eq!(PageInfo::new(PageRequest::new(1, 12), 24).total_pages, 2);
    assert_eq!(PageInfo::new(PageRequest::new(1, 12), 0).total_pages, 0);
    assert_eq!(PageRequest::new(3, 12).offset(), 24);
  }

  #[test]
  fn popular_sort_differs_per_kind() {
    assert_eq!(
      SortBy::Popular.order_keys(CatalogKind::Kit),
      vec![OrderKey::desc(SortColumn::MemberCount), OrderKey::desc(SortColumn::UpdatedAt)]
    );
    assert_eq!(
      SortBy::Popular.order_keys(CatalogKind::Course),
      vec![OrderKey::desc(SortColumn::UpdatedAt)]
    );
    assert_eq!(
      SortBy::Rating.order_keys(CatalogKind::Kit),
      vec![OrderKey::desc(SortColumn::UpdatedAt)]
    );
    assert_eq!(
      SortBy::PriceLow.order_keys(CatalogKind::Course),
      vec![OrderKey::asc(SortColumn::Price)]
    );
  }
}
