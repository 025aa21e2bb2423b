// core/src/store/memory.rs

//! In-process store used by tests and benchmarks (`test-util` feature).
//!
//! Evaluates the same filters and orderings as the SQL store, using
//! [`CatalogFilter::matches`] and [`compare_items`].

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use sqlx::types::Json;
use std::cmp::Reverse;
use uuid::Uuid;

use super::{CatalogStore, EnrollmentStore, OrderStore, ProfileChanges, UserStore};
use crate::catalog::{
  compare_items, CatalogFilter, CatalogKind, CatalogQuery, CategoryCount, CourseListing, InstructorView, KitListing,
  PageRequest, ReviewStats,
};
use crate::dashboard::{EnrollmentStats, StatusTotal};
use crate::error::{CoreError, CoreResult};
use crate::models::{
  Course, CourseModule, Difficulty, EnrolledCourse, Enrollment, EnrollmentStatus, EnrollmentWithCourse, Instructor,
  Kit, KitImage, NewUser, Order, OrderStatus, OrderWithKit, Review, ReviewSubject, ReviewWithAuthor, Role, Tag, User,
};
use crate::pricing::NewOrder;

#[derive(Default)]
struct Tables {
  users: Vec<User>,
  instructors: Vec<Instructor>,
  tags: Vec<Tag>,
  kits: Vec<Kit>,
  kit_images: Vec<KitImage>,
  kit_tags: Vec<(Uuid, Uuid)>,
  courses: Vec<Course>,
  course_modules: Vec<CourseModule>,
  course_tags: Vec<(Uuid, Uuid)>,
  reviews: Vec<Review>,
  orders: Vec<Order>,
  enrollments: Vec<Enrollment>,
  last_tick: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl Tables {
  /// Strictly increasing timestamps so "newest first" is deterministic.
  fn tick(&mut self) -> DateTime<Utc> {
    let now = Utc::now();
    let next = match self.last_tick {
      Some(last) if now <= last => last + Duration::microseconds(1),
      _ => now,
    };
    self.last_tick = Some(next);
    next
  }

  fn user(&self, id: Uuid) -> Option<&User> {
    self.users.iter().find(|u| u.id == id)
  }

  fn kit(&self, id: Uuid) -> Option<&Kit> {
    self.kits.iter().find(|k| k.id == id)
  }

  fn course(&self, id: Uuid) -> Option<&Course> {
    self.courses.iter().find(|c| c.id == id)
  }

  fn tag_names(&self, links: &[(Uuid, Uuid)], owner: Uuid) -> Vec<String> {
    links
      .iter()
      .filter(|(o, _)| *o == owner)
      .filter_map(|(_, tag_id)| self.tags.iter().find(|t| t.id == *tag_id))
      .map(|t| t.name.clone())
      .collect()
  }

  fn ensure_tag(&mut self, name: &str) -> Uuid {
    if let Some(tag) = self.tags.iter().find(|t| t.name == name) {
      return tag.id;
    }
    let tag = Tag {
      id: Uuid::new_v4(),
      name: name.to_string(),
      slug: Tag::slugify(name),
      tag_type: None,
    };
    let id = tag.id;
    self.tags.push(tag);
    id
  }

  fn review_stats(&self, subject: ReviewSubject) -> ReviewStats {
    let ratings: Vec<i16> = self
      .reviews
      .iter()
      .filter(|r| r.subject == subject)
      .map(|r| r.rating)
      .collect();
    ReviewStats::from_ratings(&ratings)
  }

  fn kit_listing(&self, kit: &Kit) -> KitListing {
    let mut images: Vec<KitImage> = self.kit_images.iter().filter(|i| i.kit_id == kit.id).cloned().collect();
    images.sort_by_key(|i| i.sort_order);
    KitListing {
      kit: kit.clone(),
      images,
      tags: self.tag_names(&self.kit_tags, kit.id),
      reviews: self.review_stats(ReviewSubject::Kit(kit.id)),
      total_orders: self.orders.iter().filter(|o| o.kit_id == kit.id).count() as i64,
    }
  }

  fn course_listing(&self, course: &Course) -> CourseListing {
    let instructor = course
      .instructor_id
      .and_then(|id| self.instructors.iter().find(|i| i.id == id))
      .map(InstructorView::from);
    CourseListing {
      course: course.clone(),
      instructor,
      tags: self.tag_names(&self.course_tags, course.id),
      reviews: self.review_stats(ReviewSubject::Course(course.id)),
      total_enrollments: self.enrollments.iter().filter(|e| e.course_id == course.id).count() as i64,
    }
  }

  fn matching_kits(&self, filter: &CatalogFilter) -> Vec<&Kit> {
    self
      .kits
      .iter()
      .filter(|k| filter.matches(*k, &self.tag_names(&self.kit_tags, k.id)))
      .collect()
  }

  fn matching_courses(&self, filter: &CatalogFilter) -> Vec<&Course> {
    self
      .courses
      .iter()
      .filter(|c| filter.matches(*c, &self.tag_names(&self.course_tags, c.id)))
      .collect()
  }

  fn order_with_kit(&self, order: &Order) -> Option<OrderWithKit> {
    let kit = self.kit(order.kit_id)?;
    Some(OrderWithKit {
      order: order.clone(),
      kit_name: kit.name.clone(),
      kit_image_url: kit.image_url.clone(),
      kit_description: kit.description.clone(),
    })
  }

  fn user_orders(&self, user_id: Uuid, status: Option<OrderStatus>) -> Vec<&Order> {
    let mut orders: Vec<&Order> = self
      .orders
      .iter()
      .filter(|o| o.user_id == user_id && status.map_or(true, |s| o.status == s))
      .collect();
    orders.sort_by_key(|o| (Reverse(o.created_at), o.id));
    orders
  }

  fn enrollment_with_course(&self, enrollment: &Enrollment) -> Option<EnrollmentWithCourse> {
    let course = self.course(enrollment.course_id)?;
    Some(EnrollmentWithCourse {
      enrollment: enrollment.clone(),
      course: EnrolledCourse {
        id: course.id,
        title: course.name.clone(),
        slug: course.slug.clone(),
        image_cover_url: course.image_url.clone(),
        level: course.difficulty,
      },
    })
  }
}

fn page_of<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
  items
    .into_iter()
    .skip(page.offset().max(0) as usize)
    .take(page.limit().max(0) as usize)
    .collect()
}

fn category_counts<'a>(categories: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
  let mut counts: Vec<CategoryCount> = Vec::new();
  for category in categories {
    match counts.iter_mut().find(|c| c.category == category) {
      Some(entry) => entry.count += 1,
      None => counts.push(CategoryCount {
        category: category.to_string(),
        count: 1,
      }),
    }
  }
  counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
  counts
}

// Fixture helpers. Rows are created active with neutral defaults; tests adjust
// them through the `update_*` closures.
impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// A user with no usable password. Use `identity::register` when a login is needed.
  pub fn add_user(&self, first_name: &str, last_name: &str, email: &str, role: Role) -> User {
    let mut t = self.tables.write();
    let now = t.tick();
    let user = User {
      id: Uuid::new_v4(),
      first_name: first_name.to_string(),
      last_name: last_name.to_string(),
      email: email.to_lowercase(),
      password_hash: String::new(),
      role,
      bio: None,
      phone: None,
      avatar_url: None,
      created_at: now,
      updated_at: now,
      last_login: None,
    };
    t.users.push(user.clone());
    user
  }

  pub fn set_user_role(&self, user_id: Uuid, role: Role) {
    if let Some(user) = self.tables.write().users.iter_mut().find(|u| u.id == user_id) {
      user.role = role;
    }
  }

  pub fn add_instructor(&self, user_id: Uuid, first_name: &str, last_name: &str) -> Instructor {
    let instructor = Instructor {
      id: Uuid::new_v4(),
      user_id,
      first_name: first_name.to_string(),
      last_name: last_name.to_string(),
      bio: None,
      avatar_url: None,
      expertise: Vec::new(),
    };
    self.tables.write().instructors.push(instructor.clone());
    instructor
  }

  pub fn add_kit(&self, name: &str, category: &str, difficulty: Difficulty, price: Decimal) -> Kit {
    let mut t = self.tables.write();
    let now = t.tick();
    let kit = Kit {
      id: Uuid::new_v4(),
      name: name.to_string(),
      description: format!("{name} kit"),
      price,
      original_price: None,
      category: category.to_string(),
      difficulty,
      duration: None,
      modules: 0,
      image_url: None,
      features: Vec::new(),
      specifications: Json(serde_json::json!({})),
      what_includes: Vec::new(),
      member_count: 0,
      stock: 10,
      is_active: true,
      created_at: now,
      updated_at: now,
    };
    t.kits.push(kit.clone());
    kit
  }

  pub fn update_kit(&self, id: Uuid, change: impl FnOnce(&mut Kit)) -> Option<Kit> {
    let mut t = self.tables.write();
    let kit = t.kits.iter_mut().find(|k| k.id == id)?;
    change(kit);
    Some(kit.clone())
  }

  pub fn add_kit_image(&self, kit_id: Uuid, url: &str, is_primary: bool, sort_order: i32) {
    self.tables.write().kit_images.push(KitImage {
      id: Uuid::new_v4(),
      kit_id,
      url: url.to_string(),
      is_primary,
      sort_order,
    });
  }

  pub fn tag_kit(&self, kit_id: Uuid, tag: &str) {
    let mut t = self.tables.write();
    let tag_id = t.ensure_tag(tag);
    t.kit_tags.push((kit_id, tag_id));
  }

  pub fn add_course(&self, name: &str, category: &str, difficulty: Difficulty, price: Decimal) -> Course {
    let mut t = self.tables.write();
    let now = t.tick();
    let course = Course {
      id: Uuid::new_v4(),
      slug: Tag::slugify(name),
      name: name.to_string(),
      description: format!("{name} course"),
      price,
      category: category.to_string(),
      difficulty,
      duration: None,
      modules: 0,
      image_url: None,
      is_premium: false,
      what_you_learn: Vec::new(),
      requirements: Vec::new(),
      instructor_id: None,
      is_active: true,
      created_at: now,
      updated_at: now,
    };
    t.courses.push(course.clone());
    course
  }

  pub fn update_course(&self, id: Uuid, change: impl FnOnce(&mut Course)) -> Option<Course> {
    let mut t = self.tables.write();
    let course = t.courses.iter_mut().find(|c| c.id == id)?;
    change(course);
    Some(course.clone())
  }

  pub fn tag_course(&self, course_id: Uuid, tag: &str) {
    let mut t = self.tables.write();
    let tag_id = t.ensure_tag(tag);
    t.course_tags.push((course_id, tag_id));
  }

  pub fn add_course_module(&self, course_id: Uuid, title: &str, order_index: i32, is_free: bool) {
    self.tables.write().course_modules.push(CourseModule {
      id: Uuid::new_v4(),
      course_id,
      title: title.to_string(),
      description: None,
      duration: None,
      video_url: None,
      order_index,
      is_free,
    });
  }

  pub fn add_review(&self, user_id: Uuid, subject: ReviewSubject, rating: i16, comment: Option<&str>) -> Review {
    let mut t = self.tables.write();
    let now = t.tick();
    let review = Review {
      id: Uuid::new_v4(),
      user_id,
      subject,
      rating,
      comment: comment.map(str::to_string),
      is_verified: false,
      created_at: now,
    };
    t.reviews.push(review.clone());
    review
  }
}

#[async_trait]
impl UserStore for MemoryStore {
  async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
    Ok(self.tables.read().users.iter().find(|u| u.email == email).cloned())
  }

  async fn find_user(&self, id: Uuid) -> CoreResult<Option<User>> {
    Ok(self.tables.read().user(id).cloned())
  }

  async fn insert_user(&self, new_user: NewUser) -> CoreResult<User> {
    let mut t = self.tables.write();
    if t.users.iter().any(|u| u.email.eq_ignore_ascii_case(&new_user.email)) {
      return Err(CoreError::Conflict("User with this email already exists".to_string()));
    }
    let now = t.tick();
    let user = User {
      id: Uuid::new_v4(),
      first_name: new_user.first_name,
      last_name: new_user.last_name,
      email: new_user.email,
      password_hash: new_user.password_hash,
      role: Role::Student,
      bio: None,
      phone: None,
      avatar_url: None,
      created_at: now,
      updated_at: now,
      last_login: None,
    };
    t.users.push(user.clone());
    Ok(user)
  }

  async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> CoreResult<()> {
    if let Some(user) = self.tables.write().users.iter_mut().find(|u| u.id == id) {
      user.last_login = Some(at);
    }
    Ok(())
  }

  async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> CoreResult<Option<User>> {
    let mut t = self.tables.write();
    let now = t.tick();
    let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
      return Ok(None);
    };
    if let Some(v) = &changes.first_name {
      user.first_name = v.clone();
    }
    if let Some(v) = &changes.last_name {
      user.last_name = v.clone();
    }
    if let Some(v) = &changes.bio {
      user.bio = Some(v.clone());
    }
    if let Some(v) = &changes.phone {
      user.phone = Some(v.clone());
    }
    user.updated_at = now;
    Ok(Some(user.clone()))
  }
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn find_kits(&self, query: &CatalogQuery) -> CoreResult<Vec<KitListing>> {
    let t = self.tables.read();
    let keys = query.sort_by.order_keys(CatalogKind::Kit);
    let mut kits = t.matching_kits(&query.filter);
    kits.sort_by(|a, b| compare_items(&keys, *a, *b));
    Ok(page_of(kits, query.page).into_iter().map(|k| t.kit_listing(k)).collect())
  }

  async fn count_kits(&self, filter: &CatalogFilter) -> CoreResult<i64> {
    Ok(self.tables.read().matching_kits(filter).len() as i64)
  }

  async fn kit_categories(&self) -> CoreResult<Vec<CategoryCount>> {
    let t = self.tables.read();
    Ok(category_counts(
      t.kits.iter().filter(|k| k.is_active).map(|k| k.category.as_str()),
    ))
  }

  async fn find_active_kit(&self, id: Uuid) -> CoreResult<Option<KitListing>> {
    let t = self.tables.read();
    Ok(t.kit(id).filter(|k| k.is_active).map(|k| t.kit_listing(k)))
  }

  async fn find_kit(&self, id: Uuid) -> CoreResult<Option<Kit>> {
    Ok(self.tables.read().kit(id).cloned())
  }

  async fn deactivate_kit(&self, id: Uuid) -> CoreResult<bool> {
    let mut t = self.tables.write();
    let now = t.tick();
    match t.kits.iter_mut().find(|k| k.id == id && k.is_active) {
      Some(kit) => {
        kit.is_active = false;
        kit.updated_at = now;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn find_courses(&self, query: &CatalogQuery) -> CoreResult<Vec<CourseListing>> {
    let t = self.tables.read();
    let keys = query.sort_by.order_keys(CatalogKind::Course);
    let mut courses = t.matching_courses(&query.filter);
    courses.sort_by(|a, b| compare_items(&keys, *a, *b));
    Ok(
      page_of(courses, query.page)
        .into_iter()
        .map(|c| t.course_listing(c))
        .collect(),
    )
  }

  async fn count_courses(&self, filter: &CatalogFilter) -> CoreResult<i64> {
    Ok(self.tables.read().matching_courses(filter).len() as i64)
  }

  async fn course_categories(&self) -> CoreResult<Vec<CategoryCount>> {
    let t = self.tables.read();
    Ok(category_counts(
      t.courses.iter().filter(|c| c.is_active).map(|c| c.category.as_str()),
    ))
  }

  async fn find_active_course(&self, id: Uuid) -> CoreResult<Option<CourseListing>> {
    let t = self.tables.read();
    Ok(t.course(id).filter(|c| c.is_active).map(|c| t.course_listing(c)))
  }

  async fn find_course(&self, id: Uuid) -> CoreResult<Option<Course>> {
    Ok(self.tables.read().course(id).cloned())
  }

  async fn deactivate_course(&self, id: Uuid) -> CoreResult<bool> {
    let mut t = self.tables.write();
    let now = t.tick();
    match t.courses.iter_mut().find(|c| c.id == id && c.is_active) {
      Some(course) => {
        course.is_active = false;
        course.updated_at = now;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn course_modules(&self, course_id: Uuid) -> CoreResult<Vec<CourseModule>> {
    let t = self.tables.read();
    let mut modules: Vec<CourseModule> = t
      .course_modules
      .iter()
      .filter(|m| m.course_id == course_id)
      .cloned()
      .collect();
    modules.sort_by_key(|m| m.order_index);
    Ok(modules)
  }

  async fn recent_reviews(&self, subject: ReviewSubject, limit: i64) -> CoreResult<Vec<ReviewWithAuthor>> {
    let t = self.tables.read();
    let mut reviews: Vec<&Review> = t.reviews.iter().filter(|r| r.subject == subject).collect();
    reviews.sort_by_key(|r| (Reverse(r.created_at), r.id));
    Ok(
      reviews
        .into_iter()
        .filter_map(|r| {
          let author = t.user(r.user_id)?;
          Some(ReviewWithAuthor {
            id: r.id,
            rating: r.rating,
            comment: r.comment.clone(),
            created_at: r.created_at,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            avatar_url: author.avatar_url.clone(),
          })
        })
        .take(limit.max(0) as usize)
        .collect(),
    )
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn insert_order(&self, new_order: NewOrder) -> CoreResult<Order> {
    let mut t = self.tables.write();
    let now = t.tick();
    let order = Order {
      id: Uuid::new_v4(),
      user_id: new_order.user_id,
      kit_id: new_order.kit_id,
      quantity: new_order.quantity,
      subtotal: new_order.pricing.subtotal,
      tax: new_order.pricing.tax,
      shipping: new_order.pricing.shipping,
      total: new_order.pricing.total,
      status: OrderStatus::Pending,
      shipping_address: Json(new_order.shipping_address),
      tracking_number: None,
      created_at: now,
      updated_at: now,
    };
    t.orders.push(order.clone());
    Ok(order)
  }

  async fn find_orders(
    &self,
    user_id: Uuid,
    status: Option<OrderStatus>,
    page: PageRequest,
  ) -> CoreResult<Vec<OrderWithKit>> {
    let t = self.tables.read();
    let orders = page_of(t.user_orders(user_id, status), page);
    Ok(orders.into_iter().filter_map(|o| t.order_with_kit(o)).collect())
  }

  async fn count_orders(&self, user_id: Uuid, status: Option<OrderStatus>) -> CoreResult<i64> {
    Ok(self.tables.read().user_orders(user_id, status).len() as i64)
  }

  async fn find_order(&self, user_id: Uuid, order_id: Uuid) -> CoreResult<Option<OrderWithKit>> {
    let t = self.tables.read();
    Ok(
      t.orders
        .iter()
        .find(|o| o.id == order_id && o.user_id == user_id)
        .and_then(|o| t.order_with_kit(o)),
    )
  }

  async fn update_order_status(
    &self,
    order_id: Uuid,
    status: OrderStatus,
    tracking_number: Option<String>,
  ) -> CoreResult<Option<Order>> {
    let mut t = self.tables.write();
    let now = t.tick();
    let Some(order) = t.orders.iter_mut().find(|o| o.id == order_id) else {
      return Ok(None);
    };
    order.status = status;
    if tracking_number.is_some() {
      order.tracking_number = tracking_number;
    }
    order.updated_at = now;
    Ok(Some(order.clone()))
  }

  async fn order_totals_by_status(&self, user_id: Uuid) -> CoreResult<Vec<StatusTotal>> {
    let t = self.tables.read();
    let statuses = [
      OrderStatus::Pending,
      OrderStatus::Confirmed,
      OrderStatus::Shipped,
      OrderStatus::Delivered,
      OrderStatus::Cancelled,
    ];
    Ok(
      statuses
        .into_iter()
        .filter_map(|status| {
          let rows: Vec<&Order> = t
            .orders
            .iter()
            .filter(|o| o.user_id == user_id && o.status == status)
            .collect();
          (!rows.is_empty()).then(|| StatusTotal {
            status,
            count: rows.len() as i64,
            total: rows.iter().map(|o| o.total).sum(),
          })
        })
        .collect(),
    )
  }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
  async fn upsert_enrollment(&self, user_id: Uuid, course_id: Uuid) -> CoreResult<Enrollment> {
    let mut t = self.tables.write();
    let now = t.tick();
    if let Some(existing) = t
      .enrollments
      .iter_mut()
      .find(|e| e.user_id == user_id && e.course_id == course_id)
    {
      existing.status = EnrollmentStatus::Active;
      existing.updated_at = now;
      return Ok(existing.clone());
    }
    let enrollment = Enrollment {
      id: Uuid::new_v4(),
      user_id,
      course_id,
      status: EnrollmentStatus::Active,
      progress: 0,
      enrolled_at: now,
      updated_at: now,
    };
    t.enrollments.push(enrollment.clone());
    Ok(enrollment)
  }

  async fn find_enrollments(&self, user_id: Uuid, limit: Option<i64>) -> CoreResult<Vec<EnrollmentWithCourse>> {
    let t = self.tables.read();
    let mut rows: Vec<&Enrollment> = t.enrollments.iter().filter(|e| e.user_id == user_id).collect();
    rows.sort_by_key(|e| (Reverse(e.enrolled_at), e.id));
    let limit = limit.map_or(usize::MAX, |l| l.max(0) as usize);
    Ok(
      rows
        .into_iter()
        .filter_map(|e| t.enrollment_with_course(e))
        .take(limit)
        .collect(),
    )
  }

  async fn find_enrollment(&self, user_id: Uuid, course_id: Uuid) -> CoreResult<Option<EnrollmentWithCourse>> {
    let t = self.tables.read();
    Ok(
      t.enrollments
        .iter()
        .find(|e| e.user_id == user_id && e.course_id == course_id)
        .and_then(|e| t.enrollment_with_course(e)),
    )
  }

  async fn update_progress(
    &self,
    user_id: Uuid,
    course_id: Uuid,
    progress: i16,
    status: Option<EnrollmentStatus>,
  ) -> CoreResult<Option<Enrollment>> {
    let mut t = self.tables.write();
    let now = t.tick();
    let Some(enrollment) = t
      .enrollments
      .iter_mut()
      .find(|e| e.user_id == user_id && e.course_id == course_id)
    else {
      return Ok(None);
    };
    enrollment.progress = progress;
    if let Some(status) = status {
      enrollment.status = status;
    }
    enrollment.updated_at = now;
    Ok(Some(enrollment.clone()))
  }

  async fn enrollment_stats(&self, user_id: Uuid) -> CoreResult<EnrollmentStats> {
    let t = self.tables.read();
    let rows: Vec<&Enrollment> = t.enrollments.iter().filter(|e| e.user_id == user_id).collect();
    let count_of = |status: EnrollmentStatus| rows.iter().filter(|e| e.status == status).count() as i64;
    let avg_progress = (!rows.is_empty())
      .then(|| rows.iter().map(|e| f64::from(e.progress)).sum::<f64>() / rows.len() as f64);
    Ok(EnrollmentStats {
      total: rows.len() as i64,
      completed: count_of(EnrollmentStatus::Completed),
      active: count_of(EnrollmentStatus::Active),
      avg_progress,
    })
  }
}

impl MemoryStore {
  /// Test hook for fulfilment states that have no public operation besides the admin update.
  pub fn set_order_status(&self, order_id: Uuid, status: OrderStatus) {
    if let Some(order) = self.tables.write().orders.iter_mut().find(|o| o.id == order_id) {
      order.status = status;
    }
  }
}
