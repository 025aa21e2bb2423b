// core/src/store/postgres/catalog.rs

use async_trait::async_trait;
use sqlx::{FromRow, Postgres, QueryBuilder};
use std::collections::HashMap;
use uuid::Uuid;

use super::{db_err, like_pattern, PgStore};
use crate::catalog::{
  CatalogFilter, CatalogKind, CatalogQuery, CategoryCount, CourseListing, InstructorView, KitListing, OrderKey,
  ReviewStats,
};
use crate::error::CoreResult;
use crate::models::{Course, CourseModule, Kit, KitImage, ReviewSubject, ReviewWithAuthor};
use crate::store::CatalogStore;

/// Table names and join keys for one catalog kind.
struct Catalog {
  table: &'static str,
  tag_links: &'static str,
  owner_key: &'static str,
}

const KITS: Catalog = Catalog {
  table: "kits",
  tag_links: "kit_tags",
  owner_key: "kit_id",
};

const COURSES: Catalog = Catalog {
  table: "courses",
  tag_links: "course_tags",
  owner_key: "course_id",
};

impl Catalog {
  /// Correlated aggregates shared by list and detail reads. The row alias is `c`.
  fn aggregate_columns(&self) -> String {
    format!(
      "COALESCE((SELECT array_agg(t.name::TEXT ORDER BY t.name) FROM {links} l JOIN tags t ON t.id = l.tag_id \
         WHERE l.{key} = c.id), '{{}}'::TEXT[]) AS tags, \
       (SELECT COUNT(*) FROM reviews r WHERE r.{key} = c.id) AS review_count, \
       (SELECT COALESCE(SUM(r.rating), 0)::BIGINT FROM reviews r WHERE r.{key} = c.id) AS review_sum",
      links = self.tag_links,
      key = self.owner_key,
    )
  }

  fn push_filter(&self, qb: &mut QueryBuilder<'_, Postgres>, filter: &CatalogFilter) {
    qb.push(" WHERE c.is_active = TRUE");
    if let Some(search) = &filter.search {
      let pattern = like_pattern(search);
      qb.push(" AND (c.name ILIKE ");
      qb.push_bind(pattern.clone());
      qb.push(" OR c.description ILIKE ");
      qb.push_bind(pattern);
      qb.push(")");
    }
    if let Some(category) = &filter.category {
      qb.push(" AND c.category = ");
      qb.push_bind(category.clone());
    }
    if let Some(difficulty) = filter.difficulty {
      qb.push(" AND c.difficulty = ");
      qb.push_bind(difficulty);
    }
    if !filter.tags.is_empty() {
      qb.push(format!(
        " AND EXISTS (SELECT 1 FROM {links} l JOIN tags t ON t.id = l.tag_id WHERE l.{key} = c.id AND t.name = ANY(",
        links = self.tag_links,
        key = self.owner_key,
      ));
      qb.push_bind(filter.tags.clone());
      qb.push("))");
    }
  }

  fn push_order(&self, qb: &mut QueryBuilder<'_, Postgres>, keys: &[OrderKey]) {
    qb.push(" ORDER BY ");
    for key in keys {
      qb.push(format!(
        "c.{} {}, ",
        key.column.column_name(),
        if key.descending { "DESC" } else { "ASC" }
      ));
    }
    qb.push("c.id ASC");
  }

  fn count_query(&self, filter: &CatalogFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {} c", self.table));
    self.push_filter(&mut qb, filter);
    qb
  }

  fn categories_sql(&self) -> String {
    format!(
      "SELECT category, COUNT(*) AS count FROM {} WHERE is_active = TRUE \
       GROUP BY category ORDER BY count DESC, category ASC",
      self.table
    )
  }
}

#[derive(FromRow)]
struct KitRow {
  #[sqlx(flatten)]
  kit: Kit,
  tags: Vec<String>,
  review_count: i64,
  review_sum: i64,
  total_orders: i64,
}

#[derive(FromRow)]
struct CourseRow {
  #[sqlx(flatten)]
  course: Course,
  instructor_first_name: Option<String>,
  instructor_last_name: Option<String>,
  instructor_bio: Option<String>,
  instructor_avatar_url: Option<String>,
  tags: Vec<String>,
  review_count: i64,
  review_sum: i64,
  total_enrollments: i64,
}

impl CourseRow {
  fn into_listing(self) -> CourseListing {
    let instructor = match (self.instructor_first_name, self.instructor_last_name) {
      (Some(first), Some(last)) => Some(InstructorView::new(
        &first,
        &last,
        self.instructor_bio,
        self.instructor_avatar_url,
      )),
      _ => None,
    };
    CourseListing {
      course: self.course,
      instructor,
      tags: self.tags,
      reviews: ReviewStats {
        count: self.review_count,
        sum: self.review_sum,
      },
      total_enrollments: self.total_enrollments,
    }
  }
}

fn kit_select() -> QueryBuilder<'static, Postgres> {
  QueryBuilder::new(format!(
    "SELECT c.*, {}, (SELECT COUNT(*) FROM orders o WHERE o.kit_id = c.id) AS total_orders FROM kits c",
    KITS.aggregate_columns()
  ))
}

fn course_select() -> QueryBuilder<'static, Postgres> {
  QueryBuilder::new(format!(
    "SELECT c.*, i.first_name AS instructor_first_name, i.last_name AS instructor_last_name, \
       i.bio AS instructor_bio, i.avatar_url AS instructor_avatar_url, {}, \
       (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id) AS total_enrollments \
     FROM courses c LEFT JOIN instructors i ON i.id = c.instructor_id",
    COURSES.aggregate_columns()
  ))
}

impl PgStore {
  /// Attaches images (ascending `sort_order`) to each kit row in one round trip.
  async fn kit_listings(&self, rows: Vec<KitRow>) -> CoreResult<Vec<KitListing>> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.kit.id).collect();
    let images = if ids.is_empty() {
      Vec::new()
    } else {
      sqlx::query_as::<_, KitImage>("SELECT * FROM kit_images WHERE kit_id = ANY($1) ORDER BY kit_id, sort_order, id")
        .bind(&ids)
        .fetch_all(self.pool())
        .await
        .map_err(db_err("load kit images"))?
    };

    let mut by_kit: HashMap<Uuid, Vec<KitImage>> = HashMap::new();
    for image in images {
      by_kit.entry(image.kit_id).or_default().push(image);
    }

    Ok(
      rows
        .into_iter()
        .map(|row| KitListing {
          images: by_kit.remove(&row.kit.id).unwrap_or_default(),
          tags: row.tags,
          reviews: ReviewStats {
            count: row.review_count,
            sum: row.review_sum,
          },
          total_orders: row.total_orders,
          kit: row.kit,
        })
        .collect(),
    )
  }
}

#[async_trait]
impl CatalogStore for PgStore {
  async fn find_kits(&self, query: &CatalogQuery) -> CoreResult<Vec<KitListing>> {
    let mut qb = kit_select();
    KITS.push_filter(&mut qb, &query.filter);
    KITS.push_order(&mut qb, &query.sort_by.order_keys(CatalogKind::Kit));
    qb.push(" LIMIT ");
    qb.push_bind(query.page.limit());
    qb.push(" OFFSET ");
    qb.push_bind(query.page.offset());

    let rows = qb
      .build_query_as::<KitRow>()
      .fetch_all(self.pool())
      .await
      .map_err(db_err("load kit page"))?;
    self.kit_listings(rows).await
  }

  async fn count_kits(&self, filter: &CatalogFilter) -> CoreResult<i64> {
    let mut qb = KITS.count_query(filter);
    let total = qb
      .build_query_scalar::<i64>()
      .fetch_one(self.pool())
      .await
      .map_err(db_err("count kits"))?;
    Ok(total)
  }

  async fn kit_categories(&self) -> CoreResult<Vec<CategoryCount>> {
    let sql = KITS.categories_sql();
    let counts = sqlx::query_as::<_, CategoryCount>(&sql)
      .fetch_all(self.pool())
      .await
      .map_err(db_err("aggregate kit categories"))?;
    Ok(counts)
  }

  async fn find_active_kit(&self, id: Uuid) -> CoreResult<Option<KitListing>> {
    let mut qb = kit_select();
    qb.push(" WHERE c.is_active = TRUE AND c.id = ");
    qb.push_bind(id);

    let row = qb
      .build_query_as::<KitRow>()
      .fetch_optional(self.pool())
      .await
      .map_err(db_err("load kit"))?;
    match row {
      Some(row) => Ok(self.kit_listings(vec![row]).await?.pop()),
      None => Ok(None),
    }
  }

  async fn find_kit(&self, id: Uuid) -> CoreResult<Option<Kit>> {
    sqlx::query_as::<_, Kit>("SELECT * FROM kits WHERE id = $1")
      .bind(id)
      .fetch_optional(self.pool())
      .await
      .map_err(db_err("find kit"))
  }

  async fn deactivate_kit(&self, id: Uuid) -> CoreResult<bool> {
    let result = sqlx::query("UPDATE kits SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE")
      .bind(id)
      .execute(self.pool())
      .await
      .map_err(db_err("deactivate kit"))?;
    Ok(result.rows_affected() == 1)
  }

  async fn find_courses(&self, query: &CatalogQuery) -> CoreResult<Vec<CourseListing>> {
    let mut qb = course_select();
    COURSES.push_filter(&mut qb, &query.filter);
    COURSES.push_order(&mut qb, &query.sort_by.order_keys(CatalogKind::Course));
    qb.push(" LIMIT ");
    qb.push_bind(query.page.limit());
    qb.push(" OFFSET ");
    qb.push_bind(query.page.offset());

    let rows = qb
      .build_query_as::<CourseRow>()
      .fetch_all(self.pool())
      .await
      .map_err(db_err("load course page"))?;
    Ok(rows.into_iter().map(CourseRow::into_listing).collect())
  }

  async fn count_courses(&self, filter: &CatalogFilter) -> CoreResult<i64> {
    let mut qb = COURSES.count_query(filter);
    let total = qb
      .build_query_scalar::<i64>()
      .fetch_one(self.pool())
      .await
      .map_err(db_err("count courses"))?;
    Ok(total)
  }

  async fn course_categories(&self) -> CoreResult<Vec<CategoryCount>> {
    let sql = COURSES.categories_sql();
    let counts = sqlx::query_as::<_, CategoryCount>(&sql)
      .fetch_all(self.pool())
      .await
      .map_err(db_err("aggregate course categories"))?;
    Ok(counts)
  }

  async fn find_active_course(&self, id: Uuid) -> CoreResult<Option<CourseListing>> {
    let mut qb = course_select();
    qb.push(" WHERE c.is_active = TRUE AND c.id = ");
    qb.push_bind(id);

    let row = qb
      .build_query_as::<CourseRow>()
      .fetch_optional(self.pool())
      .await
      .map_err(db_err("load course"))?;
    Ok(row.map(CourseRow::into_listing))
  }

  async fn find_course(&self, id: Uuid) -> CoreResult<Option<Course>> {
    sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
      .bind(id)
      .fetch_optional(self.pool())
      .await
      .map_err(db_err("find course"))
  }

  async fn deactivate_course(&self, id: Uuid) -> CoreResult<bool> {
    let result =
      sqlx::query("UPDATE courses SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE")
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(db_err("deactivate course"))?;
    Ok(result.rows_affected() == 1)
  }

  async fn course_modules(&self, course_id: Uuid) -> CoreResult<Vec<CourseModule>> {
    sqlx::query_as::<_, CourseModule>("SELECT * FROM course_modules WHERE course_id = $1 ORDER BY order_index, id")
      .bind(course_id)
      .fetch_all(self.pool())
      .await
      .map_err(db_err("load course modules"))
  }

  async fn recent_reviews(&self, subject: ReviewSubject, limit: i64) -> CoreResult<Vec<ReviewWithAuthor>> {
    let (column, id) = match subject {
      ReviewSubject::Kit(id) => ("kit_id", id),
      ReviewSubject::Course(id) => ("course_id", id),
    };
    let sql = format!(
      "SELECT r.id, r.rating, r.comment, r.created_at, u.first_name, u.last_name, u.avatar_url \
       FROM reviews r JOIN users u ON u.id = r.user_id \
       WHERE r.{column} = $1 ORDER BY r.created_at DESC, r.id LIMIT $2"
    );
    let reviews = sqlx::query_as::<_, ReviewWithAuthor>(&sql)
      .bind(id)
      .bind(limit)
      .fetch_all(self.pool())
      .await
      .map_err(db_err("load recent reviews"))?;
    Ok(reviews)
  }
}
