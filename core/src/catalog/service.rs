// core/src/catalog/service.rs

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::shape::{CategoryCount, CourseDetail, CourseDetailView, CourseSummary, KitDetail, KitDetailView, KitSummary};
use super::{CatalogQuery, PageInfo, Paged, DETAIL_REVIEW_LIMIT};
use crate::error::{CoreError, CoreResult};
use crate::identity::require_role;
use crate::models::{ReviewSubject, ReviewView, Role};
use crate::store::{CatalogStore, UserStore};

/// # Arguments
/// * `store`: Runs the page and count queries concurrently.
/// * `query`: Validated filter, sort and page.
///
/// # Returns
/// One page of active kits with pagination metadata.
#[instrument(name = "catalog::list_kits", skip(store))]
pub async fn list_kits<S>(store: &S, query: &CatalogQuery) -> CoreResult<Paged<KitSummary>>
where
  S: CatalogStore + ?Sized,
{
  let (listings, total) = tokio::try_join!(store.find_kits(query), store.count_kits(&query.filter))?;
  debug!(returned = listings.len(), total, "Kit page loaded.");

  Ok(Paged {
    items: listings.iter().map(KitSummary::from).collect(),
    pagination: PageInfo::new(query.page, total),
  })
}

#[instrument(name = "catalog::list_courses", skip(store))]
pub async fn list_courses<S>(store: &S, query: &CatalogQuery) -> CoreResult<Paged<CourseSummary>>
where
  S: CatalogStore + ?Sized,
{
  let (listings, total) = tokio::try_join!(store.find_courses(query), store.count_courses(&query.filter))?;
  debug!(returned = listings.len(), total, "Course page loaded.");

  Ok(Paged {
    items: listings.iter().map(CourseSummary::from).collect(),
    pagination: PageInfo::new(query.page, total),
  })
}

pub async fn kit_categories<S>(store: &S) -> CoreResult<Vec<CategoryCount>>
where
  S: CatalogStore + ?Sized,
{
  store.kit_categories().await
}

pub async fn course_categories<S>(store: &S) -> CoreResult<Vec<CategoryCount>>
where
  S: CatalogStore + ?Sized,
{
  store.course_categories().await
}

#[instrument(name = "catalog::get_kit", skip(store))]
pub async fn get_kit<S>(store: &S, id: Uuid) -> CoreResult<KitDetailView>
where
  S: CatalogStore + ?Sized,
{
  let (listing, reviews) = tokio::try_join!(
    store.find_active_kit(id),
    store.recent_reviews(ReviewSubject::Kit(id), DETAIL_REVIEW_LIMIT),
  )?;
  let listing = listing.ok_or_else(|| CoreError::NotFound("Kit not found".to_string()))?;

  Ok(KitDetailView {
    kit: KitDetail::from(listing),
    reviews: reviews.into_iter().map(ReviewView::from).collect(),
  })
}

#[instrument(name = "catalog::get_course", skip(store))]
pub async fn get_course<S>(store: &S, id: Uuid) -> CoreResult<CourseDetailView>
where
  S: CatalogStore + ?Sized,
{
  let (listing, modules, reviews) = tokio::try_join!(
    store.find_active_course(id),
    store.course_modules(id),
    store.recent_reviews(ReviewSubject::Course(id), DETAIL_REVIEW_LIMIT),
  )?;
  let listing = listing.ok_or_else(|| CoreError::NotFound("Course not found".to_string()))?;

  Ok(CourseDetailView {
    course: CourseDetail::from(listing),
    modules,
    reviews: reviews.into_iter().map(ReviewView::from).collect(),
  })
}

/// Soft delete. The kit keeps its orders and reviews but leaves every catalog read.
#[instrument(name = "catalog::deactivate_kit", skip(store))]
pub async fn deactivate_kit<S>(store: &S, actor_id: Uuid, id: Uuid) -> CoreResult<()>
where
  S: UserStore + CatalogStore + ?Sized,
{
  require_role(store, actor_id, &[Role::Admin]).await?;
  if !store.deactivate_kit(id).await? {
    return Err(CoreError::NotFound("Kit not found".to_string()));
  }
  info!(kit_id = %id, "Kit deactivated.");
  Ok(())
}

#[instrument(name = "catalog::deactivate_course", skip(store))]
pub async fn deactivate_course<S>(store: &S, actor_id: Uuid, id: Uuid) -> CoreResult<()>
where
  S: UserStore + CatalogStore + ?Sized,
{
  require_role(store, actor_id, &[Role::Admin]).await?;
  if !store.deactivate_course(id).await? {
    return Err(CoreError::NotFound("Course not found".to_string()));
  }
  info!(course_id = %id, "Course deactivated.");
  Ok(())
}
