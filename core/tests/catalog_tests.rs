// tests/catalog_tests.rs
mod common;
use common::*;
use qsat_core::catalog::{self, CatalogParams, CatalogQuery, SortBy};
use qsat_core::models::{Difficulty, ReviewSubject};
use qsat_core::{CoreError, MemoryStore};
use serial_test::serial;

fn query(params: CatalogParams) -> CatalogQuery {
  CatalogQuery::from_params(params).expect("valid catalog params")
}

#[tokio::test]
#[serial]
async fn test_pagination_over_twenty_five_kits() {
  setup_tracing();
  let store = MemoryStore::new();
  for i in 0..25 {
    kit(&store, &format!("Kit {i:02}"), 100 + i);
  }

  let first = catalog::list_kits(&store, &query(CatalogParams::default())).await.unwrap();
  assert_eq!(first.items.len(), 12);
  assert_eq!(first.pagination.total_items, 25);
  assert_eq!(first.pagination.total_pages, 3);
  assert_eq!(first.pagination.current_page, 1);
  assert_eq!(first.pagination.items_per_page, 12);

  let third = catalog::list_kits(
    &store,
    &query(CatalogParams {
      page: Some(3),
      ..Default::default()
    }),
  )
  .await
  .unwrap();
  assert_eq!(third.items.len(), 1);
  assert_eq!(third.pagination.current_page, 3);

  // Pages never overlap.
  let second = catalog::list_kits(
    &store,
    &query(CatalogParams {
      page: Some(2),
      ..Default::default()
    }),
  )
  .await
  .unwrap();
  let mut ids: Vec<_> = first
    .items
    .iter()
    .chain(&second.items)
    .chain(&third.items)
    .map(|k| k.id)
    .collect();
  ids.sort();
  ids.dedup();
  assert_eq!(ids.len(), 25);
}

#[tokio::test]
#[serial]
async fn test_filters_combine() {
  setup_tracing();
  let store = MemoryStore::new();
  let telescope = kit(&store, "QSAT Telescope Kit", 3499);
  store.tag_kit(telescope.id, "Telescope");
  store.tag_kit(telescope.id, "Astronomy");
  let rover = store.add_kit("Mars Rover", "Robotics", Difficulty::Advanced, dec(5000));
  store.tag_kit(rover.id, "Robotics");
  store.add_kit("Solar Cells", "Energy", Difficulty::Intermediate, dec(900));

  let by_search = catalog::list_kits(
    &store,
    &query(CatalogParams {
      search: Some("telescope".into()),
      ..Default::default()
    }),
  )
  .await
  .unwrap();
  assert_eq!(by_search.items.len(), 1);
  assert_eq!(by_search.items[0].id, telescope.id);
  assert_eq!(by_search.items[0].tags, vec!["Telescope", "Astronomy"]);

  let by_difficulty = catalog::list_kits(
    &store,
    &query(CatalogParams {
      difficulty: Some("Advanced".into()),
      category: Some("All".into()),
      ..Default::default()
    }),
  )
  .await
  .unwrap();
  assert_eq!(by_difficulty.items.len(), 1);
  assert_eq!(by_difficulty.items[0].id, rover.id);

  let by_tags = catalog::list_kits(
    &store,
    &query(CatalogParams {
      tags: Some("Robotics, Telescope".into()),
      sort_by: Some(SortBy::PriceLow),
      ..Default::default()
    }),
  )
  .await
  .unwrap();
  let names: Vec<_> = by_tags.items.iter().map(|k| k.name.as_str()).collect();
  assert_eq!(names, vec!["QSAT Telescope Kit", "Mars Rover"]);
  assert_eq!(by_tags.pagination.total_items, 2);

  let by_category = catalog::list_kits(
    &store,
    &query(CatalogParams {
      category: Some("Energy".into()),
      ..Default::default()
    }),
  )
  .await
  .unwrap();
  assert_eq!(by_category.items.len(), 1);
  assert_eq!(by_category.items[0].name, "Solar Cells");
}

#[tokio::test]
#[serial]
async fn test_sort_orders() {
  setup_tracing();
  let store = MemoryStore::new();
  let cheap = kit(&store, "Cheap", 100);
  let pricey = kit(&store, "Pricey", 900);
  let popular = kit(&store, "Popular", 500);
  store.update_kit(popular.id, |k| k.member_count = 250);

  let sorted = |sort_by| {
    let store = &store;
    async move {
      catalog::list_kits(
        store,
        &query(CatalogParams {
          sort_by: Some(sort_by),
          ..Default::default()
        }),
      )
      .await
      .unwrap()
      .items
      .into_iter()
      .map(|k| k.id)
      .collect::<Vec<_>>()
    }
  };

  assert_eq!(sorted(SortBy::PriceLow).await, vec![cheap.id, popular.id, pricey.id]);
  assert_eq!(sorted(SortBy::PriceHigh).await, vec![pricey.id, popular.id, cheap.id]);
  assert_eq!(sorted(SortBy::Newest).await, vec![popular.id, pricey.id, cheap.id]);
  assert_eq!(sorted(SortBy::Popular).await[0], popular.id);
}

#[tokio::test]
#[serial]
async fn test_detail_shapes_rating_images_and_reviews() {
  setup_tracing();
  let store = MemoryStore::new();
  let telescope = kit(&store, "QSAT Telescope Kit", 3499);
  store.add_kit_image(telescope.id, "side.png", false, 1);
  store.add_kit_image(telescope.id, "front.png", true, 0);

  let reviewer = student(&store, "reviewer@example.com");
  for rating in [5, 4, 3, 4, 4, 5] {
    store.add_review(reviewer.id, ReviewSubject::Kit(telescope.id), rating, Some("Clear views"));
  }

  let view = catalog::get_kit(&store, telescope.id).await.unwrap();
  assert_eq!(view.kit.summary.image_url.as_deref(), Some("front.png"));
  assert_eq!(view.kit.images[0].url, "front.png");
  assert_eq!(view.kit.review_count, 6);
  assert_eq!(view.kit.summary.rating, 4.2);
  assert_eq!(view.reviews.len(), 5);
  assert_eq!(view.reviews[0].user.name, "Sam Student");

  let json = serde_json::to_value(&view).unwrap();
  assert_eq!(json["kit"]["price"], serde_json::json!(3499.0));
  assert_eq!(json["kit"]["members"], json["kit"]["memberCount"]);
  assert_eq!(json["kit"]["images"][0]["order"], serde_json::json!(0));
}

#[tokio::test]
#[serial]
async fn test_kit_without_reviews_rates_zero() {
  setup_tracing();
  let store = MemoryStore::new();
  let telescope = kit(&store, "QSAT Telescope Kit", 3499);

  let view = catalog::get_kit(&store, telescope.id).await.unwrap();
  assert_eq!(view.kit.summary.rating, 0.0);
  assert_eq!(view.kit.summary.image_url, None);
  assert!(view.reviews.is_empty());
}

#[tokio::test]
#[serial]
async fn test_soft_deleted_items_disappear_everywhere() {
  setup_tracing();
  let store = MemoryStore::new();
  let root = admin(&store);
  let kept = kit(&store, "Kept", 100);
  let removed = kit(&store, "Removed", 200);
  let course = store.add_course("Astronomy 101", "Astronomy", Difficulty::Beginner, dec(1999));

  catalog::deactivate_kit(&store, root.id, removed.id).await.unwrap();
  catalog::deactivate_course(&store, root.id, course.id).await.unwrap();

  let page = catalog::list_kits(&store, &CatalogQuery::default()).await.unwrap();
  assert_eq!(page.items.iter().map(|k| k.id).collect::<Vec<_>>(), vec![kept.id]);
  assert_eq!(page.pagination.total_items, 1);

  assert!(matches!(
    catalog::get_kit(&store, removed.id).await,
    Err(CoreError::NotFound(_))
  ));
  assert!(matches!(
    catalog::get_course(&store, course.id).await,
    Err(CoreError::NotFound(_))
  ));
  assert!(catalog::list_courses(&store, &CatalogQuery::default())
    .await
    .unwrap()
    .items
    .is_empty());

  // Deleting twice reports the kit as gone.
  assert!(matches!(
    catalog::deactivate_kit(&store, root.id, removed.id).await,
    Err(CoreError::NotFound(_))
  ));
}

#[tokio::test]
#[serial]
async fn test_soft_deleted_items_stay_hidden_under_every_filter_and_sort() {
  setup_tracing();
  let store = MemoryStore::new();
  let root = admin(&store);

  let kept_kit = store.add_kit("Telescope Alpha", "Astronomy", Difficulty::Beginner, dec(100));
  let removed_kit = store.add_kit("Telescope Beta", "Astronomy", Difficulty::Beginner, dec(200));
  let kept_course = store.add_course("Telescope Basics", "Astronomy", Difficulty::Beginner, dec(300));
  let removed_course = store.add_course("Telescope Mastery", "Astronomy", Difficulty::Beginner, dec(400));
  for id in [kept_kit.id, removed_kit.id] {
    store.tag_kit(id, "Optics");
  }
  for id in [kept_course.id, removed_course.id] {
    store.tag_course(id, "Optics");
  }
  // The removed rows would otherwise lead every ordering.
  store.update_kit(removed_kit.id, |k| k.member_count = 999);
  let reviewer = student(&store, "reviewer@example.com");
  store.add_review(reviewer.id, ReviewSubject::Kit(removed_kit.id), 5, None);
  store.add_review(reviewer.id, ReviewSubject::Course(removed_course.id), 5, None);

  catalog::deactivate_kit(&store, root.id, removed_kit.id).await.unwrap();
  catalog::deactivate_course(&store, root.id, removed_course.id).await.unwrap();

  let filters = [
    CatalogParams::default(),
    CatalogParams {
      search: Some("telescope".into()),
      ..Default::default()
    },
    CatalogParams {
      category: Some("Astronomy".into()),
      ..Default::default()
    },
    CatalogParams {
      difficulty: Some("Beginner".into()),
      ..Default::default()
    },
    CatalogParams {
      tags: Some("Optics".into()),
      ..Default::default()
    },
    CatalogParams {
      search: Some("Telescope".into()),
      category: Some("Astronomy".into()),
      difficulty: Some("Beginner".into()),
      tags: Some("Optics".into()),
      ..Default::default()
    },
  ];
  let sorts = [
    SortBy::Popular,
    SortBy::PriceLow,
    SortBy::PriceHigh,
    SortBy::Rating,
    SortBy::Newest,
  ];

  for filter in &filters {
    for sort_by in sorts {
      let q = query(CatalogParams {
        sort_by: Some(sort_by),
        ..filter.clone()
      });

      let kits = catalog::list_kits(&store, &q).await.unwrap();
      let kit_ids: Vec<_> = kits.items.iter().map(|k| k.id).collect();
      assert_eq!(kit_ids, vec![kept_kit.id], "kits with {filter:?} sorted by {sort_by:?}");
      assert_eq!(kits.pagination.total_items, 1);

      let courses = catalog::list_courses(&store, &q).await.unwrap();
      let course_ids: Vec<_> = courses.items.iter().map(|c| c.id).collect();
      assert_eq!(course_ids, vec![kept_course.id], "courses with {filter:?} sorted by {sort_by:?}");
      assert_eq!(courses.pagination.total_items, 1);
    }
  }

  assert!(matches!(
    catalog::get_kit(&store, removed_kit.id).await,
    Err(CoreError::NotFound(_))
  ));
  assert!(matches!(
    catalog::get_course(&store, removed_course.id).await,
    Err(CoreError::NotFound(_))
  ));
  let categories = catalog::kit_categories(&store).await.unwrap();
  assert_eq!(categories[0].count, 1);
}

#[tokio::test]
#[serial]
async fn test_deactivation_requires_admin() {
  setup_tracing();
  let store = MemoryStore::new();
  let user = student(&store, "sam@example.com");
  let telescope = kit(&store, "QSAT Telescope Kit", 3499);

  let err = catalog::deactivate_kit(&store, user.id, telescope.id).await.unwrap_err();
  assert!(matches!(err, CoreError::Forbidden(_)));
  assert!(catalog::get_kit(&store, telescope.id).await.is_ok());
}

#[tokio::test]
#[serial]
async fn test_categories_count_active_rows_only() {
  setup_tracing();
  let store = MemoryStore::new();
  store.add_kit("A", "Astronomy", Difficulty::Beginner, dec(1));
  store.add_kit("B", "Astronomy", Difficulty::Beginner, dec(1));
  store.add_kit("C", "Robotics", Difficulty::Beginner, dec(1));
  let hidden = store.add_kit("D", "Energy", Difficulty::Beginner, dec(1));
  store.update_kit(hidden.id, |k| k.is_active = false);

  let categories = catalog::kit_categories(&store).await.unwrap();
  let pairs: Vec<_> = categories.iter().map(|c| (c.category.as_str(), c.count)).collect();
  assert_eq!(pairs, vec![("Astronomy", 2), ("Robotics", 1)]);
}

#[tokio::test]
#[serial]
async fn test_course_detail_includes_instructor_and_ordered_modules() {
  setup_tracing();
  let store = MemoryStore::new();
  let sarah = store.add_user("Sarah", "Johnson", "instructor@example.com", qsat_core::models::Role::Instructor);
  let instructor = store.add_instructor(sarah.id, "Sarah", "Johnson");
  let course = store.add_course("Astronomy 101", "Astronomy", Difficulty::Beginner, dec(1999));
  store.update_course(course.id, |c| c.instructor_id = Some(instructor.id));
  store.add_course_module(course.id, "Observing the Moon", 2, false);
  store.add_course_module(course.id, "Meet the night sky", 0, true);
  store.add_course_module(course.id, "Assembling your telescope", 1, false);
  store.tag_course(course.id, "Astronomy");

  let view = catalog::get_course(&store, course.id).await.unwrap();
  let titles: Vec<_> = view.modules.iter().map(|m| m.title.as_str()).collect();
  assert_eq!(
    titles,
    vec!["Meet the night sky", "Assembling your telescope", "Observing the Moon"]
  );
  let instructor = view.course.summary.instructor.as_ref().unwrap();
  assert_eq!(instructor.name, "Sarah Johnson");
  assert_eq!(view.course.summary.slug, "astronomy-101");
  assert_eq!(view.course.summary.tags, vec!["Astronomy"]);

  let listed = catalog::list_courses(&store, &CatalogQuery::default()).await.unwrap();
  assert_eq!(listed.items.len(), 1);
  assert_eq!(listed.items[0].total_enrollments, 0);
}

#[test]
fn test_invalid_params_are_rejected_before_any_store_call() {
  let err = CatalogQuery::from_params(CatalogParams {
    limit: Some(51),
    ..Default::default()
  })
  .unwrap_err();
  assert!(matches!(err, CoreError::Validation { .. }));
}
