// core/src/store/postgres/seed.rs

//! Demo data for local development. Safe to run on every start.

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{Postgres, Transaction};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{db_err, PgStore};
use crate::error::CoreResult;
use crate::identity::password::hash_password;
use crate::models::{Difficulty, OrderStatus, Role, ShippingAddress, Tag};
use crate::pricing::OrderPricing;

pub const DEMO_PASSWORD: &str = "Password123!";
pub const DEMO_STUDENT_EMAIL: &str = "student@example.com";
pub const DEMO_INSTRUCTOR_EMAIL: &str = "instructor@example.com";

const TELESCOPE_KIT: &str = "QSAT Telescope Kit";
const TELESCOPE_IMAGE: &str =
  "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/image-lrPaaonoR6lgHP0vgIkA6yfwkOR3z1.png";
const ASTRONOMY_COURSE: &str = "Astronomy for Young Explorers";

/// Inserts the demo student, instructor, telescope kit, a course and one order.
/// Skips everything when the demo student already exists.
#[instrument(name = "store::seed_demo_data", skip(store))]
pub async fn seed_demo_data(store: &PgStore) -> CoreResult<()> {
  let seeded = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
    .bind(DEMO_STUDENT_EMAIL)
    .fetch_one(store.pool())
    .await
    .map_err(db_err("check demo data"))?;
  if seeded {
    info!("Demo data already present, skipping seed.");
    return Ok(());
  }

  let password_hash = hash_password(DEMO_PASSWORD.to_string()).await?;
  let mut tx = store.pool().begin().await.map_err(db_err("begin seed"))?;

  let student_id = insert_user(&mut tx, "Student", "User", DEMO_STUDENT_EMAIL, &password_hash, Role::Student).await?;
  let instructor_user_id = insert_user(
    &mut tx,
    "Sarah",
    "Johnson",
    DEMO_INSTRUCTOR_EMAIL,
    &password_hash,
    Role::Instructor,
  )
  .await?;

  let instructor_id = Uuid::new_v4();
  sqlx::query(
    "INSERT INTO instructors (id, user_id, first_name, last_name, bio, expertise) VALUES ($1, $2, $3, $4, $5, $6)",
  )
  .bind(instructor_id)
  .bind(instructor_user_id)
  .bind("Sarah")
  .bind("Johnson")
  .bind("Former NASA Engineer")
  .bind(vec!["Astronomy".to_string(), "Optics".to_string()])
  .execute(&mut *tx)
  .await
  .map_err(db_err("insert demo instructor"))?;

  let telescope_tag = upsert_tag(&mut tx, "Telescope").await?;
  let astronomy_tag = upsert_tag(&mut tx, "Astronomy").await?;

  let kit_id = Uuid::new_v4();
  let kit_price = Decimal::new(3499, 0);
  sqlx::query(
    "INSERT INTO kits (id, name, description, price, original_price, category, difficulty, duration, modules, \
       image_url, features, specifications, what_includes, member_count, stock) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
  )
  .bind(kit_id)
  .bind(TELESCOPE_KIT)
  .bind(
    "This kit comes with all the parts you need. Kids can assemble it step by step and learn how a telescope \
     works. Once built, you can use it to observe the Moon, stars, and planets.",
  )
  .bind(kit_price)
  .bind(Decimal::new(3999, 0))
  .bind("Astronomy")
  .bind(Difficulty::Beginner)
  .bind("4-6 hours")
  .bind(6_i32)
  .bind(TELESCOPE_IMAGE)
  .bind(vec![
    "Stable Alt-Az Mount".to_string(),
    "Quick-Start Guide".to_string(),
    "Finder Scope".to_string(),
    "Adjustable Tripod".to_string(),
  ])
  .bind(Json(serde_json::json!({ "aperture": "70mm", "focalLength": "700mm" })))
  .bind(vec![
    "Optical Tube Assembly".to_string(),
    "Finder scope".to_string(),
    "Alt-Az mount & tripod".to_string(),
    "Eyepieces (10mm & 25mm)".to_string(),
    "Quick-start guide".to_string(),
  ])
  .bind(250_i32)
  .bind(40_i32)
  .execute(&mut *tx)
  .await
  .map_err(db_err("insert demo kit"))?;

  sqlx::query("INSERT INTO kit_images (id, kit_id, url, is_primary, sort_order) VALUES ($1, $2, $3, TRUE, 0)")
    .bind(Uuid::new_v4())
    .bind(kit_id)
    .bind(TELESCOPE_IMAGE)
    .execute(&mut *tx)
    .await
    .map_err(db_err("insert demo kit image"))?;

  for tag_id in [telescope_tag, astronomy_tag] {
    sqlx::query("INSERT INTO kit_tags (kit_id, tag_id) VALUES ($1, $2)")
      .bind(kit_id)
      .bind(tag_id)
      .execute(&mut *tx)
      .await
      .map_err(db_err("tag demo kit"))?;
  }

  let course_id = Uuid::new_v4();
  sqlx::query(
    "INSERT INTO courses (id, slug, name, description, price, category, difficulty, duration, modules, \
       what_you_learn, requirements, instructor_id) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
  )
  .bind(course_id)
  .bind(Tag::slugify(ASTRONOMY_COURSE))
  .bind(ASTRONOMY_COURSE)
  .bind("Find your way around the night sky and get the most out of a small telescope.")
  .bind(Decimal::new(1999, 0))
  .bind("Astronomy")
  .bind(Difficulty::Beginner)
  .bind("3 weeks")
  .bind(3_i32)
  .bind(vec![
    "Read a star chart".to_string(),
    "Align and focus a telescope".to_string(),
  ])
  .bind(vec!["A QSAT Telescope Kit or similar".to_string()])
  .bind(instructor_id)
  .execute(&mut *tx)
  .await
  .map_err(db_err("insert demo course"))?;

  for (index, title) in ["Meet the night sky", "Assembling your telescope", "Observing the Moon"]
    .into_iter()
    .enumerate()
  {
    sqlx::query(
      "INSERT INTO course_modules (id, course_id, title, order_index, is_free) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(course_id)
    .bind(title)
    .bind(index as i32)
    .bind(index == 0)
    .execute(&mut *tx)
    .await
    .map_err(db_err("insert demo course module"))?;
  }

  sqlx::query("INSERT INTO course_tags (course_id, tag_id) VALUES ($1, $2)")
    .bind(course_id)
    .bind(astronomy_tag)
    .execute(&mut *tx)
    .await
    .map_err(db_err("tag demo course"))?;

  let pricing = OrderPricing::compute(kit_price, 1);
  let address = ShippingAddress {
    street: "123 Street".to_string(),
    city: "Bengaluru".to_string(),
    state: "KA".to_string(),
    zip_code: "560001".to_string(),
    country: "IN".to_string(),
  };
  sqlx::query(
    "INSERT INTO orders (id, user_id, kit_id, quantity, subtotal, tax, shipping, total, status, shipping_address) \
     VALUES ($1, $2, $3, 1, $4, $5, $6, $7, $8, $9)",
  )
  .bind(Uuid::new_v4())
  .bind(student_id)
  .bind(kit_id)
  .bind(pricing.subtotal)
  .bind(pricing.tax)
  .bind(pricing.shipping)
  .bind(pricing.total)
  .bind(OrderStatus::Pending)
  .bind(Json(address))
  .execute(&mut *tx)
  .await
  .map_err(db_err("insert demo order"))?;

  tx.commit().await.map_err(db_err("commit seed"))?;
  info!("Demo data seeded.");
  Ok(())
}

async fn insert_user(
  tx: &mut Transaction<'_, Postgres>,
  first_name: &str,
  last_name: &str,
  email: &str,
  password_hash: &str,
  role: Role,
) -> CoreResult<Uuid> {
  let id = Uuid::new_v4();
  sqlx::query("INSERT INTO users (id, first_name, last_name, email, password_hash, role) VALUES ($1, $2, $3, $4, $5, $6)")
    .bind(id)
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .execute(&mut **tx)
    .await
    .map_err(db_err("insert demo user"))?;
  Ok(id)
}

async fn upsert_tag(tx: &mut Transaction<'_, Postgres>, name: &str) -> CoreResult<Uuid> {
  sqlx::query_scalar::<_, Uuid>(
    "INSERT INTO tags (id, name, slug) VALUES ($1, $2, $3) \
     ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id",
  )
  .bind(Uuid::new_v4())
  .bind(name)
  .bind(Tag::slugify(name))
  .fetch_one(&mut **tx)
  .await
  .map_err(db_err("upsert tag"))
}
