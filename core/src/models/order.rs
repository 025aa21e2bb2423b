// core/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Confirmed,
  Shipped,
  Delivered,
  Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
  #[validate(length(min = 1, message = "Street is required"))]
  pub street: String,
  #[validate(length(min = 1, message = "City is required"))]
  pub city: String,
  #[validate(length(min = 1, message = "State is required"))]
  pub state: String,
  #[validate(length(min = 1, message = "Zip code is required"))]
  pub zip_code: String,
  #[validate(length(min = 1, message = "Country is required"))]
  pub country: String,
}

/// A placed order. The four money columns are what was charged at creation
/// time and are never recomputed from the kit's current price.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub kit_id: Uuid,
  pub quantity: i32,
  pub subtotal: Decimal,
  pub tax: Decimal,
  pub shipping: Decimal,
  pub total: Decimal,
  pub status: OrderStatus,
  pub shipping_address: Json<ShippingAddress>,
  pub tracking_number: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// An order joined with the display fields of its kit.
#[derive(Debug, Clone, FromRow)]
pub struct OrderWithKit {
  #[sqlx(flatten)]
  pub order: Order,
  pub kit_name: String,
  pub kit_image_url: Option<String>,
  pub kit_description: String,
}
