// core/src/models/kit.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Shared by kits and courses. Stored and serialized with its capitalized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "difficulty_level")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

impl Difficulty {
  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Beginner => "Beginner",
      Difficulty::Intermediate => "Intermediate",
      Difficulty::Advanced => "Advanced",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Difficulty {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Beginner" => Ok(Difficulty::Beginner),
      "Intermediate" => Ok(Difficulty::Intermediate),
      "Advanced" => Ok(Difficulty::Advanced),
      other => Err(format!(
        "Invalid difficulty '{}'. Expected Beginner, Intermediate, Advanced or All",
        other
      )),
    }
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct Kit {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub original_price: Option<Decimal>,
  pub category: String,
  pub difficulty: Difficulty,
  pub duration: Option<String>,
  pub modules: i32,
  pub image_url: Option<String>,
  pub features: Vec<String>,
  pub specifications: Json<serde_json::Value>,
  pub what_includes: Vec<String>,
  pub member_count: i32,
  pub stock: i32,
  /// Soft-delete flag. Inactive kits are invisible to catalog reads.
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct KitImage {
  pub id: Uuid,
  #[serde(skip_serializing)]
  pub kit_id: Uuid,
  pub url: String,
  pub is_primary: bool,
  #[serde(rename = "order")]
  pub sort_order: i32,
}
