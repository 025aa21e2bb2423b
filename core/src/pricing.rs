// core/src/pricing.rs

//! Order totals. The formula is fixed: 18% tax, flat 150 shipping, free above 2000.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

use crate::models::ShippingAddress;

/// Tax rate applied to the subtotal (18%).
pub fn tax_rate() -> Decimal {
  Decimal::new(18, 2)
}

/// Subtotals strictly above this ship for free.
pub fn free_shipping_threshold() -> Decimal {
  Decimal::new(2000, 0)
}

pub fn flat_shipping() -> Decimal {
  Decimal::new(150, 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderPricing {
  #[serde(with = "rust_decimal::serde::float")]
  pub subtotal: Decimal,
  #[serde(with = "rust_decimal::serde::float")]
  pub tax: Decimal,
  #[serde(with = "rust_decimal::serde::float")]
  pub shipping: Decimal,
  #[serde(with = "rust_decimal::serde::float")]
  pub total: Decimal,
}

impl OrderPricing {
  /// Tax is rounded to cents before it enters the total, so the four stored
  /// columns always add up exactly.
  pub fn compute(unit_price: Decimal, quantity: u32) -> Self {
    let subtotal = unit_price * Decimal::from(quantity);
    let tax = (subtotal * tax_rate()).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let shipping = if subtotal > free_shipping_threshold() {
      Decimal::ZERO
    } else {
      flat_shipping()
    };
    Self {
      subtotal,
      tax,
      shipping,
      total: subtotal + tax + shipping,
    }
  }
}

/// Insert payload for an order whose money columns are already frozen.
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub user_id: Uuid,
  pub kit_id: Uuid,
  pub quantity: i32,
  pub pricing: OrderPricing,
  pub shipping_address: ShippingAddress,
}
