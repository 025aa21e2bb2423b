// tests/order_tests.rs
mod common;
use common::*;
use qsat_core::models::OrderStatus;
use qsat_core::orders::{self, CreateOrderRequest, ListOrdersParams, UpdateOrderStatusRequest};
use qsat_core::{CoreError, MemoryStore};
use rust_decimal::Decimal;
use serial_test::serial;
use uuid::Uuid;

fn order_request(kit_id: Uuid, quantity: u32) -> CreateOrderRequest {
  CreateOrderRequest {
    kit_id,
    quantity,
    shipping_address: address(),
  }
}

#[tokio::test]
#[serial]
async fn test_order_totals_follow_pricing_rules() {
  setup_tracing();
  let store = MemoryStore::new();
  let buyer = student(&store, "buyer@example.com");

  let cases = [
    (1500, 1, (1500, 270, 150, 1920)),
    (1200, 2, (2400, 432, 0, 2832)),
    (1000, 3, (3000, 540, 0, 3540)),
  ];
  for (price, quantity, (subtotal, tax, shipping, total)) in cases {
    let item = kit(&store, &format!("Kit at {price}"), price);
    let receipt = orders::create_order(&store, buyer.id, order_request(item.id, quantity))
      .await
      .unwrap();
    assert_eq!(receipt.pricing.subtotal, dec(subtotal));
    assert_eq!(receipt.pricing.tax, dec(tax));
    assert_eq!(receipt.pricing.shipping, dec(shipping));
    assert_eq!(receipt.pricing.total, dec(total));
    assert_eq!(receipt.status, OrderStatus::Pending);
    assert_eq!(receipt.kit_name, item.name);
  }
}

#[tokio::test]
#[serial]
async fn test_order_amounts_are_frozen_at_creation() {
  setup_tracing();
  let store = MemoryStore::new();
  let buyer = student(&store, "buyer@example.com");
  let item = kit(&store, "Telescope", 1500);

  let receipt = orders::create_order(&store, buyer.id, order_request(item.id, 1))
    .await
    .unwrap();
  store.update_kit(item.id, |k| k.price = dec(9999));

  let fetched = orders::get_order(&store, buyer.id, receipt.id).await.unwrap();
  assert_eq!(fetched.pricing.total, dec(1920));
  assert_eq!(fetched.kit.description.as_deref(), Some("Telescope kit"));
}

#[tokio::test]
#[serial]
async fn test_missing_and_inactive_kits_are_rejected() {
  setup_tracing();
  let store = MemoryStore::new();
  let buyer = student(&store, "buyer@example.com");
  let item = kit(&store, "Retired", 1500);
  store.update_kit(item.id, |k| k.is_active = false);

  let err = orders::create_order(&store, buyer.id, order_request(Uuid::new_v4(), 1))
    .await
    .unwrap_err();
  match err {
    CoreError::NotFound(msg) => assert_eq!(msg, "Kit not found"),
    other => panic!("Expected NotFound, got {:?}", other),
  }

  let err = orders::create_order(&store, buyer.id, order_request(item.id, 1))
    .await
    .unwrap_err();
  match err {
    CoreError::Unavailable(msg) => assert_eq!(msg, "Kit is not available for purchase"),
    other => panic!("Expected Unavailable, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_quantity_and_address_are_validated() {
  setup_tracing();
  let store = MemoryStore::new();
  let buyer = student(&store, "buyer@example.com");
  let item = kit(&store, "Telescope", 1500);

  let mut req = order_request(item.id, 11);
  req.shipping_address.zip_code.clear();
  let err = orders::create_order(&store, buyer.id, req).await.unwrap_err();
  match err {
    CoreError::Validation { errors, .. } => {
      let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
      assert_eq!(paths, vec!["quantity", "shippingAddress.zipCode"]);
    }
    other => panic!("Expected Validation, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_other_users_order_is_not_found() {
  setup_tracing();
  let store = MemoryStore::new();
  let owner = student(&store, "owner@example.com");
  let intruder = student(&store, "intruder@example.com");
  let item = kit(&store, "Telescope", 1500);

  let receipt = orders::create_order(&store, owner.id, order_request(item.id, 1))
    .await
    .unwrap();

  assert!(orders::get_order(&store, owner.id, receipt.id).await.is_ok());
  match orders::get_order(&store, intruder.id, receipt.id).await {
    Err(CoreError::NotFound(msg)) => assert_eq!(msg, "Order not found"),
    other => panic!("Expected NotFound, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_order_history_is_newest_first_and_filterable() {
  setup_tracing();
  let store = MemoryStore::new();
  let buyer = student(&store, "buyer@example.com");
  let item = kit(&store, "Telescope", 100);

  let mut ids = Vec::new();
  for _ in 0..12 {
    let receipt = orders::create_order(&store, buyer.id, order_request(item.id, 1))
      .await
      .unwrap();
    ids.push(receipt.id);
  }
  store.set_order_status(ids[0], OrderStatus::Delivered);

  let page = orders::list_orders(&store, buyer.id, ListOrdersParams::default())
    .await
    .unwrap();
  assert_eq!(page.items.len(), 10);
  assert_eq!(page.pagination.total_items, 12);
  assert_eq!(page.pagination.total_pages, 2);
  assert_eq!(page.items[0].id, ids[11]);
  assert!(page.items[0].kit.description.is_none());

  let delivered = orders::list_orders(
    &store,
    buyer.id,
    ListOrdersParams {
      status: Some(OrderStatus::Delivered),
      ..Default::default()
    },
  )
  .await
  .unwrap();
  assert_eq!(delivered.items.len(), 1);
  assert_eq!(delivered.items[0].id, ids[0]);

  let err = orders::list_orders(
    &store,
    buyer.id,
    ListOrdersParams {
      limit: Some(51),
      ..Default::default()
    },
  )
  .await
  .unwrap_err();
  assert!(matches!(err, CoreError::Validation { .. }));
}

#[tokio::test]
#[serial]
async fn test_status_update_is_admin_only_and_keeps_amounts() {
  setup_tracing();
  let store = MemoryStore::new();
  let buyer = student(&store, "buyer@example.com");
  let root = admin(&store);
  let item = kit(&store, "Telescope", 1500);
  let receipt = orders::create_order(&store, buyer.id, order_request(item.id, 1))
    .await
    .unwrap();

  let req = UpdateOrderStatusRequest {
    status: OrderStatus::Shipped,
    tracking_number: Some("TRK-1".into()),
  };
  let err = orders::update_order_status(&store, buyer.id, receipt.id, req.clone())
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Forbidden(_)));

  let updated = orders::update_order_status(&store, root.id, receipt.id, req).await.unwrap();
  assert_eq!(updated.status, OrderStatus::Shipped);
  assert_eq!(updated.tracking_number.as_deref(), Some("TRK-1"));

  let fetched = orders::get_order(&store, buyer.id, receipt.id).await.unwrap();
  assert_eq!(fetched.status, OrderStatus::Shipped);
  assert_eq!(fetched.pricing.total, Decimal::from(1920));

  let missing = orders::update_order_status(
    &store,
    root.id,
    Uuid::new_v4(),
    UpdateOrderStatusRequest {
      status: OrderStatus::Delivered,
      tracking_number: None,
    },
  )
  .await;
  assert!(matches!(missing, Err(CoreError::NotFound(_))));
}
