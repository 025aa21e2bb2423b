// core/src/orders.rs

//! Order placement and a user's own order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::catalog::{PageInfo, PageRequest, Paged};
use crate::error::{CoreError, CoreResult};
use crate::identity::require_role;
use crate::models::{Order, OrderStatus, OrderWithKit, Role, ShippingAddress};
use crate::pricing::{NewOrder, OrderPricing};
use crate::store::{CatalogStore, OrderStore, UserStore};

pub const DEFAULT_ORDER_PAGE_SIZE: u32 = 10;

fn default_quantity() -> u32 {
  1
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
  pub kit_id: Uuid,
  #[serde(default = "default_quantity")]
  #[validate(range(min = 1, max = 10, message = "Quantity must be between 1 and 10"))]
  pub quantity: u32,
  #[validate(nested)]
  pub shipping_address: ShippingAddress,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersParams {
  #[validate(range(min = 1, message = "page must be a positive integer"))]
  pub page: Option<u32>,
  #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
  pub limit: Option<u32>,
  pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
  pub status: OrderStatus,
  #[validate(length(min = 1, max = 100, message = "Tracking number must be 1-100 characters"))]
  pub tracking_number: Option<String>,
}

/// Echo of a freshly created order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
  pub id: Uuid,
  pub kit_id: Uuid,
  pub kit_name: String,
  pub quantity: i32,
  #[serde(flatten)]
  pub pricing: OrderPricing,
  pub status: OrderStatus,
  pub shipping_address: ShippingAddress,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderKit {
  pub id: Uuid,
  pub name: String,
  pub image_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
  pub id: Uuid,
  pub kit: OrderKit,
  pub quantity: i32,
  #[serde(flatten)]
  pub pricing: OrderPricing,
  pub status: OrderStatus,
  pub shipping_address: ShippingAddress,
  pub tracking_number: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl OrderView {
  fn from_row(row: OrderWithKit, with_description: bool) -> Self {
    let OrderWithKit {
      order,
      kit_name,
      kit_image_url,
      kit_description,
    } = row;
    Self {
      id: order.id,
      kit: OrderKit {
        id: order.kit_id,
        name: kit_name,
        image_url: kit_image_url,
        description: with_description.then_some(kit_description),
      },
      quantity: order.quantity,
      pricing: stored_pricing(&order),
      status: order.status,
      shipping_address: order.shipping_address.0,
      tracking_number: order.tracking_number,
      created_at: order.created_at,
      updated_at: order.updated_at,
    }
  }
}

/// The charged amounts exactly as persisted.
fn stored_pricing(order: &Order) -> OrderPricing {
  OrderPricing {
    subtotal: order.subtotal,
    tax: order.tax,
    shipping: order.shipping,
    total: order.total,
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusView {
  pub id: Uuid,
  pub status: OrderStatus,
  pub tracking_number: Option<String>,
  pub updated_at: DateTime<Utc>,
}

/// Places an order for one kit.
///
/// The active check and the insert are two separate statements; a kit
/// deactivated in between still gets the order.
///
/// # Arguments
/// * `store`: Supplies the kit and persists the order.
/// * `user_id`: The authenticated buyer.
/// * `req`: Kit id, quantity (1-10) and shipping address.
///
/// # Returns
/// The stored order with its frozen amounts. `CoreError::NotFound` for an unknown
/// kit, `CoreError::Unavailable` for a deactivated one.
#[instrument(name = "orders::create", skip(store, req), fields(kit_id = %req.kit_id, quantity = req.quantity))]
pub async fn create_order<S>(store: &S, user_id: Uuid, req: CreateOrderRequest) -> CoreResult<OrderReceipt>
where
  S: CatalogStore + OrderStore + ?Sized,
{
  req.validate()?;

  let kit = store
    .find_kit(req.kit_id)
    .await?
    .ok_or_else(|| CoreError::NotFound("Kit not found".to_string()))?;
  if !kit.is_active {
    warn!("Order attempted for inactive kit.");
    return Err(CoreError::Unavailable("Kit is not available for purchase".to_string()));
  }

  let pricing = OrderPricing::compute(kit.price, req.quantity);
  let order = store
    .insert_order(NewOrder {
      user_id,
      kit_id: kit.id,
      quantity: req.quantity as i32,
      pricing,
      shipping_address: req.shipping_address,
    })
    .await?;

  info!(order_id = %order.id, total = %order.total, "Order created.");
  Ok(OrderReceipt {
    id: order.id,
    kit_id: order.kit_id,
    kit_name: kit.name,
    quantity: order.quantity,
    pricing: stored_pricing(&order),
    status: order.status,
    shipping_address: order.shipping_address.0,
    created_at: order.created_at,
  })
}

#[instrument(name = "orders::list", skip(store))]
pub async fn list_orders<S>(store: &S, user_id: Uuid, params: ListOrdersParams) -> CoreResult<Paged<OrderView>>
where
  S: OrderStore + ?Sized,
{
  params.validate()?;
  let page = PageRequest::new(
    params.page.unwrap_or(1),
    params.limit.unwrap_or(DEFAULT_ORDER_PAGE_SIZE),
  );

  let (rows, total) = tokio::try_join!(
    store.find_orders(user_id, params.status, page),
    store.count_orders(user_id, params.status),
  )?;

  Ok(Paged {
    items: rows.into_iter().map(|r| OrderView::from_row(r, false)).collect(),
    pagination: PageInfo::new(page, total),
  })
}

/// Another user's order is indistinguishable from a missing one.
#[instrument(name = "orders::get", skip(store))]
pub async fn get_order<S>(store: &S, user_id: Uuid, order_id: Uuid) -> CoreResult<OrderView>
where
  S: OrderStore + ?Sized,
{
  store
    .find_order(user_id, order_id)
    .await?
    .map(|r| OrderView::from_row(r, true))
    .ok_or_else(|| CoreError::NotFound("Order not found".to_string()))
}

/// Admin-only fulfilment update. The charged amounts are left untouched.
///
/// # Arguments
/// * `actor_id`: Must resolve to an admin.
/// * `order_id`: Any user's order.
/// * `req`: New status and, optionally, a tracking number.
///
/// # Returns
/// The updated status fields, `CoreError::Forbidden` for non-admins, or
/// `CoreError::NotFound` when no order has that id.
#[instrument(name = "orders::update_status", skip(store, req), fields(status = ?req.status))]
pub async fn update_order_status<S>(
  store: &S,
  actor_id: Uuid,
  order_id: Uuid,
  req: UpdateOrderStatusRequest,
) -> CoreResult<OrderStatusView>
where
  S: UserStore + OrderStore + ?Sized,
{
  req.validate()?;
  require_role(store, actor_id, &[Role::Admin]).await?;

  let order = store
    .update_order_status(order_id, req.status, req.tracking_number)
    .await?
    .ok_or_else(|| CoreError::NotFound("Order not found".to_string()))?;

  info!(order_id = %order.id, "Order status updated.");
  Ok(OrderStatusView {
    id: order.id,
    status: order.status,
    tracking_number: order.tracking_number,
    updated_at: order.updated_at,
  })
}
