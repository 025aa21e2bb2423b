// core/src/store/postgres/orders.rs

use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::{db_err, PgStore};
use crate::catalog::PageRequest;
use crate::dashboard::StatusTotal;
use crate::error::CoreResult;
use crate::models::{Order, OrderStatus, OrderWithKit};
use crate::pricing::NewOrder;
use crate::store::OrderStore;

const ORDER_WITH_KIT: &str = "SELECT o.*, k.name AS kit_name, k.image_url AS kit_image_url, \
   k.description AS kit_description FROM orders o JOIN kits k ON k.id = o.kit_id";

#[async_trait]
impl OrderStore for PgStore {
  async fn insert_order(&self, order: NewOrder) -> CoreResult<Order> {
    let pricing = order.pricing;
    sqlx::query_as::<_, Order>(
      "INSERT INTO orders (id, user_id, kit_id, quantity, subtotal, tax, shipping, total, status, shipping_address) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(order.user_id)
    .bind(order.kit_id)
    .bind(order.quantity)
    .bind(pricing.subtotal)
    .bind(pricing.tax)
    .bind(pricing.shipping)
    .bind(pricing.total)
    .bind(OrderStatus::Pending)
    .bind(Json(order.shipping_address))
    .fetch_one(self.pool())
    .await
    .map_err(db_err("insert order"))
  }

  async fn find_orders(
    &self,
    user_id: Uuid,
    status: Option<OrderStatus>,
    page: PageRequest,
  ) -> CoreResult<Vec<OrderWithKit>> {
    let sql = format!(
      "{ORDER_WITH_KIT} WHERE o.user_id = $1 AND ($2::order_status IS NULL OR o.status = $2) \
       ORDER BY o.created_at DESC, o.id LIMIT $3 OFFSET $4"
    );
    let orders = sqlx::query_as::<_, OrderWithKit>(&sql)
      .bind(user_id)
      .bind(status)
      .bind(page.limit())
      .bind(page.offset())
      .fetch_all(self.pool())
      .await
      .map_err(db_err("list orders"))?;
    Ok(orders)
  }

  async fn count_orders(&self, user_id: Uuid, status: Option<OrderStatus>) -> CoreResult<i64> {
    sqlx::query_scalar::<_, i64>(
      "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND ($2::order_status IS NULL OR status = $2)",
    )
    .bind(user_id)
    .bind(status)
    .fetch_one(self.pool())
    .await
    .map_err(db_err("count orders"))
  }

  async fn find_order(&self, user_id: Uuid, order_id: Uuid) -> CoreResult<Option<OrderWithKit>> {
    let sql = format!("{ORDER_WITH_KIT} WHERE o.id = $1 AND o.user_id = $2");
    let order = sqlx::query_as::<_, OrderWithKit>(&sql)
      .bind(order_id)
      .bind(user_id)
      .fetch_optional(self.pool())
      .await
      .map_err(db_err("find order"))?;
    Ok(order)
  }

  async fn update_order_status(
    &self,
    order_id: Uuid,
    status: OrderStatus,
    tracking_number: Option<String>,
  ) -> CoreResult<Option<Order>> {
    sqlx::query_as::<_, Order>(
      "UPDATE orders SET status = $2, tracking_number = COALESCE($3, tracking_number), updated_at = NOW() \
       WHERE id = $1 RETURNING *",
    )
    .bind(order_id)
    .bind(status)
    .bind(tracking_number)
    .fetch_optional(self.pool())
    .await
    .map_err(db_err("update order status"))
  }

  async fn order_totals_by_status(&self, user_id: Uuid) -> CoreResult<Vec<StatusTotal>> {
    sqlx::query_as::<_, StatusTotal>(
      "SELECT status, COUNT(*) AS count, COALESCE(SUM(total), 0) AS total \
       FROM orders WHERE user_id = $1 GROUP BY status ORDER BY status",
    )
    .bind(user_id)
    .fetch_all(self.pool())
    .await
    .map_err(db_err("aggregate orders by status"))
  }
}
