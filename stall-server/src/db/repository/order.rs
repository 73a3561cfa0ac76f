//! Order Repository
//!
//! `orders` + `order_items`. Orders are only ever created, read, and
//! have their status / payment proof updated; items are immutable.

use super::{RepoError, RepoResult};
use futures::future::join_all;
use shared::models::{Order, OrderItem, OrderStatus, OrderWithItems, PaymentMethod};
use sqlx::SqlitePool;

const ORDER_COLUMNS: &str = "id, customer_name, table_number, total_price, payment_method, status, created_at, payment_proof_ref, items_summary";

/// New order as written by [`create`]
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_name: String,
    pub table_number: Option<String>,
    pub total_price: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub items_summary: String,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    table_number: Option<String>,
    total_price: f64,
    payment_method: String,
    status: String,
    created_at: i64,
    payment_proof_ref: Option<String>,
    items_summary: String,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            customer_name: row.customer_name,
            table_number: row.table_number,
            total_price: row.total_price,
            payment_method: PaymentMethod::from(row.payment_method),
            status: OrderStatus::from(row.status),
            created_at: row.created_at,
            payment_proof_ref: row.payment_proof_ref,
            items_summary: row.items_summary,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    item_name: String,
    quantity: i64,
    unit_price: f64,
    note: Option<String>,
}

impl From<ItemRow> for OrderItem {
    fn from(row: ItemRow) -> Self {
        Self {
            item_name: row.item_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            note: row.note,
        }
    }
}

/// Insert an order and all of its items in one transaction
pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<Order> {
    if data.customer_name.trim().is_empty() {
        return Err(RepoError::Validation("customer name is empty".into()));
    }
    if !data.total_price.is_finite() || data.total_price <= 0.0 {
        return Err(RepoError::Validation(format!(
            "total price must be > 0, got {}",
            data.total_price
        )));
    }
    if data.items.is_empty() {
        return Err(RepoError::Validation("order has no items".into()));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (customer_name, table_number, total_price, payment_method, status, created_at, items_summary) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id",
    )
    .bind(&data.customer_name)
    .bind(&data.table_number)
    .bind(data.total_price)
    .bind(data.payment_method.as_str())
    .bind(data.status.as_str())
    .bind(now)
    .bind(&data.items_summary)
    .fetch_one(&mut *tx)
    .await?;

    for item in &data.items {
        sqlx::query(
            "INSERT INTO order_items (order_id, item_name, quantity, unit_price, note) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(id)
        .bind(&item.item_name)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(&item.note)
        .execute(&mut *tx)
        .await?;
    }

    // Dropping `tx` on any early return above rolls everything back
    tx.commit().await?;

    Ok(Order {
        id,
        customer_name: data.customer_name,
        table_number: data.table_number,
        total_price: data.total_price,
        payment_method: data.payment_method,
        status: data.status,
        created_at: now,
        payment_proof_ref: None,
        items_summary: data.items_summary,
    })
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Order::from))
}

/// Line items in submission order; unknown order ids yield an empty list
pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, ItemRow>(
        "SELECT item_name, quantity, unit_price, note FROM order_items WHERE order_id = ? ORDER BY id ASC",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(OrderItem::from).collect())
}

/// All orders, newest first, each with its items attached
///
/// Item lookups run concurrently and are all awaited before the result is
/// assembled. A failed lookup only empties that one order's item list.
pub async fn find_all_with_items(pool: &SqlitePool) -> RepoResult<Vec<OrderWithItems>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC");
    let orders: Vec<Order> = sqlx::query_as::<_, OrderRow>(&sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(attach_items(orders, |id| find_items(pool, id)).await)
}

/// Fan out one item lookup per order and join them back in order
///
/// A failed lookup is logged and leaves that order with no items.
async fn attach_items<F, Fut>(orders: Vec<Order>, lookup: F) -> Vec<OrderWithItems>
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = RepoResult<Vec<OrderItem>>>,
{
    let results = join_all(orders.iter().map(|order| lookup(order.id))).await;

    orders
        .into_iter()
        .zip(results)
        .map(|(order, items)| {
            let items = items.unwrap_or_else(|e| {
                tracing::warn!(order_id = order.id, error = %e, "Failed to load order items");
                Vec::new()
            });
            OrderWithItems { order, items }
        })
        .collect()
}

/// Set the status of one order; returns the number of rows touched (always 1)
pub async fn update_status(pool: &SqlitePool, id: i64, status: &OrderStatus) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2")
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!("order {id} not found")));
    }
    Ok(rows)
}

/// Record the payment proof reference and force `AWAITING_CONFIRMATION`
pub async fn attach_payment_proof(pool: &SqlitePool, id: i64, file_ref: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET payment_proof_ref = ?1, status = ?2 WHERE id = ?3")
        .bind(file_ref)
        .bind(shared::models::AWAITING_CONFIRMATION)
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!("order {id} not found")));
    }
    Ok(())
}
