//! Order queries
//!
//! Every status transition is a single conditional `UPDATE ... RETURNING`,
//! so concurrent writers on one row are resolved by the row lock.

use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::PgPool;
use sqlx::types::Json;

use super::NewOrder;
use crate::error::StoreError;

const ORDER_COLUMNS: &str =
    "id, user_id, items, allapot, leadva, idozitve, megjegyzes, archived, vegosszeg";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    items: Json<Vec<OrderItem>>,
    allapot: String,
    leadva: i64,
    idozitve: Option<i64>,
    megjegyzes: String,
    archived: bool,
    vegosszeg: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let allapot = row
            .allapot
            .parse::<OrderStatus>()
            .map_err(|e| StoreError::Corrupt(format!("order {}: {e}", row.id)))?;
        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            items: row.items.0,
            allapot,
            leadva: row.leadva,
            idozitve: row.idozitve,
            megjegyzes: row.megjegyzes,
            archived: row.archived,
            vegosszeg: row.vegosszeg,
        })
    }
}

fn convert_one(row: Option<OrderRow>) -> Result<Option<Order>, StoreError> {
    row.map(Order::try_from).transpose()
}

fn convert_all(rows: Vec<OrderRow>) -> Result<Vec<Order>, StoreError> {
    rows.into_iter().map(Order::try_from).collect()
}

pub async fn insert(pool: &PgPool, order: &NewOrder) -> Result<Order, StoreError> {
    let row: OrderRow = sqlx::query_as(&format!(
        "INSERT INTO orders (user_id, items, allapot, leadva, idozitve, megjegyzes, archived, vegosszeg)
         VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order.user_id)
    .bind(Json(&order.items))
    .bind(OrderStatus::Placed.as_str())
    .bind(order.leadva)
    .bind(order.idozitve)
    .bind(&order.megjegyzes)
    .bind(order.vegosszeg)
    .fetch_one(pool)
    .await?;
    row.try_into()
}

pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Order>, StoreError> {
    let row: Option<OrderRow> =
        sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    convert_one(row)
}

pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Order>, StoreError> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY leadva DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    convert_all(rows)
}

pub async fn list_active(pool: &PgPool) -> Result<Vec<Order>, StoreError> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE NOT archived ORDER BY leadva DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    convert_all(rows)
}

/// Compare-and-set: only the owner, only from `leadva`
pub async fn cancel_placed(
    pool: &PgPool,
    id: i64,
    user_id: i64,
) -> Result<Option<Order>, StoreError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "UPDATE orders SET allapot = $3
         WHERE id = $1 AND user_id = $2 AND allapot = $4
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(id)
    .bind(user_id)
    .bind(OrderStatus::Cancelled.as_str())
    .bind(OrderStatus::Placed.as_str())
    .fetch_optional(pool)
    .await?;
    convert_one(row)
}

pub async fn set_status(
    pool: &PgPool,
    id: i64,
    status: OrderStatus,
) -> Result<Option<Order>, StoreError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "UPDATE orders SET allapot = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
    ))
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?;
    convert_one(row)
}

pub async fn archive(pool: &PgPool, id: i64) -> Result<Option<Order>, StoreError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "UPDATE orders SET archived = TRUE WHERE id = $1 RETURNING {ORDER_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    convert_one(row)
}

pub async fn archive_done(pool: &PgPool) -> Result<u64, StoreError> {
    let done: Vec<&str> = OrderStatus::DONE.iter().map(|s| s.as_str()).collect();
    let result =
        sqlx::query("UPDATE orders SET archived = TRUE WHERE NOT archived AND allapot = ANY($1)")
            .bind(&done)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, users};

    async fn user(pool: &PgPool, email: &str) -> i64 {
        let new = NewUser {
            email: email.to_string(),
            first_name: "Anna".into(),
            last_name: "Kiss".into(),
            password_hash: "x".into(),
            date_joined: 0,
        };
        users::insert(pool, &new).await.unwrap().id
    }

    async fn place(pool: &PgPool, user_id: i64) -> Order {
        let order = NewOrder {
            user_id,
            items: vec![OrderItem { termek_id: 1, db: 2 }],
            leadva: 1_709_539_200_000,
            idozitve: None,
            megjegyzes: String::new(),
            vegosszeg: 1000,
        };
        insert(pool, &order).await.unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL DATABASE_URL"]
    async fn cancel_is_owner_only_and_once(pool: PgPool) {
        let owner = user(&pool, "diak@szlgbp.hu").await;
        let other = user(&pool, "masik@szlgbp.hu").await;
        let order = place(&pool, owner).await;
        assert_eq!(order.items, vec![OrderItem { termek_id: 1, db: 2 }]);

        assert!(cancel_placed(&pool, order.id, other).await.unwrap().is_none());

        let cancelled = cancel_placed(&pool, order.id, owner).await.unwrap().unwrap();
        assert_eq!(cancelled.allapot, OrderStatus::Cancelled);
        assert!(cancel_placed(&pool, order.id, owner).await.unwrap().is_none());

        let confirmed = place(&pool, owner).await;
        set_status(&pool, confirmed.id, OrderStatus::Confirmed).await.unwrap();
        assert!(cancel_placed(&pool, confirmed.id, owner).await.unwrap().is_none());
        let stored = get(&pool, confirmed.id).await.unwrap().unwrap();
        assert_eq!(stored.allapot, OrderStatus::Confirmed);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL DATABASE_URL"]
    async fn archive_done_touches_only_done_orders(pool: PgPool) {
        let owner = user(&pool, "diak@szlgbp.hu").await;
        let open = place(&pool, owner).await;
        let handed = place(&pool, owner).await;
        let rejected = place(&pool, owner).await;
        set_status(&pool, handed.id, OrderStatus::HandedOver).await.unwrap();
        set_status(&pool, rejected.id, OrderStatus::Rejected).await.unwrap();

        assert_eq!(archive_done(&pool).await.unwrap(), 2);
        assert_eq!(archive_done(&pool).await.unwrap(), 0);

        let active: Vec<i64> = list_active(&pool).await.unwrap().iter().map(|o| o.id).collect();
        assert_eq!(active, vec![open.id]);
        assert!(get(&pool, handed.id).await.unwrap().unwrap().archived);
    }
}
