//! Buffet, opening hours and buffet admin queries

use chrono::NaiveTime;
use shared::models::{Buffet, DEFAULT_BUFFET_NAME, OpeningHours};
use sqlx::PgPool;

pub async fn get(pool: &PgPool) -> Result<Option<Buffet>, sqlx::Error> {
    sqlx::query_as("SELECT id, nev, rendkivuli_zarva FROM buffets ORDER BY id LIMIT 1")
        .fetch_optional(pool)
        .await
}

/// Singleton accessor. Creates the buffet with one closed opening-hours row
/// per weekday when the table is empty.
pub async fn get_or_create(pool: &PgPool) -> Result<Buffet, sqlx::Error> {
    let mut tx = pool.begin().await?;

    // Serialize concurrent creators; readers are not blocked
    sqlx::query("LOCK TABLE buffets IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await?;

    let existing: Option<Buffet> =
        sqlx::query_as("SELECT id, nev, rendkivuli_zarva FROM buffets ORDER BY id LIMIT 1")
            .fetch_optional(&mut *tx)
            .await?;
    if let Some(buffet) = existing {
        tx.commit().await?;
        return Ok(buffet);
    }

    let buffet: Buffet = sqlx::query_as(
        "INSERT INTO buffets (nev, rendkivuli_zarva) VALUES ($1, FALSE)
         RETURNING id, nev, rendkivuli_zarva",
    )
    .bind(DEFAULT_BUFFET_NAME)
    .fetch_one(&mut *tx)
    .await?;

    let weekdays: Vec<i16> = (0..7).collect();
    sqlx::query(
        "INSERT INTO opening_hours (buffet_id, weekday, from_hour, to_hour)
         SELECT $1, weekday, NULL, NULL FROM UNNEST($2::smallint[]) AS weekday",
    )
    .bind(buffet.id)
    .bind(&weekdays)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(buffet_id = buffet.id, "Buffet created with closed opening hours");
    Ok(buffet)
}

pub async fn set_exceptionally_closed(
    pool: &PgPool,
    buffet_id: i64,
    closed: bool,
) -> Result<Option<Buffet>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE buffets SET rendkivuli_zarva = $2 WHERE id = $1
         RETURNING id, nev, rendkivuli_zarva",
    )
    .bind(buffet_id)
    .bind(closed)
    .fetch_optional(pool)
    .await
}

pub async fn list_opening_hours(
    pool: &PgPool,
    buffet_id: i64,
) -> Result<Vec<OpeningHours>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, buffet_id, weekday, from_hour, to_hour FROM opening_hours
         WHERE buffet_id = $1
         ORDER BY weekday, from_hour NULLS FIRST, id",
    )
    .bind(buffet_id)
    .fetch_all(pool)
    .await
}

pub async fn update_opening_hours(
    pool: &PgPool,
    id: i64,
    from_hour: Option<NaiveTime>,
    to_hour: Option<NaiveTime>,
) -> Result<Option<OpeningHours>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE opening_hours SET from_hour = $2, to_hour = $3 WHERE id = $1
         RETURNING id, buffet_id, weekday, from_hour, to_hour",
    )
    .bind(id)
    .bind(from_hour)
    .bind(to_hour)
    .fetch_optional(pool)
    .await
}

pub async fn admin_ids(pool: &PgPool, buffet_id: i64) -> Result<Vec<i64>, sqlx::Error> {
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT user_id FROM buffet_admins WHERE buffet_id = $1")
            .bind(buffet_id)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn add_admin(pool: &PgPool, buffet_id: i64, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO buffet_admins (buffet_id, user_id) VALUES ($1, $2)
         ON CONFLICT DO NOTHING",
    )
    .bind(buffet_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}
