//! User queries

use shared::models::User;
use sqlx::PgPool;

use super::NewUser;
use crate::error::StoreError;

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, password_hash, \
                            is_active, date_joined, last_login";

pub async fn get(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<User>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"))
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// Concurrent registrations race past the lookup; the `UNIQUE` index decides.
pub async fn insert(pool: &PgPool, user: &NewUser) -> Result<User, StoreError> {
    sqlx::query_as(&format!(
        "INSERT INTO users (username, email, first_name, last_name, password_hash, is_active, date_joined)
         VALUES ($1, $1, $2, $3, $4, FALSE, $5)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.password_hash)
    .bind(user.date_joined)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::EmailTaken(user.email.clone())
        }
        other => other.into(),
    })
}

pub async fn activate(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET is_active = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn record_login(pool: &PgPool, id: i64, now: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
        .bind(id)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(())
}
