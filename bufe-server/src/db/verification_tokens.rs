use sqlx::PgPool;
use uuid::Uuid;

use super::VerificationToken;

/// One token per user: the upsert replaces any earlier one
pub async fn replace(pool: &PgPool, token: &VerificationToken) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO verification_tokens (user_id, token, created_at, expires_at, is_used)
         VALUES ($1, $2, $3, $4, FALSE)
         ON CONFLICT (user_id) DO UPDATE SET
            token = $2, created_at = $3, expires_at = $4, is_used = FALSE",
    )
    .bind(token.user_id)
    .bind(token.token)
    .bind(token.created_at)
    .bind(token.expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find(pool: &PgPool, token: Uuid) -> Result<Option<VerificationToken>, sqlx::Error> {
    sqlx::query_as(
        "SELECT user_id, token, created_at, expires_at, is_used
         FROM verification_tokens WHERE token = $1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

pub async fn mark_used(pool: &PgPool, token: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE verification_tokens SET is_used = TRUE WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}
