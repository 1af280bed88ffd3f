//! Category and product queries

use shared::models::{Category, Product, ProductCreate};
use sqlx::PgPool;

const PRODUCT_COLUMNS: &str =
    "id, nev, kategoria_id, ar, max_rendelesenkent, hutve, elerheto, kisult";

pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as("SELECT id, nev FROM categories ORDER BY nev, id")
        .fetch_all(pool)
        .await
}

pub async fn get_category(pool: &PgPool, id: i64) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT id, nev FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY nev, id"
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn products_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Product>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await
}

pub async fn insert_product(pool: &PgPool, p: &ProductCreate) -> Result<Product, sqlx::Error> {
    sqlx::query_as(&format!(
        "INSERT INTO products (nev, kategoria_id, ar, max_rendelesenkent, hutve, elerheto, kisult)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&p.nev)
    .bind(p.kategoria_id)
    .bind(p.ar)
    .bind(p.max_rendelesenkent)
    .bind(p.hutve)
    .bind(p.elerheto)
    .bind(p.kisult)
    .fetch_one(pool)
    .await
}

pub async fn save_product(pool: &PgPool, p: &Product) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as(&format!(
        "UPDATE products SET
            nev = $2, kategoria_id = $3, ar = $4, max_rendelesenkent = $5,
            hutve = $6, elerheto = $7, kisult = $8
         WHERE id = $1
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(p.id)
    .bind(&p.nev)
    .bind(p.kategoria_id)
    .bind(p.ar)
    .bind(p.max_rendelesenkent)
    .bind(p.hutve)
    .bind(p.elerheto)
    .bind(p.kisult)
    .fetch_optional(pool)
    .await
}
