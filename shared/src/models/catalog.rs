//! Category and product models

use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub nev: String,
}

/// Highest unit price (Ft) a product may carry
pub const MAX_PRICE: i64 = 1_000_000;

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub nev: String,
    pub kategoria_id: i64,
    /// Price in Ft
    pub ar: i64,
    /// Per-order quantity cap
    pub max_rendelesenkent: i32,
    /// Refrigerated
    pub hutve: bool,
    /// Available for ordering
    pub elerheto: bool,
    /// Freshly baked
    pub kisult: bool,
}

/// Create product payload (REST and dashboard socket)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub nev: String,
    pub kategoria_id: i64,
    pub ar: i64,
    #[serde(default = "default_max_per_order")]
    pub max_rendelesenkent: i32,
    #[serde(default)]
    pub hutve: bool,
    #[serde(default = "default_true")]
    pub elerheto: bool,
    #[serde(default)]
    pub kisult: bool,
}

fn default_max_per_order() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

/// Partial product update; absent fields stay unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub product_id: i64,
    pub nev: Option<String>,
    pub ar: Option<i64>,
    pub max_rendelesenkent: Option<i32>,
    pub hutve: Option<bool>,
    pub elerheto: Option<bool>,
    pub kisult: Option<bool>,
}

impl ProductUpdate {
    /// Apply the present fields onto `product`
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(nev) = &self.nev {
            product.nev = nev.clone();
        }
        if let Some(ar) = self.ar {
            product.ar = ar;
        }
        if let Some(max) = self.max_rendelesenkent {
            product.max_rendelesenkent = max;
        }
        if let Some(v) = self.hutve {
            product.hutve = v;
        }
        if let Some(v) = self.elerheto {
            product.elerheto = v;
        }
        if let Some(v) = self.kisult {
            product.kisult = v;
        }
    }
}

/// Product with its category name, as sent to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRepr {
    pub id: i64,
    pub nev: String,
    pub kategoria_id: i64,
    pub kategoria_nev: String,
    pub ar: i64,
    pub max_rendelesenkent: i32,
    pub hutve: bool,
    pub elerheto: bool,
    pub kisult: bool,
}

impl ProductRepr {
    pub fn new(product: &Product, kategoria_nev: impl Into<String>) -> Self {
        Self {
            id: product.id,
            nev: product.nev.clone(),
            kategoria_id: product.kategoria_id,
            kategoria_nev: kategoria_nev.into(),
            ar: product.ar,
            max_rendelesenkent: product.max_rendelesenkent,
            hutve: product.hutve,
            elerheto: product.elerheto,
            kisult: product.kisult,
        }
    }
}

/// Menu section: a category with its products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: i64,
    pub nev: String,
    pub products: Vec<ProductRepr>,
}

/// Group products under their categories, keeping the category order given
pub fn build_menu(categories: &[Category], products: &[Product]) -> Vec<MenuCategory> {
    categories
        .iter()
        .map(|c| MenuCategory {
            id: c.id,
            nev: c.nev.clone(),
            products: products
                .iter()
                .filter(|p| p.kategoria_id == c.id)
                .map(|p| ProductRepr::new(p, c.nev.as_str()))
                .collect(),
        })
        .collect()
}
