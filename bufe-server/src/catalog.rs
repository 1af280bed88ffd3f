//! Menu, products and buffet opening hours

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use shared::dashboard::DashboardEvent;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Buffet, MenuCategory, OpeningHours, OpeningHoursRepr, OpeningHoursResponse,
    MAX_PRICE, OpeningHoursUpdate, Product, ProductCreate, ProductRepr, ProductUpdate,
    build_menu, is_open_at,
};
use shared::util::parse_hhmm;

use crate::db::Store;
use crate::error::ServiceResult;
use crate::live::{Broadcaster, publish_best_effort};

const MISSING_PRODUCT_FIELDS: &str = "Hiányzó kötelező mezők (név, kategória)";

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self { store, broadcaster }
    }

    /// Categories alphabetically, each with all of its products
    pub async fn menu(&self) -> ServiceResult<Vec<MenuCategory>> {
        let categories = self.store.list_categories().await?;
        let products = self.store.list_products().await?;
        Ok(build_menu(&categories, &products))
    }

    pub async fn opening_hours(&self, now: DateTime<Utc>) -> ServiceResult<OpeningHoursResponse> {
        let buffet = self.buffet().await?;
        let hours = self.store.list_opening_hours(buffet.id).await?;
        Ok(OpeningHoursResponse {
            is_open: is_open_at(&buffet, &hours, now.naive_utc()),
            bufe_name: buffet.nev,
            rendkivuli_zarva: buffet.rendkivuli_zarva,
            opening_hours: hours.iter().map(OpeningHoursRepr::from).collect(),
        })
    }

    /// Empty or missing times close the day
    pub async fn update_opening_hours(
        &self,
        update: &OpeningHoursUpdate,
    ) -> ServiceResult<OpeningHours> {
        let from = parse_optional_time("from_hour", update.from_hour.as_deref())?;
        let to = parse_optional_time("to_hour", update.to_hour.as_deref())?;

        let hours = self
            .store
            .update_opening_hours(update.id, from, to)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OpeningHoursNotFound,
                    format!("Nyitvatartás nem található (#{})", update.id),
                )
                .with_detail("id", update.id)
            })?;

        tracing::info!(
            id = hours.id,
            weekday = hours.weekday,
            from = ?hours.from_hour,
            to = ?hours.to_hour,
            "Opening hours updated"
        );
        Ok(hours)
    }

    pub async fn set_exceptionally_closed(&self, closed: bool) -> ServiceResult<Buffet> {
        let buffet = self.buffet().await?;
        let buffet = self
            .store
            .set_exceptionally_closed(buffet.id, closed)
            .await?
            .ok_or_else(buffet_not_found)?;
        tracing::info!(closed, "Buffet exceptional closure changed");
        Ok(buffet)
    }

    pub async fn create_product(&self, input: &ProductCreate) -> ServiceResult<ProductRepr> {
        let nev = input.nev.trim();
        if nev.is_empty() {
            return Err(AppError::with_message(ErrorCode::RequiredField, MISSING_PRODUCT_FIELDS)
                .with_detail("field", "nev")
                .into());
        }
        check_price_and_limit(input.ar, input.max_rendelesenkent)?;

        let category = self
            .store
            .get_category(input.kategoria_id)
            .await?
            .ok_or_else(|| category_not_found(input.kategoria_id))?;

        let product = self
            .store
            .insert_product(&ProductCreate {
                nev: nev.to_string(),
                ..input.clone()
            })
            .await?;

        tracing::info!(product_id = product.id, nev = %product.nev, "Product created");

        let repr = ProductRepr::new(&product, category.nev);
        publish_best_effort(&*self.broadcaster, DashboardEvent::ProductNew(repr.clone())).await;
        Ok(repr)
    }

    /// Partial update; last write wins
    pub async fn update_product(&self, update: &ProductUpdate) -> ServiceResult<ProductRepr> {
        let mut product = self
            .store
            .get_product(update.product_id)
            .await?
            .ok_or_else(|| product_not_found(update.product_id))?;

        update.apply_to(&mut product);
        product.nev = product.nev.trim().to_string();
        if product.nev.is_empty() {
            return Err(AppError::required_field("nev").into());
        }
        check_price_and_limit(product.ar, product.max_rendelesenkent)?;

        let product = self
            .store
            .save_product(&product)
            .await?
            .ok_or_else(|| product_not_found(update.product_id))?;

        tracing::info!(product_id = product.id, "Product updated");

        let repr = self.product_repr(&product).await?;
        publish_best_effort(&*self.broadcaster, DashboardEvent::ProductUpdate(repr.clone()))
            .await;
        Ok(repr)
    }

    async fn product_repr(&self, product: &Product) -> ServiceResult<ProductRepr> {
        let kategoria_nev = self
            .store
            .get_category(product.kategoria_id)
            .await?
            .map(|c| c.nev)
            .unwrap_or_default();
        Ok(ProductRepr::new(product, kategoria_nev))
    }

    async fn buffet(&self) -> ServiceResult<Buffet> {
        let buffet = self.store.get_buffet().await?;
        buffet.ok_or_else(|| buffet_not_found().into())
    }
}

fn parse_optional_time(field: &str, value: Option<&str>) -> Result<Option<NaiveTime>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse_hhmm(v).map(Some).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidTimeFormat,
                format!("Érvénytelen időformátum: {v} (ÓÓ:PP)"),
            )
            .with_detail("field", field)
        }),
    }
}

fn check_price_and_limit(ar: i64, max: i32) -> Result<(), AppError> {
    if ar < 0 {
        return Err(
            AppError::with_message(ErrorCode::ProductInvalidPrice, "Az ár nem lehet negatív")
                .with_detail("ar", ar),
        );
    }
    if ar > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("Az ár legfeljebb {MAX_PRICE} Ft lehet"),
        )
        .with_detail("ar", ar)
        .with_detail("max", MAX_PRICE));
    }
    if max < 1 {
        return Err(AppError::validation(
            "A rendelésenkénti maximum legalább 1 kell legyen",
        )
        .with_detail("max_rendelesenkent", max));
    }
    Ok(())
}

fn buffet_not_found() -> AppError {
    AppError::with_message(ErrorCode::BuffetNotFound, "Büfé nem található")
}

fn category_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CategoryNotFound, "Kategória nem található")
        .with_detail("kategoria_id", id)
}

fn product_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, "Termék nem található")
        .with_detail("product_id", id)
}
