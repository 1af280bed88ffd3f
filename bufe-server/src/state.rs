//! Application state for bufe-server

use std::sync::Arc;

use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::catalog::CatalogService;
use crate::config::Config;
use crate::db::{PgStore, Store};
use crate::email::Mailer;
use crate::error::StoreError;
use crate::live::{Broadcaster, LiveHub};
use crate::orders::OrderService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Dashboard fan-out
    pub hub: LiveHub,
    pub orders: OrderService,
    pub catalog: CatalogService,
    pub mailer: Mailer,
    /// HS256 secret for sessions and verification links
    pub session_secret: String,
    pub allowed_domains: Vec<String>,
    /// Base URL used in verification links
    pub frontend_url: String,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Connect, migrate, make sure the buffet exists and grant configured admins
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));

        let buffet = store.get_or_create_buffet().await?;
        tracing::info!(buffet_id = buffet.id, name = %buffet.nev, "Buffet ready");

        for email in &config.bufe_admin_emails {
            match store.find_user_by_email(email).await? {
                Some(user) => {
                    store.add_buffet_admin(buffet.id, user.id).await?;
                    tracing::info!(user_id = user.id, email = %email, "Buffet admin granted");
                }
                None => tracing::warn!(email = %email, "Configured buffet admin has no account"),
            }
        }

        let mailer = match &config.ses_from_email {
            Some(from) => {
                let aws_config =
                    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                let client = match &config.ses_region {
                    Some(region) => {
                        let ses_config = aws_config
                            .to_builder()
                            .region(aws_config::Region::new(region.clone()))
                            .build();
                        SesClient::new(&ses_config)
                    }
                    None => SesClient::new(&aws_config),
                };
                Mailer::Ses {
                    client,
                    from: from.clone(),
                }
            }
            None => {
                tracing::warn!("SES_FROM_EMAIL not set, verification mails are only logged");
                Mailer::Log
            }
        };

        Ok(Self::assemble(store, LiveHub::new(), mailer, config))
    }

    fn assemble(store: Arc<dyn Store>, hub: LiveHub, mailer: Mailer, config: &Config) -> Self {
        let broadcaster: Arc<dyn Broadcaster> = Arc::new(hub.clone());
        Self {
            orders: OrderService::new(store.clone(), broadcaster.clone()),
            catalog: CatalogService::new(store.clone(), broadcaster),
            store,
            hub,
            mailer,
            session_secret: config.session_secret.clone(),
            allowed_domains: config.allowed_email_domains.clone(),
            frontend_url: config.frontend_url.clone(),
            secure_cookies: !config.is_development(),
            rate_limiter: RateLimiter::new(),
        }
    }

    /// Current buffet administrators; empty while no buffet row exists
    pub async fn admin_ids(&self) -> Result<Vec<i64>, StoreError> {
        match self.store.get_buffet().await? {
            Some(buffet) => self.store.buffet_admin_ids(buffet.id).await,
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
impl AppState {
    pub const TEST_SECRET: &'static str = "test-session-secret";

    /// State over an in-memory store, logging mailer and a fresh hub
    pub fn for_tests(store: Arc<crate::db::memory::MemoryStore>) -> Self {
        let config = Config {
            database_url: String::new(),
            http_port: 0,
            environment: "development".to_string(),
            session_secret: Self::TEST_SECRET.to_string(),
            allowed_email_domains: vec!["szlgbp.hu".to_string(), "botond.eu".to_string()],
            bufe_admin_emails: Vec::new(),
            frontend_url: "http://localhost:8080".to_string(),
            ses_from_email: None,
            ses_region: None,
            log_format: None,
        };
        Self::assemble(store, LiveHub::new(), Mailer::Log, &config)
    }
}
