//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const DEFAULT_ALLOWED_DOMAINS: &str = "szlgbp.hu,botond.eu";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for session and verification tokens
    pub session_secret: String,
    /// E-mail domains allowed to use the buffet (lower-case)
    pub allowed_email_domains: Vec<String>,
    /// E-mails granted buffet admin at startup
    pub bufe_admin_emails: Vec<String>,
    /// Base URL used in verification links
    pub frontend_url: String,
    /// SES sender address; unset means verification mails are only logged
    pub ses_from_email: Option<String>,
    /// SES region override
    pub ses_region: Option<String>,
    /// `json` for JSON log lines
    pub log_format: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            session_secret: Self::require_secret("SESSION_SECRET", &environment)?,
            allowed_email_domains: parse_list(
                &std::env::var("ALLOWED_EMAIL_DOMAINS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_DOMAINS.into()),
            ),
            bufe_admin_emails: parse_list(&std::env::var("BUFE_ADMIN_EMAILS").unwrap_or_default()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into())
                .trim_end_matches('/')
                .to_string(),
            ses_from_email: std::env::var("SES_FROM_EMAIL").ok().filter(|s| !s.is_empty()),
            ses_region: std::env::var("SES_REGION").ok().filter(|s| !s.is_empty()),
            log_format: std::env::var("LOG_FORMAT").ok(),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Comma separated list, trimmed and lower-cased, empty entries dropped
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_normalizes_entries() {
        assert_eq!(
            parse_list(" SZLGBP.hu, ,botond.eu "),
            vec!["szlgbp.hu".to_string(), "botond.eu".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn default_domains() {
        assert_eq!(parse_list(DEFAULT_ALLOWED_DOMAINS), vec!["szlgbp.hu", "botond.eu"]);
    }
}
