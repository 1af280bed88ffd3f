//! User model

use serde::{Deserialize, Serialize};

/// User account. `username` equals the e-mail address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Set once the e-mail address is verified
    pub is_active: bool,
    pub date_joined: i64,
    pub last_login: Option<i64>,
}

impl User {
    /// "{last_name} {first_name}", falling back to the username
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.last_name, self.first_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Lower-cased part after the last `@` of the e-mail
    pub fn email_domain(&self) -> Option<String> {
        email_domain(&self.email)
    }
}

/// Lower-cased part after the last `@`, `None` if there is no `@`
pub fn email_domain(email: &str) -> Option<String> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim().to_lowercase())
}

/// User as returned by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRepr {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub is_active: bool,
}

impl From<&User> for UserRepr {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            full_name: u.full_name(),
            is_active: u.is_active,
        }
    }
}
