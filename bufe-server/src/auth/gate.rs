//! Access gate for the buffet
//!
//! A pure decision over the current user, re-evaluated on every request.
//! Sessions only carry the user id, so deactivating a user or removing an
//! admin takes effect on the next request.

use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use shared::models::User;

/// What the caller wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Browse the menu and place/cancel own orders
    Buffet,
    /// Administer orders, catalog and opening hours; join the dashboard
    BuffetAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotAuthenticated,
    NotActive,
    InvalidDomain,
    NotAdmin,
}

impl DenyReason {
    /// Wire token
    pub const fn as_str(&self) -> &'static str {
        match self {
            DenyReason::NotAuthenticated => "not_authenticated",
            DenyReason::NotActive => "not_active",
            DenyReason::InvalidDomain => "invalid_domain",
            DenyReason::NotAdmin => "not_admin",
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            DenyReason::NotAuthenticated => StatusCode::UNAUTHORIZED,
            _ => StatusCode::FORBIDDEN,
        }
    }

    pub const fn error_code(&self) -> ErrorCode {
        match self {
            DenyReason::NotAuthenticated => ErrorCode::NotAuthenticated,
            DenyReason::NotActive => ErrorCode::AccountNotActive,
            DenyReason::InvalidDomain => ErrorCode::InvalidDomain,
            DenyReason::NotAdmin => ErrorCode::AdminRequired,
        }
    }

    /// User-facing (Hungarian) message
    pub fn message(&self, user_domain: &str) -> String {
        match self {
            DenyReason::NotAuthenticated => "Felhasználó nincs bejelentkezve".to_string(),
            DenyReason::NotActive => "Felhasználó fiókja nincs aktiválva".to_string(),
            DenyReason::InvalidDomain => format!("Érvénytelen e-mail domain: @{user_domain}"),
            DenyReason::NotAdmin => "Nincs jogosultsága a büfé kezeléséhez".to_string(),
        }
    }

    pub fn into_app_error(self, user: Option<&User>) -> AppError {
        let domain = user.and_then(User::email_domain).unwrap_or_default();
        AppError::with_message(self.error_code(), self.message(&domain))
            .with_detail("reason", self.as_str())
    }
}

/// Inputs besides the user that the decision depends on
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    /// Lower-case e-mail domains allowed to use the buffet
    pub allowed_domains: &'a [String],
    /// Buffet administrators; only consulted for [`Capability::BuffetAdmin`]
    pub admin_ids: &'a [i64],
}

/// Decide whether `user` may exercise `capability`.
///
/// `Buffet`: authenticated, active, allowed e-mail domain.
/// `BuffetAdmin`: authenticated, active, member of the admin set. Admins are
/// designated explicitly, so their domain is not checked.
pub fn check_access(
    user: Option<&User>,
    capability: Capability,
    ctx: GateContext<'_>,
) -> Result<(), DenyReason> {
    let user = user.ok_or(DenyReason::NotAuthenticated)?;

    if !user.is_active {
        return Err(DenyReason::NotActive);
    }

    match capability {
        Capability::Buffet => {
            let allowed = user
                .email_domain()
                .is_some_and(|d| ctx.allowed_domains.iter().any(|a| *a == d));
            if !allowed {
                return Err(DenyReason::InvalidDomain);
            }
        }
        Capability::BuffetAdmin => {
            if !ctx.admin_ids.contains(&user.id) {
                return Err(DenyReason::NotAdmin);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, email: &str, active: bool) -> User {
        User {
            id,
            username: email.to_string(),
            email: email.to_string(),
            first_name: "Anna".to_string(),
            last_name: "Kiss".to_string(),
            password_hash: String::new(),
            is_active: active,
            date_joined: 0,
            last_login: None,
        }
    }

    fn domains() -> Vec<String> {
        vec!["szlgbp.hu".to_string(), "botond.eu".to_string()]
    }

    fn ctx<'a>(domains: &'a [String], admins: &'a [i64]) -> GateContext<'a> {
        GateContext {
            allowed_domains: domains,
            admin_ids: admins,
        }
    }

    #[test]
    fn anonymous_is_not_authenticated() {
        let d = domains();
        assert_eq!(
            check_access(None, Capability::Buffet, ctx(&d, &[])),
            Err(DenyReason::NotAuthenticated)
        );
        assert_eq!(
            check_access(None, Capability::BuffetAdmin, ctx(&d, &[1])),
            Err(DenyReason::NotAuthenticated)
        );
    }

    #[test]
    fn inactive_user_is_refused_before_domain_check() {
        let d = domains();
        let u = user(1, "diak@gmail.com", false);
        assert_eq!(
            check_access(Some(&u), Capability::Buffet, ctx(&d, &[])),
            Err(DenyReason::NotActive)
        );
    }

    #[test]
    fn domain_check_is_case_insensitive_exact_match() {
        let d = domains();
        let ok = user(1, "diak@SZLGBP.HU", true);
        assert_eq!(check_access(Some(&ok), Capability::Buffet, ctx(&d, &[])), Ok(()));

        let sub = user(2, "diak@mail.szlgbp.hu", true);
        assert_eq!(
            check_access(Some(&sub), Capability::Buffet, ctx(&d, &[])),
            Err(DenyReason::InvalidDomain)
        );

        let other = user(3, "diak@gmail.com", true);
        assert_eq!(
            check_access(Some(&other), Capability::Buffet, ctx(&d, &[])),
            Err(DenyReason::InvalidDomain)
        );
    }

    #[test]
    fn admin_requires_membership() {
        let d = domains();
        let u = user(5, "tanar@szlgbp.hu", true);
        assert_eq!(
            check_access(Some(&u), Capability::BuffetAdmin, ctx(&d, &[1, 2])),
            Err(DenyReason::NotAdmin)
        );
        assert_eq!(
            check_access(Some(&u), Capability::BuffetAdmin, ctx(&d, &[5])),
            Ok(())
        );

        let outside = user(6, "bufes@gmail.com", true);
        assert_eq!(
            check_access(Some(&outside), Capability::BuffetAdmin, ctx(&d, &[6])),
            Ok(())
        );
    }

    #[test]
    fn reasons_map_to_status_and_tokens() {
        assert_eq!(DenyReason::NotAuthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(DenyReason::NotActive.status(), StatusCode::FORBIDDEN);
        assert_eq!(DenyReason::InvalidDomain.status(), StatusCode::FORBIDDEN);
        assert_eq!(DenyReason::NotAdmin.status(), StatusCode::FORBIDDEN);
        assert_eq!(DenyReason::InvalidDomain.as_str(), "invalid_domain");

        for reason in [
            DenyReason::NotAuthenticated,
            DenyReason::NotActive,
            DenyReason::InvalidDomain,
            DenyReason::NotAdmin,
        ] {
            assert_eq!(reason.error_code().http_status(), reason.status());
        }
    }

    #[test]
    fn invalid_domain_error_names_domain() {
        let u = user(3, "diak@gmail.com", true);
        let err = DenyReason::InvalidDomain.into_app_error(Some(&u));
        assert_eq!(err.code, ErrorCode::InvalidDomain);
        assert_eq!(err.message, "Érvénytelen e-mail domain: @gmail.com");
        assert_eq!(err.details.unwrap().get("reason").unwrap(), "invalid_domain");
    }
}
