use crate::{
    error::{IncorrectPermissionsSnafu, RosterResult},
    state::RosterState,
};
use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
};
use bitflags::bitflags;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::convert::Infallible;

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Roles: u8 {
        const USER =       0b0000_0001;
        const ADMIN =      0b0000_0010;
        const PROFESSOR =  0b0000_0100;
        const INSTRUCTOR = 0b0000_1000;
    }
}

impl Roles {
    pub fn from_authority(authority: &str) -> Option<Self> {
        Some(match authority {
            "ROLE_USER" => Self::USER,
            "ROLE_ADMIN" => Self::ADMIN,
            "ROLE_PROFESSOR" => Self::PROFESSOR,
            "ROLE_INSTRUCTOR" => Self::INSTRUCTOR,
            _ => return None,
        })
    }
}

/// Whatever the browser sent us that the backend uses to recognise the user.
#[derive(Debug, Clone, Default)]
pub struct BackendCredentials {
    cookie: Option<SecretString>,
}

impl BackendCredentials {
    pub fn from_cookie(cookie: impl Into<String>) -> Self {
        Self {
            cookie: Some(SecretString::from(cookie.into())),
        }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_ref().map(ExposeSecret::expose_secret)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
struct GrantedAuthority {
    authority: String,
}

/// Body of the backend's `/api/currentUser`.
#[derive(Debug, Deserialize)]
pub struct CurrentUserResponse {
    user: Option<UserSummary>,
    #[serde(default)]
    roles: Vec<GrantedAuthority>,
}

impl CurrentUserResponse {
    pub fn into_current_user(self, credentials: BackendCredentials) -> CurrentUser {
        let roles = self
            .roles
            .iter()
            .filter_map(|granted| Roles::from_authority(&granted.authority))
            .fold(Roles::empty(), |acc, role| acc | role);

        CurrentUser {
            user: self.user,
            roles,
            credentials,
        }
    }
}

/// Who is making this request, passed explicitly to anything that gates on roles.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: Option<UserSummary>,
    pub roles: Roles,
    pub credentials: BackendCredentials,
}

impl CurrentUser {
    pub fn anonymous() -> Self {
        Self {
            user: None,
            roles: Roles::empty(),
            credentials: BackendCredentials::default(),
        }
    }

    pub const fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// The identity cached rosters are filed under. `None` means nothing may be cached for this user.
    pub fn cache_identity(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|user| user.email.as_str())
            .filter(|email| !email.is_empty())
    }

    pub const fn can(&self, needed: Roles) -> bool {
        self.roles.contains(needed)
    }

    pub const fn can_any(&self, any_of: Roles) -> bool {
        self.roles.intersects(any_of)
    }

    pub fn ensure_can(&self, needed: Roles) -> RosterResult<()> {
        snafu::ensure!(
            self.can(needed),
            IncorrectPermissionsSnafu {
                needed,
                found: self.roles
            }
        );
        Ok(())
    }

    pub fn ensure_can_any(&self, any_of: Roles) -> RosterResult<()> {
        snafu::ensure!(
            self.can_any(any_of),
            IncorrectPermissionsSnafu {
                needed: any_of,
                found: self.roles
            }
        );
        Ok(())
    }
}

impl FromRequestParts<RosterState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &RosterState,
    ) -> Result<Self, Self::Rejection> {
        let Some(cookie) = parts
            .headers
            .get(COOKIE)
            .and_then(|value| value.to_str().ok())
        else {
            return Ok(Self::anonymous());
        };
        let credentials = BackendCredentials::from_cookie(cookie);

        match state.backend().current_user(&credentials).await {
            Ok(response) => Ok(response.into_current_user(credentials)),
            Err(e) => {
                warn!(?e, "Unable to resolve current user, treating as anonymous");
                Ok(Self::anonymous())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::current_user_fixtures;

    #[test]
    fn roles_come_from_known_authorities_only() {
        let response: CurrentUserResponse = serde_json::from_str(
            r#"{
                "user": {"id": 4, "email": "a@ucsb.edu", "fullName": "A B", "githubLogin": "ab"},
                "roles": [{"authority": "ROLE_USER"}, {"authority": "ROLE_ADMIN"}, {"authority": "SCOPE_openid"}]
            }"#,
        )
        .unwrap();

        let user = response.into_current_user(BackendCredentials::default());
        assert!(user.is_logged_in());
        assert_eq!(user.roles, Roles::USER | Roles::ADMIN);
    }

    #[test]
    fn ensure_can_rejects_missing_roles() {
        let admin = current_user_fixtures::admin_user();
        let user = current_user_fixtures::user_only();

        assert!(admin.ensure_can(Roles::ADMIN).is_ok());
        assert!(user.ensure_can(Roles::ADMIN).is_err());
        assert!(
            current_user_fixtures::professor_user()
                .ensure_can_any(Roles::ADMIN | Roles::PROFESSOR)
                .is_ok()
        );
        assert!(user.ensure_can_any(Roles::ADMIN | Roles::PROFESSOR).is_err());
    }

    #[test]
    fn anonymous_has_nothing() {
        let anon = current_user_fixtures::not_logged_in();
        assert!(!anon.is_logged_in());
        assert!(!anon.can_any(Roles::all()));
        assert_eq!(anon.credentials.cookie(), None);
    }

    #[test]
    fn rosters_are_cached_per_signed_in_user() {
        assert_eq!(
            current_user_fixtures::admin_user().cache_identity(),
            Some("phtcon@ucsb.edu")
        );
        assert_eq!(current_user_fixtures::not_logged_in().cache_identity(), None);

        let mut nameless = current_user_fixtures::user_only();
        if let Some(summary) = nameless.user.as_mut() {
            summary.email.clear();
        }
        assert_eq!(nameless.cache_identity(), None);
    }
}
