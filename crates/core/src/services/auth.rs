//! Admin authentication against the CMS identity provider.
//!
//! A request is authenticated when its bearer token is accepted by the
//! provider's "who am I" endpoint. Tokens carrying the reserved development
//! prefix never reach the provider: they are only honored when the opt-in
//! `auth.dev_bypass` flag is set, and rejected outright otherwise.

use std::sync::Arc;

use puspresma_cms::CmsClient;
use puspresma_common::{AppError, AppResult, AuthConfig};
use serde::Serialize;
use tracing::warn;

/// Reserved prefix for development tokens.
pub const DEV_TOKEN_PREFIX: &str = "dev_token_";

const DEV_EMAIL: &str = "admin@puspresma.test";
const DEV_PASSWORD: &str = "puspresma-dev";
const DEV_TOKEN: &str = "dev_token_local_admin";
const DEV_REFRESH_TOKEN: &str = "dev_token_local_refresh";

/// Authenticated admin identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminIdentity {
    /// Provider-side user id.
    pub id: String,
    /// Login email.
    pub email: Option<String>,
    /// Display name.
    pub nama: Option<String>,
}

/// Token pair plus its cookie lifetime.
#[derive(Debug, Clone)]
pub struct LoginTokens {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Cookie lifetime in days.
    pub ttl_days: i64,
}

/// Service validating and issuing admin tokens.
#[derive(Clone)]
pub struct AuthService {
    client: Arc<CmsClient>,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(client: Arc<CmsClient>, config: AuthConfig) -> Self {
        Self { client, config }
    }

    /// Exchange credentials for a token pair. With `auth.dev_bypass` set,
    /// one built-in credential pair short-circuits the provider.
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> AppResult<LoginTokens> {
        let ttl_days = if remember {
            self.config.remember_ttl_days
        } else {
            self.config.token_ttl_days
        };

        if self.config.dev_bypass && email == DEV_EMAIL && password == DEV_PASSWORD {
            warn!("Development auth bypass used; disable auth.dev_bypass outside development");
            return Ok(LoginTokens {
                access_token: DEV_TOKEN.to_string(),
                refresh_token: DEV_REFRESH_TOKEN.to_string(),
                ttl_days,
            });
        }

        let tokens = self.client.auth_login(email, password).await?;
        Ok(LoginTokens {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            ttl_days,
        })
    }

    /// Validate a bearer token and return the admin identity behind it.
    pub async fn validate_token(&self, token: &str) -> AppResult<AdminIdentity> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized);
        }

        if token.starts_with(DEV_TOKEN_PREFIX) {
            if self.config.dev_bypass {
                return Ok(AdminIdentity {
                    id: "dev-admin".to_string(),
                    email: Some(DEV_EMAIL.to_string()),
                    nama: Some("Dev Admin".to_string()),
                });
            }
            warn!("Rejected development-prefixed token while auth.dev_bypass is off");
            return Err(AppError::Unauthorized);
        }

        let user = self.client.auth_me(token).await?;
        let nama = match (&user.first_name, &user.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        };
        Ok(AdminIdentity {
            id: user.id,
            email: user.email,
            nama,
        })
    }
}
