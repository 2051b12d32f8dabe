//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use puspresma_common::AppError;
use puspresma_core::AdminIdentity;

use crate::middleware::{ADMIN_TOKEN_COOKIE, AppState};

/// Authenticated admin extractor. Rejects with 401 when the admin-token
/// cookie is absent or the identity provider refuses it.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub AdminIdentity);

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ADMIN_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .unwrap_or_default();

        let identity = state.auth_service.validate_token(&token).await?;
        Ok(Self(identity))
    }
}

/// Optional admin extractor: `None` for anonymous requests, used where a
/// query parameter widens results for admins only (`includeDeleted`).
#[derive(Debug, Clone)]
pub struct MaybeAdminAuth(pub Option<AdminIdentity>);

impl FromRequestParts<AppState> for MaybeAdminAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ADMIN_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .unwrap_or_default();

        Ok(Self(state.auth_service.validate_token(&token).await.ok()))
    }
}
