//! Admin authentication endpoints.

use axum::{Json, Router, extract::State, routing::{get, post}};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use puspresma_common::AppResult;
use puspresma_core::AdminIdentity;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{
    extractors::AdminAuth,
    middleware::{ADMIN_REFRESH_COOKIE, ADMIN_TOKEN_COOKIE, AppState},
    response::ApiResponse,
};

/// Create the admin auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Format email tidak valid"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub password: String,

    /// Extends the cookie lifetime to the configured "remember" TTL.
    #[serde(default)]
    pub remember_me: bool,
}

/// Login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub logged_in: bool,
    pub admin: AdminIdentity,
}

fn auth_cookie(name: &'static str, value: String, ttl_days: i64) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(ttl_days))
        .build()
}

/// Exchange credentials for the admin token cookies.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, ApiResponse<LoginResponse>)> {
    req.validate()?;

    let tokens = state
        .auth_service
        .login(&req.email, &req.password, req.remember_me)
        .await?;
    let admin = state
        .auth_service
        .validate_token(&tokens.access_token)
        .await?;

    info!(admin_id = %admin.id, "Admin logged in");

    let jar = jar
        .add(auth_cookie(
            ADMIN_TOKEN_COOKIE,
            tokens.access_token,
            tokens.ttl_days,
        ))
        .add(auth_cookie(
            ADMIN_REFRESH_COOKIE,
            tokens.refresh_token,
            state.config.auth.remember_ttl_days,
        ));

    Ok((
        jar,
        ApiResponse::ok(LoginResponse {
            logged_in: true,
            admin,
        }),
    ))
}

/// Clear both auth cookies, valid token or not.
async fn logout(jar: CookieJar) -> AppResult<(CookieJar, ApiResponse<()>)> {
    let jar = jar
        .remove(Cookie::build((ADMIN_TOKEN_COOKIE, "")).path("/"))
        .remove(Cookie::build((ADMIN_REFRESH_COOKIE, "")).path("/"));
    Ok((jar, ApiResponse::with_message((), "Berhasil keluar")))
}

/// Current admin identity (also serves as a session probe for the UI).
async fn me(AdminAuth(admin): AdminAuth) -> AppResult<ApiResponse<AdminIdentity>> {
    Ok(ApiResponse::ok(admin))
}
