//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use puspresma_common::{AppError, Config};
use puspresma_core::{
    AuthService, CalendarService, ExpoService, KontakService, KontenService, LombaService,
    PrestasiService, RegistrationService, ReminderService, SearchService,
};

/// Name of the admin bearer-token cookie.
pub const ADMIN_TOKEN_COOKIE: &str = "admin_token";

/// Name of the admin refresh-token cookie.
pub const ADMIN_REFRESH_COOKIE: &str = "admin_refresh_token";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub lomba_service: LombaService,
    pub registration_service: RegistrationService,
    pub expo_service: ExpoService,
    pub prestasi_service: PrestasiService,
    pub calendar_service: CalendarService,
    pub reminder_service: ReminderService,
    pub kontak_service: KontakService,
    pub konten_service: KontenService,
    pub search_service: SearchService,
    pub auth_service: AuthService,
}

/// Router-layer admin gate: rejects the request before the handler runs
/// unless the admin-token cookie validates. The in-handler
/// [`AdminAuth`](crate::extractors::AdminAuth) extractor is the second
/// enforcement point.
pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(ADMIN_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap_or_default();

    state.auth_service.validate_token(&token).await?;
    Ok(next.run(req).await)
}
