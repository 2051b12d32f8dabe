//! Puspresma portal server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use puspresma_api::{AppState, router as api_router};
use puspresma_cms::CmsClient;
use puspresma_cms::repositories::{
    ExpoRepository, KalenderRepository, KontakRepository, KontenRepository, LombaRepository,
    PendaftaranExpoRepository, PendaftaranLombaRepository, PrestasiRepository,
};
use puspresma_common::Config;
use puspresma_core::{
    AuthService, CalendarService, ExpoService, KontakService, KontenService, LombaService,
    Mailer, PrestasiService, RegistrationService, ReminderService, SearchService,
};
use axum::Router;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
#[allow(clippy::expect_used)]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "puspresma=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting puspresma server...");

    // Load configuration once; every handler sees this one object
    let config = Arc::new(Config::load()?);
    info!(cms_url = %config.cms.url, "Configuration loaded");

    if config.auth.dev_bypass {
        tracing::warn!("auth.dev_bypass is enabled; do not run this configuration in production");
    }

    // One CMS client shared by every repository
    let client = Arc::new(CmsClient::new(&config.cms)?);

    // Initialize repositories
    let lomba_repo = LombaRepository::new(Arc::clone(&client));
    let pendaftaran_lomba_repo = PendaftaranLombaRepository::new(Arc::clone(&client));
    let expo_repo = ExpoRepository::new(Arc::clone(&client));
    let pendaftaran_expo_repo = PendaftaranExpoRepository::new(Arc::clone(&client));
    let prestasi_repo = PrestasiRepository::new(Arc::clone(&client));
    let kalender_repo = KalenderRepository::new(Arc::clone(&client));
    let kontak_repo = KontakRepository::new(Arc::clone(&client));
    let konten_repo = KontenRepository::new(Arc::clone(&client));

    // Mail transport: SMTP when configured, log-only otherwise
    let mailer = Arc::new(Mailer::from_config(config.email.as_ref())?);
    info!(transport = mailer.name(), "Mail transport ready");

    // Initialize services
    let lomba_service = LombaService::new(lomba_repo.clone());
    let registration_service = RegistrationService::new(
        lomba_repo.clone(),
        pendaftaran_lomba_repo.clone(),
        kalender_repo.clone(),
    );
    let expo_service = ExpoService::new(expo_repo.clone(), pendaftaran_expo_repo);
    let prestasi_service = PrestasiService::new(prestasi_repo.clone(), Arc::clone(&client));
    let calendar_service = CalendarService::new(
        lomba_repo.clone(),
        expo_repo.clone(),
        kalender_repo.clone(),
    );
    let reminder_service = ReminderService::new(
        lomba_repo.clone(),
        pendaftaran_lomba_repo,
        kalender_repo,
        mailer,
    );
    let kontak_service = KontakService::new(kontak_repo);
    let konten_service = KontenService::new(konten_repo, config.cms.url.clone());
    let search_service = SearchService::new(lomba_repo, expo_repo, prestasi_repo);
    let auth_service = AuthService::new(Arc::clone(&client), config.auth.clone());

    // Create app state
    let state = AppState {
        config: Arc::clone(&config),
        lomba_service,
        registration_service,
        expo_service,
        prestasi_service,
        calendar_service,
        reminder_service,
        kontak_service,
        konten_service,
        search_service,
        auth_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
