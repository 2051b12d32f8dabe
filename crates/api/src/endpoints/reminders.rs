//! Deadline reminder endpoints (admin only; gated at the router layer).

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use puspresma_common::{AppError, AppResult};
use puspresma_core::{AdhocReminder, DEFAULT_LOOKAHEAD_DAYS};
use serde::Deserialize;
use tracing::info;

use crate::{middleware::AppState, response::ApiResponse};

/// Create the reminder router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deadlines", get(deadlines))
        .route("/deadlines", post(create_adhoc))
}

/// Deadline batch query.
#[derive(Debug, Deserialize)]
pub struct DeadlinesQuery {
    /// Lookahead window in days.
    #[serde(default = "default_days")]
    pub days: i64,
    /// `check` buckets only; `send` also dispatches the mails.
    #[serde(default = "default_action")]
    pub action: String,
}

const fn default_days() -> i64 {
    DEFAULT_LOOKAHEAD_DAYS
}

fn default_action() -> String {
    "check".to_string()
}

/// Bucket upcoming deadlines; with `action=send`, also push one reminder
/// mail per approved registrant through the configured transport.
async fn deadlines(
    State(state): State<AppState>,
    Query(query): Query<DeadlinesQuery>,
) -> AppResult<Response> {
    match query.action.as_str() {
        "check" => {
            let report = state.reminder_service.check(query.days).await?;
            Ok(ApiResponse::ok(report).into_response())
        }
        "send" => {
            let dispatch = state.reminder_service.send(query.days).await?;
            info!(
                sent = dispatch.sent,
                failed = dispatch.failed,
                transport = dispatch.transport,
                "Reminder batch dispatched"
            );
            Ok(ApiResponse::ok(dispatch).into_response())
        }
        other => Err(AppError::BadRequest(format!(
            "Aksi tidak dikenal: {other}"
        ))),
    }
}

/// Create one ad-hoc reminder tied to a competition.
async fn create_adhoc(
    State(state): State<AppState>,
    Json(body): Json<AdhocReminder>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let record = state.reminder_service.create_adhoc(&body).await?;
    Ok(ApiResponse::with_message(
        serde_json::json!({ "id": record.id, "judul": record.judul, "tanggal": record.tanggal }),
        "Pengingat dibuat",
    ))
}
