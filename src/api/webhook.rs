//! Webhook handler for Docker Hub build events

use axum::{
    body::{Body, to_bytes},
    extract::Query,
    extract::State as AxumState,
    http::{Method, StatusCode, Uri},
};
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::error::WebhookError;
use crate::messaging::Notification;
use crate::utils::{first_token, verify_token};
use crate::webhook::DockerHubPayload;
use crate::{AppState, SharedState};

/// Largest body read from an authenticated request.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Handles the Docker Hub webhook request.
///
/// The body is only read once method and token have been accepted.
///
/// Answers `200` with an empty body once the notification has been handed to
/// the messaging backend, whether or not delivery succeeded.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    method: Method,
    uri: Uri,
    body: Body,
) -> Result<StatusCode, WebhookError> {
    let span = info_span!("webhook", request_id = %Uuid::now_v7());

    let result = relay_event(&state, method, &uri, body)
        .instrument(span.clone())
        .await;

    if let Err(e) = &result {
        span.in_scope(|| warn!(status = %e.status_code(), "Rejected webhook: {}", e));
    }
    result
}

async fn relay_event(
    state: &AppState,
    method: Method,
    uri: &Uri,
    body: Body,
) -> Result<StatusCode, WebhookError> {
    if method != Method::POST {
        return Err(WebhookError::MethodNotAllowed);
    }

    let Query(query) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(|e| WebhookError::MalformedUrl(e.body_text()))?;

    if !verify_token(&state.config.auth_str, first_token(&query)) {
        return Err(WebhookError::Unauthorized);
    }

    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| WebhookError::UnreadableBody(e.to_string()))?;

    let payload = DockerHubPayload::from_slice(&body)
        .map_err(|e| WebhookError::MalformedBody(e.to_string()))?;

    info!(
        repo = %payload.repository.repo_name,
        pusher = %payload.push_data.pusher,
        images = ?payload.push_data.images,
        pushed_at = ?payload.push_data.pushed_at_utc().map(|t| t.to_rfc3339()),
        "Build event received"
    );

    let notification = Notification::build_notice(
        &state.config.hipchat_room,
        payload.notification_text(),
        state.config.hipchat_notify,
    );

    match state.notifier.send(&notification).await {
        Ok(()) => info!(
            room = %notification.room_id,
            repo = %payload.repository.repo_name,
            "Notification delivered"
        ),
        Err(e) => error!(
            room = %notification.room_id,
            repo = %payload.repository.repo_name,
            "Failed to deliver notification: {}", e
        ),
    }

    Ok(StatusCode::OK)
}
