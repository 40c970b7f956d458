//! Web router construction.

use axum::{
    Router,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::{status, webhook};

/// Headroom on top of the lookup timeout for the reply round-trip to Twilio.
const SEND_HEADROOM: Duration = Duration::from_secs(15);

/// Creates the web server router
pub fn create_router(app_state: AppState) -> Router {
    let request_timeout = app_state.lookup.pool().timeout() + SEND_HEADROOM;

    Router::new()
        .route("/", post(webhook::receive_sms))
        .route("/health", get(status::health))
        .with_state(app_state)
        .layer((
            // Outermost: per-request ID span + severity-proportional response logging.
            RequestIdLayer,
            TimeoutLayer::new(request_timeout),
        ))
}
