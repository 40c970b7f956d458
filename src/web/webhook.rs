//! Inbound SMS webhook.

use axum::body::to_bytes;
use axum::extract::{FromRequest, Request, State};
use axum::response::Json;
use tracing::{error, info, instrument, warn};

use crate::sms::signature::SIGNATURE_HEADER;
use crate::sms::{AuthError, validate_signature};
use crate::state::AppState;
use crate::utils::mask_phone;
use crate::web::error::ApiError;
use crate::web::middleware::rate_limit::SLOW_DOWN_REPLY;
use crate::web::middleware::webhook_url::signed_url;

/// Twilio's webhook payloads are a few hundred bytes.
const MAX_WEBHOOK_BODY: usize = 64 * 1024;

/// Form fields of a webhook whose `X-Twilio-Signature` checked out.
#[derive(Debug)]
pub struct ValidatedWebhook {
    params: Vec<(String, String)>,
}

impl ValidatedWebhook {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl FromRequest<AppState> for ValidatedWebhook {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();

        let signature = parts
            .headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(|| {
                warn!("Webhook without signature header");
                AuthError::MissingSignature
            })?;

        let url = signed_url(&parts, state.webhook.public_url.as_ref()).ok_or_else(|| {
            warn!("Cannot determine webhook URL; set PUBLIC_URL");
            AuthError::InvalidSignature
        })?;

        let bytes = to_bytes(body, MAX_WEBHOOK_BODY)
            .await
            .map_err(|_| AuthError::MalformedBody)?;
        let params: Vec<(String, String)> = url::form_urlencoded::parse(&bytes)
            .into_owned()
            .collect();

        validate_signature(&state.webhook.auth_token, &url, &params, &signature).map_err(
            |e| {
                warn!(url = %url, "Webhook signature mismatch");
                e
            },
        )?;

        Ok(Self { params })
    }
}

/// `POST /`
///
/// Always acknowledges with `"Success!"` once a reply has been produced, even
/// if delivering it fails, and for messages with no sender to reply to.
/// Lookup failures send nothing and answer 500.
#[instrument(skip_all, fields(sender = tracing::field::Empty))]
pub(super) async fn receive_sms(
    State(state): State<AppState>,
    webhook: ValidatedWebhook,
) -> Result<Json<&'static str>, ApiError> {
    let Some(from) = webhook.param("From") else {
        warn!("Signed webhook has no From field, nothing to reply to");
        return Ok(Json("Success!"));
    };
    let body = webhook.param("Body").unwrap_or_default();
    tracing::Span::current().record("sender", mask_phone(from).as_str());
    info!(body, "Received message");

    let reply = match state.limiter.check(from) {
        Ok(()) => state.lookup.answer(body).await.map_err(|e| {
            error!(error = ?e, "Seat lookup failed");
            ApiError::from(e)
        })?,
        Err(_) => SLOW_DOWN_REPLY.to_owned(),
    };

    if let Err(e) = state.messenger.send(from, &reply).await {
        warn!(error = ?e, "Failed to deliver reply");
    }

    Ok(Json("Success!"))
}
