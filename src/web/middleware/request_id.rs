//! Per-request tracing spans and response logging.
//!
//! Twilio stamps each webhook delivery with `I-Twilio-Idempotency-Token`,
//! which stays the same when Twilio retries that delivery. Using it as the
//! request ID ties retried deliveries together in the logs. Requests without
//! one (health checks, local curl) get a fresh ULID.
//!
//! The resolved ID is echoed back in `X-Request-Id`.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::Response;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::Instrument;

pub static TWILIO_IDEMPOTENCY_TOKEN: &str = "i-twilio-idempotency-token";
pub static REQUEST_ID_HEADER: &str = "x-request-id";

/// Twilio's delivery token when present and non-empty, else a new ULID.
pub fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(TWILIO_IDEMPOTENCY_TOKEN)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| ulid::Ulid::new().to_string())
}

/// Successful webhooks are routine; rejected signatures and failed lookups
/// are what an operator looks for.
fn log_response(method: &Method, path: &str, status: StatusCode, duration_ms: u64) {
    let status = status.as_u16();
    if status >= 500 {
        tracing::warn!(%method, path, status, duration_ms, "Response");
    } else if status >= 400 {
        tracing::info!(%method, path, status, duration_ms, "Response");
    } else {
        tracing::debug!(%method, path, status, duration_ms, "Response");
    }
}

#[derive(Clone)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request> for RequestIdService<S>
where
    S: Service<Request, Response = Response<B>> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Debug,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let req_id = resolve_request_id(req.headers());
        let header_value = HeaderValue::from_str(&req_id).ok();
        let span = tracing::info_span!("request", req_id = %req_id);

        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        let start = Instant::now();
        let future = self.inner.call(req);

        Box::pin(
            async move {
                let mut result = future.await;
                let duration_ms = start.elapsed().as_millis() as u64;

                match &mut result {
                    Ok(response) => {
                        log_response(&method, &path, response.status(), duration_ms);
                        if let Some(value) = header_value {
                            response.headers_mut().insert(REQUEST_ID_HEADER, value);
                        }
                    }
                    Err(e) => {
                        tracing::error!(%method, path, error = ?e, duration_ms, "Request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
