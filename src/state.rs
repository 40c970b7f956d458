//! Application state shared by the web handlers.
//!
//! Built once at startup and immutable afterwards; the only interior
//! mutability is the rate limiter's own bookkeeping.

use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::lookup::SeatLookup;
use crate::sms::MessageSender;
use crate::web::middleware::rate_limit::SenderLimiter;

/// Secrets and settings needed to authenticate inbound webhooks.
pub struct WebhookAuth {
    pub auth_token: String,
    /// When set, the signed URL is this base plus the request path.
    pub public_url: Option<Url>,
}

#[derive(Clone)]
pub struct AppState {
    pub lookup: SeatLookup,
    pub messenger: Arc<dyn MessageSender>,
    pub webhook: Arc<WebhookAuth>,
    pub limiter: Arc<SenderLimiter>,
}

impl AppState {
    pub fn new(
        lookup: SeatLookup,
        messenger: Arc<dyn MessageSender>,
        webhook: WebhookAuth,
        limiter: SenderLimiter,
    ) -> Self {
        Self {
            lookup,
            messenger,
            webhook: Arc::new(webhook),
            limiter: Arc::new(limiter),
        }
    }

    /// Periodically drop rate-limit state for idle senders.
    pub fn spawn_limiter_pruning(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let limiter = self.limiter.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiter.prune();
            }
        })
    }
}
