//! Per-sender throttling of seat lookups.
//!
//! Keyed on the webhook's `From` number rather than the client IP, since every
//! webhook arrives from Twilio's own address pool. Two windows are checked and
//! the first rejection wins:
//!
//! 1. **Burst** -- 3 lookups per 15s
//! 2. **Sustained** -- 10 lookups per minute

use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, warn};

use crate::utils::mask_phone;

/// Reply texted to a sender who is over their budget.
pub const SLOW_DOWN_REPLY: &str =
    "You're sending requests too quickly. Please wait a minute and try again.";

pub struct SenderLimiter {
    burst: DefaultKeyedRateLimiter<String>,
    sustained: DefaultKeyedRateLimiter<String>,
}

/// Quota helper: `count` requests per `period` with burst = count.
fn quota(count: u32, period: Duration) -> Quota {
    Quota::with_period(period / count)
        .expect("non-zero period")
        .allow_burst(NonZeroU32::new(count).expect("non-zero count"))
}

impl Default for SenderLimiter {
    fn default() -> Self {
        Self::new(quota(3, Duration::from_secs(15)), quota(10, Duration::from_secs(60)))
    }
}

impl SenderLimiter {
    pub fn new(burst: Quota, sustained: Quota) -> Self {
        Self {
            burst: RateLimiter::keyed(burst),
            sustained: RateLimiter::keyed(sustained),
        }
    }

    /// Record one lookup for `sender`. Returns `Err(wait)` with the longest
    /// wait across windows when the sender is over budget.
    pub fn check(&self, sender: &str) -> Result<(), Duration> {
        let key = sender.to_owned();
        let mut max_wait: Option<Duration> = None;

        for limiter in [&self.burst, &self.sustained] {
            if let Err(not_until) = limiter.check_key(&key) {
                let wait = not_until.wait_time_from(DefaultClock::default().now());
                max_wait = Some(max_wait.map_or(wait, |current| current.max(wait)));
            }
        }

        match max_wait {
            Some(wait) => {
                warn!(
                    sender = mask_phone(sender),
                    retry_after_secs = wait.as_secs().max(1),
                    "Sender rate limit exceeded"
                );
                Err(wait)
            }
            None => Ok(()),
        }
    }

    /// Drop state for senders whose buckets have fully refilled.
    pub fn prune(&self) {
        self.burst.retain_recent();
        self.sustained.retain_recent();
        self.burst.shrink_to_fit();
        self.sustained.shrink_to_fit();
        debug!(tracked_senders = self.sustained.len(), "Pruned sender rate limits");
    }
}
