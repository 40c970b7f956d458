//! Bounded pool for catalog lookups.
//!
//! Each lookup runs on its own spawned task so a slow catalog page never ties
//! up the HTTP handler. The pool caps how many run at once, aborts any that
//! exceed the timeout, and cancels everything on shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;
use tracing::{debug, warn};

use crate::lookup::LookupError;
use crate::utils::fmt_duration;

#[derive(Debug, Clone)]
pub struct LookupPool {
    permits: Arc<Semaphore>,
    timeout: Duration,
    cancel: CancellationToken,
}

impl LookupPool {
    pub fn new(max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
            cancel: CancellationToken::new(),
        }
    }

    /// Run `job` on a worker task and wait for its result.
    ///
    /// The worker is aborted when this future is dropped, so an abandoned
    /// request releases its permit.
    pub async fn run<F, T>(&self, job: F) -> Result<T, LookupError>
    where
        F: Future<Output = Result<T, LookupError>> + Send + 'static,
        T: Send + 'static,
    {
        let permit = tokio::select! {
            _ = self.cancel.cancelled() => return Err(LookupError::Cancelled),
            permit = self.permits.clone().acquire_owned() => {
                permit.map_err(|_| LookupError::Cancelled)?
            }
        };
        debug!(
            available = self.permits.available_permits(),
            "Lookup worker started"
        );

        // The worker stops on shutdown even when no caller is waiting on it,
        // and dropping the caller aborts it.
        let cancel = self.cancel.clone();
        let mut handle = AbortOnDropHandle::new(tokio::spawn(async move {
            let _permit = permit;
            tokio::select! {
                _ = cancel.cancelled() => Err(LookupError::Cancelled),
                result = job => result,
            }
        }));

        tokio::select! {
            _ = self.cancel.cancelled() => {
                handle.abort();
                Err(LookupError::Cancelled)
            }
            _ = tokio::time::sleep(self.timeout) => {
                handle.abort();
                warn!(timeout = fmt_duration(self.timeout), "Lookup timed out");
                Err(LookupError::TimedOut(self.timeout))
            }
            joined = &mut handle => match joined {
                Ok(result) => result,
                Err(e) => Err(LookupError::Worker(e.to_string())),
            },
        }
    }

    /// Cancel queued and running lookups. Later calls to [`run`](Self::run)
    /// fail immediately with [`LookupError::Cancelled`].
    pub fn shutdown(&self) {
        self.cancel.cancel();
        self.permits.close();
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
