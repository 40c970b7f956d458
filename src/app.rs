use crate::catalog::WebSocClient;
use crate::config::Config;
use crate::lookup::{LookupPool, SeatLookup};
use crate::sms::TwilioClient;
use crate::state::{AppState, WebhookAuth};
use crate::utils::fmt_duration;
use crate::web::create_router;
use crate::web::middleware::rate_limit::SenderLimiter;
use anyhow::Context;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// How often idle senders are dropped from the rate limiter.
const LIMITER_PRUNE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Main application struct containing all necessary components
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    /// Build the catalog client, lookup pool and Twilio client from `config`.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let catalog = WebSocClient::new(
            config.catalog.catalog_url.clone(),
            config.catalog.lookup_timeout,
        )
        .context("Failed to create catalog client")?;

        let pool = LookupPool::new(
            config.catalog.max_concurrent_lookups,
            config.catalog.lookup_timeout,
        );

        let messenger = TwilioClient::new(
            &config.twilio.twilio_api_base,
            config.twilio.account_sid.clone(),
            config.twilio.auth_token.clone(),
            config.twilio.from_number.clone(),
        )
        .context("Failed to create Twilio client")?;

        info!(
            catalog_url = %config.catalog.catalog_url,
            max_concurrent_lookups = config.catalog.max_concurrent_lookups,
            lookup_timeout = fmt_duration(config.catalog.lookup_timeout),
            public_url = config.server.public_url.as_ref().map(|u| u.as_str()),
            "lookup pipeline configured"
        );

        let app_state = AppState::new(
            SeatLookup::new(Arc::new(catalog), pool),
            Arc::new(messenger),
            WebhookAuth {
                auth_token: config.twilio.auth_token.clone(),
                public_url: config.server.public_url.clone(),
            },
            SenderLimiter::default(),
        );

        Ok(App { config, app_state })
    }

    /// Serve the webhook until a shutdown signal, then drain in-flight
    /// requests for up to `SHUTDOWN_TIMEOUT` before cancelling lookups.
    pub async fn run(self) -> ExitCode {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.server.port));
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = ?e, %addr, "Failed to bind listener");
                return ExitCode::FAILURE;
            }
        };
        info!(%addr, "web server listening");

        let pruner = self.app_state.spawn_limiter_pruning(LIMITER_PRUNE_INTERVAL);
        let router = create_router(self.app_state.clone());

        let shutdown = CancellationToken::new();
        let server_shutdown = shutdown.clone();
        let mut server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
                .await
        });

        tokio::select! {
            _ = shutdown_signal() => {
                info!(
                    timeout = fmt_duration(self.config.server.shutdown_timeout),
                    "shutdown signal received, draining requests"
                );
            }
            result = &mut server => {
                pruner.abort();
                self.app_state.lookup.pool().shutdown();
                error!(result = ?result, "web server exited unexpectedly");
                return ExitCode::FAILURE;
            }
        }

        shutdown.cancel();
        let exit = match tokio::time::timeout(self.config.server.shutdown_timeout, &mut server).await
        {
            Ok(Ok(Ok(()))) => {
                info!("web server stopped");
                ExitCode::SUCCESS
            }
            Ok(Ok(Err(e))) => {
                error!(error = ?e, "web server failed during shutdown");
                ExitCode::FAILURE
            }
            Ok(Err(e)) => {
                error!(error = ?e, "web server task failed");
                ExitCode::FAILURE
            }
            Err(_) => {
                warn!("graceful shutdown timed out, cancelling in-flight lookups");
                self.app_state.lookup.pool().shutdown();
                server.abort();
                ExitCode::FAILURE
            }
        };

        self.app_state.lookup.pool().shutdown();
        pruner.abort();
        exit
    }
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = ?e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = ?e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
