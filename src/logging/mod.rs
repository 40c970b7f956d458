pub mod formatter;

use crate::cli::TracingFormat;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt::format::JsonFields};

/// Configure and initialize logging for the application.
///
/// `RUST_LOG` takes precedence over `base_level`.
pub fn setup_logging(base_level: &str, tracing_format: TracingFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(base_level)));

    match tracing_format {
        TracingFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .event_format(formatter::CustomPrettyFormatter)
                        .fmt_fields(formatter::compact_fields()),
                )
                .init();
        }
        TracingFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .event_format(formatter::CustomJsonFormatter)
                        .fmt_fields(JsonFields::new()),
                )
                .init();
        }
    }
}

fn default_directives(base_level: &str) -> String {
    format!("warn,seatline={base_level}")
}
