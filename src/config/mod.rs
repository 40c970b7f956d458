//! Application configuration.
//!
//! Loaded once at startup from an optional `seatline.toml` and the process
//! environment (environment wins). The Twilio credentials are required; every
//! other setting has a default.

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use fundu::DurationParser;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use url::Url;

/// Messaging-provider credentials and sender.
#[derive(Clone, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    #[serde(default = "default_from_number")]
    pub from_number: String,
    #[serde(default = "default_twilio_api_base")]
    pub twilio_api_base: Url,
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("twilio_api_base", &self.twilio_api_base.as_str())
            .finish()
    }
}

/// Where and how the course catalog is fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub catalog_url: Url,
    /// Upper bound on one full lookup (both page loads plus parsing).
    #[serde(
        default = "default_lookup_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub lookup_timeout: Duration,
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

/// HTTP server and process settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally visible base URL (e.g. `https://seatline.example.com`).
    /// Twilio signs the URL it called, so behind a proxy this must be set.
    #[serde(default)]
    pub public_url: Option<Url>,
    #[serde(
        default = "default_shutdown_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub shutdown_timeout: Duration,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub twilio: TwilioConfig,
    pub catalog: CatalogConfig,
}

impl Config {
    /// The standard provider chain: `seatline.toml`, then the environment.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file("seatline.toml"))
            .merge(Env::raw())
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(&Self::figment())
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, figment::Error> {
        Ok(Self {
            server: figment.extract()?,
            twilio: figment.extract()?,
            catalog: figment.extract()?,
        })
    }
}

fn default_from_number() -> String {
    "+18182908210".to_owned()
}

fn default_twilio_api_base() -> Url {
    Url::parse("https://api.twilio.com").expect("valid default URL")
}

fn default_catalog_url() -> Url {
    Url::parse("https://www.reg.uci.edu/perl/WebSoc/").expect("valid default URL")
}

fn default_lookup_timeout() -> Duration {
    Duration::from_secs(45)
}

fn default_max_concurrent_lookups() -> usize {
    4
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(8)
}

fn default_log_level() -> String {
    "info".to_owned()
}

/// Accepts bare seconds (`45`) or a duration string (`45s`, `1.5m`, `500ms`).
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => {
            let parsed = DurationParser::with_all_time_units()
                .parse(text.trim())
                .map_err(|e| D::Error::custom(format!("invalid duration {text:?}: {e}")))?;
            Duration::try_from(parsed)
                .map_err(|e| D::Error::custom(format!("invalid duration {text:?}: {e}")))
        }
    }
}
