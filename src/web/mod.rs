//! HTTP surface: the Twilio webhook and a health check.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod status;
pub mod webhook;

pub use routes::*;
