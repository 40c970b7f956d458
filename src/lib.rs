pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod departments;
pub mod logging;
pub mod lookup;
pub mod sms;
pub mod soc;
pub mod state;
pub mod utils;
pub mod web;
