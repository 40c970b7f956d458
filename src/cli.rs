use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// SMS seat-availability bot for the UCI Schedule of Classes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log formatter to use
    #[arg(long, value_enum, default_value_t = default_tracing_format())]
    pub tracing: TracingFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the webhook server (default)
    Serve,
    /// Look up one course and print the reply that would be texted back
    Check {
        /// Department and course number, e.g. `I&C SCI 33`
        #[arg(required = true, num_args = 2..)]
        query: Vec<String>,
        /// Read the listing from a saved results page instead of the live catalog
        #[arg(long, value_name = "FILE")]
        page: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingFormat {
    /// Compact, coloured output for terminals
    Pretty,
    /// One JSON object per line
    Json,
}

const fn default_tracing_format() -> TracingFormat {
    if cfg!(debug_assertions) {
        TracingFormat::Pretty
    } else {
        TracingFormat::Json
    }
}
