//! Subscriber setup for the `tracing` events emitted by the solver and the
//! dataset loader.
//!
//! The library crates only emit events; nothing is printed until an
//! application installs a subscriber, typically once at startup:
//!
//! ```no_run
//! use sparsemf::logging::{init_tracing, TracingConfig, TracingFormat};
//!
//! init_tracing(TracingConfig {
//!     format: TracingFormat::Compact,
//!     filter: "sparsemf_optim=debug,info".to_string(),
//!     ..TracingConfig::default()
//! })?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: default filter directive (e.g. `RUST_LOG=sparsemf_optim=debug`)
//! - `SPARSEMF_LOG_FORMAT`: `pretty`, `json` or `compact` (default: `compact`)

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Multi-line human-readable format
    Pretty,
    /// JSON format for structured logging
    Json,
    /// Single line per event
    Compact,
}

impl TracingFormat {
    /// Parses a format name, falling back to `Compact`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Output format
    pub format: TracingFormat,
    /// Filter directive (e.g., "sparsemf_optim=debug,info")
    pub filter: String,
    /// Enable ANSI colors
    pub with_ansi: bool,
    /// Show target module paths
    pub with_target: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let format = std::env::var("SPARSEMF_LOG_FORMAT")
            .map(|s| TracingFormat::parse(&s))
            .unwrap_or(TracingFormat::Compact);
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            format,
            filter,
            with_ansi: true,
            with_target: true,
        }
    }
}

/// Installs the global subscriber.
///
/// Fails if the filter directive does not parse or if a global subscriber
/// is already installed.
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;

    match config.format {
        TracingFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(config.with_target)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
    }

    Ok(())
}
