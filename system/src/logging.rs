//! Structured logging initialisation and the audit trail.
//!
//! Two output formats are supported:
//! - [`LogFormat::Human`]: coloured, human-readable lines (development).
//! - [`LogFormat::Json`]: newline-delimited JSON (production / log aggregation).
//!
//! The filter level can be overridden at runtime via the `RUST_LOG`
//! environment variable.  When `RUST_LOG` is not set, the caller-supplied
//! `level` string is used (e.g. `"info"`, `"debug,gavel_governance=trace"`).

use gavel_types::Event;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::SystemError;

/// Target under which every emitted [`Event`] is logged.
pub const AUDIT_TARGET: &str = "gavel::audit";

/// Selects the output format for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty-printed, coloured output for local development.
    Human,
    /// Newline-delimited JSON for production and log aggregation pipelines.
    Json,
}

/// Install the global tracing subscriber.
///
/// Fails if a global subscriber has already been set.
pub fn init_logging(format: LogFormat, level: &str) -> Result<(), SystemError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let result = match format {
        LogFormat::Human => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init(),
    };
    result.map_err(|e| SystemError::Logging(e.to_string()))
}

/// Render an event as one line of JSON.
pub fn event_to_json(event: &Event) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// A bus listener that logs every event as JSON under [`AUDIT_TARGET`].
pub fn audit_listener() -> Box<dyn Fn(&Event)> {
    Box::new(|event| match event_to_json(event) {
        Ok(json) => info!(target: AUDIT_TARGET, event = %json, "audit"),
        Err(e) => warn!(target: AUDIT_TARGET, error = %e, "event not serializable"),
    })
}
