//! gavel system wiring.
//!
//! Loads a [`SystemConfig`], installs logging, and deploys the voting ledger,
//! the delay queue and the proposal engine with their roles connected.

pub mod config;
pub mod error;
pub mod logging;
pub mod system;

pub use config::{GovernorConfig, LoggingConfig, SystemConfig, TimelockConfig, TokenConfig};
pub use error::SystemError;
pub use logging::{audit_listener, event_to_json, init_logging, LogFormat, AUDIT_TARGET};
pub use system::{component_address, GovernanceSystem};
