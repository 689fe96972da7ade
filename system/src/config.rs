//! System configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use gavel_governance::{MAX_VOTING_DELAY, MAX_VOTING_PERIOD, MIN_VOTING_DELAY, MIN_VOTING_PERIOD};
use gavel_timelock::{DEFAULT_DELAY, DEFAULT_GRACE_PERIOD, MAXIMUM_DELAY, MINIMUM_DELAY};

use crate::logging::LogFormat;
use crate::SystemError;

/// Configuration for a gavel deployment.
///
/// Can be loaded from a TOML file via [`SystemConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every table and field is
/// optional; missing values take the reference deployment's defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub governor: GovernorConfig,
    #[serde(default)]
    pub timelock: TimelockConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_token_name")]
    pub name: String,

    #[serde(default = "default_token_symbol")]
    pub symbol: String,

    /// Initial supply in whole tokens, minted to the deployer's holder.
    #[serde(default = "default_initial_supply")]
    pub initial_supply: u32,

    /// Unix time before which minting is refused.
    #[serde(default = "default_minting_allowed_after")]
    pub minting_allowed_after: u64,

    /// Unix time before which the ledger refuses to be upgraded.
    #[serde(default = "default_change_implementation_after")]
    pub change_implementation_after: u64,

    /// Start with transfers paused.
    #[serde(default)]
    pub transfer_paused: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Blocks between proposing and the start of voting.
    #[serde(default = "default_voting_delay")]
    pub voting_delay: u64,

    /// Blocks during which votes are accepted.
    #[serde(default = "default_voting_period")]
    pub voting_period: u64,

    /// Whole tokens of voting power needed to propose.
    #[serde(default = "default_proposal_threshold")]
    pub proposal_threshold: u32,

    /// Whole tokens of for-votes needed for a proposal to pass.
    #[serde(default = "default_quorum")]
    pub quorum: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelockConfig {
    /// Seconds between queueing and earliest execution.
    #[serde(default = "default_delay")]
    pub delay: u64,

    /// Seconds after the eta during which execution stays possible.
    #[serde(default = "default_grace_period")]
    pub grace_period: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log every emitted event as JSON under the `gavel::audit` target.
    #[serde(default = "default_true")]
    pub audit: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_token_name() -> String {
    "Gavel".to_string()
}

fn default_token_symbol() -> String {
    "GVL".to_string()
}

fn default_initial_supply() -> u32 {
    10_000_000
}

fn default_minting_allowed_after() -> u64 {
    1_622_505_601
}

fn default_change_implementation_after() -> u64 {
    1_622_505_601
}

fn default_voting_delay() -> u64 {
    1
}

fn default_voting_period() -> u64 {
    6_000
}

fn default_proposal_threshold() -> u32 {
    60_000
}

fn default_quorum() -> u32 {
    400_000
}

fn default_delay() -> u64 {
    DEFAULT_DELAY
}

fn default_grace_period() -> u64 {
    DEFAULT_GRACE_PERIOD
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_token_name(),
            symbol: default_token_symbol(),
            initial_supply: default_initial_supply(),
            minting_allowed_after: default_minting_allowed_after(),
            change_implementation_after: default_change_implementation_after(),
            transfer_paused: false,
        }
    }
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            voting_delay: default_voting_delay(),
            voting_period: default_voting_period(),
            proposal_threshold: default_proposal_threshold(),
            quorum: default_quorum(),
        }
    }
}

impl Default for TimelockConfig {
    fn default() -> Self {
        Self {
            delay: default_delay(),
            grace_period: default_grace_period(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            level: default_log_level(),
            audit: default_true(),
        }
    }
}

// ── Impl ───────────────────────────────────────────────────────────────

impl SystemConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SystemError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SystemError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SystemError> {
        toml::from_str(s).map_err(|e| SystemError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, SystemError> {
        toml::to_string_pretty(self).map_err(|e| SystemError::Config(e.to_string()))
    }

    /// Check every value against the bounds the components enforce, so a bad
    /// file is reported before anything is constructed.
    pub fn validate(&self) -> Result<(), SystemError> {
        let fail = |msg: String| Err(SystemError::Config(msg));
        let g = &self.governor;
        let t = &self.timelock;

        if self.token.initial_supply == 0 {
            return fail("token.initial_supply must be positive".into());
        }
        if !(MIN_VOTING_DELAY..=MAX_VOTING_DELAY).contains(&g.voting_delay) {
            return fail(format!(
                "governor.voting_delay {} outside [{MIN_VOTING_DELAY}, {MAX_VOTING_DELAY}]",
                g.voting_delay
            ));
        }
        if !(MIN_VOTING_PERIOD..=MAX_VOTING_PERIOD).contains(&g.voting_period) {
            return fail(format!(
                "governor.voting_period {} outside [{MIN_VOTING_PERIOD}, {MAX_VOTING_PERIOD}]",
                g.voting_period
            ));
        }
        if g.proposal_threshold == 0 || g.quorum == 0 {
            return fail("governor.proposal_threshold and governor.quorum must be positive".into());
        }
        if !(MINIMUM_DELAY..=MAXIMUM_DELAY).contains(&t.delay) {
            return fail(format!(
                "timelock.delay {} outside [{MINIMUM_DELAY}, {MAXIMUM_DELAY}]",
                t.delay
            ));
        }
        if t.grace_period == 0 {
            return fail("timelock.grace_period must be positive".into());
        }
        Ok(())
    }
}
