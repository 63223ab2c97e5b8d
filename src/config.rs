//! Ledger configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), each with a default.

use std::fmt;
use std::str::FromStr;

/// How new campaign ids are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Random UUID v4 strings.
    #[default]
    Uuid,
    /// Zero-padded counter, deterministic across runs.
    Sequential,
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uuid" => Ok(Self::Uuid),
            "sequential" => Ok(Self::Sequential),
            other => Err(format!(
                "invalid id strategy {other:?}: expected \"uuid\" or \"sequential\""
            )),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid => f.write_str("uuid"),
            Self::Sequential => f.write_str("sequential"),
        }
    }
}

/// Top-level ledger configuration.
///
/// Loaded once at startup via [`LedgerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Campaign id generation strategy.
    pub id_strategy: IdStrategy,

    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            event_bus_capacity: 1024,
            id_strategy: IdStrategy::Uuid,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file,
    /// then reads:
    ///
    /// | key | default |
    /// |-----|---------|
    /// | `LEDGER_EVENT_BUS_CAPACITY` | `1024` |
    /// | `LEDGER_ID_STRATEGY` | `uuid` |
    /// | `LEDGER_LOG_LEVEL` | `info` |
    /// | `LEDGER_LOG_JSON` | `false` |
    ///
    /// # Errors
    ///
    /// Returns an error if `LEDGER_ID_STRATEGY` is set to an unknown value.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back
    /// to defaults for missing or unparsable numeric and boolean values.
    ///
    /// # Errors
    ///
    /// Returns an error if `LEDGER_ID_STRATEGY` is set to an unknown value.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let defaults = Self::default();

        let event_bus_capacity = parse_or(
            lookup("LEDGER_EVENT_BUS_CAPACITY"),
            defaults.event_bus_capacity,
        );

        let id_strategy = match lookup("LEDGER_ID_STRATEGY") {
            Some(value) => value.parse::<IdStrategy>()?,
            None => defaults.id_strategy,
        };

        let log_level = lookup("LEDGER_LOG_LEVEL").unwrap_or(defaults.log_level);
        let log_json = parse_bool_or(lookup("LEDGER_LOG_JSON"), defaults.log_json);

        Ok(Self {
            event_bus_capacity,
            id_strategy,
            log_level,
            log_json,
        })
    }
}

/// Parses `value` as `T`, returning `default` on missing or invalid input.
fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool_or(value: Option<String>, default: bool) -> bool {
    match value.map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
