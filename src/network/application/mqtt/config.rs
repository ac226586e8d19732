//! Sequencer timing configuration.

use serde::{Deserialize, Serialize};

/// Timeouts and settle pauses used by the [`Client`](super::Client).
///
/// The defaults match the modem's documented response times for each
/// command. Every field is optional when loading from JSON.
///
/// # Examples
///
/// ```rust
/// use quectel_mqtt::network::application::mqtt::Config;
///
/// let config = Config::from_json(r#"{"open_timeout_ms":30000}"#).unwrap();
/// assert_eq!(config.open_timeout_ms, 30000);
/// assert_eq!(config.connect_timeout_ms, 10000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wait for `OK` after `AT+QMTCFG`.
    pub config_timeout_ms: u32,
    /// Wait for `+QMTOPEN` after `AT+QMTOPEN`.
    pub open_timeout_ms: u32,
    /// Wait for `+QMTCONN` after `AT+QMTCONN`.
    pub connect_timeout_ms: u32,
    /// Wait for the `>` payload prompt after `AT+QMTPUB`.
    pub prompt_timeout_ms: u32,
    /// Wait for `+QMTPUB` after the payload.
    pub publish_timeout_ms: u32,
    /// Wait for `OK` after `AT+QMTSUB`.
    pub subscribe_timeout_ms: u32,
    /// Wait for `+QMTUNS` after `AT+QMTUNS`.
    pub unsubscribe_timeout_ms: u32,
    /// Wait for `+QMTDISC` after `AT+QMTDISC`.
    pub disconnect_timeout_ms: u32,
    /// Wait for `+QMTCLOSE` after `AT+QMTCLOSE`.
    pub close_timeout_ms: u32,
    /// Pause between the prompt and the payload.
    pub prompt_settle_ms: u32,
    /// Pause between `AT+QMTUNS` and checking its acknowledgement.
    pub unsubscribe_settle_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_timeout_ms: 5_000,
            open_timeout_ms: 10_000,
            connect_timeout_ms: 10_000,
            prompt_timeout_ms: 10_000,
            publish_timeout_ms: 10_000,
            subscribe_timeout_ms: 5_000,
            unsubscribe_timeout_ms: 5_000,
            disconnect_timeout_ms: 10_000,
            close_timeout_ms: 10_000,
            prompt_settle_ms: 100,
            unsubscribe_settle_ms: 1_000,
        }
    }
}

impl Config {
    /// Parse a configuration from a JSON object. Missing fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json_core::de::Error> {
        serde_json_core::from_str(json).map(|(config, _)| config)
    }
}
