//! # Application Layer Protocols
//!
//! Application protocols carried by the modem's own stack. The modem terminates
//! TCP and MQTT itself; the host only drives it with AT commands through an
//! [`AtTransport`](crate::network::AtTransport).
//!
//! ## Available Protocols
//!
//! - **[`mqtt`]**: MQTT 3.1.1 through the Quectel `AT+QMT*` command family

/// MQTT client driven through Quectel `AT+QMT*` commands.
///
/// Provides the command sequencer, the command builders, configuration and
/// a parser for the modem's `+QMT...` result lines.
pub mod mqtt;
