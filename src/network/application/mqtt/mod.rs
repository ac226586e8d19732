//! MQTT over Quectel `AT+QMT*` commands.
//!
//! Quectel cellular modules (BG95, BG96, EC2x, ...) embed an MQTT 3.1.1 client
//! that the host drives with AT commands over a serial link. This module
//! sequences those commands and interprets the modem's answers.
//!
//! # Key Features
//!
//! - One command per operation, one awaited response token, no retries
//! - Per-client message identifier counter
//! - Bounded command buffers with argument validation before anything is sent
//! - Timeouts and settle pauses configurable from JSON
//!
//! # Usage
//!
//! The main entry point is the [`Client`], generic over any
//! [`AtTransport`](crate::network::AtTransport) and
//! [`Delay`](crate::network::Delay).
//!
//! ```rust,no_run
//! use quectel_mqtt::network::application::mqtt::{Client, Config, QoS};
//! # use quectel_mqtt::network::{AtTransport, Delay};
//! # struct Uart;
//! # impl AtTransport for Uart {
//! #     type Error = ();
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write(&mut self, _data: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn get_response(&mut self, _buf: &mut [u8], _expected: &str, _timeout_ms: u32) -> Result<Option<usize>, Self::Error> { Ok(None) }
//! #     fn verify_response(&mut self, _expected: &str, _timeout_ms: u32) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # struct Ticks;
//! # impl Delay for Ticks { fn delay_ms(&mut self, _ms: u32) {} }
//!
//! let config = Config::from_json(r#"{"open_timeout_ms":30000}"#).unwrap();
//! let mut client = Client::with_config(Uart, Ticks, config);
//!
//! // client.open_connection("broker.hivemq.com", 1883)?;
//! // client.connect("iot_device_123", "", "")?;
//! // client.subscribe("commands/+", QoS::AtLeastOnce)?;
//! ```

/// The command sequencer.
pub mod client;

/// `AT+QMT*` command builders and response tokens.
pub mod command;

/// Timeouts and settle pauses.
pub mod config;

/// Parser for `+QMT...` result lines.
pub mod urc;

pub use client::{Client, SessionState};
pub use command::QoS;
pub use config::Config;
pub use urc::Urc;
