//! # quectel-mqtt - MQTT for Quectel cellular modems
//!
//! A small `no_std` library that lets an IoT device talk MQTT through the MQTT
//! client built into Quectel cellular modules. The host never sees an MQTT
//! packet: it sends `AT+QMT*` commands over a serial link and waits for the
//! modem's answers.
//!
//! ## Features
//!
//! - **Command Sequencer**: init, open, connect, publish, subscribe,
//!   unsubscribe, disconnect and close, one AT command each
//! - **Transport Agnostic**: works with any AT engine implementing
//!   [`AtTransport`](network::AtTransport)
//! - **Bounded Buffers**: commands are built in fixed-size `heapless` strings
//! - **Configurable Timing**: timeouts and settle pauses loadable from JSON
//! - **Diagnostics**: parser for the modem's `+QMT...` result lines
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! quectel-mqtt = "0.1.0"
//! ```
//!
//! ### Publishing a Reading
//!
//! ```rust,no_run
//! use quectel_mqtt::network::application::mqtt::{Client, QoS};
//! # use quectel_mqtt::network::{AtTransport, Delay};
//! # struct Uart;
//! # impl AtTransport for Uart {
//! #     type Error = ();
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write(&mut self, _data: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn get_response(&mut self, _buf: &mut [u8], _expected: &str, _timeout_ms: u32) -> Result<Option<usize>, Self::Error> { Ok(Some(0)) }
//! #     fn verify_response(&mut self, _expected: &str, _timeout_ms: u32) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct Ticks;
//! # impl Delay for Ticks { fn delay_ms(&mut self, _ms: u32) {} }
//!
//! let mut client = Client::new(Uart, Ticks);
//!
//! // client.init()?;
//! // client.open_connection("test.mosquitto.org", 1883)?;
//! // client.connect("my_device", "", "")?;
//! // client.publish("sensors/temperature", b"23.5", QoS::AtMostOnce)?;
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (`std::error::Error`, `StdDelay`)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

/// Modem abstraction layer: the AT transport contract and the protocols
/// driven through it.
pub mod network;
