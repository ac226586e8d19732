//! A modem abstraction layer for cellular IoT devices
//!
//! This module defines the collaborator contracts the MQTT sequencer is built on:
//! an AT-command transport that owns the serial link, framing and response
//! matching, and a blocking delay used for the fixed settle pauses.
//!

#![deny(unsafe_code)]

/// Common error types for modem operations
pub mod error;

/// Protocol-specific client implementations
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{AtTransport, Delay};
}

/// An AT-command transaction layer attached to a modem's serial port.
///
/// Implementations own timeout handling and substring matching. Every wait
/// method reports "token seen" or "timed out"; an `Err` is reserved for I/O
/// failures of the link itself.
pub trait AtTransport {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Discard any data buffered on the link.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Send raw bytes to the modem.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Send a single raw byte to the modem.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.write(&[byte])
    }

    /// Block until `expected` appears in the received data or `timeout_ms`
    /// elapses, copying what was received into `buf`.
    ///
    /// Returns `Some(n)` with the number of captured bytes on a match and
    /// `None` on timeout.
    fn get_response(
        &mut self,
        buf: &mut [u8],
        expected: &str,
        timeout_ms: u32,
    ) -> Result<Option<usize>, Self::Error>;

    /// Block until `expected` appears or `timeout_ms` elapses, without
    /// capturing the received data.
    fn verify_response(&mut self, expected: &str, timeout_ms: u32) -> Result<bool, Self::Error>;

    /// Send `command` and wait for `expected`.
    fn command(&mut self, command: &str, expected: &str, timeout_ms: u32) -> Result<bool, Self::Error> {
        self.write(command.as_bytes())?;
        self.verify_response(expected, timeout_ms)
    }
}

/// A blocking millisecond delay.
pub trait Delay {
    /// Pause the calling context for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// [`Delay`] backed by [`std::thread::sleep`].
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
