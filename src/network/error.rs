//! Common error types for modem operations

/// A common error type for MQTT-over-AT operations.
///
/// A timed out wait and an unexpected modem answer are the same failure,
/// [`Error::NoResponse`]. Argument errors are raised before anything is
/// written to the modem.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The expected response was not seen before the timeout.
    NoResponse,
    /// The transport failed to write, flush or read.
    Transport,
    /// A qos value outside 0, 1 and 2.
    InvalidQos,
    /// A required argument was empty.
    EmptyArgument,
    /// An argument exceeded its maximum length.
    ArgumentTooLong,
    /// A quoted argument contained `"`, `\r` or `\n`.
    InvalidArgument,
    /// A publish payload contained the prompt terminator or escape byte.
    InvalidPayload,
    /// A formatted command did not fit its buffer.
    CommandTooLong,
}

impl Error {
    /// The numeric status for a failed operation, always `0`.
    pub const fn status_code(&self) -> u8 {
        0
    }
}

/// Map an operation result to the modem-style status code: `1` on success,
/// `0` on any failure.
pub fn status_code<T>(result: &Result<T, Error>) -> u8 {
    match result {
        Ok(_) => 1,
        Err(e) => e.status_code(),
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::NoResponse => "expected response not received",
            Error::Transport => "transport failure",
            Error::InvalidQos => "invalid qos",
            Error::EmptyArgument => "empty argument",
            Error::ArgumentTooLong => "argument too long",
            Error::InvalidArgument => "argument contains a reserved character",
            Error::InvalidPayload => "payload contains a control byte",
            Error::CommandTooLong => "command too long",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NoResponse => defmt::write!(f, "NoResponse"),
            Error::Transport => defmt::write!(f, "Transport"),
            Error::InvalidQos => defmt::write!(f, "InvalidQos"),
            Error::EmptyArgument => defmt::write!(f, "EmptyArgument"),
            Error::ArgumentTooLong => defmt::write!(f, "ArgumentTooLong"),
            Error::InvalidArgument => defmt::write!(f, "InvalidArgument"),
            Error::InvalidPayload => defmt::write!(f, "InvalidPayload"),
            Error::CommandTooLong => defmt::write!(f, "CommandTooLong"),
        }
    }
}
