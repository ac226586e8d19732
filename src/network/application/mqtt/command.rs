//! Quectel `AT+QMT*` command builders.
//!
//! Each builder validates its arguments and formats one CRLF-terminated
//! command into a bounded buffer. Nothing here talks to the modem.

use crate::network::error::Error;
use core::fmt::Write as _;
use heapless::String;

/// Capacity of a formatted command line.
pub const COMMAND_CAPACITY: usize = 512;

/// Capacity of a formatted expected-response token.
pub const TOKEN_CAPACITY: usize = 32;

/// Maximum broker host name length, as accepted by `AT+QMTOPEN`.
pub const MAX_HOST_LEN: usize = 100;
/// Maximum topic length.
pub const MAX_TOPIC_LEN: usize = 256;
/// Maximum client identifier length.
pub const MAX_CLIENT_ID_LEN: usize = 64;
/// Maximum user name or password length.
pub const MAX_CREDENTIAL_LEN: usize = 128;
/// Maximum payload length sent in prompt mode.
pub const MAX_PAYLOAD_LEN: usize = 1024;

/// The only connection index the sequencer drives.
pub const CONNECTION_INDEX: u8 = 0;

/// Ctrl-Z, ends prompt-mode input.
pub const CTRL_Z: u8 = 0x1A;
/// Escape, aborts prompt-mode input.
pub const ESC: u8 = 0x1B;

/// Disables the will message on connection 0.
pub const WILL_DISABLED: &str = "AT+QMTCFG=\"will\",0\r\n";
/// Disconnects from the broker on connection 0.
pub const DISCONNECT: &str = "AT+QMTDISC=0\r\n";
/// Closes the network connection 0.
pub const CLOSE: &str = "AT+QMTCLOSE=0\r\n";

/// Final result of an accepted command.
pub const OK: &str = "OK";
/// Prompt for publish payload input.
pub const PROMPT: &str = ">";
/// Network connection opened.
pub const OPEN_OK: &str = "+QMTOPEN: 0,0";
/// Broker accepted the connection.
pub const CONNECT_OK: &str = "+QMTCONN: 0,0,0";
/// Any publish acknowledgement.
pub const PUBLISH_ACK: &str = "+QMTPUB:";
/// Broker disconnected cleanly.
pub const DISCONNECT_OK: &str = "+QMTDISC: 0,0";
/// Network connection closed cleanly.
pub const CLOSE_OK: &str = "+QMTCLOSE: 0,0";

/// A formatted AT command line.
pub type Command = String<COMMAND_CAPACITY>;

/// A formatted expected-response token.
pub type Token = String<TOKEN_CAPACITY>;

/// Quality of Service levels for MQTT messages.
///
/// # Examples
///
/// ```rust
/// use quectel_mqtt::network::application::mqtt::QoS;
///
/// assert_eq!(QoS::try_from(1u8), Ok(QoS::AtLeastOnce));
/// assert!(QoS::try_from(3u8).is_err());
/// assert_eq!(QoS::ExactlyOnce as u8, 2);
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum QoS {
    /// At most once delivery.
    AtMostOnce = 0,
    /// At least once delivery.
    AtLeastOnce = 1,
    /// Exactly once delivery.
    ExactlyOnce = 2,
}

impl TryFrom<u8> for QoS {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            _ => Err(Error::InvalidQos),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for QoS {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", *self as u8)
    }
}

/// `AT+QMTOPEN=0,"<host>",<port>`
pub fn open(host: &str, port: u16) -> Result<Command, Error> {
    check_quoted(host, 1, MAX_HOST_LEN)?;
    format(format_args!(
        "AT+QMTOPEN={},\"{}\",{}\r\n",
        CONNECTION_INDEX, host, port
    ))
}

/// `AT+QMTCONN=0,"<clientID>","<user>","<pass>"`
pub fn connect(client_id: &str, user: &str, pass: &str) -> Result<Command, Error> {
    check_quoted(client_id, 1, MAX_CLIENT_ID_LEN)?;
    check_quoted(user, 0, MAX_CREDENTIAL_LEN)?;
    check_quoted(pass, 0, MAX_CREDENTIAL_LEN)?;
    format(format_args!(
        "AT+QMTCONN={},\"{}\",\"{}\",\"{}\"\r\n",
        CONNECTION_INDEX, client_id, user, pass
    ))
}

/// `AT+QMTPUB=0,<id>,<qos>,0,"<topic>"`
///
/// The caller picks `id`; a qos 0 publish carries id 0.
pub fn publish(id: u16, qos: QoS, topic: &str) -> Result<Command, Error> {
    check_quoted(topic, 1, MAX_TOPIC_LEN)?;
    format(format_args!(
        "AT+QMTPUB={},{},{},0,\"{}\"\r\n",
        CONNECTION_INDEX, id, qos as u8, topic
    ))
}

/// `AT+QMTSUB=0,<id>,"<topic>",<qos>`
pub fn subscribe(id: u16, topic: &str, qos: QoS) -> Result<Command, Error> {
    check_quoted(topic, 1, MAX_TOPIC_LEN)?;
    format(format_args!(
        "AT+QMTSUB={},{},\"{}\",{}\r\n",
        CONNECTION_INDEX, id, topic, qos as u8
    ))
}

/// `AT+QMTUNS=0,<id>,"<topic>"`
pub fn unsubscribe(id: u16, topic: &str) -> Result<Command, Error> {
    check_quoted(topic, 1, MAX_TOPIC_LEN)?;
    format(format_args!(
        "AT+QMTUNS={},{},\"{}\"\r\n",
        CONNECTION_INDEX, id, topic
    ))
}

/// `+QMTUNS: 0,<id>`, the acknowledgement prefix for an unsubscribe.
pub fn unsubscribe_ack(id: u16) -> Result<Token, Error> {
    let mut token = Token::new();
    write!(token, "+QMTUNS: {},{}", CONNECTION_INDEX, id).map_err(|_| Error::CommandTooLong)?;
    Ok(token)
}

/// Check that `payload` can be sent in prompt mode.
///
/// Ctrl-Z would end the input early and Escape would cancel it.
pub fn check_payload(payload: &[u8]) -> Result<(), Error> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(Error::ArgumentTooLong);
    }
    if payload.iter().any(|&b| b == CTRL_Z || b == ESC) {
        return Err(Error::InvalidPayload);
    }
    Ok(())
}

fn check_quoted(arg: &str, min_len: usize, max_len: usize) -> Result<(), Error> {
    if arg.len() < min_len {
        return Err(Error::EmptyArgument);
    }
    if arg.len() > max_len {
        return Err(Error::ArgumentTooLong);
    }
    if arg.bytes().any(|b| matches!(b, b'"' | b'\r' | b'\n')) {
        return Err(Error::InvalidArgument);
    }
    Ok(())
}

fn format(args: core::fmt::Arguments<'_>) -> Result<Command, Error> {
    let mut cmd = Command::new();
    cmd.write_fmt(args).map_err(|_| Error::CommandTooLong)?;
    Ok(cmd)
}
