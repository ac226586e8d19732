//! Parser for the modem's `+QMT...` result lines.
//!
//! The modem reports the outcome of most MQTT commands asynchronously with a
//! result line such as `+QMTOPEN: 0,3`. The sequencer only waits for fixed
//! success tokens; this parser turns a captured failure into something worth
//! logging.

use core::str::FromStr;

/// A parsed `+QMT...` result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Urc {
    /// `+QMTOPEN: <idx>,<result>`
    ///
    /// `result` is `0` on success, `-1` on failure, and `1..=5` for wrong
    /// parameter, index in use, PDP activation failure, DNS failure and
    /// network disconnect.
    Open {
        /// Connection index.
        client: u8,
        /// Open result.
        result: i8,
    },
    /// `+QMTCONN: <idx>,<result>[,<ret_code>]`
    Connect {
        /// Connection index.
        client: u8,
        /// `0` sent, `1` retransmitting, `2` failed.
        result: i8,
        /// CONNACK return code, `0` accepted, `1..=5` refused.
        ret_code: Option<u8>,
    },
    /// `+QMTPUB: <idx>,<msgid>,<result>[,<value>]`
    Publish {
        /// Connection index.
        client: u8,
        /// Message identifier.
        msg_id: u16,
        /// `0` acknowledged, `1` retransmitting, `2` failed.
        result: i8,
        /// Retransmission count.
        value: Option<u8>,
    },
    /// `+QMTSUB: <idx>,<msgid>,<result>[,<value>]`
    Subscribe {
        /// Connection index.
        client: u8,
        /// Message identifier.
        msg_id: u16,
        /// `0` acknowledged, `1` retransmitting, `2` failed.
        result: i8,
        /// First granted qos, or retransmission count.
        value: Option<u8>,
    },
    /// `+QMTUNS: <idx>,<msgid>,<result>`
    Unsubscribe {
        /// Connection index.
        client: u8,
        /// Message identifier.
        msg_id: u16,
        /// `0` acknowledged, `1` retransmitting, `2` failed.
        result: i8,
    },
    /// `+QMTDISC: <idx>,<result>`
    Disconnect {
        /// Connection index.
        client: u8,
        /// `0` success, `-1` failure.
        result: i8,
    },
    /// `+QMTCLOSE: <idx>,<result>`
    Close {
        /// Connection index.
        client: u8,
        /// `0` success, `-1` failure.
        result: i8,
    },
    /// `+QMTSTAT: <idx>,<err_code>`, the link changed state on its own.
    Status {
        /// Connection index.
        client: u8,
        /// Reason the link changed state.
        err_code: u8,
    },
}

impl Urc {
    /// Parse one response line. Returns `None` for anything that is not a
    /// well-formed `+QMT...` result line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quectel_mqtt::network::application::mqtt::Urc;
    ///
    /// let urc = Urc::parse("+QMTOPEN: 0,3\r\n").unwrap();
    /// assert_eq!(urc, Urc::Open { client: 0, result: 3 });
    /// assert!(!urc.is_success());
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let (name, rest) = line.trim().strip_prefix("+QMT")?.split_once(':')?;
        let mut fields = rest.split(',').map(str::trim);
        let client = required(&mut fields)?;

        let urc = match name {
            "OPEN" => Urc::Open {
                client,
                result: required(&mut fields)?,
            },
            "CONN" => Urc::Connect {
                client,
                result: required(&mut fields)?,
                ret_code: optional(&mut fields),
            },
            "PUB" => Urc::Publish {
                client,
                msg_id: required(&mut fields)?,
                result: required(&mut fields)?,
                value: optional(&mut fields),
            },
            "SUB" => Urc::Subscribe {
                client,
                msg_id: required(&mut fields)?,
                result: required(&mut fields)?,
                value: optional(&mut fields),
            },
            "UNS" => Urc::Unsubscribe {
                client,
                msg_id: required(&mut fields)?,
                result: required(&mut fields)?,
            },
            "DISC" => Urc::Disconnect {
                client,
                result: required(&mut fields)?,
            },
            "CLOSE" => Urc::Close {
                client,
                result: required(&mut fields)?,
            },
            "STAT" => Urc::Status {
                client,
                err_code: required(&mut fields)?,
            },
            _ => return None,
        };
        Some(urc)
    }

    /// Whether the line reports a successful outcome.
    pub fn is_success(&self) -> bool {
        match *self {
            Urc::Open { result, .. }
            | Urc::Publish { result, .. }
            | Urc::Subscribe { result, .. }
            | Urc::Unsubscribe { result, .. }
            | Urc::Disconnect { result, .. }
            | Urc::Close { result, .. } => result == 0,
            Urc::Connect {
                result, ret_code, ..
            } => result == 0 && ret_code.unwrap_or(0) == 0,
            Urc::Status { .. } => false,
        }
    }
}

/// Find the last `+QMT...` result line in a captured response buffer.
pub fn find_urc(captured: &[u8]) -> Option<Urc> {
    captured
        .split(|&b| b == b'\n')
        .filter_map(|line| core::str::from_utf8(line).ok())
        .filter_map(Urc::parse)
        .last()
}

fn required<'a, T: FromStr>(fields: &mut impl Iterator<Item = &'a str>) -> Option<T> {
    fields.next()?.parse().ok()
}

fn optional<'a, T: FromStr>(fields: &mut impl Iterator<Item = &'a str>) -> Option<T> {
    fields.next().and_then(|f| f.parse().ok())
}
