//! MQTT command sequencer for Quectel modems.
//!
//! The modem runs the MQTT client itself. This module turns each MQTT
//! operation into one `AT+QMT*` command, hands it to an [`AtTransport`], waits
//! for one expected response token and reports the outcome.
//!
//! # Sequencing
//!
//! Each operation is a single attempt with a fixed timeout taken from
//! [`Config`]. There are no retries and no ordering checks: calling
//! [`Client::publish`] before [`Client::connect`] simply sends the command and
//! reports whatever the modem answers.
//!
//! ```text
//! open_connection ─▶ connect ─▶ publish / subscribe / unsubscribe ─▶ disconnect ─▶ close_connection
//!   +QMTOPEN          +QMTCONN    > + Ctrl-Z / OK / +QMTUNS             +QMTDISC      +QMTCLOSE
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use quectel_mqtt::network::application::mqtt::{Client, QoS};
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
//! let mut client = Client::new(Uart, Ticks);
//! client.init().ok();
//! client.open_connection("broker.hivemq.com", 1883).ok();
//! client.connect("tracker-01", "", "").ok();
//! client.publish("fleet/tracker-01/position", b"48.1173,11.5167", QoS::AtLeastOnce).ok();
//! client.disconnect().ok();
//! client.close_connection().ok();
//! ```

use super::command::{self, QoS};
use super::config::Config;
use super::urc::find_urc;
use crate::network::error::Error;
use crate::network::{AtTransport, Delay};

/// Size of the buffer that captures the modem's answer to open, connect,
/// disconnect and close.
pub const RESPONSE_BUFFER_SIZE: usize = 256;

/// First message identifier handed out by a new client.
pub const FIRST_MESSAGE_ID: u16 = 1;

/// The last lifecycle step the client saw succeed.
///
/// This is bookkeeping only. The client never refuses an operation because
/// of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Nothing has succeeded yet.
    Idle,
    /// The network connection to the broker is open.
    Opened,
    /// The broker accepted the MQTT connection.
    Connected,
    /// The broker acknowledged the disconnect.
    Disconnected,
    /// The network connection is closed.
    Closed,
}

/// MQTT client driving a Quectel modem through AT commands.
///
/// # Type Parameters
///
/// * `T` - The AT-command transport attached to the modem
/// * `D` - The delay used for settle pauses
pub struct Client<T: AtTransport, D: Delay> {
    transport: T,
    delay: D,
    config: Config,
    next_msg_id: u16,
    state: SessionState,
    response: [u8; RESPONSE_BUFFER_SIZE],
}

impl<T: AtTransport, D: Delay> Client<T, D> {
    /// Create a client with the default [`Config`].
    pub fn new(transport: T, delay: D) -> Self {
        Self::with_config(transport, delay, Config::default())
    }

    /// Create a client with explicit timeouts and settle pauses.
    pub fn with_config(transport: T, delay: D, config: Config) -> Self {
        Self {
            transport,
            delay,
            config,
            next_msg_id: FIRST_MESSAGE_ID,
            state: SessionState::Idle,
            response: [0; RESPONSE_BUFFER_SIZE],
        }
    }

    /// Configure the MQTT context, with the will message disabled.
    pub fn init(&mut self) -> Result<(), Error> {
        self.transport.flush().map_err(transport_failure)?;

        let timeout = self.config.config_timeout_ms;
        let accepted = self
            .transport
            .command(command::WILL_DISABLED, command::OK, timeout)
            .map_err(transport_failure)?;

        if accepted {
            warn!("Set initial MQTT parameters ok");
            Ok(())
        } else {
            warn!("Set initial MQTT parameters failed");
            Err(Error::NoResponse)
        }
    }

    /// Open the network connection to the broker at `host:port`.
    ///
    /// `host` is an IP address or a domain name.
    pub fn open_connection(&mut self, host: &str, port: u16) -> Result<(), Error> {
        let cmd = command::open(host, port)?;
        let timeout = self.config.open_timeout_ms;

        if self.exchange(&cmd, command::OPEN_OK, timeout)? {
            warn!("Open MQTT connection to {}:{} ok", host, port);
            self.state = SessionState::Opened;
            Ok(())
        } else {
            error!("Open MQTT connection to {}:{} failed", host, port);
            Err(Error::NoResponse)
        }
    }

    /// Connect to the broker with a client identifier and credentials.
    ///
    /// Empty `user` and `pass` are sent as empty quoted strings.
    pub fn connect(&mut self, client_id: &str, user: &str, pass: &str) -> Result<(), Error> {
        let cmd = command::connect(client_id, user, pass)?;
        let timeout = self.config.connect_timeout_ms;

        if self.exchange(&cmd, command::CONNECT_OK, timeout)? {
            warn!("Connection to broker as {} ok", client_id);
            self.state = SessionState::Connected;
            Ok(())
        } else {
            error!("Connection to broker as {} failed", client_id);
            Err(Error::NoResponse)
        }
    }

    /// Publish `payload` to `topic`.
    ///
    /// The publish command is sent first and the payload only follows once the
    /// modem shows its `>` prompt. A qos 0 publish carries message id 0; any
    /// other qos carries the next message id. The message id advances on every
    /// call that gets past argument validation.
    ///
    /// Returns the message id carried by the command.
    pub fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS) -> Result<u16, Error> {
        command::check_payload(payload)?;

        let id = match qos {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce | QoS::ExactlyOnce => self.next_msg_id,
        };
        let cmd = command::publish(id, qos, topic)?;
        self.advance_message_id();

        let timeout = self.config.prompt_timeout_ms;
        let prompted = self
            .transport
            .command(&cmd, command::PROMPT, timeout)
            .map_err(transport_failure)?;
        if !prompted {
            info!("Publish to {} got no prompt", topic);
            return Err(Error::NoResponse);
        }

        self.delay.delay_ms(self.config.prompt_settle_ms);
        self.transport.write(payload).map_err(transport_failure)?;
        self.transport
            .write_byte(command::CTRL_Z)
            .map_err(transport_failure)?;

        let timeout = self.config.publish_timeout_ms;
        let acked = self
            .transport
            .verify_response(command::PUBLISH_ACK, timeout)
            .map_err(transport_failure)?;

        if acked {
            info!("Publish packet {} success", id);
            Ok(id)
        } else {
            info!("Publish packet {} fail", id);
            Err(Error::NoResponse)
        }
    }

    /// Subscribe to `topic` with the requested `qos`.
    ///
    /// Returns the message id carried by the command.
    pub fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<u16, Error> {
        let id = self.next_msg_id;
        let cmd = command::subscribe(id, topic, qos)?;
        self.advance_message_id();

        self.transport.flush().map_err(transport_failure)?;
        self.transport
            .write(cmd.as_bytes())
            .map_err(transport_failure)?;
        self.transport
            .write_byte(command::CTRL_Z)
            .map_err(transport_failure)?;

        let timeout = self.config.subscribe_timeout_ms;
        let accepted = self
            .transport
            .verify_response(command::OK, timeout)
            .map_err(transport_failure)?;

        if accepted {
            info!("Subscribe packet {} success", id);
            Ok(id)
        } else {
            info!("Subscribe packet {} fail", id);
            Err(Error::NoResponse)
        }
    }

    /// Unsubscribe from `topic`.
    ///
    /// The message id advances before the command is built, and the command
    /// and the awaited `+QMTUNS: 0,<id>` acknowledgement carry that same id.
    ///
    /// Returns the message id carried by the command.
    pub fn unsubscribe(&mut self, topic: &str) -> Result<u16, Error> {
        let id = following(self.next_msg_id);
        let cmd = command::unsubscribe(id, topic)?;
        let ack = command::unsubscribe_ack(id)?;
        self.next_msg_id = id;

        self.transport.flush().map_err(transport_failure)?;
        self.transport
            .write(cmd.as_bytes())
            .map_err(transport_failure)?;
        self.transport
            .write_byte(command::CTRL_Z)
            .map_err(transport_failure)?;

        self.delay.delay_ms(self.config.unsubscribe_settle_ms);

        let timeout = self.config.unsubscribe_timeout_ms;
        let acked = self
            .transport
            .verify_response(&ack, timeout)
            .map_err(transport_failure)?;

        if acked {
            info!("Unsubscribe packet {} success", id);
            Ok(id)
        } else {
            info!("Unsubscribe packet {} fail", id);
            Err(Error::NoResponse)
        }
    }

    /// Disconnect from the broker.
    pub fn disconnect(&mut self) -> Result<(), Error> {
        let timeout = self.config.disconnect_timeout_ms;

        if self.exchange(command::DISCONNECT, command::DISCONNECT_OK, timeout)? {
            warn!("Disconnection from broker ok");
            self.state = SessionState::Disconnected;
            Ok(())
        } else {
            error!("Disconnection from broker failed");
            Err(Error::NoResponse)
        }
    }

    /// Close the network connection to the broker.
    pub fn close_connection(&mut self) -> Result<(), Error> {
        let timeout = self.config.close_timeout_ms;

        if self.exchange(command::CLOSE, command::CLOSE_OK, timeout)? {
            warn!("Close network ok");
            self.state = SessionState::Closed;
            Ok(())
        } else {
            error!("Close network failed");
            Err(Error::NoResponse)
        }
    }

    /// The message id the next subscribe or qos 1/2 publish will carry.
    pub fn next_message_id(&self) -> u16 {
        self.next_msg_id
    }

    /// Seed the message id counter, e.g. when resuming a persistent session.
    /// Zero is not a valid MQTT message id and is replaced by 1.
    pub fn set_next_message_id(&mut self, id: u16) {
        self.next_msg_id = id.max(FIRST_MESSAGE_ID);
    }

    /// The last lifecycle step observed to succeed.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport, e.g. to handle URCs between operations.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport and the delay.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    fn advance_message_id(&mut self) {
        self.next_msg_id = following(self.next_msg_id);
    }

    /// Flush, send `cmd` and capture the answer until `expected` shows up.
    fn exchange(&mut self, cmd: &str, expected: &str, timeout_ms: u32) -> Result<bool, Error> {
        self.transport.flush().map_err(transport_failure)?;
        self.transport
            .write(cmd.as_bytes())
            .map_err(transport_failure)?;

        self.response.fill(0);
        let captured = self
            .transport
            .get_response(&mut self.response, expected, timeout_ms)
            .map_err(transport_failure)?;

        match captured {
            Some(_) => Ok(true),
            None => {
                if let Some(urc) = find_urc(&self.response) {
                    debug!("Modem answered {}", urc);
                }
                Ok(false)
            }
        }
    }
}

impl<T: AtTransport, D: Delay> core::fmt::Debug for Client<T, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("next_msg_id", &self.next_msg_id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Message ids run 1..=65535 and wrap back to 1.
fn following(id: u16) -> u16 {
    id.wrapping_add(1).max(FIRST_MESSAGE_ID)
}

fn transport_failure<E: core::fmt::Debug>(_err: E) -> Error {
    error!("AT transport failure");
    Error::Transport
}
