use crate::mock::{MockModem, RecordingDelay};
use quectel_mqtt::network::application::mqtt::command::CTRL_Z;
use quectel_mqtt::network::application::mqtt::{Client, Config, QoS, SessionState};
use quectel_mqtt::network::error::{Error, status_code};

fn client(modem: MockModem) -> Client<MockModem, RecordingDelay> {
    Client::new(modem, RecordingDelay::default())
}

fn publish_modem() -> MockModem {
    MockModem::new()
        .on("AT+QMTPUB=", "\r\n> ")
        .on_bytes(&[CTRL_Z], "\r\nOK\r\n\r\n+QMTPUB: 0,0,0\r\n")
}

#[test]
fn test_init_disables_will() {
    let modem = MockModem::new().on("AT+QMTCFG=", "\r\nOK\r\n");
    let mut client = client(modem);

    assert_eq!(client.init(), Ok(()));
    let modem = client.transport();
    assert_eq!(modem.flushes, 1);
    assert_eq!(modem.written_str(), "AT+QMTCFG=\"will\",0\r\n");
    assert_eq!(modem.waits, vec![("OK".to_string(), 5000)]);
}

#[test]
fn test_init_without_ok_fails() {
    let modem = MockModem::new().on("AT+QMTCFG=", "\r\nERROR\r\n");
    let mut client = client(modem);

    assert_eq!(client.init(), Err(Error::NoResponse));
}

#[test]
fn test_open_connection() {
    let modem = MockModem::new().on("AT+QMTOPEN=", "\r\nOK\r\n\r\n+QMTOPEN: 0,0\r\n");
    let mut client = client(modem);

    assert_eq!(client.open_connection("10.0.0.1", 1883), Ok(()));
    assert_eq!(client.state(), SessionState::Opened);

    let modem = client.transport();
    assert_eq!(modem.written_str(), "AT+QMTOPEN=0,\"10.0.0.1\",1883\r\n");
    assert_eq!(modem.waits, vec![("+QMTOPEN: 0,0".to_string(), 10000)]);
}

#[test]
fn test_open_connection_timeout() {
    // The modem never answers with +QMTOPEN: 0,0.
    let modem = MockModem::new().on("AT+QMTOPEN=", "\r\nOK\r\n\r\n+QMTOPEN: 0,3\r\n");
    let mut client = client(modem);

    let result = client.open_connection("10.0.0.1", 1883);
    assert_eq!(result, Err(Error::NoResponse));
    assert_eq!(status_code(&result), 0);
    assert_eq!(client.state(), SessionState::Idle);

    let silent = MockModem::new();
    let mut client = self::client(silent);
    assert_eq!(
        client.open_connection("10.0.0.1", 1883),
        Err(Error::NoResponse)
    );
    assert_eq!(
        client.transport().waits,
        vec![("+QMTOPEN: 0,0".to_string(), 10000)]
    );
}

#[test]
fn test_connect_round_trip() {
    let modem = MockModem::new().on(
        "AT+QMTCONN=0,\"dev1\",\"u\",\"p\"\r\n",
        "\r\nOK\r\n\r\n+QMTCONN: 0,0,0\r\n",
    );
    let mut client = client(modem);

    let result = client.connect("dev1", "u", "p");
    assert_eq!(result, Ok(()));
    assert_eq!(status_code(&result), 1);
    assert_eq!(client.state(), SessionState::Connected);
    assert_eq!(
        client.transport().written_str(),
        "AT+QMTCONN=0,\"dev1\",\"u\",\"p\"\r\n"
    );
}

#[test]
fn test_connect_refused() {
    let modem = MockModem::new().on("AT+QMTCONN=", "\r\nOK\r\n\r\n+QMTCONN: 0,0,4\r\n");
    let mut client = client(modem);

    let result = client.connect("dev1", "u", "wrong");
    assert_eq!(result, Err(Error::NoResponse));
    assert_eq!(status_code(&result), 0);
}

#[test]
fn test_publish_qos0_carries_id_zero() {
    let mut client = client(publish_modem());

    assert_eq!(client.publish("t", b"23.5", QoS::AtMostOnce), Ok(0));
    assert_eq!(client.next_message_id(), 2);

    let (modem, delay) = client.release();
    assert_eq!(
        modem.writes,
        vec![
            b"AT+QMTPUB=0,0,0,0,\"t\"\r\n".to_vec(),
            b"23.5".to_vec(),
            vec![CTRL_Z],
        ]
    );
    assert_eq!(
        modem.waits,
        vec![(">".to_string(), 10000), ("+QMTPUB:".to_string(), 10000)]
    );
    assert_eq!(delay.pauses, vec![100]);
    assert_eq!(modem.flushes, 0);
}

#[test]
fn test_publish_uses_counter_before_increment() {
    let mut client = client(publish_modem());

    assert_eq!(client.publish("t", b"x", QoS::AtLeastOnce), Ok(1));
    assert_eq!(client.publish("t", b"x", QoS::ExactlyOnce), Ok(2));
    assert_eq!(client.next_message_id(), 3);

    let written = client.transport().written_str();
    assert!(written.contains("AT+QMTPUB=0,1,1,0,\"t\"\r\n"));
    assert!(written.contains("AT+QMTPUB=0,2,2,0,\"t\"\r\n"));
}

#[test]
fn test_publish_advances_counter_once_per_call() {
    for qos in [QoS::AtMostOnce, QoS::AtLeastOnce, QoS::ExactlyOnce] {
        // Acknowledged.
        let mut acked = client(publish_modem());
        acked.publish("t", b"x", qos).unwrap();
        assert_eq!(acked.next_message_id(), 2);

        // Prompt never shows up.
        let mut silent = client(MockModem::new());
        assert_eq!(silent.publish("t", b"x", qos), Err(Error::NoResponse));
        assert_eq!(silent.next_message_id(), 2);

        // Prompt but no acknowledgement.
        let mut unacked = client(MockModem::new().on("AT+QMTPUB=", "> "));
        assert_eq!(unacked.publish("t", b"x", qos), Err(Error::NoResponse));
        assert_eq!(unacked.next_message_id(), 2);
    }
}

#[test]
fn test_publish_without_prompt_never_sends_payload() {
    let modem = MockModem::new().on("AT+QMTPUB=", "\r\nERROR\r\n");
    let mut client = client(modem);

    assert_eq!(
        client.publish("t", b"payload", QoS::AtLeastOnce),
        Err(Error::NoResponse)
    );

    let (modem, delay) = client.release();
    assert_eq!(modem.writes, vec![b"AT+QMTPUB=0,1,1,0,\"t\"\r\n".to_vec()]);
    assert!(!modem.written().contains(&CTRL_Z));
    assert!(delay.pauses.is_empty());
}

#[test]
fn test_subscribe() {
    let modem = MockModem::new().on("AT+QMTSUB=", "\r\nOK\r\n\r\n+QMTSUB: 0,1,0,1\r\n");
    let mut client = client(modem);

    assert_eq!(client.subscribe("commands/+", QoS::AtLeastOnce), Ok(1));
    assert_eq!(client.next_message_id(), 2);

    let modem = client.transport();
    assert_eq!(modem.flushes, 1);
    assert_eq!(
        modem.writes,
        vec![
            b"AT+QMTSUB=0,1,\"commands/+\",1\r\n".to_vec(),
            vec![CTRL_Z],
        ]
    );
    assert_eq!(modem.waits, vec![("OK".to_string(), 5000)]);
}

#[test]
fn test_subscribe_failure_still_consumes_id() {
    let mut client = client(MockModem::new());

    assert_eq!(client.subscribe("a", QoS::AtMostOnce), Err(Error::NoResponse));
    assert_eq!(client.subscribe("b", QoS::AtMostOnce), Err(Error::NoResponse));
    assert_eq!(client.next_message_id(), 3);
    assert!(client.transport().written_str().contains("AT+QMTSUB=0,2,\"b\",0"));
}

#[test]
fn test_unsubscribe_command_and_ack_share_id() {
    let modem = MockModem::new().on("AT+QMTUNS=", "\r\nOK\r\n\r\n+QMTUNS: 0,2,0\r\n");
    let mut client = client(modem);
    assert_eq!(client.next_message_id(), 1);

    assert_eq!(client.unsubscribe("t"), Ok(2));
    assert_eq!(client.next_message_id(), 2);

    let (modem, delay) = client.release();
    assert_eq!(
        modem.writes,
        vec![b"AT+QMTUNS=0,2,\"t\"\r\n".to_vec(), vec![CTRL_Z]]
    );
    assert_eq!(modem.waits, vec![("+QMTUNS: 0,2".to_string(), 5000)]);
    assert_eq!(delay.pauses, vec![1000]);
}

#[test]
fn test_unsubscribe_rejects_ack_for_other_id() {
    let modem = MockModem::new().on("AT+QMTUNS=", "\r\nOK\r\n\r\n+QMTUNS: 0,1,0\r\n");
    let mut client = client(modem);

    assert_eq!(client.unsubscribe("t"), Err(Error::NoResponse));
}

#[test]
fn test_disconnect_and_close() {
    let modem = MockModem::new()
        .on("AT+QMTDISC=0\r\n", "\r\nOK\r\n\r\n+QMTDISC: 0,0\r\n")
        .on("AT+QMTCLOSE=0\r\n", "\r\nOK\r\n\r\n+QMTCLOSE: 0,0\r\n");
    let mut client = client(modem);

    assert_eq!(client.disconnect(), Ok(()));
    assert_eq!(client.state(), SessionState::Disconnected);
    assert_eq!(client.close_connection(), Ok(()));
    assert_eq!(client.state(), SessionState::Closed);

    let modem = client.transport();
    assert_eq!(modem.flushes, 2);
    assert_eq!(
        modem.waits,
        vec![
            ("+QMTDISC: 0,0".to_string(), 10000),
            ("+QMTCLOSE: 0,0".to_string(), 10000),
        ]
    );
}

#[test]
fn test_disconnect_failure() {
    let modem = MockModem::new().on("AT+QMTDISC=0\r\n", "\r\nOK\r\n\r\n+QMTDISC: 0,-1\r\n");
    let mut client = client(modem);

    assert_eq!(client.disconnect(), Err(Error::NoResponse));
    assert_eq!(client.close_connection(), Err(Error::NoResponse));
}

#[test]
fn test_invalid_arguments_write_nothing() {
    let mut client = client(publish_modem());

    assert_eq!(
        client.publish("t", &[b'a', CTRL_Z], QoS::AtLeastOnce),
        Err(Error::InvalidPayload)
    );
    assert_eq!(
        client.publish("", b"x", QoS::AtLeastOnce),
        Err(Error::EmptyArgument)
    );
    assert_eq!(
        client.subscribe("a\"b", QoS::AtMostOnce),
        Err(Error::InvalidArgument)
    );
    assert_eq!(client.unsubscribe(""), Err(Error::EmptyArgument));
    assert_eq!(client.connect("dev\r\n", "", ""), Err(Error::InvalidArgument));
    assert_eq!(client.open_connection("", 1883), Err(Error::EmptyArgument));

    assert_eq!(client.next_message_id(), 1);
    let modem = client.transport();
    assert!(modem.writes.is_empty());
    assert_eq!(modem.flushes, 0);
}

#[test]
fn test_transport_failure() {
    let mut modem = MockModem::new();
    modem.broken = true;
    let mut client = client(modem);

    assert_eq!(client.init(), Err(Error::Transport));
    assert_eq!(client.connect("dev1", "u", "p"), Err(Error::Transport));
    assert_eq!(
        client.publish("t", b"x", QoS::AtLeastOnce),
        Err(Error::Transport)
    );
    assert_eq!(client.next_message_id(), 2);
}

#[test]
fn test_no_ordering_enforced() {
    let mut client = client(publish_modem());

    // Not connected, the command still goes out.
    assert_eq!(client.publish("t", b"x", QoS::AtMostOnce), Ok(0));
    assert_eq!(client.state(), SessionState::Idle);
}

#[test]
fn test_full_session() {
    let modem = MockModem::new()
        .on("AT+QMTCFG=", "\r\nOK\r\n")
        .on("AT+QMTOPEN=", "\r\nOK\r\n\r\n+QMTOPEN: 0,0\r\n")
        .on("AT+QMTCONN=", "\r\nOK\r\n\r\n+QMTCONN: 0,0,0\r\n")
        .on("AT+QMTSUB=", "\r\nOK\r\n\r\n+QMTSUB: 0,1,0,1\r\n")
        .on("AT+QMTPUB=", "\r\n> ")
        .on("hello", "\r\nOK\r\n\r\n+QMTPUB: 0,2,0\r\n")
        .on("AT+QMTUNS=", "\r\nOK\r\n\r\n+QMTUNS: 0,4,0\r\n")
        .on("AT+QMTDISC=", "\r\nOK\r\n\r\n+QMTDISC: 0,0\r\n")
        .on("AT+QMTCLOSE=", "\r\nOK\r\n\r\n+QMTCLOSE: 0,0\r\n");
    let mut client = client(modem);

    client.init().unwrap();
    client.open_connection("broker.example.com", 1883).unwrap();
    client.connect("tracker-01", "", "").unwrap();
    assert_eq!(client.subscribe("fleet/cmd", QoS::AtLeastOnce), Ok(1));
    assert_eq!(client.publish("fleet/pos", b"hello", QoS::AtLeastOnce), Ok(2));
    // Unsubscribe advances before use, so id 3 is never sent.
    assert_eq!(client.unsubscribe("fleet/cmd"), Ok(4));
    client.disconnect().unwrap();
    client.close_connection().unwrap();
    assert_eq!(client.state(), SessionState::Closed);
}

#[test]
fn test_custom_timeouts() {
    let config = Config::from_json(
        r#"{"open_timeout_ms":30000,"prompt_timeout_ms":2000,"prompt_settle_ms":0}"#,
    )
    .unwrap();
    let modem = publish_modem().on("AT+QMTOPEN=", "+QMTOPEN: 0,0\r\n");
    let mut client = Client::with_config(modem, RecordingDelay::default(), config);

    client.open_connection("h", 1883).unwrap();
    client.publish("t", b"x", QoS::AtMostOnce).unwrap();

    let (modem, delay) = client.release();
    assert_eq!(
        modem.waits,
        vec![
            ("+QMTOPEN: 0,0".to_string(), 30000),
            (">".to_string(), 2000),
            ("+QMTPUB:".to_string(), 10000),
        ]
    );
    assert_eq!(delay.pauses, vec![0]);
}

#[test]
fn test_message_id_seed_and_wrap() {
    let modem = MockModem::new().on("AT+QMTSUB=", "OK\r\n");
    let mut client = client(modem);

    client.set_next_message_id(u16::MAX);
    assert_eq!(client.subscribe("t", QoS::AtMostOnce), Ok(u16::MAX));
    assert_eq!(client.next_message_id(), 1);

    client.set_next_message_id(0);
    assert_eq!(client.next_message_id(), 1);
}
