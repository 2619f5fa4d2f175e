//! Behavior tests for the session controller.
//!
//! Each test drives a real [`Controller`] through the harness doubles: lines
//! go in through `handle_line` or a [`ScriptedInput`], and the assertions look
//! only at what an operator or an auditor would observe: screen lines, sent
//! messages and activity-log lines.

use std::sync::Arc;

use murmur_app::{
    Controller, ControllerError, ExitReason, Flow, InboundEvent, InputLine, MessageLogger, Mode,
    Session,
};
use murmur_codec::{Codec, GoldCodec};
use chrono::TimeDelta;
use murmur_harness::{
    FailingSink, FixedClock, ManualClock, RecordingDisplay, RecordingSession, ScriptedInput,
    SentMessage, SessionProbe, SharedSink,
};

const SECRET: &[u8] = b"correct horse battery staple";

struct Fixture {
    controller: Controller<RecordingSession>,
    probe: SessionProbe,
    display: Arc<RecordingDisplay>,
    log: SharedSink,
}

/// Controller for `alice`, connected, with an in-memory log.
async fn started(key: Option<&[u8]>) -> Fixture {
    let log = SharedSink::new();
    let logger = MessageLogger::new(log.clone(), FixedClock::default());
    let (controller, probe, display) = build(key, logger);

    let mut fixture = Fixture { controller, probe, display, log };
    fixture.controller.start().await.unwrap();
    fixture
}

fn build(
    key: Option<&[u8]>,
    logger: MessageLogger,
) -> (Controller<RecordingSession>, SessionProbe, Arc<RecordingDisplay>) {
    let (network, probe) = RecordingSession::new("alice");
    let session = Arc::new(Session::new("alice", key.is_some(), false));
    let display = Arc::new(RecordingDisplay::new());
    let codec = key.map(GoldCodec::new);

    let controller = Controller::new(session, network, codec, display.clone(), Arc::new(logger));
    (controller, probe, display)
}

fn sent(text: &str, mode: Mode) -> SentMessage {
    SentMessage { text: text.to_string(), mode }
}

#[tokio::test]
async fn keyless_startup_is_plain_and_rejects_encryption() {
    let mut f = started(None).await;
    assert_eq!(f.controller.session().mode(), Mode::Plain);

    f.controller.handle_line("/encrypt").await;
    assert_eq!(f.display.last_line().as_deref(), Some("no encryption key set"));

    f.controller.handle_line("/stealth").await;
    assert_eq!(f.display.last_line().as_deref(), Some("no encryption key set"));

    f.controller.handle_line("/status").await;
    assert_eq!(f.display.last_line().as_deref(), Some("key not available, mode is plaintext"));
    assert_eq!(f.controller.session().mode(), Mode::Plain);
}

#[tokio::test]
async fn keyed_startup_sends_in_gold_and_logs_visible() {
    let mut f = started(Some(SECRET)).await;
    assert_eq!(f.controller.session().mode(), Mode::Gold);

    f.controller.handle_line("hello").await;

    assert_eq!(f.probe.room_messages(), vec![sent("hello", Mode::Gold)]);
    assert_eq!(f.log.lines(), vec!["MR 20240501T18:03:11Z 000 <alice> hello"]);
}

#[tokio::test]
async fn stealth_mode_logs_covert() {
    let mut f = started(Some(SECRET)).await;

    f.controller.handle_line("/stealth").await;
    f.controller.handle_line("  quiet please  ").await;

    assert_eq!(f.probe.room_messages(), vec![sent("quiet please", Mode::Stealth)]);
    assert_eq!(f.log.lines(), vec!["QR 20240501T18:03:11Z 000 <alice> quiet please"]);
    assert_eq!(f.controller.session().prompt(), "alice$ ");
}

#[tokio::test]
async fn overrides_leave_mode_untouched() {
    let mut f = started(Some(SECRET)).await;

    f.controller.handle_line("/p in the clear").await;
    f.controller.handle_line("/q covert").await;
    f.controller.handle_line("/plain").await;
    f.controller.handle_line("/e sealed").await;

    assert_eq!(
        f.probe.room_messages(),
        vec![
            sent("in the clear", Mode::Plain),
            sent("covert", Mode::Stealth),
            sent("sealed", Mode::Gold),
        ]
    );
    assert_eq!(f.controller.session().mode(), Mode::Plain);

    let kinds: Vec<String> = f.log.lines().iter().map(|l| l[..2].to_string()).collect();
    assert_eq!(kinds, vec!["MR", "QR", "MR"]);
}

#[tokio::test]
async fn key_commands_without_key_are_rejected_inline() {
    let mut f = started(None).await;

    for line in ["/e hi", "/q hi", "/enc hi", "/dec hi", "/encr hi"] {
        f.display.clear();
        assert_eq!(f.controller.handle_line(line).await, Flow::Continue);
        assert_eq!(f.display.lines(), vec!["error: no key set"], "{line}");
    }

    assert!(f.probe.room_messages().is_empty());
    assert!(f.log.contents().is_empty());

    f.controller.handle_line("/p plain is fine").await;
    assert_eq!(f.probe.room_messages(), vec![sent("plain is fine", Mode::Plain)]);
}

#[tokio::test]
async fn bell_toggle_and_report() {
    let mut f = started(None).await;

    f.controller.handle_line("/bell on").await;
    f.controller.handle_line("/bell").await;
    f.controller.handle_line("/bell off").await;
    f.controller.handle_line("/bell").await;
    f.controller.handle_line("/bell loud").await;

    assert_eq!(
        f.display.lines(),
        vec![
            "bell is now enabled",
            "bell is enabled",
            "bell is now disabled",
            "bell is disabled",
            "syntax error",
        ]
    );
}

#[tokio::test]
async fn encode_and_decode_locally() {
    let mut f = started(Some(SECRET)).await;

    f.controller.handle_line("/enc attack at dawn").await;
    let encoded = f.display.last_line().unwrap();
    assert_eq!(GoldCodec::new(SECRET).decode(&encoded).unwrap(), "attack at dawn");

    f.controller.handle_line(&format!("/dec {encoded}")).await;
    assert_eq!(f.display.last_line().as_deref(), Some("'attack at dawn'"));

    f.controller.handle_line("/dec not base64 at all!").await;
    assert!(f.display.last_line().unwrap().starts_with("exception: "));

    assert!(f.probe.room_messages().is_empty());
    assert!(f.log.contents().is_empty());
}

#[tokio::test]
async fn encr_sends_ciphertext_as_plain() {
    let mut f = started(Some(SECRET)).await;

    f.controller.handle_line("/encr meet at noon").await;

    let messages = f.probe.room_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].mode, Mode::Plain);

    let ciphertext = &messages[0].text;
    assert_eq!(GoldCodec::new(SECRET).decode(ciphertext).unwrap(), "meet at noon");
    assert_eq!(f.display.last_line(), Some(format!("alice> {ciphertext}")));
    assert_eq!(f.log.lines(), vec![format!("MR 20240501T18:03:11Z 000 <alice> {ciphertext}")]);
}

#[tokio::test]
async fn action_and_literal_follow_active_mode() {
    let mut f = started(Some(SECRET)).await;
    f.controller.handle_line("/stealth").await;

    f.controller.handle_line("/me waves").await;
    assert_eq!(f.controller.handle_line("/say /quit is a command").await, Flow::Continue);

    assert_eq!(
        f.probe.room_messages(),
        vec![sent("/me waves", Mode::Stealth), sent("/quit is a command", Mode::Stealth)]
    );
    assert_eq!(
        f.log.lines(),
        vec![
            "QR 20240501T18:03:11Z 000 <alice> /me waves",
            "QR 20240501T18:03:11Z 000 <alice> /quit is a command",
        ]
    );
}

#[tokio::test]
async fn private_messages_are_sent_but_not_logged() {
    let mut f = started(None).await;

    f.controller.handle_line("/msg bob  see you later ").await;
    f.controller.handle_line("/msg bob").await;

    assert_eq!(f.probe.private_messages(), vec![("bob".to_string(), "see you later".to_string())]);
    assert_eq!(f.display.lines(), vec!["syntax error"]);
    assert!(f.log.contents().is_empty());
}

#[tokio::test]
async fn unknown_commands_and_blank_lines() {
    let mut f = started(None).await;

    f.controller.handle_line("   ").await;
    f.controller.handle_line("/frobnicate").await;
    f.controller.handle_line("/me").await;

    assert_eq!(f.display.lines(), vec!["unknown command", "unknown command"]);
    assert!(f.probe.room_messages().is_empty());
}

#[tokio::test]
async fn help_output() {
    let mut f = started(None).await;

    f.controller.handle_line("/help").await;
    f.controller.handle_line("/help /quit").await;
    f.controller.handle_line("/help nothing").await;

    let lines = f.display.lines();
    assert!(lines[0].starts_with("commands: /help /quit"));
    assert_eq!(lines[1], "COMMAND: /quit\nINFO: quit the client");
    assert_eq!(lines[2], "no help entry found");
}

#[tokio::test]
async fn send_failure_is_reported_and_not_logged() {
    let mut f = started(None).await;
    f.probe.fail_sends(Some("link down"));

    assert_eq!(f.controller.handle_line("hello").await, Flow::Continue);
    f.controller.handle_line("/msg bob hi").await;

    assert_eq!(
        f.display.lines(),
        vec!["error: send failed: link down", "error: send failed: link down"]
    );
    assert!(f.log.contents().is_empty());

    f.probe.fail_sends(None);
    f.controller.handle_line("hello again").await;
    assert_eq!(f.probe.room_messages(), vec![sent("hello again", Mode::Plain)]);
}

#[tokio::test]
async fn encoding_failure_on_send_reports_exception() {
    let mut f = started(Some(SECRET)).await;
    f.probe.fail_encoding(Some("no rng"));

    f.controller.handle_line("hello").await;
    f.controller.handle_line("/q psst").await;
    f.controller.handle_line("/p visible").await;

    assert_eq!(
        f.display.lines(),
        vec!["exception: entropy unavailable: no rng", "exception: entropy unavailable: no rng"]
    );
    assert_eq!(f.probe.room_messages(), vec![sent("visible", Mode::Plain)]);
    assert_eq!(f.log.lines(), vec!["MR 20240501T18:03:11Z 000 <alice> visible"]);
}

#[tokio::test]
async fn outgoing_record_is_stamped_before_sending() {
    let log = SharedSink::new();
    let clock = ManualClock::default();
    let (mut controller, probe, _display) =
        build(None, MessageLogger::new(log.clone(), clock.clone()));
    probe.delay_sends(clock, TimeDelta::seconds(2));
    controller.start().await.unwrap();

    controller.handle_line("hello").await;
    controller.handle_line("again").await;

    assert_eq!(
        log.lines(),
        vec![
            "MR 20240501T18:03:11Z 000 <alice> hello",
            "MR 20240501T18:03:13Z 000 <alice> again",
        ]
    );
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "assertion `left == right` failed")]
fn network_nick_must_match_session() {
    let (network, _probe) = RecordingSession::new("mallory");
    let session = Arc::new(Session::new("alice", false, false));
    let logger = MessageLogger::new(SharedSink::new(), FixedClock::default());

    let _ = Controller::new(
        session,
        network,
        None::<GoldCodec>,
        Arc::new(RecordingDisplay::new()),
        Arc::new(logger),
    );
}

#[tokio::test]
async fn log_failure_is_not_fatal() {
    let (mut controller, probe, display) =
        build(None, MessageLogger::new(FailingSink, FixedClock::default()));
    controller.start().await.unwrap();

    assert_eq!(controller.handle_line("hello").await, Flow::Continue);

    assert_eq!(probe.room_messages(), vec![sent("hello", Mode::Plain)]);
    assert_eq!(
        display.lines(),
        vec!["error while writing log: I/O error: disk full"]
    );
}

#[tokio::test]
async fn connect_failure_is_fatal() {
    let (mut controller, probe, _display) =
        build(None, MessageLogger::new(SharedSink::new(), FixedClock::default()));
    probe.fail_connect("connection refused");

    let err = controller.start().await.unwrap_err();

    assert!(matches!(err, ControllerError::Connect(_)));
    assert_eq!(err.to_string(), "unable to connect: connection failed: connection refused");
    assert!(!controller.session().is_connected());
    assert!(!probe.is_delivering());
}

#[tokio::test]
async fn input_loop_exit_reasons() {
    let mut f = started(None).await;

    let mut input = ScriptedInput::lines(["hello", "/quit", "never sent"]);
    assert_eq!(f.controller.run(&mut input).await.unwrap(), ExitReason::Quit);
    assert_eq!(input.remaining(), 1);

    let mut input = ScriptedInput::lines(["", "again"]);
    assert_eq!(f.controller.run(&mut input).await.unwrap(), ExitReason::EndOfInput);

    let mut input = ScriptedInput::default().then(InputLine::Interrupted);
    assert_eq!(f.controller.run(&mut input).await.unwrap(), ExitReason::Interrupted);

    assert_eq!(f.probe.room_messages(), vec![sent("hello", Mode::Plain), sent("again", Mode::Plain)]);
}

#[tokio::test]
async fn inbound_action_renders_and_logs_once() {
    let f = started(None).await;

    f.probe.deliver(InboundEvent::RoomMessage {
        text: "/me waves".into(),
        from_nick: "bob".into(),
        stealth: false,
    });
    f.controller.shutdown().await;

    assert_eq!(f.display.lines(), vec!["*** bob waves"]);
    assert_eq!(f.log.lines(), vec!["MR 20240501T18:03:11Z 000 <bob> /me waves"]);
}

#[tokio::test]
async fn shutdown_disconnects_and_drains() {
    let f = started(None).await;
    let session = Arc::clone(f.controller.session());

    f.probe.deliver(InboundEvent::SessionEstablished);
    f.probe.deliver(InboundEvent::PresenceOffline { jid: "bob@example.org".into(), nick: "bob".into() });
    f.controller.shutdown().await;

    assert_eq!(f.probe.disconnects(), 1);
    assert!(!f.probe.is_delivering());
    assert!(!session.is_connected());
    assert_eq!(
        f.log.lines(),
        vec![
            "MI 20240501T18:03:11Z 000 You have joined as \"alice\"",
            "MI 20240501T18:03:11Z 000 bob has left",
        ]
    );
    assert_eq!(f.display.lines(), vec!["*** offline: bob"]);
}
