//! Integration tests for the quiet-mode chat filter state machine
//!
//! Drives full sessions through the dispatch point and checks the exact
//! bytes each side would receive, including byte-for-byte pass-through
//! fidelity in the common case.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use bytes::Bytes;
use packet_bridge::bridge::session::{BridgeSession, InboundPacket};
use packet_bridge::bridge::Delivery;
use packet_bridge::core::buffer::PacketBuffer;
use packet_bridge::core::chat;
use packet_bridge::protocol::registry::PacketRegistry;
use packet_bridge::protocol::{ConnectionMode, Direction, ProtocolVersion};

const CATALOG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/packets.csv");
const V1_8: ProtocolVersion = ProtocolVersion(47);
const V1_7: ProtocolVersion = ProtocolVersion(5);

fn session(version: ProtocolVersion) -> BridgeSession {
    let registry = Arc::new(PacketRegistry::load_file(CATALOG_PATH).unwrap());
    BridgeSession::new(registry, version)
}

fn chat_packet(direction: Direction, payload: Bytes) -> InboundPacket {
    InboundPacket {
        mode: ConnectionMode::Play,
        direction,
        name: "chat_message".into(),
        payload,
    }
}

fn send_upstream_text(session: &mut BridgeSession, text: &str) -> Vec<Delivery> {
    let payload = chat::write_chat(text, Direction::Upstream, session.version());
    session
        .handle(chat_packet(Direction::Upstream, payload))
        .unwrap()
}

fn decoded_text(delivery: &Delivery, version: ProtocolVersion) -> String {
    assert_eq!(delivery.name, "chat_message");
    let mut buf = PacketBuffer::new(delivery.payload.clone());
    chat::read_chat(&mut buf, delivery.direction, version)
        .unwrap()
        .unwrap()
}

#[test]
fn normal_state_forwards_exact_original_bytes() {
    let mut session = session(V1_8);
    let payload = chat::write_chat("hello", Direction::Upstream, V1_8);

    let out = session
        .handle(chat_packet(Direction::Upstream, payload.clone()))
        .unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].direction, Direction::Upstream);
    assert_eq!(out[0].payload, payload, "pass-through must be byte-exact");
}

#[test]
fn quiet_toggles_and_reports_downstream_only() {
    let mut session = session(V1_8);

    let out = send_upstream_text(&mut session, "/quiet");
    assert_eq!(out.len(), 1, "exactly one synthesized status message");
    assert_eq!(out[0].direction, Direction::Downstream);
    assert_eq!(decoded_text(&out[0], V1_8), "Quiet mode enabled");
}

#[test]
fn suppressed_chat_is_rejected_downstream() {
    let mut session = session(V1_8);
    send_upstream_text(&mut session, "/quiet");

    let out = send_upstream_text(&mut session, "hello");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].direction, Direction::Downstream);
    assert_eq!(
        decoded_text(&out[0], V1_8),
        "Can't send messages while in quiet mode"
    );
}

#[test]
fn second_quiet_restores_normal_state() {
    let mut session = session(V1_8);
    send_upstream_text(&mut session, "/quiet");

    let out = send_upstream_text(&mut session, "/quiet");
    assert_eq!(decoded_text(&out[0], V1_8), "Quiet mode disabled");

    // Back to normal: chat flows upstream again.
    let payload = chat::write_chat("hello again", Direction::Upstream, V1_8);
    let out = session
        .handle(chat_packet(Direction::Upstream, payload.clone()))
        .unwrap();
    assert_eq!(out[0].direction, Direction::Upstream);
    assert_eq!(out[0].payload, payload);
}

#[test]
fn quiet_drops_rendered_chat_lines_from_server() {
    let mut session = session(V1_8);
    send_upstream_text(&mut session, "/quiet");

    let payload = chat::write_chat("<Alice> hi", Direction::Downstream, V1_8);
    let out = session
        .handle(chat_packet(Direction::Downstream, payload))
        .unwrap();
    assert!(out.is_empty(), "rendered chat must be dropped entirely");
}

#[test]
fn quiet_passes_non_chat_server_lines_raw() {
    let mut session = session(V1_8);
    send_upstream_text(&mut session, "/quiet");

    let payload = chat::write_chat("Server restarting in 5 minutes", Direction::Downstream, V1_8);
    let out = session
        .handle(chat_packet(Direction::Downstream, payload.clone()))
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].direction, Direction::Downstream);
    assert_eq!(out[0].payload, payload);
}

#[test]
fn synthesized_placement_byte_depends_on_version() {
    // 1.8 synthesized messages end with placement byte 0.
    let mut session_new = session(V1_8);
    let out = send_upstream_text(&mut session_new, "/quiet");
    assert_eq!(out[0].payload.last(), Some(&0u8));

    // 1.7.x synthesized messages are the bare string.
    let mut session_old = session(V1_7);
    let out = send_upstream_text(&mut session_old, "/quiet");
    let expected = chat::write_chat("Quiet mode enabled", Direction::Downstream, V1_7);
    assert_eq!(out[0].payload, expected);
    let mut buf = PacketBuffer::new(out[0].payload.clone());
    buf.read_string().unwrap();
    assert!(buf.is_empty(), "no trailing placement byte at or below the threshold");
}

#[test]
fn commands_other_than_quiet_pass_while_suppressed() {
    let mut session = session(V1_8);
    send_upstream_text(&mut session, "/quiet");

    let payload = chat::write_chat("/list", Direction::Upstream, V1_8);
    let out = session
        .handle(chat_packet(Direction::Upstream, payload.clone()))
        .unwrap();
    assert_eq!(out[0].direction, Direction::Upstream);
    assert_eq!(out[0].payload, payload);
}

#[test]
fn toggle_state_is_per_session() {
    let mut first = session(V1_8);
    let mut second = session(V1_8);

    send_upstream_text(&mut first, "/quiet");

    // The second session never toggled; its chat flows upstream.
    let payload = chat::write_chat("hello", Direction::Upstream, V1_8);
    let out = second
        .handle(chat_packet(Direction::Upstream, payload.clone()))
        .unwrap();
    assert_eq!(out[0].direction, Direction::Upstream);
    assert_eq!(out[0].payload, payload);
}

#[test]
fn unparseable_chat_payload_passes_through_raw() {
    let mut session = session(V1_8);

    // Length prefix promises far more bytes than the payload carries.
    let payload = Bytes::from_static(&[0x7F, b'x', b'y']);
    let out = session
        .handle(chat_packet(Direction::Upstream, payload.clone()))
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].direction, Direction::Upstream);
    assert_eq!(out[0].payload, payload);
}
