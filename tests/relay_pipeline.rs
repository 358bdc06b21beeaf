//! Integration tests for the frame-level session pipeline
//!
//! Runs whole session flows (handshake → status, handshake → login → play)
//! over the shipped packet catalog and checks what reaches each side.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use packet_bridge::core::{chat, wire};
use packet_bridge::protocol::registry::PacketRegistry;
use packet_bridge::protocol::{ConnectionMode, Direction, ProtocolVersion};
use packet_bridge::transport::framing::Frame;
use packet_bridge::transport::relay::SessionPipeline;

const CATALOG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/packets.csv");

fn pipeline() -> SessionPipeline {
    let registry = Arc::new(PacketRegistry::load_file(CATALOG_PATH).unwrap());
    SessionPipeline::new(registry)
}

fn handshake_frame(version: i32, next_state: i32) -> Frame {
    let mut body = BytesMut::new();
    wire::write_varint(&mut body, version);
    wire::write_string(&mut body, "localhost");
    body.extend_from_slice(&25565u16.to_be_bytes());
    wire::write_varint(&mut body, next_state);
    Frame {
        id: 0,
        body: body.freeze(),
    }
}

fn login_success_frame() -> Frame {
    let mut body = BytesMut::new();
    wire::write_string(&mut body, "11111111-2222-3333-4444-555555555555");
    wire::write_string(&mut body, "Alice");
    Frame {
        id: 2,
        body: body.freeze(),
    }
}

fn upstream_chat_frame(text: &str, version: ProtocolVersion) -> Frame {
    Frame {
        id: 1,
        body: chat::write_chat(text, Direction::Upstream, version),
    }
}

#[test]
fn status_session_forwards_everything_raw() {
    let mut pipeline = pipeline();
    pipeline.on_frame(Direction::Upstream, handshake_frame(47, 1));
    assert_eq!(pipeline.mode(), ConnectionMode::Status);

    let request = Frame {
        id: 0,
        body: Bytes::new(),
    };
    let out = pipeline.on_frame(Direction::Upstream, request.clone());
    assert_eq!(out, vec![(Direction::Upstream, request)]);

    let mut body = BytesMut::new();
    wire::write_string(&mut body, "{\"description\":\"A Server\"}");
    let response = Frame {
        id: 0,
        body: body.freeze(),
    };
    let out = pipeline.on_frame(Direction::Downstream, response.clone());
    assert_eq!(out, vec![(Direction::Downstream, response)]);
}

#[test]
fn full_session_flow_with_quiet_toggle() {
    let version = ProtocolVersion(47);
    let mut pipeline = pipeline();

    // Handshake announces 1.8 and heads for login.
    pipeline.on_frame(Direction::Upstream, handshake_frame(47, 2));
    assert_eq!(pipeline.version(), version);
    assert_eq!(pipeline.mode(), ConnectionMode::Login);

    // login_start passes raw, login_success flips to play.
    let mut body = BytesMut::new();
    wire::write_string(&mut body, "Alice");
    let login_start = Frame {
        id: 0,
        body: body.freeze(),
    };
    let out = pipeline.on_frame(Direction::Upstream, login_start.clone());
    assert_eq!(out, vec![(Direction::Upstream, login_start)]);

    pipeline.on_frame(Direction::Downstream, login_success_frame());
    assert_eq!(pipeline.mode(), ConnectionMode::Play);

    // Normal chat relays byte-exact under the upstream chat id.
    let hello = upstream_chat_frame("hello", version);
    let out = pipeline.on_frame(Direction::Upstream, hello.clone());
    assert_eq!(out, vec![(Direction::Upstream, hello)]);

    // /quiet is consumed; the status line goes back under the downstream
    // chat id.
    let out = pipeline.on_frame(Direction::Upstream, upstream_chat_frame("/quiet", version));
    assert_eq!(out.len(), 1);
    let (to, frame) = &out[0];
    assert_eq!(*to, Direction::Downstream);
    assert_eq!(frame.id, 2);

    // While quiet, a rendered chat line from the server vanishes.
    let rendered = Frame {
        id: 2,
        body: chat::write_chat("<Bob> hi", Direction::Downstream, version),
    };
    let out = pipeline.on_frame(Direction::Downstream, rendered);
    assert!(out.is_empty());

    // Keep-alives are untouched in both directions.
    let keep_alive = Frame {
        id: 0,
        body: Bytes::from_static(&[0x2A]),
    };
    let out = pipeline.on_frame(Direction::Downstream, keep_alive.clone());
    assert_eq!(out, vec![(Direction::Downstream, keep_alive)]);
}

#[test]
fn old_client_gets_unpositioned_synthesized_chat() {
    let version = ProtocolVersion(5);
    let mut pipeline = pipeline();

    pipeline.on_frame(Direction::Upstream, handshake_frame(5, 2));
    pipeline.on_frame(Direction::Downstream, login_success_frame());
    assert_eq!(pipeline.mode(), ConnectionMode::Play);

    let out = pipeline.on_frame(Direction::Upstream, upstream_chat_frame("/quiet", version));
    assert_eq!(out.len(), 1);

    let body = &out[0].1.body;
    let mut slice = &body[..];
    assert_eq!(wire::read_string(&mut slice).unwrap(), "Quiet mode enabled");
    assert!(slice.is_empty(), "1.7.x chat carries no placement byte");
}

#[test]
fn compression_negotiation_degrades_to_blind_relay() {
    let mut pipeline = pipeline();
    pipeline.on_frame(Direction::Upstream, handshake_frame(47, 2));

    let mut body = BytesMut::new();
    wire::write_varint(&mut body, 256);
    let set_compression = Frame {
        id: 3,
        body: body.freeze(),
    };
    let out = pipeline.on_frame(Direction::Downstream, set_compression.clone());
    assert_eq!(out, vec![(Direction::Downstream, set_compression)]);
    assert!(pipeline.is_passthrough());

    // From here on frames relay unmodified, chat included.
    let opaque = Frame {
        id: 1,
        body: Bytes::from_static(&[0x01, 0xFF, 0x00]),
    };
    let out = pipeline.on_frame(Direction::Upstream, opaque.clone());
    assert_eq!(out, vec![(Direction::Upstream, opaque)]);
}
