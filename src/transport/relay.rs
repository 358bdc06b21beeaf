//! # TCP Relay
//!
//! Accepts client connections, opens the matching server connection, and
//! pumps frames through the interception pipeline in both directions.
//!
//! The relay is where packet identity gets resolved: it sniffs the initial
//! handshake for the protocol version and next mode, follows the
//! login→play transition, and looks up each frame's logical name in the
//! registry before handing it to the session. Frames the registry does not
//! know are forwarded raw: interception is opportunistic, never a
//! precondition for relaying.
//!
//! Sessions that negotiate a wire format this bridge does not speak
//! (compression or encryption) switch to blind pass-through: frames still
//! relay, interception stops.

use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;
use tracing::{debug, error, info, trace, warn};

use crate::bridge::session::{BridgeSession, InboundPacket};
use crate::config::ProxyConfig;
use crate::core::wire;
use crate::error::{BridgeError, Result};
use crate::protocol::registry::PacketRegistry;
use crate::protocol::{ConnectionMode, Direction, ProtocolVersion};
use crate::transport::framing::{Frame, FrameCodec};

/// Downstream packet marking the login→play transition.
const LOGIN_SUCCESS: &str = "login_success";

/// Packets that switch the session to a wire format this bridge does not
/// speak. Seeing one disables interception for the rest of the session.
const FORMAT_CHANGING_PACKETS: &[&str] = &[
    "login_encryption_request",
    "encryption_request",
    "login_set_compression",
    "set_compression",
];

/// Frame-level state of one proxied session: connection mode tracking,
/// handshake sniffing, and name resolution in front of the
/// [`BridgeSession`].
pub struct SessionPipeline {
    session: BridgeSession,
    mode: ConnectionMode,
    passthrough: bool,
}

impl SessionPipeline {
    pub fn new(registry: Arc<PacketRegistry>) -> Self {
        let version = registry.default_version();
        Self {
            session: BridgeSession::new(registry, version),
            mode: ConnectionMode::Handshake,
            passthrough: false,
        }
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn version(&self) -> ProtocolVersion {
        self.session.version()
    }

    /// Whether interception has been disabled for this session.
    pub fn is_passthrough(&self) -> bool {
        self.passthrough
    }

    /// Run one inbound frame through the pipeline. Returns the frames to
    /// send on, each tagged with the direction it travels. Never fails:
    /// anything unreadable degrades to forwarding the original frame.
    pub fn on_frame(&mut self, direction: Direction, frame: Frame) -> Vec<(Direction, Frame)> {
        if self.passthrough {
            return vec![(direction, frame)];
        }

        if self.mode == ConnectionMode::Handshake && direction == Direction::Upstream {
            return self.on_handshake(frame);
        }

        let version = self.session.version();
        let name = match self
            .session
            .registry()
            .name_for_id(version, self.mode, direction, frame.id)
        {
            Ok(name) => name.to_string(),
            Err(_) => {
                trace!(id = frame.id, %direction, "unknown packet id, forwarding raw");
                return vec![(direction, frame)];
            }
        };

        let packet = InboundPacket {
            mode: self.mode,
            direction,
            name: name.clone(),
            payload: frame.body.clone(),
        };
        let deliveries = match self.session.handle(packet) {
            Ok(deliveries) => deliveries,
            Err(e) => {
                warn!(error = %e, packet = %name, "handler failed, forwarding raw");
                return vec![(direction, frame)];
            }
        };

        let mut out = Vec::with_capacity(deliveries.len());
        for delivery in deliveries {
            match self.session.registry().id_for_name(
                version,
                self.mode,
                delivery.direction,
                &delivery.name,
            ) {
                Ok(id) => out.push((
                    delivery.direction,
                    Frame {
                        id,
                        body: delivery.payload,
                    },
                )),
                Err(e) => {
                    warn!(error = %e, packet = %delivery.name, "cannot encode delivery, dropping it");
                }
            }
        }

        self.apply_transitions(direction, &name);
        out
    }

    /// Sniff the initial handshake: adopt the announced protocol version
    /// and follow the requested next mode. The handshake itself always
    /// forwards raw.
    fn on_handshake(&mut self, frame: Frame) -> Vec<(Direction, Frame)> {
        match parse_handshake(&frame) {
            Ok(intent) => {
                match self.session.registry().version_label(intent.version) {
                    Ok(label) => {
                        info!(version = %intent.version, label, next = %intent.next_mode, "handshake");
                    }
                    Err(_) => {
                        warn!(
                            version = %intent.version,
                            "handshake for uncataloged protocol version, interception disabled"
                        );
                        self.passthrough = true;
                    }
                }
                self.session.set_version(intent.version);
                self.mode = intent.next_mode;
            }
            Err(e) => {
                warn!(error = %e, "unreadable handshake, interception disabled");
                self.passthrough = true;
            }
        }
        vec![(Direction::Upstream, frame)]
    }

    fn apply_transitions(&mut self, direction: Direction, name: &str) {
        if direction != Direction::Downstream {
            return;
        }
        if self.mode == ConnectionMode::Login && name == LOGIN_SUCCESS {
            debug!("login complete, entering play mode");
            self.mode = ConnectionMode::Play;
        } else if FORMAT_CHANGING_PACKETS.contains(&name) {
            warn!(packet = %name, "session negotiated an unsupported wire format, interception disabled");
            self.passthrough = true;
        }
    }
}

struct HandshakeIntent {
    version: ProtocolVersion,
    next_mode: ConnectionMode,
}

fn parse_handshake(frame: &Frame) -> Result<HandshakeIntent> {
    if frame.id != 0 {
        return Err(BridgeError::DataFormat(format!(
            "unexpected packet id {} in handshake mode",
            frame.id
        )));
    }

    let mut body = &frame.body[..];
    let version = wire::read_varint(&mut body)?;
    let _server_address = wire::read_string(&mut body)?;
    let _server_port = wire::read_u16(&mut body)?;
    let next_state = wire::read_varint(&mut body)?;

    let next_mode = match next_state {
        1 => ConnectionMode::Status,
        2 => ConnectionMode::Login,
        other => {
            return Err(BridgeError::DataFormat(format!(
                "unknown next state {other} in handshake"
            )))
        }
    };

    Ok(HandshakeIntent {
        version: ProtocolVersion(version),
        next_mode,
    })
}

/// Listen for clients and relay each one to the configured server until
/// CTRL+C.
pub async fn run(config: &ProxyConfig, registry: Arc<PacketRegistry>) -> Result<()> {
    let listen_addr = format!("{}:{}", config.listen.host, config.listen.port);
    let listener = TcpListener::bind(&listen_addr).await?;

    let default_version = registry.default_version();
    info!(
        address = %listen_addr,
        connect = %format!("{}:{}", config.connect.host, config.connect.port),
        default_version = %default_version,
        label = registry.version_label(default_version).unwrap_or("unknown"),
        "listening"
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("received CTRL+C signal, shutting down");
                return Ok(());
            }

            accept_result = listener.accept() => {
                match accept_result {
                    Ok((client, peer)) => {
                        let registry = registry.clone();
                        let connect_host = config.connect.host.clone();
                        let connect_port = config.connect.port;
                        tokio::spawn(async move {
                            if let Err(e) =
                                serve_session(client, peer, (connect_host, connect_port), registry).await
                            {
                                error!(peer = %peer, error = %e, "session ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "error accepting connection");
                    }
                }
            }
        }
    }
}

async fn serve_session(
    client: TcpStream,
    peer: SocketAddr,
    connect: (String, u16),
    registry: Arc<PacketRegistry>,
) -> Result<()> {
    info!(peer = %peer, "client connected");

    let server = TcpStream::connect(connect).await?;
    let mut client = Framed::new(client, FrameCodec::new());
    let mut server = Framed::new(server, FrameCodec::new());
    let mut pipeline = SessionPipeline::new(registry);

    loop {
        let (direction, frame) = tokio::select! {
            frame = client.next() => match frame {
                Some(Ok(frame)) => (Direction::Upstream, frame),
                Some(Err(e)) => return Err(e),
                None => break,
            },
            frame = server.next() => match frame {
                Some(Ok(frame)) => (Direction::Downstream, frame),
                Some(Err(e)) => return Err(e),
                None => break,
            },
        };

        for (to, out) in pipeline.on_frame(direction, frame) {
            match to {
                Direction::Upstream => server.send(out).await?,
                Direction::Downstream => client.send(out).await?,
            }
        }
    }

    info!(peer = %peer, "session closed");
    Ok(())
}
