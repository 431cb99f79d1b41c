use crate::error::RelayError;
use crate::registry::{ConnId, LeaveOutcome, RoomRegistry};
use proto::{Message, Role};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

/// Outbound half of a peer connection, abstracted for testing
pub trait PeerSink: Send {
    fn send_text(&self, text: &str) -> Result<(), RelayError>;
}

/// Bounded per-connection queue drained by the socket task
pub struct ChannelSink {
    tx: mpsc::Sender<String>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

impl PeerSink for ChannelSink {
    fn send_text(&self, text: &str) -> Result<(), RelayError> {
        self.tx
            .try_send(text.to_string())
            .map_err(|_| RelayError::TransportUnavailable)
    }
}

pub type RelayHandle = Arc<Mutex<Relay>>;

/// Pairs peers into rooms and forwards gameplay frames between them
#[derive(Default)]
pub struct Relay {
    registry: RoomRegistry,
    peers: HashMap<ConnId, Box<dyn PeerSink>>,
    next_id: ConnId,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> RelayHandle {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn connection_count(&self) -> usize {
        self.peers.len()
    }

    pub fn connect(&mut self, sink: Box<dyn PeerSink>) -> ConnId {
        self.next_id = self.next_id.saturating_add(1);
        let conn = self.next_id;
        self.peers.insert(conn, sink);
        debug!(conn, "peer connected");
        conn
    }

    pub fn handle_text(&mut self, conn: ConnId, text: &str) {
        let msg = match Message::from_text(text) {
            Ok(msg) => msg,
            Err(err) => {
                warn!(conn, %err, "dropping malformed frame");
                return;
            }
        };

        match msg {
            Message::Join { room_id } => self.join(conn, &room_id),
            msg if msg.is_relayable() => self.forward(conn, text, msg.kind()),
            msg => warn!(conn, kind = msg.kind(), "dropping relay-only message from peer"),
        }
    }

    pub fn handle_binary(&self, conn: ConnId, len: usize) {
        warn!(conn, len, "dropping binary frame");
    }

    pub fn disconnect(&mut self, conn: ConnId) {
        self.peers.remove(&conn);
        let outcome = self.registry.leave(conn);
        debug!(conn, "peer disconnected");
        self.notify_left(outcome);
    }

    fn join(&mut self, conn: ConnId, room_id: &str) {
        match self.registry.join(conn, room_id) {
            Ok(outcome) => {
                if let Some(left) = outcome.left {
                    self.notify_left(left);
                }

                info!(conn, room_id, role = ?outcome.role, rejoined = outcome.rejoined, "joined room");
                self.send(conn, &Message::joined(outcome.role, room_id));

                if let Some(host) = outcome.peer {
                    info!(room_id, host, client = conn, "room ready");
                    self.send(host, &Message::Ready);
                    self.send(conn, &Message::Ready);
                }
            }
            Err(err) => {
                warn!(conn, room_id, %err, "join rejected");
                self.send(conn, &Message::room_full());
            }
        }
    }

    fn forward(&self, conn: ConnId, text: &str, kind: &str) {
        match self.registry.peer_of(conn) {
            Some(peer) => {
                debug!(from = conn, to = peer, kind, "forwarding");
                self.send_raw(peer, text);
            }
            None => debug!(conn, kind, "no peer, dropping"),
        }
    }

    fn notify_left(&self, outcome: LeaveOutcome) {
        match outcome {
            LeaveOutcome::NotInRoom => {}
            LeaveOutcome::ClientLeft { room_id, host } => {
                info!(%room_id, host, "client left room");
                self.send(host, &Message::PlayerLeft);
            }
            LeaveOutcome::HostLeft {
                room_id,
                promoted: Some(client),
            } => {
                info!(%room_id, promoted = client, "host left, promoting client");
                self.send(client, &Message::PlayerLeft);
                self.send(client, &Message::joined(Role::Host, &room_id));
            }
            LeaveOutcome::HostLeft {
                room_id,
                promoted: None,
            } => {
                info!(%room_id, "room closed");
            }
        }
    }

    fn send(&self, conn: ConnId, msg: &Message) {
        match msg.to_text() {
            Ok(text) => self.send_raw(conn, &text),
            Err(err) => warn!(conn, %err, kind = msg.kind(), "failed to encode"),
        }
    }

    fn send_raw(&self, conn: ConnId, text: &str) {
        if let Some(sink) = self.peers.get(&conn) {
            if let Err(err) = sink.send_text(text) {
                debug!(conn, %err, "frame dropped");
            }
        }
    }
}
