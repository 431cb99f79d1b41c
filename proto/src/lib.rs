//! Network protocol for networked Pong
//!
//! One JSON object per WebSocket text frame, tagged by a `type` field.

use game_core::{GameOutcome, SoundEvent};
pub use game_core::{Side, Snapshot, SoundKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Seat assigned by the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Client,
}

impl Role {
    pub fn side(self) -> Side {
        match self {
            Role::Host => Side::Host,
            Role::Client => Side::Client,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Message {
    // ------------------------------------------------------------------
    // Relay control
    // ------------------------------------------------------------------
    /// Peer asks to enter a room
    Join { room_id: String },

    /// Relay assigns a role. Re-sent to a client promoted to host.
    Joined {
        role: Role,
        is_host: bool,
        room_id: String,
    },

    /// Room has two occupants
    Ready,

    /// Join rejected (room full)
    Error { message: String },

    /// The other occupant disconnected
    PlayerLeft,

    // ------------------------------------------------------------------
    // Gameplay (forwarded verbatim by the relay)
    // ------------------------------------------------------------------
    /// Host started the match
    Start,

    /// Host returned an ended match to the lobby
    Restart,

    /// Sender's own paddle moved
    PaddleUpdate {
        y: f32,
        is_boost_pressed: bool,
        boosts_remaining: u8,
    },

    /// Authoritative state, host → client, once per tick
    StateSnapshot(Snapshot),

    BoostUse { player: Side },

    ShieldActivate { player: Side },

    ShieldDeactivate { player: Side },

    SoundEvent { sound: SoundKind, intensity: f32 },

    GameOver {
        /// `None` is a draw
        winner: Option<Side>,
        host_score: u8,
        client_score: u8,
    },
}

impl Message {
    pub fn joined(role: Role, room_id: &str) -> Self {
        Message::Joined {
            role,
            is_host: role == Role::Host,
            room_id: room_id.to_string(),
        }
    }

    pub fn room_full() -> Self {
        Message::Error {
            message: "Room is full".to_string(),
        }
    }

    pub fn sound(event: SoundEvent) -> Self {
        Message::SoundEvent {
            sound: event.sound,
            intensity: event.intensity,
        }
    }

    pub fn game_over(outcome: GameOutcome, host_score: u8, client_score: u8) -> Self {
        Message::GameOver {
            winner: outcome.winner(),
            host_score,
            client_score,
        }
    }

    /// Wire name of this kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Join { .. } => "join",
            Message::Joined { .. } => "joined",
            Message::Ready => "ready",
            Message::Error { .. } => "error",
            Message::PlayerLeft => "player-left",
            Message::Start => "start",
            Message::Restart => "restart",
            Message::PaddleUpdate { .. } => "paddle-update",
            Message::StateSnapshot(_) => "state-snapshot",
            Message::BoostUse { .. } => "boost-use",
            Message::ShieldActivate { .. } => "shield-activate",
            Message::ShieldDeactivate { .. } => "shield-deactivate",
            Message::SoundEvent { .. } => "sound-event",
            Message::GameOver { .. } => "game-over",
        }
    }

    /// Whether the relay passes this kind on to the other occupant.
    ///
    /// Relay-originated kinds are never accepted from a peer.
    pub fn is_relayable(&self) -> bool {
        match self {
            Message::Join { .. }
            | Message::Joined { .. }
            | Message::Ready
            | Message::Error { .. }
            | Message::PlayerLeft => false,
            Message::Start
            | Message::Restart
            | Message::PaddleUpdate { .. }
            | Message::StateSnapshot(_)
            | Message::BoostUse { .. }
            | Message::ShieldActivate { .. }
            | Message::ShieldDeactivate { .. }
            | Message::SoundEvent { .. }
            | Message::GameOver { .. } => true,
        }
    }

    /// Serialize to a JSON text frame
    pub fn to_text(&self) -> Result<String, ProtoError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a JSON text frame
    pub fn from_text(text: &str) -> Result<Self, ProtoError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> Snapshot {
        Snapshot {
            ball_x: 800.0,
            ball_y: 500.0,
            ball_dx: 7.0,
            ball_dy: 0.0,
            host_paddle_y: 450.0,
            client_paddle_y: 450.0,
            host_score: 3,
            client_score: 5,
            time_remaining: 42,
            host_boosts: 4,
            client_boosts: 5,
            host_shields: 3,
            client_shields: 2,
            host_shield_active: false,
            client_shield_active: true,
            ball_boost_active: false,
            host_boost_pressed: false,
        }
    }

    #[test]
    fn test_join_wire_format() {
        let msg = Message::from_text(r#"{"type":"join","roomId":"abc"}"#)
            .expect("Deserialization should succeed");
        assert_eq!(
            msg,
            Message::Join {
                room_id: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_joined_wire_format() {
        let text = Message::joined(Role::Client, "abc")
            .to_text()
            .expect("Serialization should succeed");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(
            value,
            json!({"type": "joined", "role": "client", "isHost": false, "roomId": "abc"})
        );
    }

    #[test]
    fn test_snapshot_is_flattened_into_frame() {
        let text = Message::StateSnapshot(snapshot())
            .to_text()
            .expect("Serialization should succeed");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["type"], "state-snapshot");
        assert_eq!(value["ballX"], 800.0);
        assert_eq!(value["clientShieldActive"], true);
        assert_eq!(value["timeRemaining"], 42);

        match Message::from_text(&text).expect("Deserialization should succeed") {
            Message::StateSnapshot(decoded) => assert_eq!(decoded, snapshot()),
            other => panic!("Message type mismatch: {other:?}"),
        }
    }

    #[test]
    fn test_power_up_kinds() {
        let msg = Message::from_text(r#"{"type":"shield-activate","player":"client"}"#)
            .expect("Deserialization should succeed");
        assert_eq!(
            msg,
            Message::ShieldActivate {
                player: Side::Client
            }
        );

        let text = Message::BoostUse { player: Side::Host }
            .to_text()
            .expect("Serialization should succeed");
        assert_eq!(text, r#"{"type":"boost-use","player":"host"}"#);
    }

    #[test]
    fn test_paddle_update_fields() {
        let msg = Message::from_text(
            r#"{"type":"paddle-update","y":120.5,"isBoostPressed":true,"boostsRemaining":2}"#,
        )
        .expect("Deserialization should succeed");
        assert_eq!(
            msg,
            Message::PaddleUpdate {
                y: 120.5,
                is_boost_pressed: true,
                boosts_remaining: 2
            }
        );
    }

    #[test]
    fn test_game_over_draw_has_null_winner() {
        let text = Message::game_over(GameOutcome::Draw, 4, 4)
            .to_text()
            .expect("Serialization should succeed");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["type"], "game-over");
        assert!(value["winner"].is_null());
        assert_eq!(value["hostScore"], 4);
    }

    #[test]
    fn test_sound_event() {
        let msg = Message::sound(SoundEvent::new(SoundKind::Shield, 0.3));
        let text = msg.to_text().expect("Serialization should succeed");
        assert!(text.contains(r#""sound":"shield""#));
        assert_eq!(Message::from_text(&text).expect("round trip"), msg);
    }

    #[test]
    fn test_unknown_type_is_malformed() {
        let err = Message::from_text(r#"{"type":"teleport","x":1}"#);
        assert!(matches!(err, Err(ProtoError::Malformed(_))));

        assert!(Message::from_text("not json").is_err());
        assert!(Message::from_text(r#"{"type":"join"}"#).is_err(), "Missing roomId");
    }

    #[test]
    fn test_relayable_kinds() {
        assert!(Message::Start.is_relayable());
        assert!(Message::StateSnapshot(snapshot()).is_relayable());
        assert!(!Message::Ready.is_relayable(), "Peers cannot forge relay events");
        assert!(!Message::room_full().is_relayable());
        assert_eq!(Message::PlayerLeft.kind(), "player-left");
    }
}
