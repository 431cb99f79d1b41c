use crate::error::RelayError;
use crate::registry::ConnId;
use crate::router::{PeerSink, Relay};
use proto::{Message, Role};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct MockPeer {
    sent: Arc<Mutex<Vec<String>>>,
}

impl MockPeer {
    fn texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    fn messages(&self) -> Vec<Message> {
        self.texts()
            .iter()
            .map(|text| Message::from_text(text).expect("relay sends valid frames"))
            .collect()
    }

    fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl PeerSink for MockPeer {
    fn send_text(&self, text: &str) -> Result<(), RelayError> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Sink whose queue is always full
struct ClosedPeer;

impl PeerSink for ClosedPeer {
    fn send_text(&self, _text: &str) -> Result<(), RelayError> {
        Err(RelayError::TransportUnavailable)
    }
}

fn connect(relay: &mut Relay) -> (ConnId, MockPeer) {
    let peer = MockPeer::default();
    let conn = relay.connect(Box::new(peer.clone()));
    (conn, peer)
}

fn join(relay: &mut Relay, conn: ConnId, room: &str) {
    relay.handle_text(conn, &format!(r#"{{"type":"join","roomId":"{room}"}}"#));
}

/// Two peers joined to room "abc", outboxes cleared
fn paired() -> (Relay, (ConnId, MockPeer), (ConnId, MockPeer)) {
    let mut relay = Relay::new();
    let a = connect(&mut relay);
    let b = connect(&mut relay);
    join(&mut relay, a.0, "abc");
    join(&mut relay, b.0, "abc");
    a.1.clear();
    b.1.clear();
    (relay, a, b)
}

#[test]
fn test_join_sequence() {
    let mut relay = Relay::new();
    let (a, peer_a) = connect(&mut relay);
    let (b, peer_b) = connect(&mut relay);

    join(&mut relay, a, "abc");
    assert_eq!(peer_a.messages(), vec![Message::joined(Role::Host, "abc")]);

    join(&mut relay, b, "abc");
    assert_eq!(
        peer_b.messages(),
        vec![Message::joined(Role::Client, "abc"), Message::Ready]
    );
    assert_eq!(
        peer_a.messages(),
        vec![Message::joined(Role::Host, "abc"), Message::Ready],
        "Host is told the room is ready"
    );
}

#[test]
fn test_room_full_only_reaches_joiner() {
    let (mut relay, (_, peer_a), (b, peer_b)) = paired();
    let (c, peer_c) = connect(&mut relay);

    join(&mut relay, c, "abc");

    assert_eq!(peer_c.messages(), vec![Message::room_full()]);
    assert!(peer_a.texts().is_empty());
    assert!(peer_b.texts().is_empty());
    assert_eq!(relay.registry().role_of(b), Some(Role::Client));
}

#[test]
fn test_rejoin_resends_role_without_ready() {
    let (mut relay, (a, peer_a), (_, peer_b)) = paired();

    join(&mut relay, a, "abc");

    assert_eq!(peer_a.messages(), vec![Message::joined(Role::Host, "abc")]);
    assert!(peer_b.texts().is_empty());
}

#[test]
fn test_forwards_frames_verbatim_to_other_occupant() {
    let (mut relay, (a, peer_a), (b, peer_b)) = paired();

    // Unusual spacing and key order must survive untouched
    let frame = r#"{ "y": 120.5, "type": "paddle-update", "isBoostPressed": false, "boostsRemaining": 5 }"#;
    relay.handle_text(b, frame);
    assert_eq!(peer_a.texts(), vec![frame.to_string()]);
    assert!(peer_b.texts().is_empty(), "Sender does not get its own frame");

    relay.handle_text(a, r#"{"type":"start"}"#);
    assert_eq!(peer_b.texts(), vec![r#"{"type":"start"}"#.to_string()]);
}

#[test]
fn test_frames_without_peer_are_dropped() {
    let mut relay = Relay::new();
    let (a, peer_a) = connect(&mut relay);

    relay.handle_text(a, r#"{"type":"start"}"#);
    join(&mut relay, a, "solo");
    peer_a.clear();
    relay.handle_text(a, r#"{"type":"boost-use","player":"host"}"#);

    assert!(peer_a.texts().is_empty());
}

#[test]
fn test_malformed_and_forged_frames_are_dropped() {
    let (mut relay, (a, peer_a), (b, peer_b)) = paired();

    relay.handle_text(a, "not json");
    relay.handle_text(a, r#"{"type":"teleport"}"#);
    relay.handle_text(a, r#"{"type":"ready"}"#);
    relay.handle_text(a, r#"{"type":"player-left"}"#);
    relay.handle_binary(a, 16);

    assert!(peer_b.texts().is_empty());
    assert!(peer_a.texts().is_empty());
    assert_eq!(relay.registry().peer_of(a), Some(b), "Room survives bad input");
}

#[test]
fn test_client_disconnect_notifies_host() {
    let (mut relay, (a, peer_a), (b, _)) = paired();

    relay.disconnect(b);

    assert_eq!(peer_a.messages(), vec![Message::PlayerLeft]);
    assert_eq!(relay.registry().role_of(a), Some(Role::Host));
    assert_eq!(relay.connection_count(), 1);
}

#[test]
fn test_host_disconnect_promotes_client() {
    let (mut relay, (a, _), (b, peer_b)) = paired();

    relay.disconnect(a);

    assert_eq!(
        peer_b.messages(),
        vec![Message::PlayerLeft, Message::joined(Role::Host, "abc")]
    );
    assert_eq!(relay.registry().room_count(), 1);

    // A newcomer pairs with the promoted host
    let (c, peer_c) = connect(&mut relay);
    join(&mut relay, c, "abc");
    assert_eq!(
        peer_c.messages(),
        vec![Message::joined(Role::Client, "abc"), Message::Ready]
    );
    assert_eq!(relay.registry().peer_of(b), Some(c));
}

#[test]
fn test_lone_host_disconnect_destroys_room() {
    let mut relay = Relay::new();
    let (a, _) = connect(&mut relay);
    join(&mut relay, a, "abc");

    relay.disconnect(a);

    assert_eq!(relay.registry().room_count(), 0);
    assert_eq!(relay.connection_count(), 0);
}

#[test]
fn test_switching_rooms_notifies_old_room() {
    let (mut relay, (a, peer_a), (b, peer_b)) = paired();

    join(&mut relay, b, "xyz");

    assert_eq!(peer_a.messages(), vec![Message::PlayerLeft]);
    assert_eq!(peer_b.messages(), vec![Message::joined(Role::Host, "xyz")]);
    assert_eq!(relay.registry().peer_of(a), None);
}

#[test]
fn test_unavailable_transport_does_not_disturb_room() {
    let mut relay = Relay::new();
    let (a, peer_a) = connect(&mut relay);
    let b = relay.connect(Box::new(ClosedPeer));
    join(&mut relay, a, "abc");
    join(&mut relay, b, "abc");

    relay.handle_text(a, r#"{"type":"start"}"#);
    relay.handle_text(b, r#"{"type":"shield-activate","player":"client"}"#);

    assert_eq!(
        peer_a.messages().last(),
        Some(&Message::ShieldActivate {
            player: proto::Side::Client
        })
    );
}
