//! Network message handling

use proto::Message;

/// Outbound side of the peer's WebSocket
pub trait Transport {
    fn is_open(&self) -> bool;
    fn send_text(&self, text: &str) -> Result<(), String>;
}

/// Send queued frames in order. Frames are dropped, not retried, while the
/// transport is closed. Returns how many were sent.
pub fn flush(outbox: Vec<Message>, transport: &dyn Transport) -> usize {
    if !transport.is_open() {
        return 0;
    }

    let mut sent = 0;
    for msg in outbox {
        let text = match msg.to_text() {
            Ok(text) => text,
            Err(_) => continue,
        };
        if transport.send_text(&text).is_ok() {
            sent += 1;
        }
    }
    sent
}

/// Decode an incoming frame. Unknown kinds are reported as `None`.
pub fn parse_frame(text: &str) -> Option<Message> {
    Message::from_text(text).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct MockTransport {
        open: bool,
        sent: RefCell<Vec<String>>,
    }

    impl MockTransport {
        fn new(open: bool) -> Self {
            Self {
                open,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for MockTransport {
        fn is_open(&self) -> bool {
            self.open
        }

        fn send_text(&self, text: &str) -> Result<(), String> {
            self.sent.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_flush_sends_in_order() {
        let transport = MockTransport::new(true);
        let sent = flush(vec![Message::Start, Message::Restart], &transport);

        assert_eq!(sent, 2);
        assert_eq!(
            *transport.sent.borrow(),
            vec![r#"{"type":"start"}"#, r#"{"type":"restart"}"#]
        );
    }

    #[test]
    fn test_closed_transport_drops_frames() {
        let transport = MockTransport::new(false);
        assert_eq!(flush(vec![Message::Start], &transport), 0);
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn test_parse_frame_ignores_unknown_kinds() {
        assert_eq!(parse_frame(r#"{"type":"ready"}"#), Some(Message::Ready));
        assert_eq!(parse_frame(r#"{"type":"hello"}"#), None);
    }
}
