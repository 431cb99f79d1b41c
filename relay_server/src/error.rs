use proto::ProtoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("room {0:?} is full")]
    RoomFull(String),

    #[error(transparent)]
    Protocol(#[from] ProtoError),

    /// Outbound queue closed or full; the frame is dropped
    #[error("transport unavailable")]
    TransportUnavailable,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
