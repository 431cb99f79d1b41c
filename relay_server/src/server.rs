use crate::error::RelayError;
use crate::router::{ChannelSink, RelayHandle};
use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

/// Frames queued per connection before new ones are dropped
const OUTBOUND_QUEUE: usize = 64;

/// Pause after a failed accept, e.g. while out of file descriptors
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accept WebSocket peers forever. Accept errors are logged and retried so
/// a transient failure never takes the rooms down with it.
pub async fn serve(listener: TcpListener, relay: RelayHandle) -> Result<(), RelayError> {
    loop {
        let (stream, addr) = accept_with_retry(|| listener.accept()).await;
        let relay = relay.clone();

        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, addr, relay).await {
                debug!(%addr, %err, "connection closed with error");
            }
        });
    }
}

async fn accept_with_retry<T, F, Fut>(mut accept: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    loop {
        match accept().await {
            Ok(accepted) => return accepted,
            Err(err) => {
                warn!(%err, "accept failed, retrying");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    relay: RelayHandle,
) -> Result<(), RelayError> {
    let ws_stream = accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(OUTBOUND_QUEUE);

    let conn = relay
        .lock()
        .await
        .connect(Box::new(ChannelSink::new(outbound_tx)));
    info!(conn, %addr, "websocket connected");

    let result = loop {
        tokio::select! {
            inbound = ws_receiver.next() => {
                match inbound {
                    Some(Ok(WsMessage::Text(text))) => {
                        relay.lock().await.handle_text(conn, &text);
                    }
                    Some(Ok(WsMessage::Binary(bytes))) => {
                        relay.lock().await.handle_binary(conn, bytes.len());
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break Ok(()),
                    Some(Err(err)) => break Err(err.into()),
                    // Ping/pong handled by tungstenite
                    Some(Ok(_)) => {}
                }
            }
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(text) => {
                        if let Err(err) = ws_sender.send(WsMessage::Text(text.into())).await {
                            break Err(err.into());
                        }
                    }
                    None => break Ok(()),
                }
            }
        }
    };

    relay.lock().await.disconnect(conn);
    info!(conn, %addr, "websocket disconnected");
    result
}
