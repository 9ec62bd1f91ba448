//! Per-connection handler: the bridge between one WebSocket and the
//! registry.
//!
//! Inbound: frames are decoded into [`ClientMessage`]s; the registry
//! consumes `create_room`/`join_room`/`leave_room` itself and routes
//! everything else to the sender's room actor. Outbound: the engine
//! writes [`ServerEvent`]s into this player's channel and a pump task
//! drains them onto the socket — so event order on the wire is exactly
//! the order the room produced.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use nocturne_protocol::{
    ClientMessage, Codec, JsonCodec, PlayerHandle, ServerEvent,
};
use nocturne_room::{PlayerSender, SessionRegistry};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::tungstenite::Message;

use crate::NocturneError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    handle: PlayerHandle,
    registry: Arc<Mutex<SessionRegistry>>,
) -> Result<(), NocturneError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut sink, mut source) = ws.split();
    let codec = JsonCodec;

    // The per-player outbound channel. Room actors hold the sender; the
    // pump below owns the socket's write half.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let pump = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let bytes = match codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::error!(error = %err, "failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Binary(bytes.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound loop: one frame, one message, fully applied before the
    // next frame is read.
    while let Some(frame) = source.next().await {
        let data: Vec<u8> = match frame {
            Ok(Message::Binary(data)) => data.into(),
            Ok(Message::Text(text)) => text.as_bytes().to_vec(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // ping/pong/frame
            Err(err) => {
                tracing::debug!(%handle, error = %err, "recv error");
                break;
            }
        };

        let msg: ClientMessage = match codec.decode(&data) {
            Ok(msg) => msg,
            Err(err) => {
                tracing::debug!(%handle, error = %err, "undecodable frame");
                continue;
            }
        };

        dispatch(&registry, handle, msg, &tx).await;
    }

    // Socket gone — explicit leave and a dropped connection look the
    // same from here. NotInRoom just means they never sat down.
    {
        let mut registry = registry.lock().await;
        let _ = registry.leave(handle).await;
    }
    pump.abort();
    tracing::debug!(%handle, "connection closed");
    Ok(())
}

/// Applies one message. Registry errors flow back to the sender as an
/// `error` event; rejections raised inside a room actor are delivered
/// by the actor itself.
async fn dispatch(
    registry: &Arc<Mutex<SessionRegistry>>,
    handle: PlayerHandle,
    msg: ClientMessage,
    tx: &PlayerSender,
) {
    let result = {
        let mut registry = registry.lock().await;
        match msg {
            ClientMessage::CreateRoom { host_name } => registry
                .create_room(handle, host_name, tx.clone())
                .await
                .map(|_| ()),
            ClientMessage::JoinRoom { code, name } => registry
                .join_room(&code, handle, name, tx.clone())
                .await
                .map(|_| ()),
            ClientMessage::LeaveRoom => registry.leave(handle).await,
            other => registry.route(handle, other).await,
        }
    };

    if let Err(err) = result {
        let _ = tx.send(ServerEvent::Error {
            kind: err.kind(),
            message: err.to_string(),
        });
    }
}
