//! Unified error type for the server front-end.

use nocturne_protocol::ProtocolError;
use nocturne_room::RoomError;

/// Top-level error that wraps the lower layers' errors.
///
/// The `#[from]` attributes auto-generate `From` impls, so `?` converts
/// sub-crate errors without ceremony.
#[derive(Debug, thiserror::Error)]
pub enum NocturneError {
    /// Binding, accepting, or socket I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The WebSocket layer failed (handshake, framing).
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A registry- or room-level error.
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use nocturne_engine::RuleError;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let top: NocturneError = err.into();
        assert!(matches!(top, NocturneError::Protocol(_)));
        assert!(top.to_string().contains("bad"));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::Rule(RuleError::NotInRoom);
        let top: NocturneError = err.into();
        assert!(matches!(top, NocturneError::Room(_)));
    }

    #[test]
    fn test_from_io_error() {
        let err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let top: NocturneError = err.into();
        assert!(matches!(top, NocturneError::Io(_)));
        assert!(top.to_string().contains("gone"));
    }
}
