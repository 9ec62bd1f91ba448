//! # Nocturne
//!
//! Server engine for a room-based social-deduction party game: players
//! join a room by code, are secretly dealt asymmetric roles, and
//! alternate night actions, discussion, and votes until one side wins.
//!
//! The layers, bottom up:
//!
//! - `nocturne-protocol` — the wire vocabulary and message enums
//! - `nocturne-engine` — the pure game core (roster, resolvers, phase
//!   machine); synchronous and transport-agnostic
//! - `nocturne-room` — one actor task per room plus the session
//!   registry that routes players to rooms
//! - this crate — a WebSocket front-end that mints a [`PlayerHandle`]
//!   per connection and pumps messages between sockets and the registry
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use nocturne::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), NocturneError> {
//!     let server = NocturneServer::bind("0.0.0.0:9090").await?;
//!     server.run().await
//! }
//! ```
//!
//! [`PlayerHandle`]: nocturne_protocol::PlayerHandle

mod conn;
mod error;
mod server;

pub use error::NocturneError;
pub use server::NocturneServer;

/// The most common imports, in one place.
pub mod prelude {
    pub use nocturne_engine::{GameRoom, RuleError};
    pub use nocturne_protocol::{
        ClientMessage, Codec, ErrorKind, JsonCodec, NightActionKind, Phase,
        PlayerHandle, Role, RoleQuota, RoomCode, RoomSnapshot, ServerEvent,
        Winner,
    };
    pub use nocturne_room::{RoomError, SessionRegistry};

    pub use crate::{NocturneError, NocturneServer};
}
