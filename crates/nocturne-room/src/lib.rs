//! Room lifecycle management for Nocturne.
//!
//! Each room runs as an isolated Tokio task (actor model) owning one
//! [`GameRoom`](nocturne_engine::GameRoom). The actor is the sole
//! consumer of its command channel, so inbound messages for a room are
//! applied one at a time in arrival order — the serialization guarantee
//! the engine relies on. Rooms share no mutable state; different rooms
//! run in parallel.
//!
//! # Key types
//!
//! - [`SessionRegistry`] — creates, looks up, and retires rooms by
//!   code; routes each player's messages to their room
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`PlayerSender`] — the per-player outbound event channel
//! - [`RoomError`] — what can go wrong at this layer

mod actor;
mod error;
mod registry;

pub use actor::{PlayerSender, RoomHandle, RoomInfo};
pub use error::RoomError;
pub use registry::SessionRegistry;
