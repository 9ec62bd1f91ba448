//! Wire protocol for Nocturne.
//!
//! This crate defines the "language" that clients and the game server speak:
//!
//! - **Vocabulary** ([`PlayerHandle`], [`RoomCode`], [`Role`], [`Phase`],
//!   [`RoleQuota`], snapshots) — the types every layer shares.
//! - **Messages** ([`ClientMessage`], [`ServerEvent`], [`Recipient`]) —
//!   what travels in each direction and who receives it.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`], the wire-level [`ErrorKind`]) — what
//!   can go wrong during encoding/decoding, and the rule-rejection
//!   taxonomy reported back to clients.
//!
//! # Architecture
//!
//! The protocol layer sits below everything else. It knows nothing about
//! rooms, rosters, or sockets — it only defines shapes and how to
//! serialize them.
//!
//! ```text
//! front-end (bytes) → protocol (messages) → registry/room (game state)
//! ```

mod codec;
mod error;
mod message;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{
    ClientMessage, ErrorKind, NightActionKind, ServerEvent, VoteCount,
};
pub use types::{
    FinalSeat, Phase, PlayerHandle, Recipient, Role, RoleQuota, RoomCode,
    RoomSnapshot, SeatSummary, Winner,
};
