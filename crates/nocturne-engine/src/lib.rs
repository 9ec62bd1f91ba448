//! The Nocturne game core.
//!
//! Everything in this crate is synchronous and I/O-free: a [`GameRoom`]
//! takes one inbound message at a time and returns the events it wants
//! delivered, as `(Recipient, ServerEvent)` pairs. The concurrency shell
//! (`nocturne-room`) guarantees messages for one room are applied
//! serially; this crate only has to be correct, not thread-safe.
//!
//! # Key pieces
//!
//! - [`GameRoom`] — the aggregate: roster, phase machine, action buffers
//! - [`assign`] — quota → shuffled role assignment
//! - [`night`] — night-action resolution (kill / protect / investigate)
//! - [`vote`] — vote tally and elimination (ties never eliminate)
//! - [`win`] — win-condition evaluation after every resolution
//! - [`RuleError`] — the rejection taxonomy reported to senders

pub mod assign;
mod error;
pub mod night;
mod room;
mod roster;
pub mod vote;
pub mod win;

pub use error::RuleError;
pub use room::{GameRoom, LeaveOutcome, Outgoing};
pub use roster::{Roster, Seat};
