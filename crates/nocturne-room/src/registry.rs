//! The session registry: rooms by code, seated players by handle.
//!
//! The registry serializes only its own two maps; it never reaches into
//! a room's state. Anything that touches a room goes through that
//! room's command channel, so per-room ordering is preserved no matter
//! how many connections are talking at once.

use std::collections::HashMap;

use nocturne_engine::RuleError;
use nocturne_protocol::{ClientMessage, PlayerHandle, RoomCode, RoomSnapshot};
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::actor::{RoomHandle, RoomInfo, spawn_room};
use crate::{PlayerSender, RoomError};

/// Length of a generated join code.
const CODE_LEN: usize = 6;

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks every active room and which room each player is seated in.
///
/// This is the entry point for room operations from the connection
/// layer. A player can hold a seat in at most ONE room at a time (key
/// invariant).
pub struct SessionRegistry {
    /// Active rooms, keyed by join code. At most one room per code.
    rooms: HashMap<RoomCode, RoomHandle>,
    /// Maps each seated player to their room.
    players: HashMap<PlayerHandle, RoomCode>,
}

impl SessionRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            players: HashMap::new(),
        }
    }

    /// Allocates a code no active room is using. Collisions are rare
    /// (36^6 keyspace) but real; regenerate until free.
    fn fresh_code(&self) -> RoomCode {
        loop {
            let raw: String = rand::rng()
                .sample_iter(Alphanumeric)
                .take(CODE_LEN)
                .map(char::from)
                .collect();
            let code = RoomCode::new(raw);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    /// Creates a room with the sender as host and sole player. The host
    /// receives `room_created` through their channel.
    pub async fn create_room(
        &mut self,
        handle: PlayerHandle,
        host_name: String,
        sender: PlayerSender,
    ) -> Result<RoomCode, RoomError> {
        if let Some(current) = self.players.get(&handle) {
            return Err(RoomError::AlreadyInRoom(handle, current.clone()));
        }

        let code = self.fresh_code();
        let room = spawn_room(code.clone(), DEFAULT_CHANNEL_SIZE);
        room.join(handle, host_name, sender).await?;

        self.players.insert(handle, code.clone());
        self.rooms.insert(code.clone(), room);
        tracing::info!(%code, %handle, "room created");
        Ok(code)
    }

    /// Seats a player in the room with this code.
    ///
    /// Idempotent for a handle already seated in the same room; a
    /// handle seated elsewhere is rejected.
    pub async fn join_room(
        &mut self,
        code: &RoomCode,
        handle: PlayerHandle,
        name: String,
        sender: PlayerSender,
    ) -> Result<RoomSnapshot, RoomError> {
        if let Some(current) = self.players.get(&handle) {
            if current != code {
                return Err(RoomError::AlreadyInRoom(handle, current.clone()));
            }
            // Same room: fall through, the room treats it as a re-join.
        }

        let room = self
            .rooms
            .get(code)
            .ok_or_else(|| RuleError::RoomNotFound(code.clone()))?;

        let snapshot = room.join(handle, name, sender).await?;
        self.players.insert(handle, code.clone());
        Ok(snapshot)
    }

    /// Handles a departure (explicit `leave_room` or a dropped
    /// connection — the two are indistinguishable here). Retires the
    /// room when the departure emptied it per the lifecycle rules.
    pub async fn leave(&mut self, handle: PlayerHandle) -> Result<(), RoomError> {
        let code = self
            .players
            .remove(&handle)
            .ok_or(RuleError::NotInRoom)?;

        let retired = match self.rooms.get(&code) {
            Some(room) => room.leave(handle).await?,
            None => false,
        };
        if retired {
            self.remove_room(&code).await;
        }
        Ok(())
    }

    /// Routes a game message from a player to their room.
    pub async fn route(
        &self,
        handle: PlayerHandle,
        msg: ClientMessage,
    ) -> Result<(), RoomError> {
        let code = self.players.get(&handle).ok_or(RuleError::NotInRoom)?;
        let room = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::Unavailable(code.clone()))?;
        room.send_message(handle, msg).await
    }

    /// Returns metadata for one room.
    pub async fn room_info(&self, code: &RoomCode) -> Result<RoomInfo, RoomError> {
        let room = self
            .rooms
            .get(code)
            .ok_or_else(|| RuleError::RoomNotFound(code.clone()))?;
        room.info().await
    }

    /// The room a player is currently seated in, if any.
    pub fn room_of(&self, handle: PlayerHandle) -> Option<&RoomCode> {
        self.players.get(&handle)
    }

    /// The number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Drops a room and every player index entry pointing at it. The
    /// actor has usually already stopped itself; the shutdown send is
    /// best-effort.
    async fn remove_room(&mut self, code: &RoomCode) {
        if let Some(room) = self.rooms.remove(code) {
            let _ = room.shutdown().await;
        }
        self.players.retain(|_, c| c != code);
        tracing::info!(%code, "room removed from registry");
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
