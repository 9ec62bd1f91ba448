//! Room actor: an isolated Tokio task that owns one game instance.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. This is the actor model — no shared mutable
//! state, just message passing. Because the actor is the only consumer
//! of its channel, a message is fully applied (validation, buffer
//! update, any phase transition) before the next one is looked at.

use std::collections::HashMap;

use nocturne_engine::{GameRoom, Outgoing};
use nocturne_protocol::{
    ClientMessage, Phase, PlayerHandle, Recipient, RoomCode, RoomSnapshot,
    ServerEvent,
};
use tokio::sync::{mpsc, oneshot};

use crate::RoomError;

/// Channel sender for delivering outbound events to one player.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel — the
/// caller sends a command and awaits the response.
pub(crate) enum RoomCommand {
    /// Seat a player (or refresh a re-joining player's channel).
    Join {
        handle: PlayerHandle,
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<RoomSnapshot, RoomError>>,
    },

    /// A player left or their connection dropped. Replies with `true`
    /// when the room should be retired.
    Leave {
        handle: PlayerHandle,
        reply: oneshot::Sender<bool>,
    },

    /// Deliver a game message from a player (fire-and-forget).
    Message {
        sender: PlayerHandle,
        msg: ClientMessage,
    },

    /// Request room metadata.
    Info { reply: oneshot::Sender<RoomInfo> },

    /// Shut down the actor.
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub code: RoomCode,
    pub phase: Phase,
    pub seat_count: usize,
}

/// Handle to a running room actor. Cheap to clone — it's just an
/// `mpsc::Sender` wrapper. The registry holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Sends a join request and awaits the room's verdict.
    pub async fn join(
        &self,
        handle: PlayerHandle,
        name: String,
        sender: PlayerSender,
    ) -> Result<RoomSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join { handle, name, sender, reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Reports a departure. Returns `true` when the room retired.
    pub async fn leave(&self, handle: PlayerHandle) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave { handle, reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Sends a game message to the room (fire-and-forget).
    pub async fn send_message(
        &self,
        sender: PlayerHandle,
        msg: ClientMessage,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Message { sender, msg })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Requests the current room info.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room: GameRoom,
    /// Per-player outbound channels.
    senders: HashMap<PlayerHandle, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until retirement or
    /// shutdown.
    async fn run(mut self) {
        tracing::info!(room = %self.room.code(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join { handle, name, sender, reply } => {
                    let result = match self.room.join(handle, name) {
                        Ok(events) => {
                            self.senders.insert(handle, sender);
                            self.dispatch(events);
                            Ok(self.room.snapshot())
                        }
                        Err(err) => Err(err.into()),
                    };
                    let _ = reply.send(result);
                }

                RoomCommand::Leave { handle, reply } => {
                    // Detach the channel first so RoomClosed and friends
                    // reach only the remaining players.
                    self.senders.remove(&handle);
                    let outcome = self.room.leave(handle);
                    self.dispatch(outcome.events);
                    let _ = reply.send(outcome.retire);
                    if outcome.retire {
                        tracing::info!(
                            room = %self.room.code(),
                            "room retired"
                        );
                        break;
                    }
                }

                RoomCommand::Message { sender, msg } => {
                    match self.room.handle_message(sender, msg) {
                        Ok(events) => self.dispatch(events),
                        Err(err) => {
                            // Rejections go to the sender only; the
                            // room state is unchanged.
                            tracing::debug!(
                                room = %self.room.code(),
                                %sender,
                                error = %err,
                                "message rejected"
                            );
                            self.send_to(
                                sender,
                                ServerEvent::Error {
                                    kind: err.kind(),
                                    message: err.to_string(),
                                },
                            );
                        }
                    }
                }

                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }

                RoomCommand::Shutdown => {
                    tracing::info!(room = %self.room.code(), "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room = %self.room.code(), "room actor stopped");
    }

    /// Delivers events to the correct recipients, in order.
    fn dispatch(&self, events: Vec<Outgoing>) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(event.clone());
                    }
                }
                Recipient::Player(handle) => self.send_to(handle, event),
            }
        }
    }

    /// Sends one event to one player. Silently drops if the receiver is
    /// gone (player disconnected).
    fn send_to(&self, handle: PlayerHandle, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&handle) {
            let _ = sender.send(event);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            code: self.room.code().clone(),
            phase: self.room.phase(),
            seat_count: self.room.seat_count(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
///
/// `channel_size` bounds the command channel — if it fills up, senders
/// wait.
pub(crate) fn spawn_room(code: RoomCode, channel_size: usize) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        room: GameRoom::new(code.clone()),
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
