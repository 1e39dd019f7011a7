//! Serialized world executor
//!
//! The [`Game`] is owned by a single task that drains a FIFO command queue,
//! so joins, moves and ticks never interleave. Callers talk to it through a
//! cloneable [`WorldHandle`].

pub mod ticker;

pub use ticker::Ticker;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::game::{
    Direction, Game, GameError, JoinOutcome, PlayerStateView, PlayerSummary, Token,
};

/// Queue depth of the world executor
pub const COMMAND_QUEUE_CAPACITY: usize = 1024;

type Reply<T> = oneshot::Sender<Result<T, GameError>>;

/// Work submitted to the world executor
#[derive(Debug)]
pub enum WorldCommand {
    Join {
        map_id: String,
        name: String,
        reply: Reply<JoinOutcome>,
    },
    Move {
        token: Token,
        direction: Direction,
        reply: Reply<()>,
    },
    Authorize {
        token: Token,
        reply: Reply<()>,
    },
    ManualTick {
        delta: Duration,
        reply: Reply<()>,
    },
    Players {
        token: Token,
        reply: Reply<Vec<PlayerSummary>>,
    },
    State {
        token: Token,
        reply: Reply<Vec<PlayerStateView>>,
    },
    /// Scheduler tick; nobody waits for it
    Advance { elapsed: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("World executor is not running")]
    Closed,
}

/// Owns the game state and applies commands one at a time
pub struct WorldActor {
    game: Game,
    randomize_spawn: bool,
    command_rx: mpsc::Receiver<WorldCommand>,
    player_count: Arc<AtomicUsize>,
}

/// Handle for submitting commands to a running [`WorldActor`]
#[derive(Clone)]
pub struct WorldHandle {
    command_tx: mpsc::Sender<WorldCommand>,
    player_count: Arc<AtomicUsize>,
}

impl WorldActor {
    pub fn new(game: Game, randomize_spawn: bool) -> (Self, WorldHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let player_count = Arc::new(AtomicUsize::new(game.player_count()));

        let handle = WorldHandle {
            command_tx,
            player_count: player_count.clone(),
        };

        let actor = Self {
            game,
            randomize_spawn,
            command_rx,
            player_count,
        };

        (actor, handle)
    }

    /// Run until every handle has been dropped
    pub async fn run(mut self) {
        info!(
            maps = self.game.catalog().len(),
            tick_mode = ?self.game.tick_mode(),
            "World executor started"
        );

        while let Some(command) = self.command_rx.recv().await {
            self.handle(command);
        }

        info!("World executor stopped");
    }

    fn handle(&mut self, command: WorldCommand) {
        match command {
            WorldCommand::Join {
                map_id,
                name,
                reply,
            } => {
                let result = self.game.join(&map_id, &name, self.randomize_spawn);
                if result.is_ok() {
                    self.player_count
                        .store(self.game.player_count(), Ordering::Relaxed);
                }
                respond(reply, result);
            }
            WorldCommand::Move {
                token,
                direction,
                reply,
            } => {
                respond(reply, self.game.move_player(&token, direction));
            }
            WorldCommand::Authorize { token, reply } => {
                respond(reply, self.game.authorize(&token));
            }
            WorldCommand::ManualTick { delta, reply } => {
                respond(reply, self.game.manual_tick(delta));
            }
            WorldCommand::Players { token, reply } => {
                respond(reply, self.game.list_players(&token));
            }
            WorldCommand::State { token, reply } => {
                respond(reply, self.game.list_state(&token));
            }
            WorldCommand::Advance { elapsed } => {
                debug!(elapsed_ms = elapsed.as_millis() as u64, "Automatic tick");
                self.game.automatic_tick(elapsed);
            }
        }
    }
}

fn respond<T>(reply: Reply<T>, result: Result<T, GameError>) {
    if reply.send(result).is_err() {
        warn!("Caller dropped before world reply was sent");
    }
}

impl WorldHandle {
    /// Players joined so far, updated after each join
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> WorldCommand,
    ) -> Result<T, WorldError> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(build(reply))
            .await
            .map_err(|_| WorldError::Closed)?;
        let result = response.await.map_err(|_| WorldError::Closed)?;
        Ok(result?)
    }

    pub async fn join(&self, map_id: String, name: String) -> Result<JoinOutcome, WorldError> {
        self.request(|reply| WorldCommand::Join {
            map_id,
            name,
            reply,
        })
        .await
    }

    pub async fn move_player(&self, token: Token, direction: Direction) -> Result<(), WorldError> {
        self.request(|reply| WorldCommand::Move {
            token,
            direction,
            reply,
        })
        .await
    }

    /// Confirm the token belongs to a joined player
    pub async fn authorize(&self, token: Token) -> Result<(), WorldError> {
        self.request(|reply| WorldCommand::Authorize { token, reply })
            .await
    }

    pub async fn manual_tick(&self, delta: Duration) -> Result<(), WorldError> {
        self.request(|reply| WorldCommand::ManualTick { delta, reply })
            .await
    }

    pub async fn players(&self, token: Token) -> Result<Vec<PlayerSummary>, WorldError> {
        self.request(|reply| WorldCommand::Players { token, reply })
            .await
    }

    pub async fn state(&self, token: Token) -> Result<Vec<PlayerStateView>, WorldError> {
        self.request(|reply| WorldCommand::State { token, reply })
            .await
    }

    /// Queue a scheduler tick without waiting for it to run
    pub async fn advance(&self, elapsed: Duration) -> Result<(), WorldError> {
        self.command_tx
            .send(WorldCommand::Advance { elapsed })
            .await
            .map_err(|_| WorldError::Closed)
    }
}
