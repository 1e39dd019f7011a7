//! Whole-world registry: maps, lazily created sessions and player ids

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use super::dog::{Direction, PlayerId};
use super::map::{Map, MapCatalog, MapError, MapId};
use super::session::{GameSession, PlayerStateView, PlayerSummary, Token};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Map not found")]
    MapNotFound,

    #[error("Invalid name")]
    InvalidName,

    #[error("Invalid direction")]
    InvalidDirection,

    #[error("Player token has not been found")]
    UnknownToken,

    #[error("Manual ticks are disabled while the automatic ticker runs")]
    ModeMismatch,

    #[error(transparent)]
    Map(#[from] MapError),
}

/// How the world clock advances. Fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickMode {
    /// Each manual tick request advances the world by its own delta
    #[default]
    Manual,
    /// A scheduler advances the world every `period`
    Automatic { period: Duration },
}

impl TickMode {
    /// `0` selects manual ticking
    pub fn from_period_ms(ms: u64) -> Self {
        if ms == 0 {
            TickMode::Manual
        } else {
            TickMode::Automatic {
                period: Duration::from_millis(ms),
            }
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, TickMode::Manual)
    }
}

/// Outcome of a successful join
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub player_id: PlayerId,
    pub token: Token,
}

/// Owns every map and session in the world
#[derive(Debug)]
pub struct Game {
    catalog: MapCatalog,
    sessions: HashMap<MapId, GameSession>,
    tick_mode: TickMode,
    automatic_ticks: u64,
    next_player_id: u64,
    /// Set only for reproducible runs; otherwise each session seeds from entropy
    seed_rng: Option<ChaCha8Rng>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_rng(None)
    }

    /// Registry whose sessions draw tokens and spawns from `seed`
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(Some(ChaCha8Rng::seed_from_u64(seed)))
    }

    fn with_rng(seed_rng: Option<ChaCha8Rng>) -> Self {
        Self {
            catalog: MapCatalog::new(),
            sessions: HashMap::new(),
            tick_mode: TickMode::Manual,
            automatic_ticks: 0,
            next_player_id: 0,
            seed_rng,
        }
    }

    pub fn add_map(&mut self, map: Map) -> Result<(), GameError> {
        self.catalog.add(map)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn find_map(&self, id: &str) -> Option<&Map> {
        self.catalog.find(id).map(|m| m.as_ref())
    }

    pub fn catalog(&self) -> &MapCatalog {
        &self.catalog
    }

    pub fn tick_mode(&self) -> TickMode {
        self.tick_mode
    }

    /// Fix the tick mode. Rejected once an automatic tick has run.
    pub fn set_tick_rate(&mut self, period_ms: u64) -> Result<(), GameError> {
        if self.automatic_ticks > 0 {
            return Err(GameError::ModeMismatch);
        }
        self.tick_mode = TickMode::from_period_ms(period_ms);
        Ok(())
    }

    /// Existing session for the map, created on first use
    pub fn session_for_map(&mut self, id: &str) -> Result<&mut GameSession, GameError> {
        let map = self.catalog.find(id).ok_or(GameError::MapNotFound)?;

        if !self.sessions.contains_key(id) {
            let session = match self.seed_rng.as_mut() {
                Some(rng) => GameSession::seeded(map.clone(), rng.gen()),
                None => GameSession::new(map.clone()),
            };
            info!(map_id = %map.id(), "Creating game session");
            self.sessions.insert(map.id().clone(), session);
        }

        self.sessions.get_mut(id).ok_or(GameError::MapNotFound)
    }

    /// Session holding the token. Scans sessions, which number at most the maps.
    pub fn session_for_token(&self, token: &Token) -> Option<&GameSession> {
        self.sessions.values().find(|s| s.has_token(token))
    }

    fn session_for_token_mut(&mut self, token: &Token) -> Option<&mut GameSession> {
        self.sessions.values_mut().find(|s| s.has_token(token))
    }

    #[cfg(test)]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn player_count(&self) -> usize {
        self.sessions.values().map(GameSession::player_count).sum()
    }

    pub fn join(&mut self, map_id: &str, name: &str, random_spawn: bool) -> Result<JoinOutcome, GameError> {
        if name.is_empty() {
            return Err(GameError::InvalidName);
        }

        let player_id = PlayerId(self.next_player_id);
        let session = self.session_for_map(map_id)?;
        let (player_id, token) = session.add_player(player_id, name.to_string(), random_spawn);
        self.next_player_id += 1;

        info!(map_id, player_id = %player_id, "Player joined");
        Ok(JoinOutcome { player_id, token })
    }

    pub fn move_player(&mut self, token: &Token, direction: Direction) -> Result<(), GameError> {
        self.session_for_token_mut(token)
            .ok_or(GameError::UnknownToken)?
            .move_player(token, direction)
    }

    /// Whether `token` was issued to a player in any session
    pub fn authorize(&self, token: &Token) -> Result<(), GameError> {
        self.session_for_token(token)
            .map(|_| ())
            .ok_or(GameError::UnknownToken)
    }

    pub fn list_players(&self, token: &Token) -> Result<Vec<PlayerSummary>, GameError> {
        self.session_for_token(token)
            .map(GameSession::list_players)
            .ok_or(GameError::UnknownToken)
    }

    pub fn list_state(&self, token: &Token) -> Result<Vec<PlayerStateView>, GameError> {
        self.session_for_token(token)
            .map(GameSession::list_state)
            .ok_or(GameError::UnknownToken)
    }

    /// Advance every session by `dt`
    pub fn advance(&mut self, dt: Duration) {
        for session in self.sessions.values_mut() {
            session.tick(dt);
        }
    }

    /// Tick requested by a client; only allowed in manual mode
    pub fn manual_tick(&mut self, dt: Duration) -> Result<(), GameError> {
        if !self.tick_mode.is_manual() {
            return Err(GameError::ModeMismatch);
        }
        debug!(dt_ms = dt.as_millis() as u64, "Manual tick");
        self.advance(dt);
        Ok(())
    }

    /// Tick driven by the scheduler
    pub fn automatic_tick(&mut self, dt: Duration) {
        self.automatic_ticks += 1;
        self.advance(dt);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
