//! Per-map game session and token issuance

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::dog::{Direction, Player, PlayerId, Velocity};
use super::geometry::DogPoint;
use super::map::Map;
use super::registry::GameError;

/// Length of an auth token in hex characters
pub const TOKEN_LEN: usize = 32;

/// Opaque player credential: 32 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Accept a token with the expected length. Content is not inspected; an
    /// unrecognised token is reported later as unknown.
    pub fn parse(raw: &str) -> Option<Self> {
        (raw.len() == TOKEN_LEN).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds tokens from two independently seeded 64-bit generators
#[derive(Debug)]
pub struct TokenGenerator {
    first: ChaCha8Rng,
    second: ChaCha8Rng,
}

impl TokenGenerator {
    pub fn from_entropy() -> Self {
        Self {
            first: ChaCha8Rng::from_entropy(),
            second: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn from_seeds(first: u64, second: u64) -> Self {
        Self {
            first: ChaCha8Rng::seed_from_u64(first),
            second: ChaCha8Rng::seed_from_u64(second),
        }
    }

    /// Both values as unpadded lowercase hex, right-filled with `'0'` to 32 chars
    pub fn generate(&mut self) -> Token {
        let mut raw = format!("{:x}{:x}", self.first.next_u64(), self.second.next_u64());
        while raw.len() < TOKEN_LEN {
            raw.push('0');
        }
        Token(raw)
    }
}

/// Public roster entry
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
}

/// Dynamic state of one player's dog
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStateView {
    pub id: PlayerId,
    pub position: DogPoint,
    pub velocity: Velocity,
    pub facing: Direction,
}

/// All players currently on one map
#[derive(Debug)]
pub struct GameSession {
    map: Arc<Map>,
    players: BTreeMap<PlayerId, Player>,
    tokens: HashMap<Token, PlayerId>,
    token_generator: TokenGenerator,
    spawn_rng: ChaCha8Rng,
}

impl GameSession {
    pub fn new(map: Arc<Map>) -> Self {
        Self::with_rng(map, TokenGenerator::from_entropy(), ChaCha8Rng::from_entropy())
    }

    /// Session with explicit random sources, for reproducible runs
    pub fn with_rng(map: Arc<Map>, token_generator: TokenGenerator, spawn_rng: ChaCha8Rng) -> Self {
        Self {
            map,
            players: BTreeMap::new(),
            tokens: HashMap::new(),
            token_generator,
            spawn_rng,
        }
    }

    /// Derive both random sources from one seed
    pub fn seeded(map: Arc<Map>, seed: u64) -> Self {
        let mut root = ChaCha8Rng::seed_from_u64(seed);
        let generator = TokenGenerator::from_seeds(root.gen(), root.gen());
        let spawn_rng = ChaCha8Rng::seed_from_u64(root.gen());
        Self::with_rng(map, generator, spawn_rng)
    }

    #[cfg(test)]
    pub fn map(&self) -> &Arc<Map> {
        &self.map
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn generate_token(&mut self) -> Token {
        self.token_generator.generate()
    }

    /// Spawn a new player on this map and issue their token
    pub fn add_player(&mut self, id: PlayerId, name: String, random_spawn: bool) -> (PlayerId, Token) {
        let spawn = if random_spawn {
            self.map.random_spawn_point(&mut self.spawn_rng)
        } else {
            self.map.default_spawn_point()
        };

        let token = self.generate_token();
        self.players.insert(id, Player::new(id, name, spawn));
        self.tokens.insert(token.clone(), id);
        (id, token)
    }

    pub fn has_token(&self, token: &Token) -> bool {
        self.tokens.contains_key(token)
    }

    #[cfg(test)]
    pub fn player(&self, token: &Token) -> Option<&Player> {
        self.tokens.get(token).and_then(|id| self.players.get(id))
    }

    /// Steer the dog of the player holding `token` at the map's speed
    pub fn move_player(&mut self, token: &Token, direction: Direction) -> Result<(), GameError> {
        let id = self.tokens.get(token).ok_or(GameError::UnknownToken)?;
        let player = self.players.get_mut(id).ok_or(GameError::UnknownToken)?;
        player.steer(direction, self.map.dog_speed());
        Ok(())
    }

    /// Advance every player's dog by `dt`
    pub fn tick(&mut self, dt: Duration) {
        for player in self.players.values_mut() {
            player.tick(dt, &self.map);
        }
    }

    /// Roster ordered by player id
    pub fn list_players(&self) -> Vec<PlayerSummary> {
        self.players
            .values()
            .map(|p| PlayerSummary {
                id: p.id(),
                name: p.name().to_string(),
            })
            .collect()
    }

    /// Dog states ordered by player id
    pub fn list_state(&self) -> Vec<PlayerStateView> {
        self.players
            .values()
            .map(|p| PlayerStateView {
                id: p.id(),
                position: p.dog().position(),
                velocity: p.dog().velocity(),
                facing: p.dog().facing(),
            })
            .collect()
    }
}
