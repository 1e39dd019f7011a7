//! Avatar motion and player identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::geometry::DogPoint;
use super::map::Map;

/// Movement command. `None` stops the dog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    West,
    East,
    None,
}

impl Direction {
    /// Wire letter for the direction
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "U",
            Direction::South => "D",
            Direction::West => "L",
            Direction::East => "R",
            Direction::None => "",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "U" => Ok(Direction::North),
            "D" => Ok(Direction::South),
            "L" => Ok(Direction::West),
            "R" => Ok(Direction::East),
            "" => Ok(Direction::None),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// Velocity in world units per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// The moving avatar controlled by a player
#[derive(Debug, Clone)]
pub struct Dog {
    position: DogPoint,
    velocity: Velocity,
    facing: Direction,
}

impl Dog {
    pub fn new(position: DogPoint) -> Self {
        Self {
            position,
            velocity: Velocity::default(),
            facing: Direction::North,
        }
    }

    pub fn position(&self) -> DogPoint {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Last non-stop direction; a stop keeps the previous facing
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Overwrite the velocity for a direction at the given speed
    pub fn set_direction(&mut self, direction: Direction, speed: f64) {
        if direction != Direction::None {
            self.facing = direction;
        }

        self.velocity = match direction {
            Direction::North => Velocity { x: 0.0, y: -speed },
            Direction::South => Velocity { x: 0.0, y: speed },
            Direction::West => Velocity { x: -speed, y: 0.0 },
            Direction::East => Velocity { x: speed, y: 0.0 },
            Direction::None => Velocity::default(),
        };
    }

    /// Integrate motion over `dt`, stopping dead at the edge of the road network
    pub fn tick(&mut self, dt: Duration, map: &Map) {
        if self.velocity.is_zero() {
            return;
        }

        let secs = dt.as_secs_f64();
        let target = DogPoint::new(
            self.position.x + self.velocity.x * secs,
            self.position.y + self.velocity.y * secs,
        );

        let grid = map.grid();
        if grid.is_valid_move(self.position, target) {
            self.position = target;
            return;
        }

        let resolved = grid.resolve_blocked_move(self.position, target);
        if resolved != target {
            self.velocity = Velocity::default();
        }
        self.position = resolved;
    }
}

/// Process-unique player id, issued in increasing order from zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A joined user and their dog
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    dog: Dog,
}

impl Player {
    pub fn new(id: PlayerId, name: String, spawn: DogPoint) -> Self {
        Self {
            id,
            name,
            dog: Dog::new(spawn),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dog(&self) -> &Dog {
        &self.dog
    }

    pub fn steer(&mut self, direction: Direction, speed: f64) {
        self.dog.set_direction(direction, speed);
    }

    pub fn tick(&mut self, dt: Duration, map: &Map) {
        self.dog.tick(dt, map);
    }
}
