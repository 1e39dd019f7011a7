//! World simulation: road network, collision model, dogs, sessions and registry

pub mod collision;
pub mod dog;
pub mod geometry;
pub mod loader;
pub mod map;
pub mod registry;
pub mod session;

pub use dog::Direction;
pub use map::MapCatalog;
pub use registry::{Game, GameError, JoinOutcome, TickMode};
pub use session::{PlayerStateView, PlayerSummary, Token};
