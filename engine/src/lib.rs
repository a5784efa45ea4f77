pub mod adversary;
pub mod game;
pub mod grid;
pub mod pathfinding;
pub mod setup;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod types;

pub use adversary::{AdversaryPolicy, AdversaryView};
pub use game::{Game, GameObserver, Mover, NullObserver, WIN_SCORE};
pub use grid::TileGrid;
pub use types::*;

#[cfg(test)]
mod tests;
