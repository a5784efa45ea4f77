// ═══════════════════════════════════════════════════════════════════════
// Match setup — from a seed and board size to a ready Game
// ═══════════════════════════════════════════════════════════════════════

use crate::game::{Game, GameObserver};
use crate::grid::TileGrid;
use crate::types::{EngineError, GridCoord, TileId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Board size and the seed that determines the layout and every in-match
/// random decision the engine itself makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            width: 10,
            height: 10,
            seed: 42,
        }
    }
}

/// Generate the board and place the player on the first ring tile, the
/// (0, 0) corner. Adversaries are registered separately by the caller,
/// before the first roll.
pub fn create_match(
    config: MatchConfig,
    observer: Box<dyn GameObserver>,
) -> Result<Game, EngineError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let grid = TileGrid::generate(config.width, config.height, &mut rng)?;
    let player_start = grid
        .id_at(GridCoord::new(0, 0))
        .ok_or(EngineError::MissingCoord { x: 0, z: 0 })?;
    Game::new(grid, player_start, config.seed, observer)
}

/// Spawn tiles for the stock adversary pair: the two ring corners
/// farthest from the player's start.
pub fn adversary_starts(grid: &TileGrid, config: MatchConfig) -> Result<[TileId; 2], EngineError> {
    let (w, h) = (config.width as i32, config.height as i32);
    let far = grid
        .id_at(GridCoord::new(w - 1, h - 1))
        .ok_or(EngineError::MissingCoord { x: w - 1, z: h - 1 })?;
    let side = grid
        .id_at(GridCoord::new(w - 1, 0))
        .ok_or(EngineError::MissingCoord { x: w - 1, z: 0 })?;
    Ok([far, side])
}
