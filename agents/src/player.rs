// ═══════════════════════════════════════════════════════════════════════
// Player policies — destination pickers for headless matches
//
// In an interactive build the selection comes from tile clicks; the
// simulation needs a stand-in that chooses among the published
// reachable tiles.
// ═══════════════════════════════════════════════════════════════════════

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tilechase_engine::game::Game;
use tilechase_engine::pathfinding::{shortest_path, PathOpts};
use tilechase_engine::types::TileId;

pub trait PlayerPolicy {
    fn name(&self) -> &str;

    /// Pick a destination from the current reachable set. `None` only
    /// when the set is empty, which the engine already turns into a
    /// stalemate before asking.
    fn choose_tile(&mut self, game: &Game) -> Option<TileId>;
}

/// Moves to whichever reachable tile leaves the shortest remaining walk
/// to the collectible; wanders randomly when the board has none.
pub struct GreedyCollector {
    rng: ChaCha8Rng,
}

impl GreedyCollector {
    pub fn new(seed: u64) -> Self {
        GreedyCollector {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for GreedyCollector {
    fn name(&self) -> &str {
        "greedy-collector"
    }

    fn choose_tile(&mut self, game: &Game) -> Option<TileId> {
        let reachable = game.reachable_tiles();
        if reachable.is_empty() {
            return None;
        }
        match game.grid().resource_tile() {
            Some(resource) => reachable.iter().copied().min_by_key(|&t| {
                if t == resource {
                    0
                } else {
                    let detour = shortest_path(game.grid(), t, resource, PathOpts::default());
                    if detour.is_empty() {
                        usize::MAX
                    } else {
                        detour.len()
                    }
                }
            }),
            None => reachable.choose(&mut self.rng).copied(),
        }
    }
}

/// Uniformly random legal destination; baseline for batch comparisons.
pub struct RandomWalker {
    rng: ChaCha8Rng,
}

impl RandomWalker {
    pub fn new(seed: u64) -> Self {
        RandomWalker {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for RandomWalker {
    fn name(&self) -> &str {
        "random-walker"
    }

    fn choose_tile(&mut self, game: &Game) -> Option<TileId> {
        game.reachable_tiles().choose(&mut self.rng).copied()
    }
}
