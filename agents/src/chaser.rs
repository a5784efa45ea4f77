// ═══════════════════════════════════════════════════════════════════════
// Chaser — direct pursuit, one tile per turn
// ═══════════════════════════════════════════════════════════════════════

use log::debug;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tilechase_engine::adversary::{AdversaryPolicy, AdversaryView};
use tilechase_engine::pathfinding::{exact_steps_path, PathOpts};
use tilechase_engine::types::TileId;

/// Walks straight at the player. The one-step exact path query with the
/// destination-may-be-blocked flag is an adjacency check doubling as the
/// capture move; when it fails the chaser drifts to a random neighbor
/// instead, never onto the player's tile.
pub struct ChaserPolicy {
    rng: ChaCha8Rng,
}

impl ChaserPolicy {
    pub fn new(seed: u64) -> Self {
        ChaserPolicy {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl AdversaryPolicy for ChaserPolicy {
    fn name(&self) -> &str {
        "chaser"
    }

    fn decide(&mut self, view: &AdversaryView<'_>) -> Option<Vec<TileId>> {
        let capture = exact_steps_path(
            view.grid,
            view.own_tile,
            view.player_tile,
            1,
            PathOpts {
                blocked: None,
                allow_end_on_blocked: true,
            },
        );
        if let Some(&next) = capture.first() {
            debug!("chaser steps onto the player at {next}");
            return Some(vec![next]);
        }

        let tile = view.grid.tile(view.own_tile)?;
        let options: Vec<TileId> = tile
            .neighbors
            .iter()
            .copied()
            .filter(|&n| n != view.player_tile && view.grid.tile(n).is_some())
            .collect();
        let &next = options.choose(&mut self.rng)?;
        debug!("chaser drifts to {next}");
        Some(vec![next])
    }
}
