// ═══════════════════════════════════════════════════════════════════════
// Ambusher — interception heuristic, up to two tiles per turn
//
// Rather than tailing the player it aims for the midpoint of the
// player's route to the collectible and waits there. Everything is
// recomputed from scratch each turn; the policy keeps no plan.
// ═══════════════════════════════════════════════════════════════════════

use log::debug;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tilechase_engine::adversary::{AdversaryPolicy, AdversaryView};
use tilechase_engine::pathfinding::{reachable_within, shortest_path, PathOpts};
use tilechase_engine::types::TileId;

pub struct AmbushPolicy {
    rng: ChaCha8Rng,
}

impl AmbushPolicy {
    pub fn new(seed: u64) -> Self {
        AmbushPolicy {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Reposition when the ambush spot is taken or unreachable: pick a
    /// random tile from the two-step reachable set (the player's tile is
    /// off limits) and walk up to two tiles towards it.
    fn random_walk(&mut self, view: &AdversaryView<'_>) -> Option<Vec<TileId>> {
        let blocked: HashSet<TileId> = HashSet::from([view.player_tile]);
        let candidates = reachable_within(
            view.grid,
            view.own_tile,
            2,
            PathOpts {
                blocked: Some(&blocked),
                allow_end_on_blocked: false,
            },
        );
        let &target = candidates.choose(&mut self.rng)?;
        let path = shortest_path(view.grid, view.own_tile, target, PathOpts::default());
        let steps: Vec<TileId> = path.into_iter().take(2).collect();
        if steps.is_empty() {
            None
        } else {
            debug!("ambusher repositions towards {target}");
            Some(steps)
        }
    }
}

impl AdversaryPolicy for AmbushPolicy {
    fn name(&self) -> &str {
        "ambusher"
    }

    fn decide(&mut self, view: &AdversaryView<'_>) -> Option<Vec<TileId>> {
        let to_player = shortest_path(
            view.grid,
            view.own_tile,
            view.player_tile,
            PathOpts {
                blocked: None,
                allow_end_on_blocked: true,
            },
        );
        if to_player.is_empty() {
            // Already sharing the player's tile, or cut off entirely.
            return None;
        }
        // Two steps covers the whole distance: lunge and capture.
        if to_player.len() == 2 {
            debug!("ambusher lunges at the player");
            return Some(to_player);
        }

        let resource = view.resource_tile?;
        let player_to_resource =
            shortest_path(view.grid, view.player_tile, resource, PathOpts::default());
        if player_to_resource.is_empty() {
            return None;
        }

        let mid = player_to_resource[player_to_resource.len() / 2];
        if mid == view.own_tile {
            return self.random_walk(view);
        }

        let blocked: HashSet<TileId> = HashSet::from([view.player_tile]);
        let to_mid = shortest_path(
            view.grid,
            view.own_tile,
            mid,
            PathOpts {
                blocked: Some(&blocked),
                allow_end_on_blocked: false,
            },
        );
        if to_mid.is_empty() {
            return self.random_walk(view);
        }

        debug!("ambusher heads for the intercept tile {mid}");
        let steps: Vec<TileId> = if to_mid.len() >= 2 {
            to_mid[..2].to_vec()
        } else {
            // One step reaches the spot; spend the second step on a free
            // neighbor so the move still uses the full stride.
            let first = to_mid[0];
            let avoid: HashSet<TileId> = HashSet::from([view.player_tile, view.own_tile]);
            let onward = reachable_within(
                view.grid,
                first,
                1,
                PathOpts {
                    blocked: Some(&avoid),
                    allow_end_on_blocked: false,
                },
            );
            match onward.first() {
                Some(&next) => vec![first, next],
                None => vec![first],
            }
        };
        Some(steps)
    }
}
