// ═══════════════════════════════════════════════════════════════════════
// Adversary trait — one-ply decision contract
//
// Policies are strategy objects registered with the game, not entity
// subclasses. They read the board through a read-only view, decide a
// short path for this turn, and hold no plan between turns. The game
// owns the adversary's position and commits it only when the returned
// move completes.
// ═══════════════════════════════════════════════════════════════════════

use crate::grid::TileGrid;
use crate::types::TileId;
use std::collections::HashSet;

/// Read-only board snapshot handed to a policy for its decision.
#[derive(Debug, Clone, Copy)]
pub struct AdversaryView<'a> {
    pub grid: &'a TileGrid,
    /// The deciding adversary's own tile.
    pub own_tile: TileId,
    pub player_tile: TileId,
    /// Tile currently carrying the collectible, if any.
    pub resource_tile: Option<TileId>,
    /// Tiles occupied by the other adversaries.
    pub others: &'a HashSet<TileId>,
}

/// A one-ply movement decision, recomputed fresh every turn.
pub trait AdversaryPolicy {
    /// Human-readable policy name for logs.
    fn name(&self) -> &str;

    /// Decide this turn's move. The returned path excludes the current
    /// tile; its last element becomes the adversary's position once the
    /// move resolves. `None` means no legal move was found — the
    /// adversary simply stays put, which is not an error.
    fn decide(&mut self, view: &AdversaryView<'_>) -> Option<Vec<TileId>>;
}
