// ═══════════════════════════════════════════════════════════════════════
// Core types — tiles, coordinates, turn phases, match results
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

// ── Tile identity ──────────────────────────────────────────────────────

/// Compact, copyable tile identifier. Ids are assigned sequentially from 1
/// during grid generation and stay stable for the whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer board coordinate. `x` runs along the width, `z` along the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

impl GridCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        GridCoord { x, z }
    }
}

// ── Tile ───────────────────────────────────────────────────────────────

/// A node in the movement graph.
///
/// Tiles are created once during grid generation and are never destroyed;
/// only `resource` and `walkable` change afterwards. Adjacency is kept
/// symmetric by [`crate::grid::TileGrid::connect`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub coord: GridCoord,
    pub neighbors: Vec<TileId>,
    /// At most one collectible sits on a tile.
    pub resource: bool,
    /// Recomputed each turn: reachable under the active dice budget.
    pub walkable: bool,
}

impl Tile {
    pub(crate) fn new(id: TileId, coord: GridCoord) -> Self {
        Tile {
            id,
            coord,
            neighbors: Vec::new(),
            resource: false,
            walkable: false,
        }
    }

    /// Idempotent neighbor insertion; insertion order is preserved and
    /// drives pathfinding tie-breaks.
    pub fn add_neighbor(&mut self, id: TileId) {
        if !self.neighbors.contains(&id) {
            self.neighbors.push(id);
        }
    }
}

// ── Mobile entities ────────────────────────────────────────────────────

/// A token on the board. `current_tile` is authoritative and is only
/// updated when a resolved move completes, never mid-path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileEntity {
    pub current_tile: TileId,
}

impl MobileEntity {
    pub fn new(start: TileId) -> Self {
        MobileEntity {
            current_tile: start,
        }
    }
}

// ── Turn state ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No active dice value; waiting for a roll.
    Idle,
    /// Dice budget set, reachable set published; waiting for a selection.
    AwaitingSelection,
    /// A legal tile was selected; the player's move is in flight.
    Resolving,
    /// Adversaries act in registration order.
    AdversaryPhase,
}

/// Terminal outcome of a match. Set at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Lose,
    Stalemate,
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Win => write!(f, "Win"),
            MatchResult::Lose => write!(f, "Lose"),
            MatchResult::Stalemate => write!(f, "Stalemate"),
        }
    }
}

// ── Errors ─────────────────────────────────────────────────────────────

/// Fatal construction/setup failures. Expected in-match input races are
/// logged no-ops instead and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("grid {width}x{height} is too small to form a perimeter ring")]
    GridTooSmall { width: u32, height: u32 },

    #[error("generated grid is not connected ({reached} of {total} tiles reachable)")]
    DisconnectedGrid { reached: usize, total: usize },

    #[error("tile {0} is not part of the grid")]
    MissingTile(TileId),

    #[error("no tile at coordinate ({x}, {z})")]
    MissingCoord { x: i32, z: i32 },

    #[error("adversaries must be registered before the first turn")]
    AdversariesLocked,
}
