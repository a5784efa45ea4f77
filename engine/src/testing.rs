// ═══════════════════════════════════════════════════════════════════════
// Test fixtures — small hand-built boards shared across crates
// ═══════════════════════════════════════════════════════════════════════

use crate::grid::TileGrid;
use crate::types::{GridCoord, TileId};

/// Cycle of `n` tiles, ids returned in traversal order.
pub fn ring_grid(n: i32) -> (TileGrid, Vec<TileId>) {
    let mut grid = TileGrid::new();
    let ids: Vec<TileId> = (0..n)
        .map(|i| {
            grid.add_tile_at(GridCoord::new(i, 0))
                .expect("duplicate coord")
        })
        .collect();
    for i in 0..ids.len() {
        grid.connect(ids[i], ids[(i + 1) % ids.len()]);
    }
    (grid, ids)
}

/// Path graph of `n` tiles.
pub fn line_grid(n: i32) -> (TileGrid, Vec<TileId>) {
    let mut grid = TileGrid::new();
    let ids: Vec<TileId> = (0..n)
        .map(|i| {
            grid.add_tile_at(GridCoord::new(i, 0))
                .expect("duplicate coord")
        })
        .collect();
    for pair in ids.windows(2) {
        grid.connect(pair[0], pair[1]);
    }
    (grid, ids)
}
