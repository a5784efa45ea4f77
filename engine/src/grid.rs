// ═══════════════════════════════════════════════════════════════════════
// Tile grid — procedural construction and O(1) lookup
//
// Layout: a full perimeter ring of tiles, plus a randomized number of
// interior "bridge" lines (whole columns/rows) spliced into the ring at
// both ends. The result is connected by construction; `validate()` still
// checks it before a match is allowed to start.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{EngineError, GridCoord, Tile, TileId};
use log::debug;
use rand::Rng;
use std::collections::{HashMap, HashSet, VecDeque};

/// Owns all tiles of a match, indexed by id and by coordinate. Both
/// indexes are append-only and always agree: every tile reachable through
/// one lookup is reachable through the other.
#[derive(Debug, Clone, Default)]
pub struct TileGrid {
    tiles: HashMap<TileId, Tile>,
    by_coord: HashMap<GridCoord, TileId>,
    next_id: u32,
}

impl TileGrid {
    pub fn new() -> Self {
        TileGrid {
            tiles: HashMap::new(),
            by_coord: HashMap::new(),
            next_id: 1,
        }
    }

    /// Generate a ring-and-bridges board. All randomness comes from the
    /// injected `rng`, so a seed fully determines the layout.
    pub fn generate(width: u32, height: u32, rng: &mut impl Rng) -> Result<Self, EngineError> {
        if width < 3 || height < 3 {
            return Err(EngineError::GridTooSmall { width, height });
        }

        let mut grid = TileGrid::new();
        let (w, h) = (width as i32, height as i32);

        // Perimeter ring.
        for x in 0..w {
            grid.add_tile_at(GridCoord::new(x, 0));
            grid.add_tile_at(GridCoord::new(x, h - 1));
        }
        for z in 1..h - 1 {
            grid.add_tile_at(GridCoord::new(0, z));
            grid.add_tile_at(GridCoord::new(w - 1, z));
        }

        // Bridge acceptance: base chance 0.2, flips by 0.3 after each
        // success and rises by 0.3 after every attempt, so the bridge
        // count varies between matches instead of being fixed. The chance
        // carries over from the vertical pass into the horizontal one.
        let mut chance = 0.2f64;

        let mut vertical: Vec<i32> = Vec::new();
        for _ in 0..w / 5 {
            if rng.gen_bool(chance.clamp(0.0, 1.0)) {
                chance += if chance > 0.3 { -0.3 } else { 0.3 };
                if let Some(line) = choose_line(w, &vertical, 1, rng) {
                    vertical.push(line);
                    for z in 1..h - 1 {
                        grid.add_tile_at(GridCoord::new(line, z));
                    }
                }
            }
            chance += 0.3;
        }

        let mut horizontal: Vec<i32> = Vec::new();
        for _ in 0..h / 5 {
            if rng.gen_bool(chance.clamp(0.0, 1.0)) {
                chance += if chance > 0.3 { -0.3 } else { 0.3 };
                if let Some(line) = choose_line(h, &horizontal, 1, rng) {
                    horizontal.push(line);
                    for x in 1..w - 1 {
                        grid.add_tile_at(GridCoord::new(x, line));
                    }
                }
            }
            chance += 0.3;
        }

        grid.connect_ring_and_bridges(w, h, &vertical, &horizontal);
        debug!(
            "generated {}x{} board: {} tiles, {} vertical / {} horizontal bridges",
            width,
            height,
            grid.len(),
            vertical.len(),
            horizontal.len()
        );
        Ok(grid)
    }

    /// Walk the ring in traversal order connecting consecutive tiles into
    /// a cycle, then splice each bridge line in internally and at both
    /// ring ends.
    fn connect_ring_and_bridges(&mut self, w: i32, h: i32, vertical: &[i32], horizontal: &[i32]) {
        let mut ring: Vec<GridCoord> = Vec::new();
        for x in 0..w {
            ring.push(GridCoord::new(x, 0));
        }
        for z in 1..h - 1 {
            ring.push(GridCoord::new(w - 1, z));
        }
        for x in (0..w).rev() {
            ring.push(GridCoord::new(x, h - 1));
        }
        for z in (1..h - 1).rev() {
            ring.push(GridCoord::new(0, z));
        }

        for i in 0..ring.len() {
            self.connect_coords(ring[i], ring[(i + 1) % ring.len()]);
        }

        for &x in vertical {
            for z in 1..h - 2 {
                self.connect_coords(GridCoord::new(x, z), GridCoord::new(x, z + 1));
            }
            self.connect_coords(GridCoord::new(x, 1), GridCoord::new(x, 0));
            self.connect_coords(GridCoord::new(x, h - 2), GridCoord::new(x, h - 1));
        }

        for &z in horizontal {
            for x in 1..w - 2 {
                self.connect_coords(GridCoord::new(x, z), GridCoord::new(x + 1, z));
            }
            self.connect_coords(GridCoord::new(1, z), GridCoord::new(0, z));
            self.connect_coords(GridCoord::new(w - 2, z), GridCoord::new(w - 1, z));
        }
    }

    // ── Construction primitives ────────────────────────────────────────

    /// Add a tile at `coord`. Returns the new id, or `None` if the
    /// coordinate is already occupied (the index is append-only).
    pub fn add_tile_at(&mut self, coord: GridCoord) -> Option<TileId> {
        if self.by_coord.contains_key(&coord) {
            return None;
        }
        let id = TileId(self.next_id);
        self.next_id += 1;
        self.tiles.insert(id, Tile::new(id, coord));
        self.by_coord.insert(coord, id);
        Some(id)
    }

    /// Symmetric adjacency between two existing tiles. Soft no-op when
    /// either id is unknown.
    pub fn connect(&mut self, a: TileId, b: TileId) {
        if a == b || !self.tiles.contains_key(&a) || !self.tiles.contains_key(&b) {
            return;
        }
        if let Some(tile) = self.tiles.get_mut(&a) {
            tile.add_neighbor(b);
        }
        if let Some(tile) = self.tiles.get_mut(&b) {
            tile.add_neighbor(a);
        }
    }

    pub fn connect_coords(&mut self, a: GridCoord, b: GridCoord) {
        if let (Some(ta), Some(tb)) = (self.id_at(a), self.id_at(b)) {
            self.connect(ta, tb);
        }
    }

    // ── Lookup ─────────────────────────────────────────────────────────

    /// Absence is a normal outcome at grid boundaries, not an error.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    pub fn tile_at(&self, coord: GridCoord) -> Option<&Tile> {
        self.by_coord.get(&coord).and_then(|id| self.tiles.get(id))
    }

    pub fn id_at(&self, coord: GridCoord) -> Option<TileId> {
        self.by_coord.get(&coord).copied()
    }

    pub fn all_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The tile currently carrying the collectible, if any.
    pub fn resource_tile(&self) -> Option<TileId> {
        self.tiles.values().find(|t| t.resource).map(|t| t.id)
    }

    // ── Resources ──────────────────────────────────────────────────────

    /// Attach a collectible to a uniformly random tile that carries no
    /// resource and is not occupied by any mobile entity. Candidates are
    /// ordered by id so the pick is reproducible per seed.
    pub fn spawn_resource(
        &mut self,
        rng: &mut impl Rng,
        occupied: &HashSet<TileId>,
    ) -> Option<TileId> {
        let mut candidates: Vec<TileId> = self
            .tiles
            .values()
            .filter(|t| !t.resource && !occupied.contains(&t.id))
            .map(|t| t.id)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        candidates.sort_unstable();
        let id = candidates[rng.gen_range(0..candidates.len())];
        if let Some(tile) = self.tiles.get_mut(&id) {
            tile.resource = true;
        }
        Some(id)
    }

    // ── Integrity ──────────────────────────────────────────────────────

    /// Pre-match check: every neighbor id resolves to a tile and the whole
    /// graph is one component. Generation upholds both, but a broken board
    /// must never reach play.
    pub fn validate(&self) -> Result<(), EngineError> {
        for tile in self.tiles.values() {
            for &nid in &tile.neighbors {
                if !self.tiles.contains_key(&nid) {
                    return Err(EngineError::MissingTile(nid));
                }
            }
        }

        let total = self.tiles.len();
        if total == 0 {
            return Err(EngineError::DisconnectedGrid { reached: 0, total });
        }
        let start = self
            .tiles
            .keys()
            .copied()
            .min()
            .ok_or(EngineError::DisconnectedGrid { reached: 0, total })?;
        let mut visited: HashSet<TileId> = HashSet::from([start]);
        let mut queue: VecDeque<TileId> = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if let Some(tile) = self.tiles.get(&current) {
                for &nid in &tile.neighbors {
                    if visited.insert(nid) {
                        queue.push_back(nid);
                    }
                }
            }
        }
        if visited.len() != total {
            return Err(EngineError::DisconnectedGrid {
                reached: visited.len(),
                total,
            });
        }
        Ok(())
    }
}

/// Pick a random interior column/row for a bridge. Candidates exclude the
/// two lines nearest either edge and anything within `min_gap` of an
/// already accepted same-orientation bridge.
fn choose_line(extent: i32, existing: &[i32], min_gap: i32, rng: &mut impl Rng) -> Option<i32> {
    let candidates: Vec<i32> = (1..extent - 1)
        .filter(|&i| i != 1 && i != extent - 2)
        .filter(|&i| existing.iter().all(|&line| (line - i).abs() > min_gap))
        .collect();
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.gen_range(0..candidates.len())])
    }
}
