// ═══════════════════════════════════════════════════════════════════════
// Pathfinder — BFS queries over the tile grid
//
// All three operations are pure: they take the blocking set fresh from
// the caller on every call and cache nothing. Paths never include the
// start tile. Tie-breaking between equal-length paths follows neighbor
// insertion order and is not significant to gameplay.
// ═══════════════════════════════════════════════════════════════════════

use crate::grid::TileGrid;
use crate::types::TileId;
use std::collections::{HashMap, HashSet, VecDeque};

/// Blocking parameters shared by every pathfinding query.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathOpts<'a> {
    /// Tiles that may not be entered mid-path (occupied by other mobile
    /// entities).
    pub blocked: Option<&'a HashSet<TileId>>,
    /// Permit the destination itself to be blocked — an adjacency check
    /// doubling as a capture test.
    pub allow_end_on_blocked: bool,
}

impl PathOpts<'_> {
    fn is_blocked(&self, id: TileId) -> bool {
        self.blocked.map_or(false, |b| b.contains(&id))
    }
}

/// Shortest path from `start` to `end`, excluding `start`. Empty when the
/// destination is unreachable or equals the start.
pub fn shortest_path(grid: &TileGrid, start: TileId, end: TileId, opts: PathOpts) -> Vec<TileId> {
    if start == end {
        return Vec::new();
    }

    let mut came_from: HashMap<TileId, Option<TileId>> = HashMap::from([(start, None)]);
    let mut queue: VecDeque<TileId> = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if current == end {
            break;
        }
        let Some(tile) = grid.tile(current) else {
            continue;
        };
        for &nid in &tile.neighbors {
            if grid.tile(nid).is_none() || came_from.contains_key(&nid) {
                continue;
            }
            if opts.is_blocked(nid) && !(opts.allow_end_on_blocked && nid == end) {
                continue;
            }
            came_from.insert(nid, Some(current));
            queue.push_back(nid);
        }
    }

    if !came_from.contains_key(&end) {
        return Vec::new();
    }

    let mut path: Vec<TileId> = Vec::new();
    let mut cur = end;
    while cur != start {
        path.push(cur);
        match came_from.get(&cur) {
            Some(&Some(prev)) => cur = prev,
            // Broken predecessor chain: treat as unreachable.
            _ => return Vec::new(),
        }
    }
    path.reverse();
    path
}

/// Tiles reachable from `start` by a simple path of exactly `max_steps`
/// edges — a roll of N moves the token exactly N tiles, never fewer.
///
/// Each queued item carries its own visited-path instead of sharing one
/// global visited set, so routes through cycles are counted correctly.
/// The start tile is never part of the result; blocked tiles are never
/// entered mid-path and qualify as endpoints only under
/// `allow_end_on_blocked`.
pub fn reachable_within(
    grid: &TileGrid,
    start: TileId,
    max_steps: u32,
    opts: PathOpts,
) -> Vec<TileId> {
    let mut result: Vec<TileId> = Vec::new();
    if max_steps == 0 {
        return result;
    }

    let mut in_result: HashSet<TileId> = HashSet::new();
    let mut queue: VecDeque<(TileId, u32, Vec<TileId>)> = VecDeque::new();
    queue.push_back((start, 0, vec![start]));

    while let Some((current, steps, path)) = queue.pop_front() {
        if steps == max_steps {
            if current != start
                && !(opts.is_blocked(current) && !opts.allow_end_on_blocked)
                && in_result.insert(current)
            {
                result.push(current);
            }
            continue;
        }
        let Some(tile) = grid.tile(current) else {
            continue;
        };
        for &nid in &tile.neighbors {
            if grid.tile(nid).is_none() || path.contains(&nid) {
                continue;
            }
            if opts.is_blocked(nid) && !(opts.allow_end_on_blocked && steps + 1 == max_steps) {
                continue;
            }
            let mut next_path = path.clone();
            next_path.push(nid);
            queue.push_back((nid, steps + 1, next_path));
        }
    }
    result
}

/// A simple path of precisely `steps` edges from `start` to `end`, or
/// empty. Can fail even when a shorter or longer path exists; callers
/// fall back to [`shortest_path`] or a random legal move.
pub fn exact_steps_path(
    grid: &TileGrid,
    start: TileId,
    end: TileId,
    steps: u32,
    opts: PathOpts,
) -> Vec<TileId> {
    if steps == 0 {
        return Vec::new();
    }
    let mut path: Vec<TileId> = Vec::with_capacity(steps as usize);
    if search_exact(grid, start, start, end, steps, opts, &mut path) {
        path
    } else {
        Vec::new()
    }
}

fn search_exact(
    grid: &TileGrid,
    start: TileId,
    current: TileId,
    end: TileId,
    remaining: u32,
    opts: PathOpts,
    path: &mut Vec<TileId>,
) -> bool {
    if remaining == 0 {
        return current == end;
    }
    let Some(tile) = grid.tile(current) else {
        return false;
    };
    for &nid in &tile.neighbors {
        if nid == start || path.contains(&nid) || grid.tile(nid).is_none() {
            continue;
        }
        // A simple path cannot pass through the destination and return.
        if nid == end && remaining > 1 {
            continue;
        }
        let entering_end = nid == end && remaining == 1;
        if opts.is_blocked(nid) && !(opts.allow_end_on_blocked && entering_end) {
            continue;
        }
        path.push(nid);
        if search_exact(grid, start, nid, end, remaining - 1, opts, path) {
            return true;
        }
        path.pop();
    }
    false
}
