// ═══════════════════════════════════════════════════════════════════════
// Turn coordinator — the per-turn state machine
//
// Phases: Idle → AwaitingSelection → Resolving → AdversaryPhase → Idle,
// terminal once a result is set. The engine never animates anything:
// a selected move is published through the observer as "started" and
// stays in flight until the driving layer calls `complete_move()`. That
// is the only suspension point — while a move is in flight no new roll,
// selection, or adversary decision is accepted, which keeps the ordering
// guarantees (player fully resolves before any adversary; adversaries
// strictly sequential) explicit and testable.
//
// Input errors fall into two buckets:
//   • illegal input (selecting outside the reachable set, rolling
//     mid-turn) — expected view-layer races, logged at debug and ignored
//   • invariant violations (reachable set and path search disagreeing,
//     dangling tile ids) — logged at warn, current turn aborted to Idle
// ═══════════════════════════════════════════════════════════════════════

use crate::adversary::{AdversaryPolicy, AdversaryView};
use crate::grid::TileGrid;
use crate::pathfinding::{self, PathOpts};
use crate::types::{EngineError, MatchResult, MobileEntity, Phase, TileId};
use log::{debug, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// Collecting this many resources ends the match in a win.
pub const WIN_SCORE: u32 = 9;

/// Which entity a published move belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mover {
    Player,
    /// Index in registration order.
    Adversary(usize),
}

/// Callbacks the view layer hooks into. All methods default to no-ops so
/// observers implement only what they care about.
pub trait GameObserver {
    /// The AwaitingSelection reachable set changed (possibly to empty).
    fn reachable_tiles_changed(&mut self, _tiles: &[TileId]) {}
    /// A move was committed and should be animated; the driver must call
    /// [`Game::complete_move`] when the traversal finishes.
    fn move_started(&mut self, _mover: Mover, _path: &[TileId]) {}
    fn score_increased(&mut self, _score: u32) {}
    /// One full player-then-adversaries cycle finished; a new roll may be
    /// requested.
    fn turn_complete(&mut self, _turn_count: u32) {}
    /// Fired exactly once, terminal.
    fn game_over(&mut self, _result: MatchResult, _score: u32, _turn_count: u32) {}
}

/// Observer that ignores everything; used by headless drivers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

struct Adversary {
    entity: MobileEntity,
    policy: Box<dyn AdversaryPolicy>,
}

#[derive(Debug, Clone)]
struct MoveInFlight {
    mover: Mover,
    path: Vec<TileId>,
}

/// One match: the tile grid, the player, registered adversaries and all
/// per-turn state. Mutated exclusively through the entry points below;
/// becomes inert once a result is set.
pub struct Game {
    grid: TileGrid,
    player: MobileEntity,
    adversaries: Vec<Adversary>,
    phase: Phase,
    dice_value: Option<u32>,
    reachable: Vec<TileId>,
    score: u32,
    turn_count: u32,
    result: Option<MatchResult>,
    in_flight: Option<MoveInFlight>,
    adversary_cursor: usize,
    started: bool,
    rng: ChaCha8Rng,
    observer: Box<dyn GameObserver>,
}

impl Game {
    /// Validates the grid (a disconnected board must never reach play)
    /// and places the player.
    pub fn new(
        grid: TileGrid,
        player_start: TileId,
        seed: u64,
        observer: Box<dyn GameObserver>,
    ) -> Result<Self, EngineError> {
        grid.validate()?;
        if grid.tile(player_start).is_none() {
            return Err(EngineError::MissingTile(player_start));
        }
        Ok(Game {
            grid,
            player: MobileEntity::new(player_start),
            adversaries: Vec::new(),
            phase: Phase::Idle,
            dice_value: None,
            reachable: Vec::new(),
            score: 0,
            turn_count: 0,
            result: None,
            in_flight: None,
            adversary_cursor: 0,
            started: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
            observer,
        })
    }

    /// Register an adversary at `start`. Only allowed during setup,
    /// before the first roll.
    pub fn register_adversary(
        &mut self,
        policy: Box<dyn AdversaryPolicy>,
        start: TileId,
    ) -> Result<(), EngineError> {
        if self.started {
            return Err(EngineError::AdversariesLocked);
        }
        if self.grid.tile(start).is_none() {
            return Err(EngineError::MissingTile(start));
        }
        self.adversaries.push(Adversary {
            entity: MobileEntity::new(start),
            policy,
        });
        Ok(())
    }

    // ── Read accessors ─────────────────────────────────────────────────

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player_tile(&self) -> TileId {
        self.player.current_tile
    }

    pub fn adversary_tiles(&self) -> Vec<TileId> {
        self.adversaries
            .iter()
            .map(|a| a.entity.current_tile)
            .collect()
    }

    pub fn dice_value(&self) -> Option<u32> {
        self.dice_value
    }

    pub fn reachable_tiles(&self) -> &[TileId] {
        &self.reachable
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }

    /// True while a published move awaits [`Game::complete_move`].
    pub fn move_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    // ── Entry points ───────────────────────────────────────────────────

    /// Begin a turn with the rolled dice value. An empty reachable set
    /// means no legal move exists and the match ends in a stalemate
    /// before the player acts.
    pub fn start_turn(&mut self, dice: u32) {
        if self.result.is_some() {
            debug!("roll ignored: match is over");
            return;
        }
        if self.phase != Phase::Idle || self.in_flight.is_some() {
            debug!("roll ignored: a turn is already in progress");
            return;
        }
        if dice == 0 {
            debug!("roll ignored: dice value must be positive");
            return;
        }

        self.started = true;
        self.ensure_resource();

        let blocked = self.occupied_by_adversaries();
        let reachable = pathfinding::reachable_within(
            &self.grid,
            self.player.current_tile,
            dice,
            PathOpts {
                blocked: Some(&blocked),
                allow_end_on_blocked: false,
            },
        );

        if reachable.is_empty() {
            debug!("no legal move for dice {dice}: stalemate");
            self.finish(MatchResult::Stalemate);
            return;
        }

        for &id in &reachable {
            if let Some(tile) = self.grid.tile_mut(id) {
                tile.walkable = true;
            }
        }
        self.dice_value = Some(dice);
        self.reachable = reachable;
        self.phase = Phase::AwaitingSelection;
        self.observer.reachable_tiles_changed(&self.reachable);
    }

    /// Confirm the player's destination. Illegal selections are ignored;
    /// a legal one commits the move and publishes it for animation.
    pub fn select_tile(&mut self, tile: TileId) {
        if self.result.is_some() {
            debug!("selection ignored: match is over");
            return;
        }
        if self.phase != Phase::AwaitingSelection {
            debug!("selection ignored: no dice budget active");
            return;
        }
        if !self.reachable.contains(&tile) {
            debug!("selection ignored: tile {tile} is not reachable this turn");
            return;
        }

        let blocked = self.occupied_by_adversaries();
        let path = pathfinding::shortest_path(
            &self.grid,
            self.player.current_tile,
            tile,
            PathOpts {
                blocked: Some(&blocked),
                allow_end_on_blocked: false,
            },
        );
        if path.is_empty() {
            // Reachable set and path search disagreed; abandon the turn
            // without penalty rather than leave the match inconsistent.
            warn!("no path to reachable tile {tile}; abandoning turn");
            self.reset_turn_state();
            return;
        }

        self.phase = Phase::Resolving;
        self.observer.move_started(Mover::Player, &path);
        self.in_flight = Some(MoveInFlight {
            mover: Mover::Player,
            path,
        });
    }

    /// Resolve the move currently in flight. For the player: commit the
    /// position, collect a resource, check the win condition — strictly
    /// before any adversary acts — then run the adversary phase. For an
    /// adversary: commit its position and continue with the next one.
    pub fn complete_move(&mut self) {
        if self.result.is_some() {
            debug!("move completion ignored: match is over");
            return;
        }
        let Some(mv) = self.in_flight.take() else {
            debug!("move completion ignored: no move in flight");
            return;
        };
        let Some(&dest) = mv.path.last() else {
            warn!("empty in-flight path; aborting turn");
            self.reset_turn_state();
            return;
        };

        match mv.mover {
            Mover::Player => {
                self.player.current_tile = dest;
                self.collect_resource_at(dest);
                if self.score >= WIN_SCORE {
                    self.finish(MatchResult::Win);
                    return;
                }
                self.phase = Phase::AdversaryPhase;
                self.adversary_cursor = 0;
                self.run_adversaries();
            }
            Mover::Adversary(idx) => {
                if let Some(adv) = self.adversaries.get_mut(idx) {
                    adv.entity.current_tile = dest;
                }
                self.adversary_cursor = idx + 1;
                self.run_adversaries();
            }
        }
    }

    // ── Internals ──────────────────────────────────────────────────────

    /// Ask adversaries for their moves in registration order, pausing at
    /// each published move until it completes. After the last one: lose
    /// check, then the turn wraps up.
    fn run_adversaries(&mut self) {
        while self.adversary_cursor < self.adversaries.len() {
            let idx = self.adversary_cursor;
            let player_tile = self.player.current_tile;
            let resource_tile = self.grid.resource_tile();
            let others: HashSet<TileId> = self
                .adversaries
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != idx)
                .map(|(_, a)| a.entity.current_tile)
                .collect();

            let decision = {
                let adv = &mut self.adversaries[idx];
                let view = AdversaryView {
                    grid: &self.grid,
                    own_tile: adv.entity.current_tile,
                    player_tile,
                    resource_tile,
                    others: &others,
                };
                adv.policy.decide(&view)
            };

            match decision {
                Some(path) if path.is_empty() => {
                    debug!(
                        "adversary {} ({}) stays put",
                        idx, self.adversaries[idx].policy.name()
                    );
                    self.adversary_cursor += 1;
                }
                Some(path) => {
                    if path.iter().any(|&t| self.grid.tile(t).is_none()) {
                        warn!(
                            "adversary {} ({}) produced a path with unknown tiles; skipping",
                            idx,
                            self.adversaries[idx].policy.name()
                        );
                        self.adversary_cursor += 1;
                        continue;
                    }
                    self.observer.move_started(Mover::Adversary(idx), &path);
                    self.in_flight = Some(MoveInFlight {
                        mover: Mover::Adversary(idx),
                        path,
                    });
                    return;
                }
                None => {
                    debug!(
                        "adversary {} ({}) has no legal move this turn",
                        idx, self.adversaries[idx].policy.name()
                    );
                    self.adversary_cursor += 1;
                }
            }
        }

        if self
            .adversaries
            .iter()
            .any(|a| a.entity.current_tile == self.player.current_tile)
        {
            self.finish(MatchResult::Lose);
            return;
        }

        self.turn_count += 1;
        let turn = self.turn_count;
        self.reset_turn_state();
        self.observer.turn_complete(turn);
    }

    /// Spawn a collectible if none is on the board, avoiding every tile
    /// occupied by a mobile entity.
    fn ensure_resource(&mut self) {
        if self.grid.resource_tile().is_some() {
            return;
        }
        let mut occupied = self.occupied_by_adversaries();
        occupied.insert(self.player.current_tile);
        match self.grid.spawn_resource(&mut self.rng, &occupied) {
            Some(id) => debug!("resource spawned at tile {id}"),
            None => debug!("no free tile for a resource"),
        }
    }

    fn collect_resource_at(&mut self, dest: TileId) {
        let collected = match self.grid.tile_mut(dest) {
            Some(tile) if tile.resource => {
                tile.resource = false;
                true
            }
            _ => false,
        };
        if collected {
            self.score += 1;
            self.observer.score_increased(self.score);
        }
    }

    fn occupied_by_adversaries(&self) -> HashSet<TileId> {
        self.adversaries
            .iter()
            .map(|a| a.entity.current_tile)
            .collect()
    }

    /// Clear whole-turn-boundary state: dice budget, reachable set,
    /// walkable flags. Entity positions are untouched.
    fn reset_turn_state(&mut self) {
        for &id in &self.reachable {
            if let Some(tile) = self.grid.tile_mut(id) {
                tile.walkable = false;
            }
        }
        self.reachable.clear();
        self.dice_value = None;
        self.in_flight = None;
        self.adversary_cursor = 0;
        self.phase = Phase::Idle;
    }

    fn finish(&mut self, result: MatchResult) {
        if self.result.is_some() {
            return;
        }
        self.reset_turn_state();
        self.result = Some(result);
        self.observer.game_over(result, self.score, self.turn_count);
    }
}

#[cfg(test)]
impl Game {
    pub(crate) fn grid_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}
