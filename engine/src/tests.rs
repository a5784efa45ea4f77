// ═══════════════════════════════════════════════════════════════════════
// Engine test suite — grid generation, pathfinding, turn state machine
// ═══════════════════════════════════════════════════════════════════════

use crate::adversary::{AdversaryPolicy, AdversaryView};
use crate::game::{Game, GameObserver, Mover, NullObserver, WIN_SCORE};
use crate::grid::TileGrid;
use crate::pathfinding::{exact_steps_path, reachable_within, shortest_path, PathOpts};
use crate::testing::{line_grid, ring_grid};
use crate::types::{EngineError, GridCoord, MatchResult, Phase, TileId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

// ── Helpers ────────────────────────────────────────────────────────────

fn gen_grid(width: u32, height: u32, seed: u64) -> TileGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    TileGrid::generate(width, height, &mut rng).expect("generation failed")
}

fn bfs_distances(grid: &TileGrid, start: TileId) -> HashMap<TileId, u32> {
    let mut dist: HashMap<TileId, u32> = HashMap::from([(start, 0)]);
    let mut queue: VecDeque<TileId> = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        let d = dist[&current];
        if let Some(tile) = grid.tile(current) {
            for &nid in &tile.neighbors {
                if !dist.contains_key(&nid) {
                    dist.insert(nid, d + 1);
                    queue.push_back(nid);
                }
            }
        }
    }
    dist
}

/// Observer that records every callback as a line.
#[derive(Clone, Default)]
struct Recorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl GameObserver for Recorder {
    fn reachable_tiles_changed(&mut self, tiles: &[TileId]) {
        self.events.borrow_mut().push(format!("reachable:{}", tiles.len()));
    }
    fn move_started(&mut self, mover: Mover, path: &[TileId]) {
        self.events
            .borrow_mut()
            .push(format!("move:{mover:?}:{}", path.len()));
    }
    fn score_increased(&mut self, score: u32) {
        self.events.borrow_mut().push(format!("score:{score}"));
    }
    fn turn_complete(&mut self, turn_count: u32) {
        self.events.borrow_mut().push(format!("turn:{turn_count}"));
    }
    fn game_over(&mut self, result: MatchResult, score: u32, turn_count: u32) {
        self.events
            .borrow_mut()
            .push(format!("over:{result}:{score}:{turn_count}"));
    }
}

/// Policy that always answers the same path and counts its invocations.
struct Scripted {
    plan: Option<Vec<TileId>>,
    calls: Rc<Cell<usize>>,
}

impl AdversaryPolicy for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }
    fn decide(&mut self, _view: &AdversaryView<'_>) -> Option<Vec<TileId>> {
        self.calls.set(self.calls.get() + 1);
        self.plan.clone()
    }
}

/// Drive every pending animation to completion, headless style.
fn settle(game: &mut Game) {
    while game.move_in_flight() {
        game.complete_move();
    }
}

// ── Grid generation ────────────────────────────────────────────────────

#[test]
fn generated_grids_are_connected_and_symmetric() {
    for &(w, h) in &[(5u32, 5u32), (7, 7), (10, 6), (12, 12)] {
        for seed in [1u64, 7, 42] {
            let grid = gen_grid(w, h, seed);
            assert!(grid.validate().is_ok(), "{w}x{h} seed {seed} invalid");
            for tile in grid.all_tiles() {
                assert!(!tile.neighbors.is_empty(), "isolated tile {}", tile.id);
                for &nid in &tile.neighbors {
                    let back = grid.tile(nid).expect("dangling neighbor id");
                    assert!(
                        back.neighbors.contains(&tile.id),
                        "asymmetric edge {} -> {}",
                        tile.id,
                        nid
                    );
                }
                // Both indexes must resolve to the same tile.
                assert_eq!(grid.id_at(tile.coord), Some(tile.id));
            }
            let dist = bfs_distances(&grid, grid.id_at(GridCoord::new(0, 0)).unwrap());
            assert_eq!(dist.len(), grid.len(), "{w}x{h} seed {seed} disconnected");
        }
    }
}

#[test]
fn bridge_lines_stay_off_the_edges_and_apart() {
    // A bridge fills every interior cell of its column/row, so the
    // accepted lines can be read back off the coordinate index. With two
    // bridges at most per orientation on this board size, no line fills
    // up by crossings alone.
    let (w, h) = (12i32, 12i32);
    for seed in 0..60u64 {
        let grid = gen_grid(w as u32, h as u32, seed);
        let vertical: Vec<i32> = (1..w - 1)
            .filter(|&x| (1..h - 1).all(|z| grid.id_at(GridCoord::new(x, z)).is_some()))
            .collect();
        let horizontal: Vec<i32> = (1..h - 1)
            .filter(|&z| (1..w - 1).all(|x| grid.id_at(GridCoord::new(x, z)).is_some()))
            .collect();

        for (lines, extent) in [(&vertical, w), (&horizontal, h)] {
            for &line in lines {
                assert_ne!(line, 1, "seed {seed}: bridge hugs an edge at {line}");
                assert_ne!(
                    line,
                    extent - 2,
                    "seed {seed}: bridge hugs an edge at {line}"
                );
            }
            // Filter order is ascending, so neighbors in the list are
            // the closest same-orientation pair.
            for pair in lines.windows(2) {
                assert!(
                    pair[1] - pair[0] > 1,
                    "seed {seed}: bridges too close: {pair:?}"
                );
            }
        }
    }
}

#[test]
fn generate_rejects_tiny_boards() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(matches!(
        TileGrid::generate(2, 8, &mut rng),
        Err(EngineError::GridTooSmall { .. })
    ));
    assert!(matches!(
        TileGrid::generate(8, 1, &mut rng),
        Err(EngineError::GridTooSmall { .. })
    ));
}

#[test]
fn spawn_resource_avoids_occupied_tiles() {
    let (mut grid, ids) = line_grid(3);
    let occupied: HashSet<TileId> = HashSet::from([ids[0], ids[1]]);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    assert_eq!(grid.spawn_resource(&mut rng, &occupied), Some(ids[2]));
    assert!(grid.tile(ids[2]).unwrap().resource);
    // Everything is now occupied or already carrying the collectible.
    assert_eq!(grid.spawn_resource(&mut rng, &occupied), None);
}

// ── Pathfinding ────────────────────────────────────────────────────────

#[test]
fn reachable_excludes_start_and_members_have_exact_paths() {
    let grid = gen_grid(7, 7, 3);
    let start = grid.id_at(GridCoord::new(0, 0)).unwrap();
    for steps in 1..=4u32 {
        let reachable = reachable_within(&grid, start, steps, PathOpts::default());
        assert!(!reachable.contains(&start));
        for &t in &reachable {
            let path = exact_steps_path(&grid, start, t, steps, PathOpts::default());
            assert_eq!(path.len() as u32, steps, "no exact-{steps} path to {t}");
        }
    }
}

#[test]
fn reachable_at_two_matches_bfs_distance_two() {
    // Ring-and-bridge boards are triangle-free, so the set of tiles with
    // a simple two-step path is exactly the distance-two set.
    for seed in [2u64, 11, 29] {
        let grid = gen_grid(7, 7, seed);
        let start = grid.id_at(GridCoord::new(0, 0)).unwrap();
        let got: HashSet<TileId> = reachable_within(&grid, start, 2, PathOpts::default())
            .into_iter()
            .collect();
        let expected: HashSet<TileId> = bfs_distances(&grid, start)
            .into_iter()
            .filter(|&(_, d)| d == 2)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(got, expected, "seed {seed}");
    }
}

#[test]
fn reachable_counts_routes_through_cycles() {
    // On a 4-cycle the two tiles adjacent to the start are reachable in
    // exactly three steps by going the long way round. A single global
    // visited set would report nothing at depth three.
    let (grid, ids) = ring_grid(4);
    let got: HashSet<TileId> = reachable_within(&grid, ids[0], 3, PathOpts::default())
        .into_iter()
        .collect();
    assert_eq!(got, HashSet::from([ids[1], ids[3]]));
}

#[test]
fn reachable_respects_blocking() {
    let (grid, ids) = ring_grid(6);
    let blocked = HashSet::from([ids[1]]);

    // The clockwise route is cut; only the counter-clockwise one remains.
    let strict = PathOpts {
        blocked: Some(&blocked),
        allow_end_on_blocked: false,
    };
    let got: HashSet<TileId> = reachable_within(&grid, ids[0], 2, strict)
        .into_iter()
        .collect();
    assert_eq!(got, HashSet::from([ids[4]]));

    // A blocked tile qualifies as an endpoint when the flag allows it.
    let capture = PathOpts {
        blocked: Some(&blocked),
        allow_end_on_blocked: true,
    };
    let got: HashSet<TileId> = reachable_within(&grid, ids[0], 1, capture)
        .into_iter()
        .collect();
    assert_eq!(got, HashSet::from([ids[1], ids[5]]));
}

#[test]
fn shortest_path_lengths_are_symmetric() {
    let grid = gen_grid(9, 9, 17);
    let a = grid.id_at(GridCoord::new(0, 0)).unwrap();
    let b = grid.id_at(GridCoord::new(8, 8)).unwrap();
    let forward = shortest_path(&grid, a, b, PathOpts::default());
    let back = shortest_path(&grid, b, a, PathOpts::default());
    assert!(!forward.is_empty());
    assert_eq!(forward.len(), back.len());
}

#[test]
fn shortest_path_respects_blocking() {
    let (grid, ids) = line_grid(3);
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    let mid_blocked = HashSet::from([b]);
    let opts = PathOpts {
        blocked: Some(&mid_blocked),
        allow_end_on_blocked: false,
    };
    assert!(shortest_path(&grid, a, c, opts).is_empty());

    let end_blocked = HashSet::from([c]);
    let strict = PathOpts {
        blocked: Some(&end_blocked),
        allow_end_on_blocked: false,
    };
    assert!(shortest_path(&grid, a, c, strict).is_empty());

    let capture = PathOpts {
        blocked: Some(&end_blocked),
        allow_end_on_blocked: true,
    };
    assert_eq!(shortest_path(&grid, a, c, capture), vec![b, c]);
}

#[test]
fn exact_steps_can_fail_where_a_shorter_path_exists() {
    let (grid, ids) = ring_grid(4);
    // Opposite corners of the square: distance two, but no simple
    // three-step route.
    assert!(exact_steps_path(&grid, ids[0], ids[2], 3, PathOpts::default()).is_empty());
    assert_eq!(
        exact_steps_path(&grid, ids[0], ids[2], 2, PathOpts::default()).len(),
        2
    );
}

#[test]
fn exact_steps_honors_end_on_blocked() {
    let (grid, ids) = line_grid(2);
    let blocked = HashSet::from([ids[1]]);
    let strict = PathOpts {
        blocked: Some(&blocked),
        allow_end_on_blocked: false,
    };
    assert!(exact_steps_path(&grid, ids[0], ids[1], 1, strict).is_empty());
    let capture = PathOpts {
        blocked: Some(&blocked),
        allow_end_on_blocked: true,
    };
    assert_eq!(exact_steps_path(&grid, ids[0], ids[1], 1, capture), vec![ids[1]]);
}

// ── Turn state machine ─────────────────────────────────────────────────

#[test]
fn stalemate_when_no_move_exists() {
    let (grid, ids) = line_grid(3);
    let recorder = Recorder::default();
    let mut game = Game::new(grid, ids[0], 1, Box::new(recorder.clone())).unwrap();
    let calls = Rc::new(Cell::new(0));
    game.register_adversary(
        Box::new(Scripted {
            plan: None,
            calls: calls.clone(),
        }),
        ids[1],
    )
    .unwrap();

    // The only neighbor is occupied: no legal move before the player acts.
    game.start_turn(1);
    assert_eq!(game.result(), Some(MatchResult::Stalemate));
    assert_eq!(calls.get(), 0);

    // Terminal state rejects all further input.
    let before = recorder.events().len();
    game.start_turn(3);
    game.select_tile(ids[1]);
    game.complete_move();
    assert_eq!(recorder.events().len(), before);
    assert!(recorder.events().iter().any(|e| e.starts_with("over:Stalemate")));
}

#[test]
fn resource_collection_scores_exactly_once() {
    let (grid, ids) = line_grid(5);
    let mut game = Game::new(grid, ids[0], 1, Box::new(NullObserver)).unwrap();
    game.grid_mut().tile_mut(ids[1]).unwrap().resource = true;
    game.grid_mut().tile_mut(ids[3]).unwrap().resource = true;

    game.start_turn(1);
    game.select_tile(ids[1]);
    settle(&mut game);
    assert_eq!(game.score(), 1);
    assert_eq!(game.turn_count(), 1);
    assert!(!game.grid().tile(ids[1]).unwrap().resource);

    // Walk off and back on: the collectible is gone for good.
    game.start_turn(1);
    game.select_tile(ids[0]);
    settle(&mut game);
    game.start_turn(1);
    game.select_tile(ids[1]);
    settle(&mut game);
    assert_eq!(game.score(), 1);
    assert!(game.grid().tile(ids[3]).unwrap().resource);
}

#[test]
fn win_is_checked_before_the_adversary_phase() {
    let (grid, ids) = line_grid(3);
    let recorder = Recorder::default();
    let mut game = Game::new(grid, ids[0], 1, Box::new(recorder.clone())).unwrap();
    let calls = Rc::new(Cell::new(0));
    game.register_adversary(
        Box::new(Scripted {
            plan: Some(vec![ids[1]]),
            calls: calls.clone(),
        }),
        ids[2],
    )
    .unwrap();
    game.grid_mut().tile_mut(ids[1]).unwrap().resource = true;
    game.set_score(WIN_SCORE - 1);

    game.start_turn(1);
    game.select_tile(ids[1]);
    settle(&mut game);

    assert_eq!(game.result(), Some(MatchResult::Win));
    // The adversary one move from capture never got to act.
    assert_eq!(calls.get(), 0);
    assert_eq!(game.adversary_tiles(), vec![ids[2]]);
    assert!(recorder
        .events()
        .iter()
        .any(|e| e.starts_with(&format!("over:Win:{WIN_SCORE}"))));
}

#[test]
fn capture_after_the_adversary_phase_loses_the_match() {
    let (grid, ids) = ring_grid(6);
    let recorder = Recorder::default();
    let mut game = Game::new(grid, ids[0], 1, Box::new(recorder.clone())).unwrap();
    // Will land on the player's destination.
    game.register_adversary(
        Box::new(Scripted {
            plan: Some(vec![ids[5]]),
            calls: Rc::new(Cell::new(0)),
        }),
        ids[4],
    )
    .unwrap();

    game.start_turn(1);
    assert_eq!(game.phase(), Phase::AwaitingSelection);
    game.select_tile(ids[5]);
    settle(&mut game);

    assert_eq!(game.result(), Some(MatchResult::Lose));
    assert_eq!(game.adversary_tiles(), vec![ids[5]]);
    assert_eq!(
        recorder
            .events()
            .iter()
            .filter(|e| e.starts_with("over:"))
            .count(),
        1
    );
}

#[test]
fn registration_is_locked_after_the_first_roll() {
    let (grid, ids) = line_grid(4);
    let mut game = Game::new(grid, ids[0], 1, Box::new(NullObserver)).unwrap();
    game.start_turn(1);
    let err = game.register_adversary(
        Box::new(Scripted {
            plan: None,
            calls: Rc::new(Cell::new(0)),
        }),
        ids[3],
    );
    assert_eq!(err, Err(EngineError::AdversariesLocked));
}

#[test]
fn in_flight_move_blocks_new_input() {
    let (grid, ids) = line_grid(4);
    let mut game = Game::new(grid, ids[0], 1, Box::new(NullObserver)).unwrap();
    game.start_turn(1);
    game.select_tile(ids[1]);
    assert!(game.move_in_flight());
    assert_eq!(game.phase(), Phase::Resolving);

    // Rolling or selecting mid-animation is an expected race: ignored.
    game.start_turn(4);
    game.select_tile(ids[2]);
    assert_eq!(game.dice_value(), Some(1));
    assert!(game.move_in_flight());

    settle(&mut game);
    assert_eq!(game.player_tile(), ids[1]);
    assert_eq!(game.phase(), Phase::Idle);
}

#[test]
fn illegal_selections_are_ignored() {
    let (grid, ids) = line_grid(5);
    let mut game = Game::new(grid, ids[0], 1, Box::new(NullObserver)).unwrap();

    // No dice budget yet.
    game.select_tile(ids[1]);
    assert_eq!(game.phase(), Phase::Idle);

    game.start_turn(2);
    // ids[1] is one step away, not two.
    game.select_tile(ids[1]);
    assert_eq!(game.phase(), Phase::AwaitingSelection);
    assert_eq!(game.player_tile(), ids[0]);

    game.select_tile(ids[2]);
    settle(&mut game);
    assert_eq!(game.player_tile(), ids[2]);
}

#[test]
fn walkable_flags_follow_the_dice_budget() {
    let (grid, ids) = line_grid(5);
    let mut game = Game::new(grid, ids[0], 1, Box::new(NullObserver)).unwrap();

    game.start_turn(2);
    assert!(game.grid().tile(ids[2]).unwrap().walkable);
    assert!(!game.grid().tile(ids[1]).unwrap().walkable);

    game.select_tile(ids[2]);
    settle(&mut game);
    assert!(game.grid().all_tiles().all(|t| !t.walkable));
}

#[test]
fn observer_sees_a_full_turn_in_order() {
    let (grid, ids) = line_grid(4);
    let recorder = Recorder::default();
    let mut game = Game::new(grid, ids[0], 1, Box::new(recorder.clone())).unwrap();
    game.grid_mut().tile_mut(ids[1]).unwrap().resource = true;

    game.start_turn(1);
    game.select_tile(ids[1]);
    settle(&mut game);

    assert_eq!(
        recorder.events(),
        vec![
            "reachable:1".to_string(),
            "move:Player:1".to_string(),
            "score:1".to_string(),
            "turn:1".to_string(),
        ]
    );
}

#[test]
fn a_resource_is_spawned_when_the_board_has_none() {
    let (grid, ids) = line_grid(4);
    let mut game = Game::new(grid, ids[0], 7, Box::new(NullObserver)).unwrap();
    assert!(game.grid().resource_tile().is_none());
    game.start_turn(1);
    let spawned = game.grid().resource_tile().expect("no resource spawned");
    assert_ne!(spawned, ids[0], "spawned under the player");
}
