// ═══════════════════════════════════════════════════════════════════════
// Match Runner — runs complete headless matches with seeded policies
// ═══════════════════════════════════════════════════════════════════════

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use tilechase_agents::{AmbushPolicy, ChaserPolicy, GreedyCollector, PlayerPolicy};
use tilechase_engine::game::{GameObserver, NullObserver};
use tilechase_engine::setup::{self, MatchConfig};
use tilechase_engine::types::{EngineError, MatchResult};

/// Configuration for a single headless match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimConfig {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    /// Safety limit so a drifting match cannot loop forever.
    pub max_turns: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            width: 10,
            height: 10,
            seed: 42,
            max_turns: 200,
        }
    }
}

/// Result of a completed match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub seed: u64,
    pub result: MatchResult,
    pub score: u32,
    pub turn_count: u32,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("player policy produced no selection on turn {turn}")]
    NoSelection { turn: u32 },
    #[error("match exceeded {max_turns} turns without finishing")]
    TurnLimit { max_turns: u32 },
}

/// Run a single match headlessly.
pub fn run_match(config: SimConfig) -> Result<MatchOutcome, SimError> {
    run_match_with(config, Box::new(NullObserver))
}

/// Run a single match, forwarding every event to the given observer.
///
/// All randomness derives from `config.seed`: the board layout, the dice,
/// the player policy, and both adversary policies each get their own
/// stream so the same config always replays the same match.
pub fn run_match_with(
    config: SimConfig,
    observer: Box<dyn GameObserver>,
) -> Result<MatchOutcome, SimError> {
    let match_config = MatchConfig {
        width: config.width,
        height: config.height,
        seed: config.seed,
    };
    let mut game = setup::create_match(match_config, observer)?;
    let [far_corner, near_corner] = setup::adversary_starts(game.grid(), match_config)?;

    game.register_adversary(
        Box::new(ChaserPolicy::new(config.seed.wrapping_add(1))),
        far_corner,
    )?;
    game.register_adversary(
        Box::new(AmbushPolicy::new(config.seed.wrapping_add(2))),
        near_corner,
    )?;

    let mut dice = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(3));
    let mut picker = GreedyCollector::new(config.seed.wrapping_add(4));

    for turn in 0..config.max_turns {
        if game.result().is_some() {
            break;
        }

        let roll = dice.gen_range(1..=6);
        debug!("turn {}: rolled {}", turn, roll);
        game.start_turn(roll);
        if game.result().is_some() {
            break;
        }

        let Some(tile) = picker.choose_tile(&game) else {
            return Err(SimError::NoSelection { turn });
        };
        game.select_tile(tile);

        // Drain the move queue: the player's move, then each adversary's.
        while game.move_in_flight() {
            game.complete_move();
        }
    }

    match game.result() {
        Some(result) => Ok(MatchOutcome {
            seed: config.seed,
            result,
            score: game.score(),
            turn_count: game.turn_count(),
        }),
        None => Err(SimError::TurnLimit {
            max_turns: config.max_turns,
        }),
    }
}

/// Aggregate results over a batch of matches.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub stalemates: u32,
    pub failures: u32,
    pub mean_score: f64,
    pub mean_turns: f64,
}

/// Run `games` matches in parallel, one seed per match starting at
/// `base.seed`.
pub fn run_batch(base: SimConfig, games: u32) -> BatchSummary {
    let outcomes: Vec<Result<MatchOutcome, SimError>> = (0..games)
        .into_par_iter()
        .map(|i| {
            run_match(SimConfig {
                seed: base.seed.wrapping_add(u64::from(i)),
                ..base
            })
        })
        .collect();

    let mut summary = BatchSummary {
        games,
        ..BatchSummary::default()
    };
    let mut score_sum = 0u64;
    let mut turn_sum = 0u64;
    let mut finished = 0u32;

    for outcome in outcomes {
        match outcome {
            Ok(o) => {
                finished += 1;
                score_sum += u64::from(o.score);
                turn_sum += u64::from(o.turn_count);
                match o.result {
                    MatchResult::Win => summary.wins += 1,
                    MatchResult::Lose => summary.losses += 1,
                    MatchResult::Stalemate => summary.stalemates += 1,
                }
            }
            Err(e) => {
                warn!("match failed: {}", e);
                summary.failures += 1;
            }
        }
    }

    if finished > 0 {
        summary.mean_score = score_sum as f64 / f64::from(finished);
        summary.mean_turns = turn_sum as f64 / f64::from(finished);
    }
    summary
}
