// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for playing matches and running batches
// ═══════════════════════════════════════════════════════════════════════

use clap::{Parser, Subcommand};
use tilechase_engine::game::{GameObserver, Mover};
use tilechase_engine::types::{MatchResult, TileId};
use tilechase_sim::{run_batch, run_match_with, SimConfig};

#[derive(Parser)]
#[command(name = "tilechase", about = "Dice-driven tile chase simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single seeded match and narrate every turn
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 10)]
        width: u32,
        #[arg(long, default_value_t = 10)]
        height: u32,
        #[arg(long, default_value_t = 200)]
        max_turns: u32,
    },
    /// Run a batch of matches and print aggregate results
    Batch {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 10)]
        width: u32,
        #[arg(long, default_value_t = 10)]
        height: u32,
        #[arg(long, default_value_t = 200)]
        max_turns: u32,
        /// Emit the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            seed,
            width,
            height,
            max_turns,
        } => cmd_play(SimConfig {
            width,
            height,
            seed,
            max_turns,
        }),
        Commands::Batch {
            games,
            seed,
            width,
            height,
            max_turns,
            json,
        } => cmd_batch(
            SimConfig {
                width,
                height,
                seed,
                max_turns,
            },
            games,
            json,
        ),
    }
}

/// Observer that prints every match event to stdout.
struct Narrator;

impl GameObserver for Narrator {
    fn reachable_tiles_changed(&mut self, tiles: &[TileId]) {
        if !tiles.is_empty() {
            println!("  {} tiles reachable", tiles.len());
        }
    }

    fn move_started(&mut self, mover: Mover, path: &[TileId]) {
        let who = match mover {
            Mover::Player => "player".to_string(),
            Mover::Adversary(i) => format!("adversary {}", i),
        };
        let route: Vec<String> = path.iter().map(TileId::to_string).collect();
        println!("  {} moves {}", who, route.join(" > "));
    }

    fn score_increased(&mut self, score: u32) {
        println!("  collected! score is now {}", score);
    }

    fn turn_complete(&mut self, turn_count: u32) {
        println!("turn {} complete", turn_count);
    }

    fn game_over(&mut self, result: MatchResult, score: u32, turn_count: u32) {
        println!();
        println!(
            "game over: {} (score {}, {} turns)",
            result, score, turn_count
        );
    }
}

fn cmd_play(config: SimConfig) {
    println!("=== Tile Chase ===\n");
    println!(
        "Single match: seed={}, board={}x{}\n",
        config.seed, config.width, config.height
    );

    match run_match_with(config, Box::new(Narrator)) {
        Ok(outcome) => {
            println!(
                "Finished: {} after {} turns, score {}",
                outcome.result, outcome.turn_count, outcome.score
            );
        }
        Err(e) => eprintln!("Match error: {}", e),
    }
}

fn cmd_batch(config: SimConfig, games: u32, json: bool) {
    let summary = run_batch(config, games);

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Serialization error: {}", e),
        }
        return;
    }

    println!(
        "=== Batch: {} games, board={}x{}, seeds from {} ===\n",
        games, config.width, config.height, config.seed
    );
    println!("  wins:       {}", summary.wins);
    println!("  losses:     {}", summary.losses);
    println!("  stalemates: {}", summary.stalemates);
    if summary.failures > 0 {
        println!("  failures:   {}", summary.failures);
    }
    println!();
    println!("  mean score: {:.2}", summary.mean_score);
    println!("  mean turns: {:.2}", summary.mean_turns);
}
