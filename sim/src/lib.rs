// ═══════════════════════════════════════════════════════════════════════
// tilechase-sim — headless match driver and parallel batch runner
// ═══════════════════════════════════════════════════════════════════════

pub mod runner;

pub use runner::{
    run_batch, run_match, run_match_with, BatchSummary, MatchOutcome, SimConfig, SimError,
};
