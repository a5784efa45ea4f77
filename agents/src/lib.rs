pub mod ambusher;
pub mod chaser;
pub mod player;

pub use ambusher::AmbushPolicy;
pub use chaser::ChaserPolicy;
pub use player::{GreedyCollector, PlayerPolicy, RandomWalker};
