pub mod arena;
pub mod blackboard;
pub mod config;
pub mod ghost;
pub mod rng;
pub mod sim;
pub mod spatial;
pub mod types;

#[cfg(test)]
mod test_support;

pub use arena::{Arena, ArenaError, Spawns};
pub use blackboard::{Blackboard, SightingRecord};
pub use config::{ConfigError, DifficultyProfile, DifficultyTable};
pub use ghost::{Ghost, MoveHistory, PatrolRoute};
pub use rng::DecisionRng;
pub use sim::Simulation;
pub use spatial::SpatialQuery;
pub use types::*;
