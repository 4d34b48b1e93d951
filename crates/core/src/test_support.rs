//! Shared test fixtures for the engine's unit test suites.
//! This module exists to avoid repeating arena and ghost setup across many tests.
//! It does not own production decision logic.

use crate::arena::Arena;
use crate::config::{DifficultyProfile, DifficultyTable};
use crate::ghost::Ghost;
use crate::rng::DecisionRng;
use crate::types::{GhostId, Pos, Tier};

const FIXTURE_SEED: u64 = 0xC0FFEE;

/// Parses `rows` and places every `G` as ghost 1, 2, ... in row-major order.
pub(crate) fn arena_from(rows: &[&str]) -> (Arena, Vec<Pos>) {
    let (mut arena, spawns) = Arena::from_rows(rows).expect("fixture layout should parse");
    for (index, pos) in spawns.ghosts.iter().enumerate() {
        arena.place_ghost(GhostId(index as u32 + 1), *pos).expect("fixture spawn should be free");
    }
    (arena, spawns.ghosts)
}

pub(crate) fn ghost_at(id: u32, tier: Tier, pos: Pos) -> Ghost {
    ghost_with_seed(id, tier, pos, FIXTURE_SEED)
}

pub(crate) fn ghost_with_seed(id: u32, tier: Tier, pos: Pos, seed: u64) -> Ghost {
    let id = GhostId(id);
    Ghost::new(id, tier, pos, DecisionRng::for_ghost(seed, id))
}

/// Default tiers, except hard ghosts always win the cooperation roll.
pub(crate) fn always_cooperate_table() -> DifficultyTable {
    let defaults = DifficultyTable::default();
    let hard = DifficultyProfile { cooperation_chance: 1.0, ..defaults.profile(Tier::Hard).clone() };
    DifficultyTable::new(
        defaults.profile(Tier::Easy).clone(),
        defaults.profile(Tier::Medium).clone(),
        hard,
    )
    .expect("cooperation chance of 1.0 is valid")
}
