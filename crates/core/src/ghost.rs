//! Per-ghost decision state and the tick pipeline that drives it.
//! This file owns the state types; selection, planning, cycle detection and
//! movement bookkeeping live in focused submodules.

use std::collections::VecDeque;

use crate::blackboard::{Blackboard, SightingRecord};
use crate::config::DifficultyProfile;
use crate::rng::DecisionRng;
use crate::spatial::{self, SpatialQuery, TargetSighting};
use crate::types::*;

mod cycle_guard;
mod planner;
mod selector;
mod tick;

pub use cycle_guard::is_cycling;

pub const MOVE_HISTORY_CAPACITY: usize = 8;
pub const PATROL_ROUTE_MIN_LEN: usize = 3;
pub const PATROL_ROUTE_MAX_LEN: usize = 6;
/// Consecutive blocked patrol steps before the route is thrown away.
pub const PATROL_STUCK_LIMIT: u32 = 3;

/// Sliding window over the most recent moves, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: VecDeque<Direction>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self { moves: VecDeque::with_capacity(MOVE_HISTORY_CAPACITY) }
    }

    pub fn push(&mut self, direction: Direction) {
        if self.moves.len() == MOVE_HISTORY_CAPACITY {
            self.moves.pop_front();
        }
        self.moves.push_back(direction);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.moves.len() == MOVE_HISTORY_CAPACITY
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.moves.contains(&direction)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Direction> + ExactSizeIterator + '_ {
        self.moves.iter().copied()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

impl FromIterator<Direction> for MoveHistory {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut history = Self::new();
        for direction in iter {
            history.push(direction);
        }
        history
    }
}

/// A short loop of directions a patrolling ghost walks over and over.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatrolRoute {
    steps: Vec<Direction>,
    index: usize,
    stuck: u32,
}

impl PatrolRoute {
    pub fn generate(rng: &mut DecisionRng) -> Self {
        let mut route = Self::default();
        route.regenerate(rng);
        route
    }

    /// Fixed route, e.g. a host-scripted beat.
    pub fn from_steps(steps: Vec<Direction>) -> Self {
        Self { steps, index: 0, stuck: 0 }
    }

    pub fn regenerate(&mut self, rng: &mut DecisionRng) {
        let len = rng.range_inclusive(PATROL_ROUTE_MIN_LEN, PATROL_ROUTE_MAX_LEN);
        self.steps.clear();
        for _ in 0..len {
            self.steps.push(Direction::ALL[rng.below(Direction::ALL.len())]);
        }
        self.index = 0;
        self.stuck = 0;
    }

    pub fn steps(&self) -> &[Direction] {
        &self.steps
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn stuck(&self) -> u32 {
        self.stuck
    }

    fn scheduled(&self) -> Option<Direction> {
        self.steps.get(self.index).copied()
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % self.steps.len();
        self.stuck = 0;
    }
}

#[derive(Clone, Debug)]
pub struct Ghost {
    id: GhostId,
    tier: Tier,
    pos: Pos,
    behavior: Behavior,
    previous_direction: Option<Direction>,
    hunt_cooldown: u32,
    blocking_remaining: u32,
    patrol: PatrolRoute,
    last_known_target: Option<SightingRecord>,
    recent_moves: MoveHistory,
    idle_count: u32,
    last_pos: Option<Pos>,
    rng: DecisionRng,
}

impl Ghost {
    pub fn new(id: GhostId, tier: Tier, pos: Pos, mut rng: DecisionRng) -> Self {
        let patrol = PatrolRoute::generate(&mut rng);
        Self {
            id,
            tier,
            pos,
            behavior: Behavior::Random,
            previous_direction: None,
            hunt_cooldown: 0,
            blocking_remaining: 0,
            patrol,
            last_known_target: None,
            recent_moves: MoveHistory::new(),
            idle_count: 0,
            last_pos: None,
            rng,
        }
    }

    pub fn id(&self) -> GhostId {
        self.id
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn previous_direction(&self) -> Option<Direction> {
        self.previous_direction
    }

    pub fn hunt_cooldown(&self) -> u32 {
        self.hunt_cooldown
    }

    pub fn blocking_remaining(&self) -> u32 {
        self.blocking_remaining
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking_remaining > 0
    }

    pub fn patrol_route(&self) -> &PatrolRoute {
        &self.patrol
    }

    pub fn last_known_target(&self) -> Option<&SightingRecord> {
        self.last_known_target.as_ref()
    }

    pub fn recent_moves(&self) -> &MoveHistory {
        &self.recent_moves
    }

    pub fn idle_count(&self) -> u32 {
        self.idle_count
    }

    pub fn is_cycling(&self) -> bool {
        is_cycling(&self.recent_moves)
    }

    fn switch_behavior(&mut self, next: Behavior) {
        if self.behavior != next {
            tracing::debug!(ghost = %self.id, from = ?self.behavior, to = ?next, "behavior changed");
            self.behavior = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_evicts_oldest_past_capacity() {
        let mut history = MoveHistory::new();
        history.push(Direction::Left);
        for _ in 0..MOVE_HISTORY_CAPACITY {
            history.push(Direction::Up);
        }
        assert_eq!(history.len(), MOVE_HISTORY_CAPACITY);
        assert!(history.is_full());
        assert!(!history.contains(Direction::Left), "oldest entry should be evicted");
    }

    #[test]
    fn generated_routes_have_three_to_six_steps() {
        let mut rng = DecisionRng::seed_from_u64(2024);
        for _ in 0..100 {
            let route = PatrolRoute::generate(&mut rng);
            assert!((PATROL_ROUTE_MIN_LEN..=PATROL_ROUTE_MAX_LEN).contains(&route.steps().len()));
            assert_eq!(route.index(), 0);
            assert_eq!(route.stuck(), 0);
        }
    }

    #[test]
    fn new_ghost_starts_random_with_idle_timers() {
        let ghost = Ghost::new(GhostId(1), Tier::Hard, Pos { y: 1, x: 1 }, DecisionRng::seed_from_u64(5));
        assert_eq!(ghost.behavior(), Behavior::Random);
        assert_eq!(ghost.hunt_cooldown(), 0);
        assert!(!ghost.is_blocking());
        assert!(ghost.recent_moves().is_empty());
        assert!(!ghost.patrol_route().steps().is_empty());
    }
}
