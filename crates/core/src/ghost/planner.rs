//! Direction planning for each behavior, sharing one anti-reversal/anti-repeat filter.

use super::*;

/// How many cells ahead a blocking ghost weighs when ranking escape lanes.
pub(super) const BLOCK_LOOKAHEAD: u32 = 3;
/// Near the end of a blocking window the ghost stops ranking lanes and just commits.
pub(super) const BLOCK_COMMIT_TICKS: u32 = 2;

impl Ghost {
    pub(super) fn plan_direction<Q: SpatialQuery + ?Sized>(
        &mut self,
        world: &Q,
        sighting: Option<TargetSighting>,
    ) -> Option<Direction> {
        match self.behavior {
            Behavior::Hunt => self.plan_hunt(world, sighting),
            Behavior::Block => self.plan_block(world),
            Behavior::Patrol => self.plan_patrol(world),
            Behavior::Random => self.plan_explore(world),
        }
    }

    fn plan_hunt<Q: SpatialQuery + ?Sized>(
        &mut self,
        world: &Q,
        sighting: Option<TargetSighting>,
    ) -> Option<Direction> {
        if let Some(seen) = sighting {
            return Some(seen.direction);
        }
        if let Some(record) = self.last_known_target
            && let Some(direction) = self.direction_toward(world, record.target)
        {
            return Some(direction);
        }
        self.plan_explore(world)
    }

    fn plan_block<Q: SpatialQuery + ?Sized>(&mut self, world: &Q) -> Option<Direction> {
        let candidates = self.filtered_candidates(world);
        if self.blocking_remaining <= BLOCK_COMMIT_TICKS {
            return self.rng.pick(&candidates);
        }

        let mut best: Option<(Direction, u32)> = None;
        for direction in candidates {
            let score = spatial::open_run_length(world, self.pos, direction, BLOCK_LOOKAHEAD);
            if score > best.map_or(0, |(_, best_score)| best_score) {
                best = Some((direction, score));
            }
        }
        match best {
            Some((direction, _)) => Some(direction),
            None => self.plan_explore(world),
        }
    }

    fn plan_patrol<Q: SpatialQuery + ?Sized>(&mut self, world: &Q) -> Option<Direction> {
        let Some(scheduled) = self.patrol.scheduled() else {
            self.patrol.regenerate(&mut self.rng);
            return self.plan_explore(world);
        };

        if spatial::is_walkable(world, self.pos, scheduled) {
            self.patrol.advance();
            return Some(scheduled);
        }

        self.patrol.stuck += 1;
        if self.patrol.stuck >= PATROL_STUCK_LIMIT {
            self.patrol.regenerate(&mut self.rng);
        }
        self.plan_explore(world)
    }

    /// Uniform pick among filtered walkable neighbors; `None` when boxed in.
    pub(super) fn plan_explore<Q: SpatialQuery + ?Sized>(&mut self, world: &Q) -> Option<Direction> {
        let candidates = self.filtered_candidates(world);
        self.rng.pick(&candidates)
    }

    /// Walkable neighbors minus the reverse of the last move (when there is a choice),
    /// minus recently used directions (when that still leaves something).
    fn filtered_candidates<Q: SpatialQuery + ?Sized>(&self, world: &Q) -> Vec<Direction> {
        let mut candidates = spatial::walkable_directions(world, self.pos);
        if candidates.len() > 1
            && let Some(previous) = self.previous_direction
        {
            candidates.retain(|&direction| direction != previous.opposite());
        }
        let fresh: Vec<Direction> = candidates
            .iter()
            .copied()
            .filter(|&direction| !self.recent_moves.contains(direction))
            .collect();
        if fresh.is_empty() { candidates } else { fresh }
    }

    /// Greedy step toward `goal` along the axis with the larger offset, else the other axis.
    fn direction_toward<Q: SpatialQuery + ?Sized>(&self, world: &Q, goal: Pos) -> Option<Direction> {
        let dx = goal.x - self.pos.x;
        let dy = goal.y - self.pos.y;
        let horizontal = match dx.signum() {
            1 => Some(Direction::Right),
            -1 => Some(Direction::Left),
            _ => None,
        };
        let vertical = match dy.signum() {
            1 => Some(Direction::Down),
            -1 => Some(Direction::Up),
            _ => None,
        };
        let (primary, secondary) =
            if dx.abs() > dy.abs() { (horizontal, vertical) } else { (vertical, horizontal) };

        [primary, secondary]
            .into_iter()
            .flatten()
            .find(|&direction| spatial::is_walkable(world, self.pos, direction))
    }
}
