//! One full decision tick for a single ghost: select, plan, move, then settle timers.

use super::*;

/// Ticks spent on the same cell before the ghost gives up on its current plan.
pub const IDLE_RESET_LIMIT: u32 = 5;

impl Ghost {
    /// Runs one decision tick against `world` and returns what happened.
    ///
    /// The ghost updates its own position; the host is expected to mirror a
    /// `MoveOutcome::Moved` into its grid and to end the round on `Captured`.
    pub fn tick<Q: SpatialQuery + ?Sized>(
        &mut self,
        profile: &DifficultyProfile,
        world: &Q,
        blackboard: &mut Blackboard,
    ) -> TickReport {
        let (trigger, sighting) = self.select_behavior(profile, world, blackboard);
        let behavior = self.behavior;
        let direction = self.plan_direction(world, sighting);
        if direction.is_some() {
            self.previous_direction = direction;
        }
        tracing::trace!(ghost = %self.id, ?behavior, ?direction, "direction chosen");

        let outcome = match direction {
            Some(direction) => self.execute_move(world, direction),
            None => MoveOutcome::Stayed,
        };
        let reset = self.settle();

        TickReport { ghost: self.id, trigger, behavior, direction, outcome, reset }
    }

    fn execute_move<Q: SpatialQuery + ?Sized>(&mut self, world: &Q, direction: Direction) -> MoveOutcome {
        let to = self.pos.step(direction, 1);
        match world.entity_at(self.pos, direction, 1) {
            Some(EntityKind::Target) => MoveOutcome::Captured { target: to },
            Some(kind) if !kind.obstructs() && to != self.pos => {
                let from = self.pos;
                self.pos = to;
                self.recent_moves.push(direction);
                MoveOutcome::Moved { from, to }
            }
            _ => MoveOutcome::Stayed,
        }
    }

    /// Timer decay, idle tracking and the oscillation check.
    fn settle(&mut self) -> Option<ResetCause> {
        self.hunt_cooldown = self.hunt_cooldown.saturating_sub(1);
        self.blocking_remaining = self.blocking_remaining.saturating_sub(1);

        if self.last_pos == Some(self.pos) {
            self.idle_count += 1;
        } else {
            self.idle_count = 0;
        }
        self.last_pos = Some(self.pos);

        let cause = if self.idle_count > IDLE_RESET_LIMIT {
            ResetCause::Idle
        } else if self.is_cycling() {
            ResetCause::Cycle
        } else {
            return None;
        };
        self.reset_behavior(cause);
        Some(cause)
    }
}
