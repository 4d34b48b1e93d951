//! Back-and-forth oscillation detection over the move history, and the reset it forces.

use super::*;

/// Earlier opposite pairs needed, on top of the most recent one, to call it a cycle.
const MIN_EARLIER_REVERSALS: usize = 2;

/// True when a full history ends on a reversal and holds at least two more reversals.
pub fn is_cycling(history: &MoveHistory) -> bool {
    if !history.is_full() {
        return false;
    }
    let moves: Vec<Direction> = history.iter().collect();
    let last = moves.len() - 1;
    if moves[last].opposite() != moves[last - 1] {
        return false;
    }
    let earlier = (1..last).filter(|&i| moves[i].opposite() == moves[i - 1]).count();
    earlier >= MIN_EARLIER_REVERSALS
}

impl Ghost {
    /// Drops every mode commitment and starts over from random exploration.
    pub(super) fn reset_behavior(&mut self, cause: ResetCause) {
        tracing::debug!(ghost = %self.id, ?cause, idle = self.idle_count, "behavior reset");
        self.switch_behavior(Behavior::Random);
        self.blocking_remaining = 0;
        self.hunt_cooldown = 0;
        self.last_known_target = None;
        self.idle_count = 0;
        self.recent_moves.clear();
        self.patrol.regenerate(&mut self.rng);
    }
}
