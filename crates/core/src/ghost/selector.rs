//! Per-tick behavior choice: direct sight, relayed sightings, cooperation, then routine.

use super::*;

pub(super) const DIRECT_HUNT_COOLDOWN: u32 = 10;
pub(super) const RELAYED_HUNT_COOLDOWN: u32 = 5;
pub(super) const BLOCKING_TICKS: u32 = 5;
/// Ghosts idling this long stop volunteering to block.
pub(super) const COOPERATION_IDLE_LIMIT: u32 = 3;

impl Ghost {
    /// Applies the first matching selection rule and returns which one fired, if any,
    /// together with this tick's direct sighting so planning does not rescan.
    pub(super) fn select_behavior<Q: SpatialQuery + ?Sized>(
        &mut self,
        profile: &DifficultyProfile,
        world: &Q,
        blackboard: &mut Blackboard,
    ) -> (Option<Trigger>, Option<TargetSighting>) {
        let sighting = spatial::spot_target(world, self.pos, profile.target_vision_range);
        let can_hunt = profile.enables(Behavior::Hunt);

        if can_hunt && let Some(seen) = sighting {
            self.switch_behavior(Behavior::Hunt);
            self.hunt_cooldown = DIRECT_HUNT_COOLDOWN;
            blackboard.report(self.id, seen.pos, Some(seen.direction));
            tracing::debug!(ghost = %self.id, target = ?seen.pos, "sighting reported");
            return (Some(Trigger::DirectSighting), sighting);
        }

        if can_hunt && let Some(record) = blackboard.latest_for(self.id) {
            self.last_known_target = Some(record);
            self.switch_behavior(Behavior::Hunt);
            self.hunt_cooldown = RELAYED_HUNT_COOLDOWN;
            return (Some(Trigger::RelayedSighting), sighting);
        }

        if profile.enables(Behavior::Block)
            && self.rng.roll(profile.cooperation_chance)
            && self.idle_count < COOPERATION_IDLE_LIMIT
            && !self.is_cycling()
            && !world.peers_near(self.pos, profile.agent_vision_range, self.id).is_empty()
            && !self.is_blocking()
        {
            self.switch_behavior(Behavior::Block);
            self.blocking_remaining = BLOCKING_TICKS;
            return (Some(Trigger::Cooperation), sighting);
        }

        if self.hunt_cooldown == 0 && self.blocking_remaining == 0 {
            let routine =
                if profile.enables(Behavior::Patrol) { Behavior::Patrol } else { Behavior::Random };
            self.switch_behavior(routine);
            return (Some(Trigger::Routine), sighting);
        }

        (None, sighting)
    }
}
