//! Tick driver that owns the arena, the ghosts and the shared blackboard for one round.
//! This module exists to keep per-tick ordering and capture handling out of the ghost logic.
//! It does not move the target; hosts reposition it between ticks with `place_target`.
//! Spawn cells are remembered so a round can be restarted from scratch.

use std::collections::BTreeMap;
use std::hash::Hasher;

use slotmap::{SlotMap, new_key_type};
use xxhash_rust::xxh3::Xxh3;

use crate::arena::{Arena, ArenaError};
use crate::blackboard::Blackboard;
use crate::config::DifficultyTable;
use crate::ghost::Ghost;
use crate::rng::DecisionRng;
use crate::types::*;

new_key_type! {
    struct GhostKey;
}

/// Where and how a ghost entered the arena; a restarted round rebuilds it from this.
#[derive(Clone, Copy, Debug)]
struct GhostSpawn {
    key: GhostKey,
    id: GhostId,
    tier: Tier,
    pos: Pos,
}

pub struct Simulation {
    seed: u64,
    table: DifficultyTable,
    arena: Arena,
    ghosts: SlotMap<GhostKey, Ghost>,
    spawns: BTreeMap<GhostId, GhostSpawn>,
    target_spawn: Option<Pos>,
    blackboard: Blackboard,
    next_ghost_id: u32,
    outcome: Option<RoundOutcome>,
    log: Vec<LogEvent>,
}

impl Simulation {
    pub fn new(seed: u64, table: DifficultyTable, arena: Arena) -> Self {
        let target_spawn = arena.target();
        Self {
            seed,
            table,
            arena,
            ghosts: SlotMap::with_key(),
            spawns: BTreeMap::new(),
            target_spawn,
            blackboard: Blackboard::new(),
            next_ghost_id: 1,
            outcome: None,
            log: Vec::new(),
        }
    }

    /// Builds the arena from ASCII rows and spawns every `G` with the given tier.
    pub fn from_rows(
        seed: u64,
        table: DifficultyTable,
        tier: Tier,
        rows: &[&str],
    ) -> Result<Self, ArenaError> {
        let (arena, spawns) = Arena::from_rows(rows)?;
        let mut sim = Self::new(seed, table, arena);
        for pos in spawns.ghosts {
            sim.spawn_ghost(pos, tier)?;
        }
        Ok(sim)
    }

    pub fn spawn_ghost(&mut self, pos: Pos, tier: Tier) -> Result<GhostId, ArenaError> {
        let id = GhostId(self.next_ghost_id);
        self.arena.place_ghost(id, pos)?;
        self.next_ghost_id += 1;
        let key = self.ghosts.insert(Ghost::new(id, tier, pos, DecisionRng::for_ghost(self.seed, id)));
        self.spawns.insert(id, GhostSpawn { key, id, tier, pos });
        tracing::debug!(ghost = %id, %tier, ?pos, "ghost spawned");
        Ok(id)
    }

    pub fn place_target(&mut self, pos: Pos) -> Result<(), ArenaError> {
        self.arena.place_target(pos)
    }

    /// Runs one tick for every ghost. Returns nothing once the round is over.
    pub fn step(&mut self) -> Vec<TickReport> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        self.blackboard.advance_tick();

        let mut order: Vec<(Pos, GhostId, GhostKey)> =
            self.ghosts.iter().map(|(key, ghost)| (ghost.pos(), ghost.id(), key)).collect();
        order.sort_unstable_by_key(|&(pos, id, _)| (pos.y, pos.x, id));

        let mut reports = Vec::with_capacity(order.len());
        for (_, _, key) in order {
            let ghost = &mut self.ghosts[key];
            let before = ghost.behavior();
            let profile = self.table.profile(ghost.tier());
            let report = ghost.tick(profile, &self.arena, &mut self.blackboard);
            self.record_events(before, &report);

            match report.outcome {
                MoveOutcome::Moved { from, to } => {
                    let relocated = self.arena.relocate_ghost(from, to);
                    debug_assert!(relocated.is_ok(), "arena out of sync with {}: {relocated:?}", report.ghost);
                    if let Err(error) = relocated {
                        tracing::error!(ghost = %report.ghost, %error, "arena rejected ghost move");
                    }
                }
                MoveOutcome::Captured { target } => {
                    tracing::info!(ghost = %report.ghost, ?target, tick = self.blackboard.tick(), "target caught");
                    self.outcome = Some(RoundOutcome::Caught { by: report.ghost, at: target });
                    self.log.push(LogEvent::TargetCaught { ghost: report.ghost, at: target });
                    reports.push(report);
                    break;
                }
                MoveOutcome::Stayed => {}
            }
            reports.push(report);
        }
        reports
    }

    pub fn advance(&mut self, max_ticks: u32) -> AdvanceResult {
        let mut ticks = 0;
        while ticks < max_ticks {
            if let Some(outcome) = self.outcome {
                return AdvanceResult {
                    simulated_ticks: ticks,
                    stop_reason: AdvanceStopReason::Finished(outcome),
                };
            }
            self.step();
            ticks += 1;
        }
        match self.outcome {
            Some(outcome) => AdvanceResult {
                simulated_ticks: ticks,
                stop_reason: AdvanceStopReason::Finished(outcome),
            },
            None => AdvanceResult { simulated_ticks: ticks, stop_reason: AdvanceStopReason::BudgetExhausted },
        }
    }

    /// Starts a fresh round on the same arena.
    ///
    /// Every ghost is rebuilt at its spawn cell with its original id and random stream,
    /// the target returns to where the round first had it, and sightings, tick count,
    /// outcome and log are cleared.
    pub fn reset_round(&mut self) -> Result<(), ArenaError> {
        tracing::debug!(tick = self.blackboard.tick(), "round reset");
        self.arena.clear_ghosts();
        self.arena.clear_target();
        for spawn in self.spawns.values() {
            self.arena.place_ghost(spawn.id, spawn.pos)?;
            self.ghosts[spawn.key] =
                Ghost::new(spawn.id, spawn.tier, spawn.pos, DecisionRng::for_ghost(self.seed, spawn.id));
        }
        if let Some(target) = self.target_spawn {
            self.arena.place_target(target)?;
        }
        self.blackboard.reset();
        self.outcome = None;
        self.log.clear();
        Ok(())
    }

    fn record_events(&mut self, before: Behavior, report: &TickReport) {
        if report.behavior != before {
            self.log.push(LogEvent::BehaviorChanged {
                ghost: report.ghost,
                from: before,
                to: report.behavior,
            });
        }
        if report.trigger == Some(Trigger::DirectSighting)
            && let Some(record) = self.blackboard.record(report.ghost)
        {
            self.log.push(LogEvent::SightingReported { ghost: report.ghost, target: record.target });
        }
        if let Some(cause) = report.reset {
            self.log.push(LogEvent::BehaviorReset { ghost: report.ghost, cause });
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_tick(&self) -> u64 {
        self.blackboard.tick()
    }

    pub fn table(&self) -> &DifficultyTable {
        &self.table
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    /// Ghosts in id order.
    pub fn ghosts(&self) -> impl Iterator<Item = &Ghost> {
        self.spawns.values().map(|spawn| &self.ghosts[spawn.key])
    }

    pub fn ghost(&self, id: GhostId) -> Option<&Ghost> {
        self.spawns.get(&id).and_then(|spawn| self.ghosts.get(spawn.key))
    }

    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.blackboard.tick());
        hasher.write_usize(self.blackboard.len());
        match self.arena.target() {
            Some(target) => {
                hasher.write_u8(1);
                hasher.write_i32(target.y);
                hasher.write_i32(target.x);
            }
            None => hasher.write_u8(0),
        }
        hasher.write_u8(match self.outcome {
            None => 0,
            Some(RoundOutcome::Caught { .. }) => 1,
        });
        for ghost in self.ghosts() {
            hasher.write_u32(ghost.id().0);
            hasher.write_i32(ghost.pos().y);
            hasher.write_i32(ghost.pos().x);
            hasher.write_u8(match ghost.behavior() {
                Behavior::Patrol => 0,
                Behavior::Hunt => 1,
                Behavior::Block => 2,
                Behavior::Random => 3,
            });
            hasher.write_u32(ghost.hunt_cooldown());
            hasher.write_u32(ghost.blocking_remaining());
            hasher.write_u32(ghost.idle_count());
        }
        hasher.finish()
    }
}
