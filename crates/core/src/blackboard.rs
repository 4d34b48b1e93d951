//! Shared, tick-aged store of target sightings.
//! This module exists so ghosts can coordinate pursuit without referencing each other.
//! It does not own perception; ghosts report what they saw and read back what others saw.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Direction, GhostId, Pos};

/// Records older than this are dropped from storage on the next tick.
pub const STORAGE_TTL_TICKS: u64 = 10;
/// Records older than this are kept but no longer handed to other ghosts.
pub const RELAY_TTL_TICKS: u64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SightingRecord {
    pub reporter: GhostId,
    pub target: Pos,
    pub heading: Option<Direction>,
    pub observed_at: u64,
}

impl SightingRecord {
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.observed_at)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Blackboard {
    tick: u64,
    records: BTreeMap<GhostId, SightingRecord>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Must run exactly once per simulation tick, before any ghost acts.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
        let now = self.tick;
        self.records.retain(|_, record| record.age(now) <= STORAGE_TTL_TICKS);
    }

    pub fn report(&mut self, reporter: GhostId, target: Pos, heading: Option<Direction>) {
        self.records
            .insert(reporter, SightingRecord { reporter, target, heading, observed_at: self.tick });
    }

    /// Freshest sighting from anyone but `consumer` that is still young enough to act on.
    ///
    /// Equal timestamps resolve to the highest reporter id.
    pub fn latest_for(&self, consumer: GhostId) -> Option<SightingRecord> {
        self.records
            .values()
            .filter(|record| record.reporter != consumer)
            .filter(|record| record.age(self.tick) <= RELAY_TTL_TICKS)
            .max_by_key(|record| record.observed_at)
            .copied()
    }

    pub fn record(&self, reporter: GhostId) -> Option<&SightingRecord> {
        self.records.get(&reporter)
    }

    pub fn records(&self) -> impl Iterator<Item = &SightingRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn reset(&mut self) {
        self.records.clear();
        self.tick = 0;
    }
}
