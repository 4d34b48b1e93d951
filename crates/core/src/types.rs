use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    /// Cell `distance` steps away from `self` along `direction`.
    pub fn step(self, direction: Direction, distance: i32) -> Pos {
        let (dy, dx) = direction.delta();
        Pos { y: self.y + dy * distance, x: self.x + dx * distance }
    }

    pub fn chebyshev(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Cardinal movement direction.
///
/// Declaration order is the canonical enumeration order used for every scan
/// and tie-break in the engine: up, down, left, right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// `(dy, dx)` offset of one step; y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// What occupies a grid cell, as far as the engine cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Empty,
    Wall,
    Ghost,
    Target,
}

impl EntityKind {
    /// Walls and other ghosts stop both movement and sight.
    pub fn obstructs(self) -> bool {
        matches!(self, EntityKind::Wall | EntityKind::Ghost)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GhostId(pub u32);

impl fmt::Display for GhostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ghost#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    Patrol,
    Hunt,
    Block,
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }

    /// Player-facing summary lines shown when picking a difficulty.
    pub fn summary(self) -> &'static [&'static str] {
        match self {
            Tier::Easy => &[
                "Ghosts patrol and move randomly",
                "Limited vision (3 cells)",
                "Minimal cooperation (10%)",
            ],
            Tier::Medium => &[
                "Ghosts can hunt the player",
                "Medium vision (5 cells)",
                "Moderate cooperation (30%)",
            ],
            Tier::Hard => &[
                "Ghosts block escape routes",
                "Extended vision (7 cells)",
                "High cooperation (60%)",
            ],
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which selection rule put a ghost into its behavior this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    DirectSighting,
    RelayedSighting,
    Cooperation,
    Routine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetCause {
    Idle,
    Cycle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Stayed,
    Moved { from: Pos, to: Pos },
    /// The chosen step lands on the target; the ghost keeps its cell.
    Captured { target: Pos },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub ghost: GhostId,
    pub trigger: Option<Trigger>,
    pub behavior: Behavior,
    pub direction: Option<Direction>,
    pub outcome: MoveOutcome,
    pub reset: Option<ResetCause>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Caught { by: GhostId, at: Pos },
}

#[derive(Clone, Debug)]
pub enum AdvanceStopReason {
    Finished(RoundOutcome),
    BudgetExhausted,
}

#[derive(Clone, Debug)]
pub struct AdvanceResult {
    pub simulated_ticks: u32,
    pub stop_reason: AdvanceStopReason,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    BehaviorChanged { ghost: GhostId, from: Behavior, to: Behavior },
    SightingReported { ghost: GhostId, target: Pos },
    BehaviorReset { ghost: GhostId, cause: ResetCause },
    TargetCaught { ghost: GhostId, at: Pos },
}
