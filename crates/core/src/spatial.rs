//! Read-only view of the world the engine consumes, plus sight and walkability rules on top of it.
//! This module exists so perception stays identical for behavior selection and direction planning.
//! It does not own the grid; hosts implement `SpatialQuery` over whatever container they keep.

use std::collections::BTreeSet;

use crate::types::{Direction, EntityKind, GhostId, Pos};

pub trait SpatialQuery {
    /// Kind of the cell `distance` steps from `origin` along `direction`; `None` when off-grid.
    fn entity_at(&self, origin: Pos, direction: Direction, distance: u32) -> Option<EntityKind>;

    /// Ghosts within a Chebyshev `radius` of `origin`, never including `exclude`.
    fn peers_near(&self, origin: Pos, radius: u32, exclude: GhostId) -> BTreeSet<GhostId>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetSighting {
    pub direction: Direction,
    pub distance: u32,
    pub pos: Pos,
}

/// Straight-line scan in each direction for the target, stopping at the first obstruction.
pub fn spot_target<Q: SpatialQuery + ?Sized>(
    world: &Q,
    origin: Pos,
    range: u32,
) -> Option<TargetSighting> {
    for direction in Direction::ALL {
        for distance in 1..=range {
            match world.entity_at(origin, direction, distance) {
                None => break,
                Some(kind) if kind.obstructs() => break,
                Some(EntityKind::Target) => {
                    let pos = origin.step(direction, distance as i32);
                    return Some(TargetSighting { direction, distance, pos });
                }
                Some(_) => {}
            }
        }
    }
    None
}

pub fn is_walkable<Q: SpatialQuery + ?Sized>(world: &Q, origin: Pos, direction: Direction) -> bool {
    world.entity_at(origin, direction, 1).is_some_and(|kind| !kind.obstructs())
}

/// Walkable neighbor directions in canonical order.
pub fn walkable_directions<Q: SpatialQuery + ?Sized>(world: &Q, origin: Pos) -> Vec<Direction> {
    Direction::ALL.into_iter().filter(|&direction| is_walkable(world, origin, direction)).collect()
}

/// Consecutive walkable cells ahead of `origin`, counting at most `limit`.
pub fn open_run_length<Q: SpatialQuery + ?Sized>(
    world: &Q,
    origin: Pos,
    direction: Direction,
    limit: u32,
) -> u32 {
    (1..=limit)
        .take_while(|&distance| {
            world.entity_at(origin, direction, distance).is_some_and(|kind| !kind.obstructs())
        })
        .count() as u32
}
