//! Minimal reference grid that answers the engine's spatial queries.
//! This module exists so the engine can be driven end to end without a full game host.
//! It does not own ghost decision state; it only tracks walls, ghost cells and the target cell.

use std::collections::{BTreeMap, BTreeSet};

use crate::spatial::SpatialQuery;
use crate::types::{Direction, EntityKind, GhostId, Pos};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    #[error("arena layout has no rows")]
    EmptyLayout,

    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("unknown glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },

    #[error("position {0:?} is outside the arena")]
    OutOfBounds(Pos),

    #[error("position {0:?} is already taken")]
    Blocked(Pos),

    #[error("no ghost stands at {0:?}")]
    NoGhostAt(Pos),
}

#[derive(Clone, Debug)]
pub struct Arena {
    width: usize,
    height: usize,
    walls: Vec<bool>,
    ghosts: BTreeMap<Pos, GhostId>,
    target: Option<Pos>,
}

/// Spawn points read from an ASCII layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Spawns {
    pub ghosts: Vec<Pos>,
    pub target: Option<Pos>,
}

impl Arena {
    /// Open floor enclosed by a one-cell wall border.
    pub fn new(width: usize, height: usize) -> Self {
        let mut walls = vec![false; width * height];
        for x in 0..width {
            walls[x] = true;
            walls[(height - 1) * width + x] = true;
        }
        for y in 0..height {
            walls[y * width] = true;
            walls[y * width + (width - 1)] = true;
        }
        Self { width, height, walls, ghosts: BTreeMap::new(), target: None }
    }

    /// Builds walls from rows of `#` (wall), `.` or space (floor), `G` (ghost spawn), `P` (target).
    ///
    /// Ghost spawns are returned in row-major order and not placed; the caller assigns ids.
    pub fn from_rows(rows: &[&str]) -> Result<(Self, Spawns), ArenaError> {
        let Some(first) = rows.first() else {
            return Err(ArenaError::EmptyLayout);
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(ArenaError::EmptyLayout);
        }

        let mut walls = Vec::with_capacity(width * rows.len());
        let mut spawns = Spawns::default();
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ArenaError::RaggedRow { row, expected: width, found });
            }
            for (col, glyph) in line.chars().enumerate() {
                let pos = Pos { y: row as i32, x: col as i32 };
                match glyph {
                    '#' => walls.push(true),
                    '.' | ' ' => walls.push(false),
                    'G' => {
                        walls.push(false);
                        spawns.ghosts.push(pos);
                    }
                    'P' => {
                        walls.push(false);
                        spawns.target = Some(pos);
                    }
                    _ => return Err(ArenaError::UnknownGlyph { glyph, row, col }),
                }
            }
        }

        let mut arena =
            Self { width, height: rows.len(), walls, ghosts: BTreeMap::new(), target: None };
        arena.target = spawns.target;
        Ok((arena, spawns))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        !self.in_bounds(pos) || self.walls[self.index(pos)]
    }

    pub fn set_wall(&mut self, pos: Pos, wall: bool) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.walls[idx] = wall;
    }

    pub fn target(&self) -> Option<Pos> {
        self.target
    }

    pub fn ghost_at(&self, pos: Pos) -> Option<GhostId> {
        self.ghosts.get(&pos).copied()
    }

    pub fn ghost_cells(&self) -> impl Iterator<Item = (Pos, GhostId)> + '_ {
        self.ghosts.iter().map(|(pos, id)| (*pos, *id))
    }

    pub fn place_target(&mut self, pos: Pos) -> Result<(), ArenaError> {
        self.check_free(pos)?;
        self.target = Some(pos);
        Ok(())
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn place_ghost(&mut self, id: GhostId, pos: Pos) -> Result<(), ArenaError> {
        self.check_free(pos)?;
        self.ghosts.insert(pos, id);
        Ok(())
    }

    pub fn clear_ghosts(&mut self) {
        self.ghosts.clear();
    }

    /// Mirrors a ghost step decided by the engine.
    pub fn relocate_ghost(&mut self, from: Pos, to: Pos) -> Result<(), ArenaError> {
        self.check_free(to)?;
        let id = self.ghosts.remove(&from).ok_or(ArenaError::NoGhostAt(from))?;
        self.ghosts.insert(to, id);
        Ok(())
    }

    pub fn cell(&self, pos: Pos) -> Option<EntityKind> {
        if !self.in_bounds(pos) {
            return None;
        }
        if self.walls[self.index(pos)] {
            return Some(EntityKind::Wall);
        }
        if self.ghosts.contains_key(&pos) {
            return Some(EntityKind::Ghost);
        }
        if self.target == Some(pos) {
            return Some(EntityKind::Target);
        }
        Some(EntityKind::Empty)
    }

    fn check_free(&self, pos: Pos) -> Result<(), ArenaError> {
        match self.cell(pos) {
            None => Err(ArenaError::OutOfBounds(pos)),
            Some(EntityKind::Empty) => Ok(()),
            Some(_) => Err(ArenaError::Blocked(pos)),
        }
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

impl SpatialQuery for Arena {
    fn entity_at(&self, origin: Pos, direction: Direction, distance: u32) -> Option<EntityKind> {
        self.cell(origin.step(direction, distance as i32))
    }

    fn peers_near(&self, origin: Pos, radius: u32, exclude: GhostId) -> BTreeSet<GhostId> {
        self.ghosts
            .iter()
            .filter(|(pos, id)| **id != exclude && **pos != origin && origin.chebyshev(**pos) <= radius)
            .map(|(_, id)| *id)
            .collect()
    }
}
