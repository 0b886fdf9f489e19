//! # Generation Module
//!
//! Procedural dungeon layout generation.
//!
//! This module provides the configuration, the random range sampler every
//! stochastic decision goes through, the [`Room`] geometry shared by the
//! generator and its consumers, and the [`Generator`] trait implemented by
//! [`RoomCorridorGenerator`].

pub mod dungeon;

pub use dungeon::*;

use crate::{config, DelveError, DelveResult, Direction, Grid, Position, TileType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive integer range sampled uniformly.
///
/// # Examples
///
/// ```
/// use delve::RandomRange;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let range = RandomRange::new(3, 10);
/// let mut rng = StdRng::seed_from_u64(1);
/// let value = range.sample(&mut rng);
/// assert!(range.contains(value));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RandomRange {
    pub min: u32,
    pub max: u32,
}

impl RandomRange {
    /// Creates a range covering `min..=max`.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Creates a range holding a single value.
    pub const fn exactly(value: u32) -> Self {
        Self::new(value, value)
    }

    /// Checks if the range holds no values.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Checks if `value` lies inside the range.
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Draws a value uniformly from the range. The range must not be empty.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

impl fmt::Display for RandomRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Configuration for procedural generation.
///
/// Controls the board size and the ranges rooms and corridors are drawn from.
/// The seed makes generation reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Board width in tiles
    pub columns: u32,
    /// Board height in tiles
    pub rows: u32,
    /// Number of rooms in the chain
    pub room_count: RandomRange,
    /// Room widths
    pub room_width: RandomRange,
    /// Room heights
    pub room_height: RandomRange,
    /// Corridor lengths
    pub corridor_length: RandomRange,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert!(config.room_width.min >= 3);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            columns: config::DEFAULT_COLUMNS,
            rows: config::DEFAULT_ROWS,
            room_count: RandomRange::new(15, 20),
            room_width: RandomRange::new(3, 10),
            room_height: RandomRange::new(3, 10),
            corridor_length: RandomRange::new(6, 10),
        }
    }

    /// Creates a configuration for testing with smaller, simpler levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            columns: 40,
            rows: 40,
            room_count: RandomRange::new(3, 6),
            room_width: RandomRange::new(3, 6),
            room_height: RandomRange::new(3, 6),
            corridor_length: RandomRange::new(2, 5),
        }
    }

    /// Rejects parameters generation cannot work with.
    pub fn validate(&self) -> DelveResult<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(DelveError::InvalidConfig(format!(
                "board must have positive dimensions, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.columns > config::MAX_BOARD_DIMENSION || self.rows > config::MAX_BOARD_DIMENSION {
            return Err(DelveError::InvalidConfig(format!(
                "board {}x{} exceeds the {} tile limit",
                self.columns,
                self.rows,
                config::MAX_BOARD_DIMENSION
            )));
        }

        for (name, range) in [
            ("room_count", self.room_count),
            ("room_width", self.room_width),
            ("room_height", self.room_height),
            ("corridor_length", self.corridor_length),
        ] {
            if range.is_empty() {
                return Err(DelveError::InvalidConfig(format!(
                    "{name} range {range} is empty"
                )));
            }
            if range.min == 0 {
                return Err(DelveError::InvalidConfig(format!(
                    "{name} range {range} must start above zero"
                )));
            }
        }

        if self.room_count.max > config::MAX_ROOM_COUNT {
            return Err(DelveError::InvalidConfig(format!(
                "room_count range {} exceeds the {} room limit",
                self.room_count,
                config::MAX_ROOM_COUNT
            )));
        }

        if self.room_width.max > self.columns || self.room_height.max > self.rows {
            return Err(DelveError::InvalidConfig(format!(
                "rooms up to {}x{} do not fit a {}x{} board",
                self.room_width.max, self.room_height.max, self.columns, self.rows
            )));
        }

        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Represents a rectangular room in the dungeon.
///
/// Every cell of a room is floor. Rooms are created by the generator and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Position of the room in the chain
    pub id: u32,
    /// Lower-left (south-west) corner of the room
    pub lower_left: Position,
    /// Width of the room
    pub width: u32,
    /// Height of the room
    pub height: u32,
    /// Direction of travel of the corridor leading into this room, if any
    pub entered_from: Option<Direction>,
}

impl Room {
    /// Creates a new room with the given parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Room, Position};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8);
    /// assert_eq!(room.id, 1);
    /// assert_eq!(room.width, 10);
    /// assert_eq!(room.height, 8);
    /// ```
    pub fn new(id: u32, lower_left: Position, width: u32, height: u32) -> Self {
        Self {
            id,
            lower_left,
            width,
            height,
            entered_from: None,
        }
    }

    /// Gets the upper-right corner of the room.
    pub fn upper_right(&self) -> Position {
        Position::new(
            self.lower_left.x + self.width as i32 - 1,
            self.lower_left.y + self.height as i32 - 1,
        )
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.lower_left.x + self.width as i32 / 2,
            self.lower_left.y + self.height as i32 / 2,
        )
    }

    /// Gets the area of the room in tiles.
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Checks if a position is inside this room.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Room, Position};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8);
    /// assert!(room.contains(Position::new(7, 7)));
    /// assert!(!room.contains(Position::new(20, 20)));
    /// ```
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.lower_left.x
            && pos.y >= self.lower_left.y
            && pos.x < self.lower_left.x + self.width as i32
            && pos.y < self.lower_left.y + self.height as i32
    }

    /// Checks if the whole room lies on a `columns x rows` board.
    pub fn fits_within(&self, columns: u32, rows: u32) -> bool {
        self.lower_left.x >= 0
            && self.lower_left.y >= 0
            && self.lower_left.x as i64 + self.width as i64 <= columns as i64
            && self.lower_left.y as i64 + self.height as i64 <= rows as i64
    }

    /// Gets all positions within this room, south row first.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity(self.area() as usize);

        for y in self.lower_left.y..(self.lower_left.y + self.height as i32) {
            for x in self.lower_left.x..(self.lower_left.x + self.width as i32) {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }

    /// Picks a uniformly random cell of the room.
    pub fn random_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position::new(
            self.lower_left.x + rng.gen_range(0..self.width.max(1)) as i32,
            self.lower_left.y + rng.gen_range(0..self.height.max(1)) as i32,
        )
    }
}

/// Trait for procedural generators.
///
/// Generators draw every random decision from the supplied RNG, so the same
/// seed always yields the same content.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Generates a dungeon with the default generator, seeded from `config.seed`.
///
/// # Examples
///
/// ```
/// use delve::{generate, GenerationConfig};
///
/// let a = generate(&GenerationConfig::for_testing(9)).unwrap();
/// let b = generate(&GenerationConfig::for_testing(9)).unwrap();
/// assert_eq!(a.grid, b.grid);
/// ```
pub fn generate(config: &GenerationConfig) -> DelveResult<Dungeon> {
    let mut rng = utils::create_rng(config);
    RoomCorridorGenerator::new().generate(config, &mut rng)
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use ::pathfinding::prelude::bfs_reach;
    use std::collections::HashSet;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Validates that a grid has somewhere to stand.
    pub fn validate_level(grid: &Grid) -> DelveResult<()> {
        if grid.count(TileType::Floor) == 0 {
            return Err(DelveError::LayoutError(
                "Level has no floor tiles".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates that every room cell is floor and lies inside the grid.
    pub fn validate_rooms_in_bounds(grid: &Grid, rooms: &[Room]) -> DelveResult<()> {
        for room in rooms {
            if !room.fits_within(grid.columns(), grid.rows()) {
                return Err(DelveError::LayoutError(format!(
                    "Room {} at {} ({}x{}) leaves the {}x{} board",
                    room.id,
                    room.lower_left,
                    room.width,
                    room.height,
                    grid.columns(),
                    grid.rows()
                )));
            }
        }

        Ok(())
    }

    /// Floor cells reachable from `start` with orthogonal steps.
    pub fn reachable_floor(grid: &Grid, start: Position) -> HashSet<Position> {
        if !grid.is_floor(start) {
            return HashSet::new();
        }

        bfs_reach(start, |&pos: &Position| {
            pos.cardinal_adjacent_positions()
                .into_iter()
                .filter(|&next| grid.is_floor(next))
                .collect::<Vec<_>>()
        })
        .collect()
    }

    /// Validates that all rooms are reachable from each other over floor.
    pub fn validate_connectivity(grid: &Grid, rooms: &[Room]) -> DelveResult<()> {
        let Some(first) = rooms.first() else {
            return Ok(());
        };

        let visited = reachable_floor(grid, first.lower_left);
        for room in rooms {
            if let Some(cut_off) = room.floor_positions().into_iter().find(|p| !visited.contains(p)) {
                return Err(DelveError::LayoutError(format!(
                    "Room {} is not connected to room {} (cell {} unreachable)",
                    room.id, first.id, cut_off
                )));
            }
        }

        Ok(())
    }
}
