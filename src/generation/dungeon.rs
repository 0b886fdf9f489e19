//! # Dungeon Generation
//!
//! Procedural dungeon layout generation using a room-and-corridor chain.
//!
//! The generator grows a single chain: a first room centred on the board, then a
//! corridor leaving one of its sides, a room flush against the corridor's far end,
//! another corridor, and so on. Every piece is drawn from the configured ranges
//! and retried a bounded number of times until it fits on the board.

use super::utils;
use crate::{
    config, DelveError, DelveResult, Direction, GenerationConfig, Generator, Grid, Position,
    Room, TileType,
};
use log::{debug, trace, warn};
use rand::{rngs::StdRng, seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A straight one-tile-wide passage leading away from a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    /// First corridor cell, directly outside the room it leaves
    pub start: Position,
    /// Number of cells in the corridor
    pub length: u32,
    /// Cardinal direction the corridor runs in
    pub direction: Direction,
}

impl Corridor {
    /// Creates a corridor running `length` cells from `start` towards `direction`.
    pub fn new(start: Position, length: u32, direction: Direction) -> Self {
        Self {
            start,
            length,
            direction,
        }
    }

    /// Last corridor cell.
    pub fn end(&self) -> Position {
        let last = i32::try_from(self.length.saturating_sub(1)).unwrap_or(i32::MAX);
        self.start.offset(self.direction, last)
    }

    /// Every cell of the corridor, from start to end.
    pub fn positions(&self) -> Vec<Position> {
        (0..self.length)
            .map(|step| {
                let step = i32::try_from(step).unwrap_or(i32::MAX);
                self.start.offset(self.direction, step)
            })
            .collect()
    }

    /// Checks if the whole corridor lies on a `columns x rows` board.
    pub fn fits_within(&self, columns: u32, rows: u32) -> bool {
        let in_bounds = |x: i64, y: i64| x >= 0 && y >= 0 && x < columns as i64 && y < rows as i64;
        if self.length == 0 {
            return false;
        }

        // Exact far end, without the saturation `end` applies
        let delta = self.direction.to_delta();
        let last = self.length as i64 - 1;
        let (x, y) = (self.start.x as i64, self.start.y as i64);
        in_bounds(x, y) && in_bounds(x + delta.x as i64 * last, y + delta.y as i64 * last)
    }
}

/// A generated level: the carved grid plus the rooms and corridors it was carved from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dungeon {
    /// Seed the level was generated from
    pub seed: u64,
    /// Wall/floor tiles; read-only once generated
    pub grid: Grid,
    /// Rooms in chain order
    pub rooms: Vec<Room>,
    /// Corridors in chain order; corridor `i` joins room `i` to room `i + 1`
    pub corridors: Vec<Corridor>,
}

impl Dungeon {
    /// Width of the board in tiles.
    pub fn columns(&self) -> u32 {
        self.grid.columns()
    }

    /// Height of the board in tiles.
    pub fn rows(&self) -> u32 {
        self.grid.rows()
    }

    /// Gets the tile type at a position.
    pub fn tile_at(&self, pos: Position) -> DelveResult<TileType> {
        self.grid.tile(pos)
    }

    /// Finds the first room containing a position.
    pub fn room_at(&self, pos: Position) -> Option<&Room> {
        self.rooms.iter().find(|room| room.contains(pos))
    }

    /// Picks a uniformly random floor cell inside the room at `index`.
    pub fn random_floor_in_room<R: Rng + ?Sized>(
        &self,
        index: usize,
        rng: &mut R,
    ) -> DelveResult<Position> {
        let room = self.rooms.get(index).ok_or_else(|| {
            DelveError::InvalidState(format!(
                "Room index {} out of range ({} rooms)",
                index,
                self.rooms.len()
            ))
        })?;
        Ok(room.random_tile(rng))
    }

    /// Picks a random room, then a random floor cell inside it.
    pub fn random_floor_position<R: Rng + ?Sized>(&self, rng: &mut R) -> DelveResult<Position> {
        if self.rooms.is_empty() {
            return Err(DelveError::InvalidState("Dungeon has no rooms".to_string()));
        }
        let index = rng.gen_range(0..self.rooms.len());
        self.random_floor_in_room(index, rng)
    }

    /// The sealed ring of wall just outside the board, for renderers.
    ///
    /// These cells sit at `x = -1`, `x = columns`, `y = -1` and `y = rows` and are
    /// not addressable through tile queries.
    pub fn outer_wall_positions(&self) -> Vec<Position> {
        let right = self.columns() as i32;
        let top = self.rows() as i32;
        let mut positions = Vec::with_capacity(2 * (right as usize + top as usize + 2));

        // Left and right walls, corners included
        for y in -1..=top {
            positions.push(Position::new(-1, y));
            positions.push(Position::new(right, y));
        }

        // Bottom and top walls between the corners
        for x in 0..right {
            positions.push(Position::new(x, -1));
            positions.push(Position::new(x, top));
        }

        positions
    }
}

impl fmt::Display for Dungeon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grid)
    }
}

/// Primary dungeon generator using the room-and-corridor chain.
///
/// This generator creates dungeons by:
/// 1. Centring a first room on the board
/// 2. Alternately growing a corridor out of the last room and a room off the
///    corridor's end, redrawing the last room when no side of it has space
/// 3. Carving every room and corridor cell to floor
/// 4. Validating bounds and connectivity before handing the level out
#[derive(Debug, Clone)]
pub struct RoomCorridorGenerator {
    /// Maximum attempts to place a room or corridor before giving up
    pub max_placement_attempts: u32,
}

impl RoomCorridorGenerator {
    /// Creates a new dungeon generator with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GenerationConfig, Generator, RoomCorridorGenerator};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let generator = RoomCorridorGenerator::new();
    /// let mut rng = StdRng::seed_from_u64(3);
    /// let dungeon = generator.generate(&GenerationConfig::for_testing(3), &mut rng).unwrap();
    /// assert!(!dungeon.rooms.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            max_placement_attempts: config::DEFAULT_PLACEMENT_ATTEMPTS,
        }
    }

    /// Sets the retry bound for placing a single room or corridor.
    pub fn with_max_placement_attempts(mut self, attempts: u32) -> Self {
        self.max_placement_attempts = attempts;
        self
    }

    /// Places the first room in the middle of the board.
    fn place_first_room(&self, config: &GenerationConfig, rng: &mut StdRng) -> Room {
        let width = config.room_width.sample(rng);
        let height = config.room_height.sample(rng);
        let x = (config.columns - width) / 2;
        let y = (config.rows - height) / 2;

        Room::new(0, Position::new(x as i32, y as i32), width, height)
    }

    /// Grows a corridor out of the last room of the chain.
    ///
    /// When no side of that room leaves space for a corridor and a minimum-sized
    /// room past it, the room is redrawn: room 0 gets a new size, later rooms a
    /// new size and offset against the corridor they were entered from.
    fn place_corridor(
        &self,
        rooms: &mut [Room],
        entered_by: Option<&Corridor>,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<Corridor> {
        let Some(room) = rooms.last_mut() else {
            return Err(DelveError::InvalidState(
                "Cannot grow a corridor from an empty chain".to_string(),
            ));
        };

        for attempt in 0..self.max_placement_attempts {
            if let Some(corridor) = self.corridor_from(room, config, rng) {
                return Ok(corridor);
            }

            trace!(
                "Corridor attempt {}: room {} ({}x{}) has no free side, redrawing it",
                attempt,
                room.id,
                room.width,
                room.height
            );
            *room = match entered_by {
                Some(corridor) => self.place_room(room.id, corridor, config, rng)?,
                None => self.place_first_room(config, rng),
            };
        }

        warn!(
            "Gave up placing a corridor from room {} after {} attempts",
            room.id, self.max_placement_attempts
        );
        Err(DelveError::LayoutError(format!(
            "No corridor fits out of room {} after {} attempts",
            room.id, self.max_placement_attempts
        )))
    }

    /// Tries every side of `room` in random order and grows a corridor out of
    /// the first one with enough space.
    fn corridor_from(
        &self,
        room: &Room,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> Option<Corridor> {
        let mut directions = Direction::CARDINAL;
        directions.shuffle(rng);

        for direction in directions {
            let (start, available) = self.corridor_start(room, direction, config, rng);
            if available < config.corridor_length.min as i64 {
                continue;
            }

            let length = config.corridor_length.sample(rng).min(available as u32);
            return Some(Corridor::new(start, length, direction));
        }

        None
    }

    /// Picks the corridor's first cell on the given side of `room`, and returns
    /// it with the longest length that still leaves space for a minimum-sized
    /// room past the corridor's end. The length may be negative.
    fn corridor_start(
        &self,
        room: &Room,
        direction: Direction,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> (Position, i64) {
        let columns = config.columns as i64;
        let rows = config.rows as i64;
        let min_width = config.room_width.min as i64;
        let min_height = config.room_height.min as i64;
        let along_x = room.lower_left.x + rng.gen_range(0..room.width) as i32;
        let along_y = room.lower_left.y + rng.gen_range(0..room.height) as i32;

        match direction {
            Direction::North => {
                let start = Position::new(along_x, room.lower_left.y + room.height as i32);
                (start, rows - min_height - start.y as i64)
            }
            Direction::South => {
                let start = Position::new(along_x, room.lower_left.y - 1);
                (start, start.y as i64 + 1 - min_height)
            }
            Direction::East => {
                let start = Position::new(room.lower_left.x + room.width as i32, along_y);
                (start, columns - min_width - start.x as i64)
            }
            Direction::West => {
                let start = Position::new(room.lower_left.x - 1, along_y);
                (start, start.x as i64 + 1 - min_width)
            }
            // Corridors only ever run along the cardinal directions.
            _ => (room.lower_left, i64::MIN),
        }
    }

    /// Places room `id` flush against the far end of `corridor`.
    fn place_room(
        &self,
        id: u32,
        corridor: &Corridor,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<Room> {
        let end = corridor.end();
        let columns = config.columns as i32;
        let rows = config.rows as i32;

        for attempt in 0..self.max_placement_attempts {
            let width = config.room_width.sample(rng);
            let height = config.room_height.sample(rng);
            let (w, h) = (width as i32, height as i32);

            let lower_left = match corridor.direction {
                Direction::North if end.y + 1 + h <= rows => {
                    Position::new(cross_offset(end.x, w, columns, rng), end.y + 1)
                }
                Direction::South if end.y - h >= 0 => {
                    Position::new(cross_offset(end.x, w, columns, rng), end.y - h)
                }
                Direction::East if end.x + 1 + w <= columns => {
                    Position::new(end.x + 1, cross_offset(end.y, h, rows, rng))
                }
                Direction::West if end.x - w >= 0 => {
                    Position::new(end.x - w, cross_offset(end.y, h, rows, rng))
                }
                _ => {
                    trace!(
                        "Room {} attempt {}: {}x{} overflows past {} heading {:?}",
                        id,
                        attempt,
                        width,
                        height,
                        end,
                        corridor.direction
                    );
                    continue;
                }
            };

            let mut room = Room::new(id, lower_left, width, height);
            room.entered_from = Some(corridor.direction);
            return Ok(room);
        }

        warn!(
            "Gave up placing room {} after {} attempts",
            id, self.max_placement_attempts
        );
        Err(DelveError::LayoutError(format!(
            "Room {} does not fit past corridor end {} after {} attempts",
            id, end, self.max_placement_attempts
        )))
    }

    /// Carves every room cell to floor.
    fn carve_room(&self, grid: &mut Grid, room: &Room) -> DelveResult<()> {
        for pos in room.floor_positions() {
            grid.set_tile(pos, TileType::Floor)?;
        }
        Ok(())
    }

    /// Carves every corridor cell to floor.
    fn carve_corridor(&self, grid: &mut Grid, corridor: &Corridor) -> DelveResult<()> {
        for pos in corridor.positions() {
            grid.set_tile(pos, TileType::Floor)?;
        }
        Ok(())
    }
}

/// Chooses where a room spanning `span` cells starts along the axis crossing a
/// corridor, so that the corridor's end (`anchor`) faces the room and the room
/// stays on a board `limit` cells wide.
fn cross_offset(anchor: i32, span: i32, limit: i32, rng: &mut StdRng) -> i32 {
    let low = (anchor - span + 1).max(0);
    let high = anchor.min(limit - span);
    rng.gen_range(low..=high.max(low))
}

impl Generator<Dungeon> for RoomCorridorGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Dungeon> {
        config.validate()?;

        let room_count = config.room_count.sample(rng);
        debug!(
            "Generating {}x{} dungeon with {} rooms (seed {})",
            config.columns, config.rows, room_count, config.seed
        );

        let mut rooms = Vec::new();
        let mut corridors: Vec<Corridor> = Vec::new();

        let first = self.place_first_room(config, rng);
        trace!("Room 0 at {} ({}x{})", first.lower_left, first.width, first.height);
        rooms.push(first);

        for id in 1..room_count {
            let corridor = self.place_corridor(&mut rooms, corridors.last(), config, rng)?;
            let room = self.place_room(id, &corridor, config, rng)?;
            trace!(
                "Corridor {} -> {} heading {:?}, room {} at {} ({}x{})",
                corridor.start,
                corridor.end(),
                corridor.direction,
                id,
                room.lower_left,
                room.width,
                room.height
            );
            corridors.push(corridor);
            rooms.push(room);
        }

        // Create empty level (all walls) and carve the chain into it
        let mut grid = Grid::new(config.columns, config.rows);
        for room in &rooms {
            self.carve_room(&mut grid, room)?;
        }
        for corridor in &corridors {
            self.carve_corridor(&mut grid, corridor)?;
        }

        let dungeon = Dungeon {
            seed: config.seed,
            grid,
            rooms,
            corridors,
        };
        self.validate(&dungeon, config)?;

        debug!(
            "Generated {} rooms, {} corridors, {} floor tiles",
            dungeon.rooms.len(),
            dungeon.corridors.len(),
            dungeon.grid.count(TileType::Floor)
        );
        Ok(dungeon)
    }

    fn validate(&self, dungeon: &Dungeon, config: &GenerationConfig) -> DelveResult<()> {
        if dungeon.columns() != config.columns || dungeon.rows() != config.rows {
            return Err(DelveError::LayoutError(format!(
                "Grid is {}x{}, config asked for {}x{}",
                dungeon.columns(),
                dungeon.rows(),
                config.columns,
                config.rows
            )));
        }

        utils::validate_level(&dungeon.grid)?;
        utils::validate_rooms_in_bounds(&dungeon.grid, &dungeon.rooms)?;

        if let Some(corridor) = dungeon
            .corridors
            .iter()
            .find(|c| !c.fits_within(config.columns, config.rows))
        {
            return Err(DelveError::LayoutError(format!(
                "Corridor {} -> {} leaves the board",
                corridor.start,
                corridor.end()
            )));
        }

        utils::validate_connectivity(&dungeon.grid, &dungeon.rooms)
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

impl Default for RoomCorridorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RandomRange;
    use rand::SeedableRng;

    fn tight_config() -> GenerationConfig {
        GenerationConfig {
            seed: 5,
            columns: 5,
            rows: 5,
            room_count: RandomRange::exactly(2),
            room_width: RandomRange::exactly(5),
            room_height: RandomRange::exactly(5),
            corridor_length: RandomRange::new(1, 3),
        }
    }

    #[test]
    fn test_room_corridor_generator_creation() {
        let generator = RoomCorridorGenerator::new();
        assert_eq!(generator.max_placement_attempts, config::DEFAULT_PLACEMENT_ATTEMPTS);
        assert_eq!(generator.generator_type(), "RoomCorridorGenerator");
        assert_eq!(
            RoomCorridorGenerator::default()
                .with_max_placement_attempts(7)
                .max_placement_attempts,
            7
        );
    }

    #[test]
    fn test_corridor_geometry() {
        let corridor = Corridor::new(Position::new(4, 2), 3, Direction::West);
        assert_eq!(corridor.end(), Position::new(2, 2));
        assert_eq!(
            corridor.positions(),
            vec![Position::new(4, 2), Position::new(3, 2), Position::new(2, 2)]
        );
        assert!(corridor.fits_within(5, 5));
        assert!(!Corridor::new(Position::new(1, 1), 3, Direction::South).fits_within(5, 5));
        assert!(!Corridor::new(Position::new(1, 1), 0, Direction::North).fits_within(5, 5));
    }

    #[test]
    fn test_oversized_corridor_stays_out_of_bounds() {
        let start = Position::new(3, 3);
        let corridor = Corridor::new(start, u32::MAX, Direction::North);
        assert!(corridor.end().y > start.y);
        assert_eq!(corridor.end().x, start.x);
        assert!(!corridor.fits_within(40, 40));
        assert!(!corridor.fits_within(u32::MAX, u32::MAX));

        let corridor = Corridor::new(start, i32::MAX as u32 + 1, Direction::West);
        assert!(corridor.end().x < start.x);
        assert!(!corridor.fits_within(40, 40));
    }

    #[test]
    fn test_blocked_first_room_is_redrawn() {
        let generator = RoomCorridorGenerator::new();
        let mut config = GenerationConfig::new(42);
        config.columns = 20;
        config.rows = 20;
        let mut rng = StdRng::seed_from_u64(42);

        // A centred 10x10 room leaves 5 cells per side, too few for a corridor
        // of at least 6 plus a 3-wide room
        let mut rooms = vec![Room::new(0, Position::new(5, 5), 10, 10)];
        assert!(generator.corridor_from(&rooms[0], &config, &mut rng).is_none());

        let corridor = generator
            .place_corridor(&mut rooms, None, &config, &mut rng)
            .unwrap();
        let room = &rooms[0];
        assert!(room.width == 3 || room.height == 3);
        assert!(room.fits_within(20, 20));
        assert!(corridor.fits_within(20, 20));
        assert!(config.corridor_length.contains(corridor.length));
        assert!(corridor
            .start
            .cardinal_adjacent_positions()
            .iter()
            .any(|&p| room.contains(p)));
    }

    #[test]
    fn test_blocked_later_room_keeps_its_corridor() {
        let generator = RoomCorridorGenerator::new();
        let mut config = GenerationConfig::for_testing(6);
        config.columns = 12;
        config.rows = 12;
        config.room_width = RandomRange::new(3, 12);
        config.room_height = RandomRange::new(3, 12);
        let mut rng = StdRng::seed_from_u64(6);

        let entry = Corridor::new(Position::new(5, 0), 2, Direction::North);
        let mut rooms = vec![
            Room::new(0, Position::new(4, 0), 3, 3),
            Room::new(1, Position::new(0, 2), 12, 10),
        ];
        assert!(generator.corridor_from(&rooms[1], &config, &mut rng).is_none());

        let corridor = generator
            .place_corridor(&mut rooms, Some(&entry), &config, &mut rng)
            .unwrap();
        let room = &rooms[1];
        assert_eq!(room.id, 1);
        assert!(room.contains(entry.end().step(Direction::North)));
        assert!(room.fits_within(12, 12));
        assert!(corridor.fits_within(12, 12));
    }

    #[test]
    fn test_corridor_attempts_are_bounded() {
        let generator = RoomCorridorGenerator::new().with_max_placement_attempts(3);
        let config = tight_config();
        let mut rng = StdRng::seed_from_u64(1);
        let mut rooms = vec![Room::new(0, Position::new(0, 0), 5, 5)];

        match generator.place_corridor(&mut rooms, None, &config, &mut rng) {
            Err(DelveError::LayoutError(message)) => assert!(message.contains("3 attempts")),
            other => panic!("expected a layout error, got {other:?}"),
        }
        assert!(generator
            .place_corridor(&mut [], None, &config, &mut rng)
            .is_err());
    }

    #[test]
    fn test_first_room_is_centered() {
        let generator = RoomCorridorGenerator::new();
        let mut config = GenerationConfig::for_testing(1);
        config.room_width = RandomRange::exactly(4);
        config.room_height = RandomRange::exactly(6);
        let mut rng = StdRng::seed_from_u64(1);

        let room = generator.place_first_room(&config, &mut rng);
        assert_eq!(room.lower_left, Position::new(18, 17));
        assert_eq!(room.entered_from, None);
    }

    #[test]
    fn test_corridor_leaves_room_and_fits() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_testing(2);
        let mut rng = StdRng::seed_from_u64(2);
        let room = Room::new(0, Position::new(18, 18), 4, 4);

        for _ in 0..50 {
            let corridor = generator.corridor_from(&room, &config, &mut rng).unwrap();
            assert!(corridor.direction.is_cardinal());
            assert!(config.corridor_length.contains(corridor.length));
            assert!(corridor.fits_within(config.columns, config.rows));
            assert!(!room.contains(corridor.start));
            assert!(corridor
                .start
                .cardinal_adjacent_positions()
                .iter()
                .any(|&p| room.contains(p)));
        }
    }

    #[test]
    fn test_room_sits_flush_against_corridor_end() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_testing(3);
        let mut rng = StdRng::seed_from_u64(3);

        for direction in Direction::CARDINAL {
            let corridor = Corridor::new(Position::new(20, 20), 3, direction);
            let room = generator.place_room(1, &corridor, &config, &mut rng).unwrap();
            let end = corridor.end();

            assert!(!room.contains(end));
            assert!(room.contains(end.step(direction)));
            assert!(room.fits_within(config.columns, config.rows));
            assert!(config.room_width.contains(room.width));
            assert!(config.room_height.contains(room.height));
            assert_eq!(room.entered_from, Some(direction));
        }
    }

    #[test]
    fn test_room_against_board_edge() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_testing(4);
        let mut rng = StdRng::seed_from_u64(4);

        // Corridor ends in the north-east corner region: only narrow offsets fit
        let corridor = Corridor::new(Position::new(39, 30), 4, Direction::North);
        let room = generator.place_room(1, &corridor, &config, &mut rng).unwrap();
        assert!(room.fits_within(40, 40));
        assert!(room.contains(Position::new(39, 34)));
    }

    #[test]
    fn test_cross_offset_keeps_anchor_inside() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let start = cross_offset(0, 4, 10, &mut rng);
            assert_eq!(start, 0);
            let start = cross_offset(9, 4, 10, &mut rng);
            assert_eq!(start, 6);
            let start = cross_offset(5, 3, 10, &mut rng);
            assert!((3..=5).contains(&start));
        }
    }

    #[test]
    fn test_board_too_small_is_layout_error() {
        let generator = RoomCorridorGenerator::new();
        let config = tight_config();
        let mut rng = StdRng::seed_from_u64(config.seed);

        let result = generator.generate(&config, &mut rng);
        assert!(matches!(result, Err(DelveError::LayoutError(_))));
    }

    #[test]
    fn test_single_room_needs_no_corridor() {
        let generator = RoomCorridorGenerator::new();
        let mut config = tight_config();
        config.room_count = RandomRange::exactly(1);
        let mut rng = StdRng::seed_from_u64(config.seed);

        let dungeon = generator.generate(&config, &mut rng).unwrap();
        assert_eq!(dungeon.rooms.len(), 1);
        assert!(dungeon.corridors.is_empty());
        assert_eq!(dungeon.grid.count(TileType::Floor), 25);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_generation() {
        let generator = RoomCorridorGenerator::new();
        let mut config = GenerationConfig::for_testing(1);
        config.room_width = RandomRange::new(0, 4);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(matches!(
            generator.generate(&config, &mut rng),
            Err(DelveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_generation_with_small_level() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_testing(12345);
        let mut rng = utils::create_rng(&config);

        let dungeon = generator.generate(&config, &mut rng).unwrap();
        assert_eq!(dungeon.columns(), config.columns);
        assert_eq!(dungeon.rows(), config.rows);
        assert!(config.room_count.contains(dungeon.rooms.len() as u32));
        assert_eq!(dungeon.corridors.len(), dungeon.rooms.len() - 1);
        assert!(dungeon.grid.count(TileType::Floor) > 0);
        assert!(generator.validate(&dungeon, &config).is_ok());
    }

    #[test]
    fn test_outer_wall_ring() {
        let dungeon = Dungeon {
            seed: 0,
            grid: Grid::new(4, 3),
            rooms: Vec::new(),
            corridors: Vec::new(),
        };
        let ring = dungeon.outer_wall_positions();
        assert_eq!(ring.len(), 2 * (4 + 2) + 2 * 3);
        assert!(ring.contains(&Position::new(-1, -1)));
        assert!(ring.contains(&Position::new(4, 3)));
        assert!(ring.contains(&Position::new(2, -1)));
        assert!(ring.iter().all(|&p| !dungeon.grid.in_bounds(p)));
        assert!(dungeon.random_floor_position(&mut StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn test_random_floor_accessors() {
        let dungeon = generate_for_testing(21);
        let mut rng = StdRng::seed_from_u64(21);

        for index in 0..dungeon.rooms.len() {
            let pos = dungeon.random_floor_in_room(index, &mut rng).unwrap();
            assert!(dungeon.rooms[index].contains(pos));
            assert_eq!(dungeon.tile_at(pos).unwrap(), TileType::Floor);
        }
        assert!(matches!(
            dungeon.random_floor_in_room(dungeon.rooms.len(), &mut rng),
            Err(DelveError::InvalidState(_))
        ));

        let pos = dungeon.random_floor_position(&mut rng).unwrap();
        assert!(dungeon.room_at(pos).is_some());
    }

    fn generate_for_testing(seed: u64) -> Dungeon {
        crate::generate(&GenerationConfig::for_testing(seed)).unwrap()
    }
}
