//! # World Representation
//!
//! The tile grid a dungeon is carved into and that agents route across.
//!
//! A [`Grid`] starts out as solid wall and only the generator carves floor into
//! it. Once handed out it is read-only: there is no public mutator, so any number
//! of searches can share one grid.

use crate::{DelveError, DelveResult, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a single grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Impassable rock
    #[default]
    Wall,
    /// Open ground agents can walk on
    Floor,
}

impl TileType {
    /// Checks if this tile type allows movement.
    pub fn is_passable(self) -> bool {
        matches!(self, TileType::Floor)
    }

    /// Returns the ASCII character used to dump this tile.
    pub fn to_char(self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Floor => '.',
        }
    }

    /// Parses the ASCII character produced by [`TileType::to_char`].
    pub fn from_char(c: char) -> Option<TileType> {
        match c {
            '#' => Some(TileType::Wall),
            '.' => Some(TileType::Floor),
            _ => None,
        }
    }
}

/// A fixed-size `columns x rows` board of tiles.
///
/// Cells are addressed by `(x, y)` with `0 <= x < columns` and `0 <= y < rows`,
/// `y` growing northward.
///
/// # Examples
///
/// ```
/// use delve::{Grid, Position, TileType};
///
/// let grid = Grid::from_ascii(&[
///     "###",
///     "#..",
/// ]).unwrap();
/// assert_eq!(grid.columns(), 3);
/// assert_eq!(grid.get(Position::new(1, 0)), Some(TileType::Floor));
/// assert_eq!(grid.get(Position::new(1, 1)), Some(TileType::Wall));
/// assert!(grid.tile(Position::new(3, 0)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Grid {
    columns: u32,
    rows: u32,
    /// Row-major storage, south row first
    tiles: Vec<TileType>,
}

impl Grid {
    /// Creates a grid of the given size filled with walls.
    pub fn new(columns: u32, rows: u32) -> Self {
        Self::filled(columns, rows, TileType::Wall)
    }

    /// Creates a grid of the given size filled with `tile`.
    pub fn filled(columns: u32, rows: u32, tile: TileType) -> Self {
        Self {
            columns,
            rows,
            tiles: vec![tile; columns as usize * rows as usize],
        }
    }

    /// Builds a grid from ASCII rows listed north to south (`#` wall, `.` floor).
    pub fn from_ascii<S: AsRef<str>>(lines: &[S]) -> DelveResult<Self> {
        let rows = lines.len();
        let columns = lines.first().map_or(0, |line| line.as_ref().chars().count());
        if rows == 0 || columns == 0 {
            return Err(DelveError::InvalidConfig(
                "ASCII grid must have at least one non-empty row".to_string(),
            ));
        }

        let mut grid = Grid::new(columns as u32, rows as u32);
        for (row_index, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != columns {
                return Err(DelveError::InvalidConfig(format!(
                    "ASCII row {} has {} cells, expected {}",
                    row_index,
                    line.chars().count(),
                    columns
                )));
            }

            let y = (rows - 1 - row_index) as i32;
            for (x, c) in line.chars().enumerate() {
                let tile = TileType::from_char(c).ok_or_else(|| {
                    DelveError::InvalidConfig(format!("unknown tile character {c:?}"))
                })?;
                grid.set_tile(Position::new(x as i32, y), tile)?;
            }
        }

        Ok(grid)
    }

    /// Width of the grid in tiles.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Height of the grid in tiles.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Checks if a position lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.columns && (pos.y as u32) < self.rows
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.columns as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Gets the tile at a position, or `None` outside the grid.
    pub fn get(&self, pos: Position) -> Option<TileType> {
        self.index(pos).map(|index| self.tiles[index])
    }

    /// Gets the tile at a position, reporting [`DelveError::OutOfBounds`] outside the grid.
    pub fn tile(&self, pos: Position) -> DelveResult<TileType> {
        self.get(pos).ok_or(DelveError::OutOfBounds {
            position: pos,
            columns: self.columns,
            rows: self.rows,
        })
    }

    /// Checks if the position is inside the grid and walkable.
    pub fn is_floor(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(TileType::is_passable)
    }

    /// Sets a tile. Only generation (and ASCII parsing) write to a grid.
    pub(crate) fn set_tile(&mut self, pos: Position, tile: TileType) -> DelveResult<()> {
        let index = self.index(pos).ok_or(DelveError::OutOfBounds {
            position: pos,
            columns: self.columns,
            rows: self.rows,
        })?;
        self.tiles[index] = tile;
        Ok(())
    }

    /// Iterates over every position and its tile, south row first.
    pub fn iter(&self) -> impl Iterator<Item = (Position, TileType)> + '_ {
        let columns = self.columns as usize;
        self.tiles.iter().enumerate().map(move |(index, &tile)| {
            let pos = Position::new((index % columns) as i32, (index / columns) as i32);
            (pos, tile)
        })
    }

    /// Counts tiles of the given type.
    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Gets all floor positions, south row first.
    pub fn floor_positions(&self) -> Vec<Position> {
        self.iter()
            .filter(|(_, tile)| tile.is_passable())
            .map(|(pos, _)| pos)
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.rows as i32).rev() {
            for x in 0..self.columns as i32 {
                let tile = self.get(Position::new(x, y)).unwrap_or_default();
                write!(f, "{}", tile.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
