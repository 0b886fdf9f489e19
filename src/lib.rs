//! # Delve
//!
//! Seeded room-and-corridor dungeon layouts with grid A* routing for roguelike agents.
//!
//! ## Architecture Overview
//!
//! Delve keeps the algorithmic core of a dungeon crawler free of any engine or
//! renderer. The crate revolves around a few key concepts:
//!
//! - **World Representation**: [`Grid`] of [`TileType`] cells addressed by [`Position`]
//! - **Generation System**: [`RoomCorridorGenerator`] chains rooms and corridors into a [`Dungeon`]
//! - **Pathfinding**: [`AStar`] searches any [`PathCost`] strategy, [`GridPathCost`] reads a grid
//! - **Agents**: [`Wanderer`] caches a route and hands out one step per turn
//!
//! Generation and search are pure, synchronous computations. A generated grid is
//! read-only, so any number of searches can share it.
//!
//! ```
//! use delve::{generate, AStar, GenerationConfig, GridPathCost};
//!
//! let dungeon = generate(&GenerationConfig::for_testing(7)).unwrap();
//! let start = dungeon.rooms[0].center();
//! let goal = dungeon.rooms[dungeon.rooms.len() - 1].center();
//!
//! let outcome = AStar::new(GridPathCost::new(&dungeon.grid)).find_path(start, goal);
//! assert!(outcome.is_found());
//! ```

pub mod game;
pub mod generation;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use utils::*;

/// Core error type for the Delve crate.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generation parameters were rejected before generation started
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Room or corridor placement could not be completed
    #[error("Layout failed: {0}")]
    LayoutError(String),

    /// A coordinate query fell outside the grid
    #[error("Position ({}, {}) is outside the {columns}x{rows} grid", position.x, position.y)]
    OutOfBounds {
        position: Position,
        columns: u32,
        rows: u32,
    },

    /// An accessor was used in a way the data cannot satisfy
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation and search constants.
pub mod config {
    /// Default board width in tiles
    pub const DEFAULT_COLUMNS: u32 = 100;

    /// Default board height in tiles
    pub const DEFAULT_ROWS: u32 = 100;

    /// Largest accepted board side; keeps every coordinate well inside `i32`
    pub const MAX_BOARD_DIMENSION: u32 = 4096;

    /// Largest accepted room count
    pub const MAX_ROOM_COUNT: u32 = 10_000;

    /// Attempts to place a single room or corridor before giving up
    pub const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Node expansions a single A* search may perform before aborting
    pub const DEFAULT_MAX_EXPANSIONS: usize = 1_000_000;

    /// Re-rolls allowed when picking a wander target distinct from the agent's cell
    pub const WANDER_TARGET_ATTEMPTS: u32 = 32;
}
