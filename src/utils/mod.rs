//! # Utilities Module
//!
//! Distance heuristics and the grid pathfinder used for agent movement.

pub mod math;
pub mod routing;

pub use math::*;
pub use routing::*;
