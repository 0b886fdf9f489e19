//! # Grid Mathematics
//!
//! Move costs and admissible distance estimates for grid routing.

use crate::Position;

/// Cost of one orthogonal step.
pub const ORTHOGONAL_COST: f64 = 1.0;

/// Cost of one diagonal step.
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// Octile distance: the exact cost of an unobstructed eight-way walk.
///
/// Never overestimates the true remaining cost when diagonal steps cost
/// [`DIAGONAL_COST`] and orthogonal steps cost [`ORTHOGONAL_COST`].
///
/// # Examples
///
/// ```
/// use delve::{octile_distance, Position, DIAGONAL_COST};
///
/// let d = octile_distance(Position::new(0, 0), Position::new(4, 4));
/// assert!((d - 4.0 * DIAGONAL_COST).abs() < 1e-9);
/// ```
pub fn octile_distance(from: Position, to: Position) -> f64 {
    let dx = from.x.abs_diff(to.x) as f64;
    let dy = from.y.abs_diff(to.y) as f64;
    let (long, short) = if dx > dy { (dx, dy) } else { (dy, dx) };
    ORTHOGONAL_COST * long + (DIAGONAL_COST - ORTHOGONAL_COST) * short
}

/// Manhattan distance in step costs, exact for an unobstructed four-way walk.
pub fn manhattan_cost(from: Position, to: Position) -> f64 {
    from.manhattan_distance(to) as f64 * ORTHOGONAL_COST
}
