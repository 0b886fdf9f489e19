//! # Grid Routing
//!
//! A* search over an abstract integer grid, and the move-cost strategy that
//! backs it with a generated [`Grid`].
//!
//! The search never looks at tiles itself. Everything it knows about the board
//! comes from a [`PathCost`] strategy, so weighted terrain or fog of war can be
//! plugged in without touching the algorithm.

use crate::{
    config, manhattan_cost, octile_distance, Direction, Grid, Position, DIAGONAL_COST,
    ORTHOGONAL_COST,
};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Strategy answering what it costs to move between two neighbouring cells.
pub trait PathCost {
    /// Cost of stepping from `from` onto `to`, or `None` if there is no edge.
    ///
    /// Returned costs must be non-negative.
    fn cost(&self, to: Position, from: Position) -> Option<f64>;

    /// Estimated remaining cost from `from` to `goal`.
    ///
    /// Must never overestimate, otherwise returned paths may not be optimal.
    fn heuristic(&self, from: Position, goal: Position) -> f64 {
        octile_distance(from, goal)
    }
}

impl<T: PathCost + ?Sized> PathCost for &T {
    fn cost(&self, to: Position, from: Position) -> Option<f64> {
        (**self).cost(to, from)
    }

    fn heuristic(&self, from: Position, goal: Position) -> f64 {
        (**self).heuristic(from, goal)
    }
}

/// Which neighbours an agent may step onto.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Orthogonal and diagonal steps
    #[default]
    EightWay,
    /// Orthogonal steps only
    FourWay,
}

/// Move costs read from a generated grid.
///
/// Walls block movement, and a diagonal step additionally needs both cells it
/// squeezes between to be floor, so agents never cut wall corners.
///
/// # Examples
///
/// ```
/// use delve::{Grid, GridPathCost, PathCost, Position};
///
/// let grid = Grid::from_ascii(&[
///     ".#",
///     "#.",
/// ]).unwrap();
/// let cost = GridPathCost::new(&grid);
/// // Both corner cells are wall, so the diagonal is closed.
/// assert_eq!(cost.cost(Position::new(1, 0), Position::new(0, 1)), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GridPathCost<'a> {
    grid: &'a Grid,
    movement: Movement,
}

impl<'a> GridPathCost<'a> {
    /// Creates an eight-way cost strategy over `grid`.
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            movement: Movement::EightWay,
        }
    }

    /// Switches the movement model.
    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = movement;
        self
    }

    /// The grid costs are read from.
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// The configured movement model.
    pub fn movement(&self) -> Movement {
        self.movement
    }

    fn both_floor(&self, to: Position, from: Position) -> bool {
        self.grid.is_floor(to) && self.grid.is_floor(from)
    }
}

impl PathCost for GridPathCost<'_> {
    fn cost(&self, to: Position, from: Position) -> Option<f64> {
        match (to.x.abs_diff(from.x), to.y.abs_diff(from.y)) {
            (1, 0) | (0, 1) => self.both_floor(to, from).then_some(ORTHOGONAL_COST),
            (1, 1) if self.movement == Movement::EightWay => {
                let corners_clear = self.grid.is_floor(Position::new(to.x, from.y))
                    && self.grid.is_floor(Position::new(from.x, to.y));
                (corners_clear && self.both_floor(to, from)).then_some(DIAGONAL_COST)
            }
            _ => None,
        }
    }

    fn heuristic(&self, from: Position, goal: Position) -> f64 {
        match self.movement {
            Movement::EightWay => octile_distance(from, goal),
            Movement::FourWay => manhattan_cost(from, goal),
        }
    }
}

/// An ordered route from start to goal, both inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    positions: Vec<Position>,
    cost: f64,
}

impl Path {
    /// All positions along the route, starting with the start cell.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Total move cost of the route.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of positions, including start and goal.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// A found path always holds at least its start cell.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of moves needed to walk the route.
    pub fn step_count(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    /// First position of the route.
    pub fn start(&self) -> Option<Position> {
        self.positions.first().copied()
    }

    /// Last position of the route.
    pub fn goal(&self) -> Option<Position> {
        self.positions.last().copied()
    }

    /// The route expressed as one direction per move.
    pub fn directions(&self) -> Vec<Direction> {
        self.positions
            .windows(2)
            .filter_map(|pair| Direction::from_delta(pair[1] - pair[0]))
            .collect()
    }

    /// Consumes the path, returning its positions.
    pub fn into_positions(self) -> Vec<Position> {
        self.positions
    }
}

/// Result of a single search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The cheapest route to the goal
    Found(Path),
    /// Every reachable cell was explored without reaching the goal
    NotFound,
    /// The expansion budget ran out first
    Aborted { expanded: usize },
}

impl SearchOutcome {
    /// Checks if the search produced a path.
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    /// Borrows the found path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            _ => None,
        }
    }

    /// Converts the outcome into the found path, if any.
    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            _ => None,
        }
    }
}

/// Search record for one visited cell.
#[derive(Debug, Clone)]
struct AStarNode {
    position: Position,
    g_cost: f64,
    h_cost: f64,
    /// Index of the node this one was reached from, within the same search
    parent: Option<usize>,
    closed: bool,
}

impl AStarNode {
    fn new(position: Position, g_cost: f64, h_cost: f64, parent: Option<usize>) -> Self {
        Self {
            position,
            g_cost,
            h_cost,
            parent,
            closed: false,
        }
    }

    fn f_cost(&self) -> f64 {
        self.g_cost + self.h_cost
    }
}

/// Open set entry. Lower `f_cost` wins, then lower `h_cost`, then earlier insertion.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f_cost: f64,
    h_cost: f64,
    sequence: u64,
    node: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior in BinaryHeap
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.h_cost.total_cmp(&self.h_cost))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// A* pathfinder parameterized by a cost strategy.
///
/// Each call to [`AStar::find_path`] allocates its own open set and node
/// records, so one pathfinder can serve many searches, including concurrent
/// ones through shared references.
///
/// # Examples
///
/// ```
/// use delve::{AStar, Grid, GridPathCost, Position, TileType};
///
/// let grid = Grid::filled(5, 5, TileType::Floor);
/// let path = AStar::new(GridPathCost::new(&grid))
///     .find_path(Position::new(0, 0), Position::new(4, 4))
///     .into_path()
///     .unwrap();
/// assert_eq!(path.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct AStar<C> {
    cost: C,
    max_expansions: usize,
}

impl<C: PathCost> AStar<C> {
    /// Creates a pathfinder with the default expansion budget.
    pub fn new(cost: C) -> Self {
        Self {
            cost,
            max_expansions: config::DEFAULT_MAX_EXPANSIONS,
        }
    }

    /// Limits how many nodes one search may expand before reporting
    /// [`SearchOutcome::Aborted`].
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Finds the cheapest route from `start` to `goal`.
    pub fn find_path(&self, start: Position, goal: Position) -> SearchOutcome {
        if start == goal {
            return SearchOutcome::Found(Path {
                positions: vec![start],
                cost: 0.0,
            });
        }

        let mut nodes = Vec::new();
        let mut node_index: HashMap<Position, usize> = HashMap::new();
        let mut open_set = BinaryHeap::new();
        let mut sequence = 0u64;
        let mut expanded = 0usize;

        let start_h = self.cost.heuristic(start, goal);
        nodes.push(AStarNode::new(start, 0.0, start_h, None));
        node_index.insert(start, 0);
        open_set.push(OpenEntry {
            f_cost: start_h,
            h_cost: start_h,
            sequence,
            node: 0,
        });

        while let Some(entry) = open_set.pop() {
            let current = entry.node;
            if nodes[current].closed {
                continue;
            }

            if nodes[current].position == goal {
                let path = reconstruct_path(&nodes, current);
                debug!(
                    "A* found {} -> {} in {} steps (cost {:.3}, {} expanded)",
                    start,
                    goal,
                    path.step_count(),
                    path.cost(),
                    expanded
                );
                return SearchOutcome::Found(path);
            }

            if expanded >= self.max_expansions {
                debug!("A* aborted {} -> {} after {} expansions", start, goal, expanded);
                return SearchOutcome::Aborted { expanded };
            }
            expanded += 1;
            nodes[current].closed = true;

            let position = nodes[current].position;
            let g_cost = nodes[current].g_cost;

            for direction in Direction::ALL {
                let neighbour = position.step(direction);
                let Some(step_cost) = self.cost.cost(neighbour, position) else {
                    continue;
                };
                debug_assert!(step_cost >= 0.0, "negative move cost {step_cost}");
                let tentative_g = g_cost + step_cost;

                let index = match node_index.get(&neighbour).copied() {
                    Some(index) => {
                        let node = &mut nodes[index];
                        if node.closed || tentative_g >= node.g_cost {
                            continue;
                        }
                        node.g_cost = tentative_g;
                        node.parent = Some(current);
                        index
                    }
                    None => {
                        let index = nodes.len();
                        let h_cost = self.cost.heuristic(neighbour, goal);
                        nodes.push(AStarNode::new(neighbour, tentative_g, h_cost, Some(current)));
                        node_index.insert(neighbour, index);
                        index
                    }
                };

                sequence += 1;
                open_set.push(OpenEntry {
                    f_cost: nodes[index].f_cost(),
                    h_cost: nodes[index].h_cost,
                    sequence,
                    node: index,
                });
            }
        }

        trace!("A* exhausted open set for {} -> {} ({} expanded)", start, goal, expanded);
        SearchOutcome::NotFound
    }
}

/// Walks parent links back from `goal_index` and returns the route start-first.
fn reconstruct_path(nodes: &[AStarNode], goal_index: usize) -> Path {
    let mut positions = Vec::new();
    let mut cursor = Some(goal_index);
    while let Some(index) = cursor {
        positions.push(nodes[index].position);
        cursor = nodes[index].parent;
    }
    positions.reverse();

    Path {
        positions,
        cost: nodes[goal_index].g_cost,
    }
}

/// Runs a single search with the default budget.
pub fn find_path<C: PathCost>(cost: C, start: Position, goal: Position) -> SearchOutcome {
    AStar::new(cost).find_path(start, goal)
}
