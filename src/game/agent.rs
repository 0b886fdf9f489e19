//! # Agent Module
//!
//! Route caching for autonomous agents that walk a generated dungeon.
//!
//! The pathfinder is stateless per call. An agent that wants to walk a route one
//! turn at a time owns a [`Wanderer`], which keeps the remaining steps and asks
//! for a fresh route once they run out.

use crate::{
    config, AStar, DelveResult, Direction, Dungeon, GridPathCost, Movement, Position,
    SearchOutcome,
};
use log::{debug, trace};
use rand::Rng;
use std::collections::VecDeque;

/// Per-agent route cache: wander between random floor tiles, one step per turn.
#[derive(Debug, Clone, Default)]
pub struct Wanderer {
    /// Positions still to be visited, next step first
    pub route: VecDeque<Position>,
    /// Where the current route ends
    pub target: Option<Position>,
    /// Movement model used when planning routes
    pub movement: Movement,
}

impl Wanderer {
    /// Creates a wanderer with no route and eight-way movement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a wanderer planning with the given movement model.
    pub fn with_movement(movement: Movement) -> Self {
        Self {
            movement,
            ..Self::default()
        }
    }

    /// Checks if a route is cached.
    pub fn has_route(&self) -> bool {
        !self.route.is_empty()
    }

    /// Drops the cached route.
    pub fn clear(&mut self) {
        self.route.clear();
        self.target = None;
    }

    /// Gets the next move for an agent standing at `current`.
    ///
    /// Follows the cached route if there is one. Otherwise picks a random floor
    /// tile other than `current`, routes to it and returns the first step.
    /// Returns `Ok(None)` when no reachable target could be found this turn.
    pub fn next_move<R: Rng + ?Sized>(
        &mut self,
        dungeon: &Dungeon,
        current: Position,
        rng: &mut R,
    ) -> DelveResult<Option<Direction>> {
        if let Some(direction) = self.follow_route(current) {
            return Ok(Some(direction));
        }

        let Some(target) = self.pick_target(dungeon, current, rng)? else {
            trace!("No wander target distinct from {}", current);
            return Ok(None);
        };

        match self.plan(dungeon, current, target) {
            SearchOutcome::Found(path) => {
                self.route = path.into_positions().into_iter().skip(1).collect();
                self.target = Some(target);
                debug!(
                    "Wandering from {} to {} over {} steps",
                    current,
                    target,
                    self.route.len()
                );
                Ok(self.follow_route(current))
            }
            outcome => {
                debug!("No route from {} to {}: {:?}", current, target, outcome);
                self.clear();
                Ok(None)
            }
        }
    }

    /// Routes straight to `target` and returns only the first step.
    ///
    /// The cached wander route is left untouched. Returns `Ok(None)` if the agent
    /// already stands on the target or the target is unreachable.
    pub fn seek(
        &self,
        dungeon: &Dungeon,
        current: Position,
        target: Position,
    ) -> DelveResult<Option<Direction>> {
        dungeon.tile_at(target)?;

        let direction = self
            .plan(dungeon, current, target)
            .into_path()
            .and_then(|path| path.directions().first().copied());
        Ok(direction)
    }

    /// Pops the next cached step, dropping the route if it no longer starts next
    /// to `current`.
    fn follow_route(&mut self, current: Position) -> Option<Direction> {
        let next = self.route.pop_front()?;
        match Direction::from_delta(next - current) {
            Some(direction) => {
                if self.route.is_empty() {
                    self.target = None;
                }
                Some(direction)
            }
            None => {
                // Path is invalid, clear it
                trace!("Cached step {} is not adjacent to {}, replanning", next, current);
                self.clear();
                None
            }
        }
    }

    fn pick_target<R: Rng + ?Sized>(
        &self,
        dungeon: &Dungeon,
        current: Position,
        rng: &mut R,
    ) -> DelveResult<Option<Position>> {
        for _ in 0..config::WANDER_TARGET_ATTEMPTS {
            let candidate = dungeon.random_floor_position(rng)?;
            if candidate != current {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    fn plan(&self, dungeon: &Dungeon, start: Position, goal: Position) -> SearchOutcome {
        let cost = GridPathCost::new(&dungeon.grid).with_movement(self.movement);
        let budget = dungeon.columns() as usize * dungeon.rows() as usize;
        AStar::new(cost)
            .with_max_expansions(budget)
            .find_path(start, goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Grid, Room};
    use rand::{rngs::StdRng, SeedableRng};

    /// Two 3x3 rooms joined by a corridor along the middle row.
    fn dumbbell() -> Dungeon {
        let grid = Grid::from_ascii(&[
            "###########",
            "#...###...#",
            "#.........#",
            "#...###...#",
            "###########",
        ])
        .unwrap();
        Dungeon {
            seed: 0,
            grid,
            rooms: vec![
                Room::new(0, Position::new(1, 1), 3, 3),
                Room::new(1, Position::new(7, 1), 3, 3),
            ],
            corridors: Vec::new(),
        }
    }

    #[test]
    fn test_wanderer_creation() {
        let wanderer = Wanderer::new();
        assert!(!wanderer.has_route());
        assert!(wanderer.target.is_none());
        assert_eq!(wanderer.movement, Movement::EightWay);
        assert_eq!(Wanderer::with_movement(Movement::FourWay).movement, Movement::FourWay);
    }

    #[test]
    fn test_follows_cached_route_step_by_step() {
        let mut wanderer = Wanderer::new();
        wanderer.route = VecDeque::from(vec![Position::new(2, 2), Position::new(3, 3)]);
        wanderer.target = Some(Position::new(3, 3));

        assert_eq!(wanderer.follow_route(Position::new(1, 2)), Some(Direction::East));
        assert!(wanderer.target.is_some());
        assert_eq!(wanderer.follow_route(Position::new(2, 2)), Some(Direction::Northeast));
        assert!(!wanderer.has_route());
        assert!(wanderer.target.is_none());
    }

    #[test]
    fn test_displaced_agent_drops_route() {
        let mut wanderer = Wanderer::new();
        wanderer.route = VecDeque::from(vec![Position::new(5, 5), Position::new(6, 5)]);
        assert_eq!(wanderer.follow_route(Position::new(1, 1)), None);
        assert!(!wanderer.has_route());
    }

    #[test]
    fn test_next_move_walks_to_target() {
        let dungeon = dumbbell();
        let mut wanderer = Wanderer::new();
        let mut rng = StdRng::seed_from_u64(8);
        let mut position = Position::new(1, 1);

        let direction = wanderer
            .next_move(&dungeon, position, &mut rng)
            .unwrap()
            .expect("open dungeon always has a route");
        position = position.step(direction);
        assert!(dungeon.grid.is_floor(position));

        let target = wanderer.target;
        while wanderer.has_route() {
            let direction = wanderer.next_move(&dungeon, position, &mut rng).unwrap().unwrap();
            position = position.step(direction);
            assert!(dungeon.grid.is_floor(position));
        }
        if let Some(target) = target {
            assert_eq!(position, target);
        }
    }

    #[test]
    fn test_seek_returns_first_step() {
        let dungeon = dumbbell();
        let wanderer = Wanderer::new();

        let step = wanderer
            .seek(&dungeon, Position::new(3, 2), Position::new(9, 2))
            .unwrap();
        assert_eq!(step, Some(Direction::East));

        let already_there = wanderer
            .seek(&dungeon, Position::new(9, 2), Position::new(9, 2))
            .unwrap();
        assert_eq!(already_there, None);

        assert!(wanderer
            .seek(&dungeon, Position::new(3, 2), Position::new(40, 2))
            .is_err());
    }

    #[test]
    fn test_seek_unreachable_target() {
        let dungeon = dumbbell();
        let wanderer = Wanderer::new();
        let step = wanderer
            .seek(&dungeon, Position::new(1, 1), Position::new(5, 3))
            .unwrap();
        assert_eq!(step, None);
    }
}
