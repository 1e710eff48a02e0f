//! Single-agent planning to a cleared board: breadth-first, uniform-cost
//! and A* over Pacman's own moves (ghosts are not simulated).

use super::frontier::{Frontier, PathNode};
use pacman_core::game::GameState;
use pacman_core::model::{Direction, Grid, Position};
use std::collections::HashSet;
use std::fmt;
use tracing::{Level, event};

/// Step onto a cell that still holds food.
pub const FOOD_STEP_COST: u32 = 1;
/// Step onto an empty cell.
pub const EMPTY_STEP_COST: u32 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathAlgorithm {
    Bfs,
    Ucs,
    AStar,
}

impl PathAlgorithm {
    pub const ALL: [PathAlgorithm; 3] = [PathAlgorithm::Bfs, PathAlgorithm::Ucs, PathAlgorithm::AStar];

    pub const fn label(self) -> &'static str {
        match self {
            PathAlgorithm::Bfs => "bfs",
            PathAlgorithm::Ucs => "ucs",
            PathAlgorithm::AStar => "astar",
        }
    }

    fn frontier<S>(self) -> Frontier<S> {
        match self {
            PathAlgorithm::Bfs => Frontier::fifo(),
            PathAlgorithm::Ucs | PathAlgorithm::AStar => Frontier::priority(),
        }
    }

    fn estimate<S: GameState>(self, state: &S) -> u32 {
        match self {
            PathAlgorithm::AStar => farthest_food_distance(state),
            PathAlgorithm::Bfs | PathAlgorithm::Ucs => 0,
        }
    }
}

impl fmt::Display for PathAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanStats {
    /// States taken off the frontier.
    pub nodes_expanded: usize,
    /// Successors produced, including already visited ones.
    pub nodes_generated: usize,
    pub path_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub moves: Vec<Direction>,
    pub stats: PlanStats,
}

pub fn step_cost<S: GameState>(parent: &S, child: &S) -> u32 {
    if parent.food().get(child.pacman_position()) {
        FOOD_STEP_COST
    } else {
        EMPTY_STEP_COST
    }
}

/// Largest Manhattan distance from Pacman to a remaining pellet; zero when
/// the board is clear.
pub fn farthest_food_distance<S: GameState>(state: &S) -> u32 {
    let pacman = state.pacman_position();
    state
        .food()
        .positions()
        .map(|pellet| pacman.manhattan(pellet))
        .max()
        .unwrap_or(0)
}

type VisitKey = (Position, Grid);

fn visit_key<S: GameState>(state: &S) -> VisitKey {
    (state.pacman_position(), state.food().clone())
}

/// Searches for a sequence of Pacman moves reaching a winning state.
///
/// A state is marked visited when it enters the frontier and is never
/// enqueued again, even if later reached more cheaply. The goal test runs
/// when a state leaves the frontier. Returns `None` when no winning state is
/// reachable.
pub fn plan<S: GameState>(algorithm: PathAlgorithm, start: &S) -> Option<Plan> {
    let mut frontier = algorithm.frontier();
    let mut visited: HashSet<VisitKey> = HashSet::new();
    let mut stats = PlanStats::default();

    visited.insert(visit_key(start));
    frontier.push(PathNode::root(start.clone(), algorithm.estimate(start)));

    while let Some(node) = frontier.pop() {
        if node.state.is_win() {
            stats.path_cost = node.backward;
            event!(
                target: "pacman_bot::plan",
                Level::DEBUG,
                algorithm = %algorithm,
                length = node.moves.len(),
                cost = stats.path_cost,
                expanded = stats.nodes_expanded,
                generated = stats.nodes_generated,
            );
            return Some(Plan {
                moves: node.moves,
                stats,
            });
        }

        stats.nodes_expanded += 1;
        for (child, action) in node.state.pacman_successors() {
            stats.nodes_generated += 1;
            if !visited.insert(visit_key(&child)) {
                continue;
            }
            let cost = step_cost(&node.state, &child);
            let forward = algorithm.estimate(&child);
            frontier.push(node.child(child, action, cost, forward));
        }
    }

    event!(
        target: "pacman_bot::plan",
        Level::DEBUG,
        algorithm = %algorithm,
        expanded = stats.nodes_expanded,
        "no winning state reachable"
    );
    None
}
