use super::Agent;
use crate::search::{PathAlgorithm, PlanStats, plan};
use pacman_core::game::GameState;
use pacman_core::model::Direction;
use std::collections::VecDeque;
use tracing::{Level, event};

/// Plans a full route to a cleared board once and replays it move by move,
/// planning again only after the route is used up.
#[derive(Debug, Clone)]
pub struct PlannerAgent {
    name: String,
    algorithm: PathAlgorithm,
    route: VecDeque<Direction>,
    searches: u32,
    last_stats: Option<PlanStats>,
}

impl PlannerAgent {
    pub fn new(algorithm: PathAlgorithm) -> Self {
        Self::named(algorithm.label(), algorithm)
    }

    pub fn named(name: impl Into<String>, algorithm: PathAlgorithm) -> Self {
        Self {
            name: name.into(),
            algorithm,
            route: VecDeque::new(),
            searches: 0,
            last_stats: None,
        }
    }

    pub fn algorithm(&self) -> PathAlgorithm {
        self.algorithm
    }

    /// Moves still queued for replay.
    pub fn cached_route(&self) -> &VecDeque<Direction> {
        &self.route
    }

    pub fn searches(&self) -> u32 {
        self.searches
    }

    pub fn last_stats(&self) -> Option<PlanStats> {
        self.last_stats
    }
}

impl<S: GameState> Agent<S> for PlannerAgent {
    fn choose_action(&mut self, state: &S) -> Direction {
        if let Some(next) = self.route.pop_front() {
            return next;
        }
        if state.food().is_empty() {
            return Direction::Stop;
        }

        self.searches += 1;
        let Some(found) = plan(self.algorithm, state) else {
            self.last_stats = None;
            return Direction::Stop;
        };

        if tracing::enabled!(Level::INFO) {
            event!(
                target: "pacman_bot::decision",
                Level::INFO,
                agent = %self.name,
                algorithm = %self.algorithm,
                search = self.searches,
                route_length = found.moves.len(),
                cost = found.stats.path_cost,
                expanded = found.stats.nodes_expanded,
            );
        }

        self.last_stats = Some(found.stats);
        self.route = found.moves.into();
        self.route.pop_front().unwrap_or(Direction::Stop)
    }

    fn reset(&mut self) {
        self.route.clear();
        self.searches = 0;
        self.last_stats = None;
    }

    fn name(&self) -> &str {
        &self.name
    }
}
