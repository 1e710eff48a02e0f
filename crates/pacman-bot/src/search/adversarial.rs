//! Minimax family over [`GameState`]: plain minimax, alpha-beta and
//! depth-limited alpha-beta share one recursion.
//!
//! Pacman is the MAX player at turn 0; ghost `i` plays MIN at turn `i + 1`.
//! Nodes on the current root-to-node path are tracked so that a repeated
//! position is never expanded twice along the same line of play. A child that
//! would repeat such a position, or whose subtree yields no value, is ignored
//! by its parent.

use super::evaluate::{EvalFrame, Evaluator, ReachHistory};
use pacman_core::ConfigError;
use pacman_core::game::{GameState, StateSignature};
use pacman_core::model::Direction;
use std::collections::HashSet;
use std::fmt;
use tracing::{Level, event};

pub const DEFAULT_DEPTH: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchVariant {
    Minimax,
    AlphaBeta,
    DepthLimited { depth: u32 },
}

impl SearchVariant {
    pub fn depth_limited(depth: u32) -> Result<Self, ConfigError> {
        if depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(SearchVariant::DepthLimited { depth })
    }

    pub const fn prunes(self) -> bool {
        !matches!(self, SearchVariant::Minimax)
    }

    pub const fn depth_limit(self) -> Option<u32> {
        match self {
            SearchVariant::DepthLimited { depth } => Some(depth),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SearchVariant::Minimax => "minimax",
            SearchVariant::AlphaBeta => "alpha_beta",
            SearchVariant::DepthLimited { .. } => "h_minimax",
        }
    }
}

impl fmt::Display for SearchVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchVariant::DepthLimited { depth } => write!(f, "{}(depth={depth})", self.label()),
            _ => f.write_str(self.label()),
        }
    }
}

/// A position together with the agent about to move.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub signature: StateSignature,
    pub turn: usize,
}

impl NodeKey {
    pub fn of<S: GameState>(state: &S, turn: usize) -> Self {
        Self {
            signature: StateSignature::of(state),
            turn,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Calls into the recursion, leaves included.
    pub nodes_visited: usize,
    /// Nodes whose successors were generated.
    pub nodes_expanded: usize,
    pub evaluations: usize,
    pub cycle_skips: usize,
    pub prunes: usize,
    pub max_depth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub action: Direction,
    /// `None` when no successor of the root produced a value.
    pub value: Option<f64>,
    pub stats: SearchStats,
}

#[derive(Debug, Clone, Copy)]
pub struct AdversarialSearch<E> {
    variant: SearchVariant,
    evaluator: E,
}

impl<E: Evaluator> AdversarialSearch<E> {
    pub fn new(variant: SearchVariant, evaluator: E) -> Self {
        Self { variant, evaluator }
    }

    pub fn variant(&self) -> SearchVariant {
        self.variant
    }

    pub fn run<S: GameState>(&self, root: &S, history: &ReachHistory) -> SearchOutcome {
        let mut walk = Walk {
            variant: self.variant,
            evaluator: &self.evaluator,
            history,
            agents: root.ghost_count() + 1,
            path: HashSet::new(),
            stats: SearchStats::default(),
        };
        let best = walk.value(root, 0, 0, f64::NEG_INFINITY, f64::INFINITY, None);
        debug_assert!(walk.path.is_empty());

        let outcome = SearchOutcome {
            action: best.map(|(_, action)| action).unwrap_or(Direction::Stop),
            value: best.map(|(value, _)| value),
            stats: walk.stats,
        };

        event!(
            target: "pacman_bot::search",
            Level::DEBUG,
            variant = %self.variant,
            action = %outcome.action,
            value = ?outcome.value,
            visited = outcome.stats.nodes_visited,
            expanded = outcome.stats.nodes_expanded,
            cycle_skips = outcome.stats.cycle_skips,
            prunes = outcome.stats.prunes,
        );
        outcome
    }
}

/// Per-call traversal state.
struct Walk<'a, E> {
    variant: SearchVariant,
    evaluator: &'a E,
    history: &'a ReachHistory,
    agents: usize,
    path: HashSet<NodeKey>,
    stats: SearchStats,
}

impl<E: Evaluator> Walk<'_, E> {
    fn value<S: GameState>(
        &mut self,
        state: &S,
        turn: usize,
        depth: u32,
        alpha: f64,
        beta: f64,
        first_round: Option<&S>,
    ) -> Option<(f64, Direction)> {
        self.stats.nodes_visited += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let cut = self.variant.depth_limit().is_some_and(|limit| depth >= limit);
        if state.is_terminal() || cut {
            self.stats.evaluations += 1;
            let frame = EvalFrame {
                state,
                first_round: first_round.unwrap_or(state),
                history: self.history,
            };
            return Some((self.evaluator.evaluate(&frame), Direction::Stop));
        }

        let key = NodeKey::of(state, turn);
        self.path.insert(key.clone());
        let best = self.expand(state, turn, depth, alpha, beta, first_round);
        self.path.remove(&key);
        best
    }

    fn expand<S: GameState>(
        &mut self,
        state: &S,
        turn: usize,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        first_round: Option<&S>,
    ) -> Option<(f64, Direction)> {
        self.stats.nodes_expanded += 1;
        let maximizing = turn == 0;
        let successors = if maximizing {
            state.pacman_successors()
        } else {
            state.ghost_successors(turn - 1)
        };
        let next_turn = (turn + 1) % self.agents;

        let mut best: Option<(f64, Direction)> = None;
        for (child, action) in &successors {
            if self.path.contains(&NodeKey::of(child, next_turn)) {
                self.stats.cycle_skips += 1;
                continue;
            }

            let child_first_round = first_round.or((next_turn == 0).then_some(child));
            let Some((value, _)) =
                self.value(child, next_turn, depth + 1, alpha, beta, child_first_round)
            else {
                continue;
            };

            let improves = match best {
                None => true,
                Some((current, _)) if maximizing => value > current,
                Some((current, _)) => value < current,
            };
            if !improves {
                continue;
            }
            best = Some((value, *action));

            if self.variant.prunes() {
                if maximizing {
                    if value >= beta {
                        self.stats.prunes += 1;
                        return best;
                    }
                    alpha = alpha.max(value);
                } else {
                    if value <= alpha {
                        self.stats.prunes += 1;
                        return best;
                    }
                    beta = beta.min(value);
                }
            }
        }
        best
    }
}
