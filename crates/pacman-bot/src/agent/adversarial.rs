use super::Agent;
use crate::search::{
    AdversarialSearch, FoodPathEvaluator, ReachHistory, ScoreEvaluator, SearchOutcome,
    SearchVariant,
};
use pacman_core::game::{GameState, StateSignature};
use pacman_core::model::Direction;
use tracing::{Level, event};

/// Searches the game tree afresh every turn. Keeps the reached-state history
/// the depth-limited evaluator penalizes revisits with.
#[derive(Debug, Clone)]
pub struct AdversarialAgent {
    name: String,
    variant: SearchVariant,
    history: ReachHistory,
    last_outcome: Option<SearchOutcome>,
}

impl AdversarialAgent {
    pub fn new(variant: SearchVariant) -> Self {
        Self::named(variant.label(), variant)
    }

    pub fn named(name: impl Into<String>, variant: SearchVariant) -> Self {
        Self {
            name: name.into(),
            variant,
            history: ReachHistory::new(),
            last_outcome: None,
        }
    }

    pub fn variant(&self) -> SearchVariant {
        self.variant
    }

    pub fn history(&self) -> &ReachHistory {
        &self.history
    }

    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last_outcome.as_ref()
    }

    fn search<S: GameState>(&self, state: &S) -> SearchOutcome {
        match self.variant {
            SearchVariant::DepthLimited { .. } => {
                AdversarialSearch::new(self.variant, FoodPathEvaluator).run(state, &self.history)
            }
            SearchVariant::Minimax | SearchVariant::AlphaBeta => {
                AdversarialSearch::new(self.variant, ScoreEvaluator).run(state, &self.history)
            }
        }
    }
}

impl<S: GameState> Agent<S> for AdversarialAgent {
    fn choose_action(&mut self, state: &S) -> Direction {
        let reached = self.history.record(StateSignature::of(state));
        let outcome = self.search(state);
        self.history.note_decision();

        if tracing::enabled!(Level::INFO) {
            event!(
                target: "pacman_bot::decision",
                Level::INFO,
                agent = %self.name,
                variant = %self.variant,
                decision = self.history.decisions(),
                reached,
                action = %outcome.action,
                value = ?outcome.value,
                expanded = outcome.stats.nodes_expanded,
            );
        }

        self.last_outcome = Some(outcome);
        outcome.action
    }

    fn reset(&mut self) {
        self.history.reset();
        self.last_outcome = None;
    }

    fn name(&self) -> &str {
        &self.name
    }
}
