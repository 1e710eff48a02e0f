use super::distribution::BeliefDistribution;
use super::sensor::SensorModel;
use super::transition::TransitionMatrix;
use crate::config::BeliefConfig;
use crate::model::grid::Grid;
use crate::model::position::Position;
use once_cell::unsync::OnceCell;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BeliefError {
    #[error("belief is {found:?} but the maze is {expected:?} (width, height)")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("expected one observation per ghost ({expected}), got {found}")]
    ObservationCount { expected: usize, found: usize },
}

/// Discrete Bayes filter over ghost cells for one maze.
///
/// The transition matrix is built on first use and kept until [`reset`](Self::reset).
#[derive(Debug)]
pub struct BeliefTracker {
    walls: Grid,
    config: BeliefConfig,
    sensor: SensorModel,
    transition: OnceCell<TransitionMatrix>,
}

impl BeliefTracker {
    pub fn new(walls: Grid, config: BeliefConfig) -> Self {
        Self {
            walls,
            config,
            sensor: SensorModel::new(config.half_width()),
            transition: OnceCell::new(),
        }
    }

    pub fn walls(&self) -> &Grid {
        &self.walls
    }

    pub fn config(&self) -> BeliefConfig {
        self.config
    }

    pub fn sensor(&self) -> SensorModel {
        self.sensor
    }

    pub fn transition(&self) -> &TransitionMatrix {
        self.transition.get_or_init(|| {
            event!(
                target: "pacman_core::belief",
                Level::DEBUG,
                width = self.walls.width(),
                height = self.walls.height(),
                east_bias = self.config.east_bias(),
                "building transition matrix"
            );
            TransitionMatrix::build(&self.walls, self.config.east_bias())
        })
    }

    pub fn is_transition_cached(&self) -> bool {
        self.transition.get().is_some()
    }

    /// Drops the cached transition matrix.
    pub fn reset(&mut self) {
        self.transition = OnceCell::new();
    }

    fn check_dimensions(&self, belief: &BeliefDistribution) -> Result<(), BeliefError> {
        let expected = (self.walls.width(), self.walls.height());
        if belief.dimensions() != expected {
            return Err(BeliefError::DimensionMismatch {
                expected,
                found: belief.dimensions(),
            });
        }
        Ok(())
    }

    /// One predict, update, normalize step for a single ghost.
    pub fn posterior(
        &self,
        prior: &BeliefDistribution,
        observation: Position,
    ) -> Result<BeliefDistribution, BeliefError> {
        self.check_dimensions(prior)?;
        let predicted = self.transition().predict(prior);
        let likelihood =
            self.sensor
                .likelihood(self.walls.width(), self.walls.height(), observation);

        let weighted: Vec<f64> = predicted
            .as_slice()
            .iter()
            .zip(likelihood.as_slice())
            .map(|(belief, evidence)| belief * evidence)
            .collect();
        let posterior =
            BeliefDistribution::from_raw(self.walls.width(), self.walls.height(), weighted)
                .normalized();

        if posterior.is_zero() {
            event!(
                target: "pacman_core::belief",
                Level::WARN,
                observation = %observation,
                "observation is inconsistent with the prior; belief collapsed to zero"
            );
        }
        Ok(posterior)
    }

    /// Updates every ghost's belief with its observation for this turn.
    pub fn update(
        &self,
        priors: &[BeliefDistribution],
        observations: &[Position],
    ) -> Result<Vec<BeliefDistribution>, BeliefError> {
        if priors.len() != observations.len() {
            return Err(BeliefError::ObservationCount {
                expected: priors.len(),
                found: observations.len(),
            });
        }
        priors
            .iter()
            .zip(observations)
            .map(|(prior, observation)| self.posterior(prior, *observation))
            .collect()
    }
}

/// Per-episode owner of the ghost beliefs.
#[derive(Debug)]
pub struct BeliefSession {
    tracker: BeliefTracker,
    beliefs: Vec<BeliefDistribution>,
    updates: u32,
}

impl BeliefSession {
    pub fn new(walls: Grid, config: BeliefConfig) -> Self {
        Self {
            tracker: BeliefTracker::new(walls, config),
            beliefs: Vec::new(),
            updates: 0,
        }
    }

    pub fn tracker(&self) -> &BeliefTracker {
        &self.tracker
    }

    pub fn start_episode(&mut self, initial: Vec<BeliefDistribution>) -> Result<(), BeliefError> {
        for belief in &initial {
            self.tracker.check_dimensions(belief)?;
        }
        self.beliefs = initial;
        self.updates = 0;
        Ok(())
    }

    pub fn update_beliefs(
        &mut self,
        observations: &[Position],
    ) -> Result<&[BeliefDistribution], BeliefError> {
        self.beliefs = self.tracker.update(&self.beliefs, observations)?;
        self.updates += 1;

        if tracing::enabled!(Level::DEBUG) {
            let peaks = self
                .beliefs
                .iter()
                .map(|belief| match belief.most_likely() {
                    Some(pos) => pos.to_string(),
                    None => "-".to_string(),
                })
                .collect::<Vec<_>>()
                .join(",");
            event!(
                target: "pacman_core::belief",
                Level::DEBUG,
                turn = self.updates,
                ghosts = self.beliefs.len(),
                peaks = %peaks,
            );
        }
        Ok(&self.beliefs)
    }

    pub fn beliefs(&self) -> &[BeliefDistribution] {
        &self.beliefs
    }

    pub fn updates(&self) -> u32 {
        self.updates
    }

    pub fn ghost_count(&self) -> usize {
        self.beliefs.len()
    }

    pub fn reset(&mut self) {
        self.beliefs.clear();
        self.updates = 0;
        self.tracker.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::{BeliefError, BeliefSession, BeliefTracker};
    use crate::belief::distribution::BeliefDistribution;
    use crate::config::BeliefConfig;
    use crate::model::grid::Grid;
    use crate::model::position::Position;

    fn open_room() -> Grid {
        let mut walls = Grid::filled(7, 7);
        for x in 1..6 {
            for y in 1..6 {
                walls.set(Position::new(x, y), false);
            }
        }
        walls
    }

    #[test]
    fn transition_is_cached_until_reset() {
        let mut tracker = BeliefTracker::new(open_room(), BeliefConfig::default());
        assert!(!tracker.is_transition_cached());
        let first = tracker.transition().clone();
        assert!(tracker.is_transition_cached());
        tracker.reset();
        assert!(!tracker.is_transition_cached());
        assert_eq!(tracker.transition(), &first);
    }

    #[test]
    fn posterior_concentrates_around_observation() {
        let walls = open_room();
        let tracker = BeliefTracker::new(walls.clone(), BeliefConfig::new(1, 0.5).unwrap());
        let prior = BeliefDistribution::uniform_over_open(&walls);
        let posterior = tracker.posterior(&prior, Position::new(2, 2)).unwrap();
        assert!((posterior.total() - 1.0).abs() < 1e-9);
        assert!((posterior.mass_within(Position::new(2, 2), 1) - 1.0).abs() < 1e-9);
        assert_eq!(posterior.prob(Position::new(5, 5)), 0.0);
    }

    #[test]
    fn far_observation_leaves_zero_belief() {
        let walls = open_room();
        let tracker = BeliefTracker::new(walls.clone(), BeliefConfig::new(0, 0.5).unwrap());
        let prior = BeliefDistribution::point_mass(7, 7, Position::new(3, 3));
        let posterior = tracker.posterior(&prior, Position::new(5, 5)).unwrap();
        assert!(posterior.is_zero());

        // A zero belief stays zero and does not panic.
        let again = tracker.posterior(&posterior, Position::new(3, 3)).unwrap();
        assert!(again.is_zero());
    }

    #[test]
    fn rejects_mismatched_inputs() {
        let tracker = BeliefTracker::new(open_room(), BeliefConfig::default());
        let wrong = BeliefDistribution::zeros(3, 3);
        assert_eq!(
            tracker.posterior(&wrong, Position::new(1, 1)),
            Err(BeliefError::DimensionMismatch {
                expected: (7, 7),
                found: (3, 3)
            })
        );

        let prior = BeliefDistribution::uniform_over_open(tracker.walls());
        assert_eq!(
            tracker.update(&[prior], &[]),
            Err(BeliefError::ObservationCount {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn session_replaces_beliefs_each_turn() {
        let walls = open_room();
        let mut session = BeliefSession::new(walls.clone(), BeliefConfig::default());
        let initial = vec![
            BeliefDistribution::uniform_over_open(&walls),
            BeliefDistribution::uniform_over_open(&walls),
        ];
        session.start_episode(initial).unwrap();

        let beliefs = session
            .update_beliefs(&[Position::new(1, 1), Position::new(5, 5)])
            .unwrap();
        assert_eq!(beliefs.len(), 2);
        assert!(beliefs[0].prob(Position::new(1, 1)) > beliefs[0].prob(Position::new(5, 5)));
        assert!(beliefs[1].prob(Position::new(5, 5)) > beliefs[1].prob(Position::new(1, 1)));
        assert_eq!(session.updates(), 1);

        session.reset();
        assert_eq!(session.ghost_count(), 0);
        assert!(!session.tracker().is_transition_cached());
    }
}
