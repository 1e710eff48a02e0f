use pacman_core::belief::BeliefDistribution;
use pacman_core::model::Position;

/// Lightweight view over the per-ghost beliefs of a tracking session.
#[derive(Debug, Clone, Copy)]
pub struct BeliefView<'a> {
    beliefs: &'a [BeliefDistribution],
}

impl<'a> BeliefView<'a> {
    pub fn new(beliefs: &'a [BeliefDistribution]) -> Self {
        Self { beliefs }
    }

    pub fn beliefs(&self) -> &'a [BeliefDistribution] {
        self.beliefs
    }

    /// Most likely cell per ghost; `None` for a ghost whose belief collapsed.
    pub fn peaks(&self) -> Vec<Option<Position>> {
        self.beliefs
            .iter()
            .map(BeliefDistribution::most_likely)
            .collect()
    }

    /// Mean Manhattan distance between each ghost's most likely cell and its
    /// true cell, over ghosts that still have a peak.
    pub fn tracking_error(&self, truth: &[Position]) -> Option<f64> {
        let errors: Vec<u32> = self
            .peaks()
            .into_iter()
            .zip(truth)
            .filter_map(|(peak, actual)| peak.map(|cell| cell.manhattan(*actual)))
            .collect();
        if errors.is_empty() {
            return None;
        }
        Some(errors.iter().map(|e| f64::from(*e)).sum::<f64>() / errors.len() as f64)
    }

    /// Expected number of ghosts within Chebyshev distance `radius` of `cell`.
    pub fn threat_near(&self, cell: Position, radius: u32) -> f64 {
        self.beliefs
            .iter()
            .map(|belief| belief.mass_within(cell, radius))
            .sum()
    }

    pub fn mean_entropy(&self) -> f64 {
        if self.beliefs.is_empty() {
            return 0.0;
        }
        self.beliefs.iter().map(BeliefDistribution::entropy).sum::<f64>()
            / self.beliefs.len() as f64
    }
}
