//! Ghost position tracking from noisy readings.
//!
//! This module is composed of:
//! - `distribution`: per-ghost probability mass over maze cells.
//! - `transition`: east-biased ghost motion model.
//! - `sensor`: square-window observation noise.
//! - `tracker`: predict / update / normalize cycles and the per-episode session.

mod distribution;
mod sensor;
mod tracker;
mod transition;

pub use distribution::BeliefDistribution;
pub use sensor::{Likelihood, SensorModel};
pub use tracker::{BeliefError, BeliefSession, BeliefTracker};
pub use transition::TransitionMatrix;
