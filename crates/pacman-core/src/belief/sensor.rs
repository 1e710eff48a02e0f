//! Uniform square-window noise model for ghost position readings.

use crate::model::position::Position;
use rand::Rng;

/// Likelihood of one observation over the flattened cells of a maze.
#[derive(Debug, Clone, PartialEq)]
pub struct Likelihood {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl Likelihood {
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn at(&self, pos: Position) -> f64 {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height;
        if !in_bounds {
            return 0.0;
        }
        self.values[pos.x as usize * self.height + pos.y as usize]
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// A reading is the true cell displaced uniformly inside a `(2w+1)²` square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorModel {
    half_width: u32,
}

impl SensorModel {
    pub fn new(half_width: u32) -> Self {
        Self { half_width }
    }

    pub fn half_width(&self) -> u32 {
        self.half_width
    }

    /// Equal mass on every in-bounds cell within Chebyshev distance `w` of the
    /// observation, normalized over the cells the clipped window still covers.
    /// An observation whose window misses the maze entirely yields zero
    /// likelihood everywhere.
    pub fn likelihood(&self, width: usize, height: usize, observation: Position) -> Likelihood {
        let mut values = vec![0.0; width * height];
        let w = self.half_width as i64;
        let (ox, oy) = (observation.x as i64, observation.y as i64);
        let x_range = (ox - w).max(0)..=(ox + w).min(width as i64 - 1);
        let y_range = (oy - w).max(0)..=(oy + w).min(height as i64 - 1);

        let covered = x_range.clone().count() * y_range.clone().count();
        if covered > 0 {
            let mass = 1.0 / covered as f64;
            for x in x_range {
                for y in y_range.clone() {
                    values[x as usize * height + y as usize] = mass;
                }
            }
        }

        Likelihood {
            width,
            height,
            values,
        }
    }

    /// Draws a noisy reading of `truth`. The reading is not clipped to the maze.
    pub fn sample_observation<R: Rng + ?Sized>(&self, truth: Position, rng: &mut R) -> Position {
        let w = i32::try_from(self.half_width).unwrap_or(i32::MAX);
        let dx = rng.gen_range(-w..=w);
        let dy = rng.gen_range(-w..=w);
        Position::new(truth.x.saturating_add(dx), truth.y.saturating_add(dy))
    }
}

#[cfg(test)]
mod tests {
    use super::SensorModel;
    use crate::model::position::Position;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn centred_window_spreads_evenly() {
        let sensor = SensorModel::new(1);
        let likelihood = sensor.likelihood(5, 5, Position::new(2, 2));
        assert!((likelihood.at(Position::new(1, 3)) - 1.0 / 9.0).abs() < 1e-12);
        assert_eq!(likelihood.at(Position::new(0, 2)), 0.0);
        assert!((likelihood.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn clipped_window_renormalizes() {
        let sensor = SensorModel::new(1);
        let likelihood = sensor.likelihood(5, 5, Position::new(0, 0));
        for pos in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            assert!((likelihood.at(Position::from(pos)) - 0.25).abs() < 1e-12);
        }
        assert!((likelihood.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_reading_still_covers_border() {
        let sensor = SensorModel::new(2);
        let likelihood = sensor.likelihood(4, 4, Position::new(-1, 5));
        assert!(likelihood.at(Position::new(0, 3)) > 0.0);
        assert!((likelihood.total() - 1.0).abs() < 1e-9);

        let blind = SensorModel::new(0).likelihood(4, 4, Position::new(-1, 0));
        assert_eq!(blind.total(), 0.0);
    }

    #[test]
    fn samples_stay_inside_window() {
        let sensor = SensorModel::new(2);
        let mut rng = StdRng::seed_from_u64(5);
        let truth = Position::new(3, 3);
        for _ in 0..200 {
            let reading = sensor.sample_observation(truth, &mut rng);
            assert!(reading.chebyshev(truth) <= 2);
        }
    }

    #[test]
    fn widest_sensor_samples_without_overflow() {
        let sensor = SensorModel::new(u32::MAX);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            sensor.sample_observation(Position::new(3, 3), &mut rng);
        }
        let likelihood = sensor.likelihood(4, 4, Position::new(1, 1));
        assert!((likelihood.total() - 1.0).abs() < 1e-9);
    }
}
