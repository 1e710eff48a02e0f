use thiserror::Error;

/// Parameters of the ghost motion and sensor noise models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeliefConfig {
    half_width: u32,
    east_bias: f64,
}

impl BeliefConfig {
    pub const DEFAULT_HALF_WIDTH: u32 = 1;
    pub const DEFAULT_EAST_BIAS: f64 = 0.5;

    /// Validates the sensor window half-width `w` and the east bias `p`.
    pub fn new(half_width: i64, east_bias: f64) -> Result<Self, ConfigError> {
        if half_width < 0 {
            return Err(ConfigError::NegativeHalfWidth(half_width));
        }
        // Readings are drawn as signed cell offsets, so `w` must fit an i32.
        let half_width = i32::try_from(half_width)
            .map_err(|_| ConfigError::HalfWidthTooLarge(half_width))?
            .unsigned_abs();
        if !east_bias.is_finite() || !(0.0..=1.0).contains(&east_bias) {
            return Err(ConfigError::EastBiasOutOfRange(east_bias));
        }
        Ok(Self {
            half_width,
            east_bias,
        })
    }

    pub fn half_width(&self) -> u32 {
        self.half_width
    }

    pub fn east_bias(&self) -> f64 {
        self.east_bias
    }
}

impl Default for BeliefConfig {
    fn default() -> Self {
        Self {
            half_width: Self::DEFAULT_HALF_WIDTH,
            east_bias: Self::DEFAULT_EAST_BIAS,
        }
    }
}

/// Construction-time contract violations.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("sensor half-width must be non-negative (got {0})")]
    NegativeHalfWidth(i64),
    #[error("sensor half-width {0} does not fit the board coordinate range")]
    HalfWidthTooLarge(i64),
    #[error("east bias must lie in [0, 1] (got {0})")]
    EastBiasOutOfRange(f64),
    #[error("cutoff depth must be at least one ply")]
    ZeroDepth,
}
