//! Score levels and the threshold tables that produce them.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors constructing a [`Level`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level {0} is outside 1..=5")]
    OutOfRange(u8),
}

/// A discrete score tier in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct Level(u8);

impl Level {
    /// Weakest tier.
    pub const MIN: Level = Level(1);
    /// Strongest tier.
    pub const MAX: Level = Level(5);

    pub fn new(value: u8) -> Result<Self, LevelError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LevelError::OutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Level scaled into `(0, 1]` (level / 5).
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX.0)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        Level::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Ordered boundaries mapping a real value to a [`Level`].
///
/// `upper_bounds[i]` is the exclusive upper bound of level `i + 1`; values at
/// or above the last bound map to [`Level::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LevelTable {
    upper_bounds: [f64; 4],
}

impl LevelTable {
    pub const fn new(upper_bounds: [f64; 4]) -> Self {
        Self { upper_bounds }
    }

    /// Look up the level for `value`.
    pub fn classify(&self, value: f64) -> Level {
        self.upper_bounds
            .iter()
            .position(|bound| value < *bound)
            .map(|idx| Level(idx as u8 + 1))
            .unwrap_or(Level::MAX)
    }

    /// True when every bound is finite and strictly greater than the previous one.
    pub fn is_well_formed(&self) -> bool {
        self.upper_bounds.iter().all(|b| b.is_finite())
            && self.upper_bounds.windows(2).all(|w| w[0] < w[1])
    }
}
