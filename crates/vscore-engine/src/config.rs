//! Scoring configuration.

use serde::{Deserialize, Serialize};
use vscore_models::{Level, LevelTable};

use crate::error::{ScoreError, ScoreResult};

/// Level assigned when a record has no ratio signal (zero views or subscribers).
pub const UNKNOWN_RATIO_LEVEL: Level = Level::MIN;

/// Age factor for records whose publish date is missing or unparseable.
pub const UNKNOWN_AGE_FACTOR: f64 = 0.5;

/// One recency tier: videos at most `max_days` old get `factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeTier {
    pub max_days: i64,
    pub factor: f64,
}

impl AgeTier {
    pub const fn new(max_days: i64, factor: f64) -> Self {
        Self { max_days, factor }
    }
}

/// Constants driving every stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Added to the ratio before `log10`
    pub log_epsilon: f64,
    /// z-score → ratio level
    pub ratio_levels: LevelTable,
    /// Minimum age (days) for a video to count as mature
    pub mature_age_days: i64,
    /// Rank fraction (from the top) selecting the sustain cut-off
    pub sustain_quantile: f64,
    /// Exposure multiplier for sustained videos
    pub sustain_boost: f64,
    /// Recency tiers, ascending by `max_days`
    pub age_tiers: Vec<AgeTier>,
    /// Factor for videos older than the last tier
    pub beyond_tiers_age_factor: f64,
    /// Factor when age is unknown
    pub unknown_age_factor: f64,
    /// Exposure score → exposure level
    pub exposure_levels: LevelTable,
    /// Weight of the ratio level in the combined score
    pub ratio_weight: f64,
    /// Weight of the exposure level in the combined score
    pub exposure_weight: f64,
    /// Shortlist length
    pub top_n: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            log_epsilon: 1e-9,
            ratio_levels: LevelTable::new([-0.5, 0.3, 1.0, 2.0]),
            mature_age_days: 90,
            sustain_quantile: 0.25,
            sustain_boost: 1.15,
            age_tiers: vec![
                AgeTier::new(7, 1.30),
                AgeTier::new(30, 1.15),
                AgeTier::new(90, 1.00),
                AgeTier::new(365, 0.75),
            ],
            beyond_tiers_age_factor: 0.5,
            unknown_age_factor: UNKNOWN_AGE_FACTOR,
            exposure_levels: LevelTable::new([0.15, 0.30, 0.50, 0.80]),
            ratio_weight: 0.6,
            exposure_weight: 0.4,
            top_n: 10,
        }
    }
}

impl ScoringConfig {
    /// Check internal consistency.
    pub fn validate(&self) -> ScoreResult<()> {
        if !(self.log_epsilon.is_finite() && self.log_epsilon > 0.0) {
            return Err(ScoreError::invalid_config("log_epsilon must be positive"));
        }
        if !self.ratio_levels.is_well_formed() {
            return Err(ScoreError::invalid_config(
                "ratio_levels bounds must be finite and strictly ascending",
            ));
        }
        if !self.exposure_levels.is_well_formed() {
            return Err(ScoreError::invalid_config(
                "exposure_levels bounds must be finite and strictly ascending",
            ));
        }
        if !(0.0..1.0).contains(&self.sustain_quantile) {
            return Err(ScoreError::invalid_config("sustain_quantile must be in [0, 1)"));
        }
        if self.age_tiers.windows(2).any(|w| w[0].max_days >= w[1].max_days) {
            return Err(ScoreError::invalid_config(
                "age_tiers must be strictly ascending by max_days",
            ));
        }
        let mut factors = self
            .age_tiers
            .iter()
            .map(|t| t.factor)
            .chain([self.beyond_tiers_age_factor, self.unknown_age_factor, self.sustain_boost]);
        if factors.any(|f| !(f.is_finite() && f >= 0.0)) {
            return Err(ScoreError::invalid_config("factors must be finite and non-negative"));
        }
        if self.ratio_weight < 0.0
            || self.exposure_weight < 0.0
            || (self.ratio_weight + self.exposure_weight - 1.0).abs() > 1e-9
        {
            return Err(ScoreError::invalid_config(
                "ratio_weight and exposure_weight must be non-negative and sum to 1",
            ));
        }
        if self.top_n == 0 {
            return Err(ScoreError::invalid_config("top_n must be at least 1"));
        }
        Ok(())
    }
}
