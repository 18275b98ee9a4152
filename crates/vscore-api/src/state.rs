//! Application state.

use std::sync::Arc;

use vscore_engine::{BatchScorer, ScoreResult, ScoringConfig, ScoringPipeline};

use crate::config::ApiConfig;
use crate::middleware::{create_rate_limiter, IpRateLimiter};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub scorer: Arc<dyn BatchScorer>,
    pub rate_limiter: Arc<IpRateLimiter>,
}

impl AppState {
    /// Create application state with the default scoring configuration.
    pub fn new(config: ApiConfig) -> ScoreResult<Self> {
        Self::with_scoring(config, ScoringConfig::default())
    }

    /// Create application state with a custom scoring configuration.
    pub fn with_scoring(config: ApiConfig, scoring: ScoringConfig) -> ScoreResult<Self> {
        let pipeline = ScoringPipeline::new(scoring)?;
        Ok(Self::with_scorer(config, Arc::new(pipeline)))
    }

    /// Create application state around an existing scorer.
    pub fn with_scorer(config: ApiConfig, scorer: Arc<dyn BatchScorer>) -> Self {
        let rate_limiter = create_rate_limiter(config.rate_limit_rps, config.rate_limit_burst);

        Self {
            config,
            scorer,
            rate_limiter,
        }
    }
}
