//! Video performance scoring engine.
//!
//! Scores one channel's batch of videos in five forward-only stages:
//!
//! 1. [`ingest`] - coerce raw records, compute age and view rate
//! 2. [`contribution`] - batch-normalized views/subscriber ratio level
//! 3. [`sustain`] - top-quartile view rate among mature videos
//! 4. [`exposure`] - age and sustainment adjusted exposure level
//! 5. [`ranker`] - weighted blend and top-N shortlist
//!
//! Batch-wide aggregates are computed once per stage and handed to pure
//! per-record functions, so a batch is always scored as a single pass.

pub mod config;
pub mod contribution;
pub mod error;
pub mod exposure;
pub mod ingest;
pub mod logging;
pub mod pipeline;
pub mod ranker;
pub mod sustain;

pub use config::{AgeTier, ScoringConfig};
pub use error::{ScoreError, ScoreResult};
pub use logging::BatchLogger;
pub use pipeline::{BatchScorer, BatchSummary, ScoredBatch, ScoringPipeline};
