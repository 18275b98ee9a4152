//! Structured batch logging.
//!
//! Tags every pipeline event with the batch it belongs to so concurrent
//! requests can be told apart in aggregated logs.

use tracing::{debug, error, info};

use crate::pipeline::BatchSummary;

/// Logger carrying batch context.
#[derive(Debug, Clone)]
pub struct BatchLogger {
    batch_id: String,
    batch_size: usize,
}

impl BatchLogger {
    /// Create a logger for a batch.
    ///
    /// # Arguments
    /// * `batch_id` - Caller-supplied identifier (e.g. the HTTP request ID)
    /// * `batch_size` - Number of records in the batch
    pub fn new(batch_id: impl Into<String>, batch_size: usize) -> Self {
        Self {
            batch_id: batch_id.into(),
            batch_size,
        }
    }

    /// Create a logger with a freshly generated batch ID.
    pub fn generated(batch_size: usize) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), batch_size)
    }

    pub fn log_start(&self) {
        info!(
            batch_id = %self.batch_id,
            batch_size = self.batch_size,
            "Scoring batch"
        );
    }

    /// Log a stage outcome.
    pub fn log_stage(&self, stage: &str, message: &str) {
        debug!(
            batch_id = %self.batch_id,
            stage = stage,
            "Stage {}: {}", stage, message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            batch_id = %self.batch_id,
            batch_size = self.batch_size,
            "Scoring failed: {}", message
        );
    }

    pub fn log_completion(&self, summary: &BatchSummary, top: usize) {
        info!(
            batch_id = %self.batch_id,
            batch_size = self.batch_size,
            ratio_samples = summary.ratio_samples,
            sustain_threshold = ?summary.sustain_threshold,
            sustained = summary.sustained,
            top = top,
            "Batch scored"
        );
    }
}
