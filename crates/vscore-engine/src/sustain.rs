//! Sustained-growth stage.
//!
//! A video is "sustained" when it is mature and still pulls a view rate in
//! the top quartile of the batch's mature videos.

use crate::config::ScoringConfig;
use crate::ingest::IngestedVideo;

/// View-rate cut-off computed from the batch's mature videos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SustainCutoff {
    /// Minimum views/day to be sustained
    pub threshold: f64,
    /// Minimum age in days to be considered at all
    pub mature_age_days: i64,
    /// Number of mature videos with a positive view rate
    pub candidates: usize,
}

impl SustainCutoff {
    /// Compute the cut-off, or `None` when the batch has no mature video with
    /// a positive view rate.
    ///
    /// Candidate rates are sorted descending and the value at
    /// `floor(n * sustain_quantile)` is taken, falling back to the maximum if
    /// that value is zero.
    pub fn from_batch(videos: &[IngestedVideo], config: &ScoringConfig) -> Option<Self> {
        let mut rates: Vec<f64> = videos
            .iter()
            .filter(|v| v.is_older_than(config.mature_age_days))
            .filter_map(|v| v.views_per_day)
            .filter(|rate| *rate > 0.0)
            .collect();

        if rates.is_empty() {
            return None;
        }

        rates.sort_by(|a, b| b.total_cmp(a));

        let idx = (rates.len() as f64 * config.sustain_quantile).floor() as usize;
        let max = rates[0];
        let threshold = rates
            .get(idx)
            .copied()
            .filter(|rate| *rate != 0.0)
            .unwrap_or(max);

        Some(Self {
            threshold,
            mature_age_days: config.mature_age_days,
            candidates: rates.len(),
        })
    }

    pub fn is_sustained(&self, video: &IngestedVideo) -> bool {
        video.is_older_than(self.mature_age_days)
            && video.views_per_day.is_some_and(|rate| rate >= self.threshold)
    }
}

/// Classify the whole batch. Without a cut-off nothing is sustained.
pub fn classify_batch(
    videos: &[IngestedVideo],
    config: &ScoringConfig,
) -> (Vec<bool>, Option<SustainCutoff>) {
    let cutoff = SustainCutoff::from_batch(videos, config);
    let flags = videos
        .iter()
        .map(|video| cutoff.is_some_and(|c| c.is_sustained(video)))
        .collect();
    (flags, cutoff)
}
