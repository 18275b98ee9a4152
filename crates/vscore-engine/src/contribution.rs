//! Contribution stage: how far each video out-performs its channel size.
//!
//! The views/subscriber ratio is log-compressed and standardized against the
//! batch's own distribution, then bucketed through a fixed z-score table.
//! Levels are therefore only comparable within one batch.

use vscore_models::Level;

use crate::config::{ScoringConfig, UNKNOWN_RATIO_LEVEL};
use crate::ingest::IngestedVideo;

/// Per-record contribution fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub ratio: Option<f64>,
    pub log_ratio: Option<f64>,
    pub ratio_z: Option<f64>,
    pub ratio_level: Level,
}

/// Views per subscriber, defined only when both counts are positive.
pub fn view_ratio(views: f64, subs: f64) -> Option<f64> {
    (views > 0.0 && subs > 0.0).then(|| views / subs)
}

/// Mean and population standard deviation of the batch's log-ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioDistribution {
    pub mean: f64,
    /// Never 0 or NaN; degenerate spreads are replaced by 1
    pub std: f64,
    pub samples: usize,
}

impl RatioDistribution {
    /// Build from log-ratio samples. NaN samples are ignored; `None` when
    /// nothing usable remains.
    pub fn from_samples(samples: impl IntoIterator<Item = f64>) -> Option<Self> {
        let values: Vec<f64> = samples.into_iter().filter(|v| !v.is_nan()).collect();
        if values.is_empty() {
            return None;
        }

        // Mean is accumulated relative to the first sample so a batch of
        // identical values yields that value exactly (and a zero spread).
        let n = values.len() as f64;
        let pivot = values[0];
        let mean = pivot + values.iter().fold(0.0, |acc, v| acc + (v - pivot)) / n;
        let variance = values
            .iter()
            .fold(0.0, |acc, v| {
                let d = v - mean;
                acc + d * d
            })
            / n;

        let std = variance.sqrt();
        let std = if std == 0.0 || std.is_nan() { 1.0 } else { std };

        Some(Self {
            mean,
            std,
            samples: values.len(),
        })
    }

    pub fn z_score(&self, log_ratio: f64) -> f64 {
        (log_ratio - self.mean) / self.std
    }
}

/// Score the whole batch.
///
/// Returns one [`Contribution`] per input, in order, plus the distribution the
/// z-scores were computed against.
pub fn score_batch(
    videos: &[IngestedVideo],
    config: &ScoringConfig,
) -> (Vec<Contribution>, Option<RatioDistribution>) {
    let log_ratios: Vec<(Option<f64>, Option<f64>)> = videos
        .iter()
        .map(|video| {
            let ratio = view_ratio(video.views, video.subs);
            let log_ratio = ratio.map(|r| (r + config.log_epsilon).log10());
            (ratio, log_ratio)
        })
        .collect();

    let distribution =
        RatioDistribution::from_samples(log_ratios.iter().filter_map(|(_, lr)| *lr));

    let contributions = log_ratios
        .into_iter()
        .map(|(ratio, log_ratio)| {
            let ratio_z = match (log_ratio, distribution.as_ref()) {
                (Some(lr), Some(dist)) => Some(dist.z_score(lr)),
                _ => None,
            };
            let ratio_level = ratio_z
                .map(|z| config.ratio_levels.classify(z))
                .unwrap_or(UNKNOWN_RATIO_LEVEL);

            Contribution {
                ratio,
                log_ratio,
                ratio_z,
                ratio_level,
            }
        })
        .collect();

    (contributions, distribution)
}
