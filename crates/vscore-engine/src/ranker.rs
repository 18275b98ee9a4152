//! Ranking stage.

use vscore_models::{EnrichedRecord, Level};

use crate::config::ScoringConfig;

/// Weighted blend of the two levels, each scaled to `(0, 1]`.
pub fn combined_score(ratio_level: Level, exposure_level: Level, config: &ScoringConfig) -> f64 {
    config.ratio_weight * ratio_level.fraction() + config.exposure_weight * exposure_level.fraction()
}

/// Identifiers of the `n` best combined scores, best first.
///
/// Ties keep their original input order.
pub fn top_ids(records: &[EnrichedRecord], n: usize) -> Vec<String> {
    let mut ranked: Vec<&EnrichedRecord> = records.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.combined_score.total_cmp(&a.combined_score));
    ranked.into_iter().take(n).map(|r| r.id.clone()).collect()
}
