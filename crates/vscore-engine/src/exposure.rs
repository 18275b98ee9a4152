//! Exposure stage: likelihood of a video being actively surfaced.

use vscore_models::Level;

use crate::config::ScoringConfig;
use crate::ingest::IngestedVideo;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exposure {
    pub age_factor: f64,
    pub score: f64,
    pub level: Level,
}

/// Recency multiplier for a video of the given age.
///
/// Tiers are matched by inclusive upper bound; older than every tier gets
/// `beyond_tiers_age_factor`, unknown age gets `unknown_age_factor`.
pub fn age_factor(days_since_published: Option<i64>, config: &ScoringConfig) -> f64 {
    let Some(days) = days_since_published else {
        return config.unknown_age_factor;
    };

    config
        .age_tiers
        .iter()
        .find(|tier| days <= tier.max_days)
        .map(|tier| tier.factor)
        .unwrap_or(config.beyond_tiers_age_factor)
}

/// `log10(views_per_day + 1) * age_factor * sustain_boost`, bucketed.
pub fn score(video: &IngestedVideo, is_sustained: bool, config: &ScoringConfig) -> Exposure {
    let rate = video.views_per_day.unwrap_or(0.0);
    let age_factor = age_factor(video.days_since_published, config);
    let boost = if is_sustained { config.sustain_boost } else { 1.0 };

    let score = (rate + 1.0).log10() * age_factor * boost;

    Exposure {
        age_factor,
        score,
        level: config.exposure_levels.classify(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(days: Option<i64>, rate: Option<f64>) -> IngestedVideo {
        IngestedVideo {
            id: String::new(),
            views: 0.0,
            subs: 0.0,
            published_at: None,
            days_since_published: days,
            views_per_day: rate,
        }
    }

    #[test]
    fn test_age_factor_tiers() {
        let config = ScoringConfig::default();
        assert_eq!(age_factor(Some(1), &config), 1.30);
        assert_eq!(age_factor(Some(7), &config), 1.30);
        assert_eq!(age_factor(Some(8), &config), 1.15);
        assert_eq!(age_factor(Some(30), &config), 1.15);
        assert_eq!(age_factor(Some(90), &config), 1.00);
        assert_eq!(age_factor(Some(365), &config), 0.75);
        assert_eq!(age_factor(Some(366), &config), 0.50);
        assert_eq!(age_factor(None, &config), 0.50);
    }

    #[test]
    fn test_unknown_age_scores_zero() {
        let config = ScoringConfig::default();
        let exposure = score(&video(None, None), false, &config);

        assert_eq!(exposure.age_factor, 0.5);
        assert_eq!(exposure.score, 0.0);
        assert_eq!(exposure.level, Level::MIN);
    }

    #[test]
    fn test_sustain_boost_applies() {
        let config = ScoringConfig::default();
        let plain = score(&video(Some(200), Some(9.0)), false, &config);
        let boosted = score(&video(Some(200), Some(9.0)), true, &config);

        // log10(10) * 0.75
        assert!((plain.score - 0.75).abs() < 1e-12);
        assert!((boosted.score - 0.75 * 1.15).abs() < 1e-12);
        assert_eq!(plain.level.get(), 4);
        assert_eq!(boosted.level.get(), 5);
    }

    #[test]
    fn test_exposure_levels() {
        let config = ScoringConfig::default();
        // age 60 -> factor 1.0, so score = log10(rate + 1)
        let level = |rate: f64| score(&video(Some(60), Some(rate)), false, &config).level.get();

        assert_eq!(level(0.0), 1);
        assert_eq!(level(0.5), 2); // 0.176
        assert_eq!(level(1.5), 3); // 0.398
        assert_eq!(level(4.0), 4); // 0.699
        assert_eq!(level(100.0), 5);
    }
}
