//! Five-stage scoring pipeline.

use chrono::{DateTime, Utc};
use vscore_models::{AnalyzeResponse, EnrichedRecord, RawVideoRecord};

use crate::config::ScoringConfig;
use crate::contribution::{self, Contribution};
use crate::error::{ScoreError, ScoreResult};
use crate::exposure::{self, Exposure};
use crate::ingest::{self, IngestedVideo};
use crate::logging::BatchLogger;
use crate::ranker;
use crate::sustain;

/// Batch-level facts gathered while scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchSummary {
    pub size: usize,
    /// Records that contributed a log-ratio sample
    pub ratio_samples: usize,
    pub sustain_threshold: Option<f64>,
    pub sustained: usize,
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredBatch {
    pub results: Vec<EnrichedRecord>,
    pub top10: Vec<String>,
    pub summary: BatchSummary,
}

impl ScoredBatch {
    fn empty() -> Self {
        Self {
            results: Vec::new(),
            top10: Vec::new(),
            summary: BatchSummary::default(),
        }
    }

    pub fn into_response(self) -> AnalyzeResponse {
        AnalyzeResponse {
            results: self.results,
            top10: self.top10,
        }
    }
}

/// Validated, reusable scoring pipeline.
///
/// Holds no per-batch state, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    config: ScoringConfig,
}

impl Default for ScoringPipeline {
    fn default() -> Self {
        Self {
            config: ScoringConfig::default(),
        }
    }
}

impl ScoringPipeline {
    pub fn new(config: ScoringConfig) -> ScoreResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Score a batch relative to `now`.
    pub fn run(&self, videos: Vec<RawVideoRecord>, now: DateTime<Utc>) -> ScoreResult<ScoredBatch> {
        let logger = BatchLogger::generated(videos.len());
        self.run_logged(videos, now, &logger)
    }

    /// Score a batch, logging under the caller's batch context.
    ///
    /// Deterministic for a fixed `now`. An empty batch returns immediately
    /// without running any stage.
    pub fn run_logged(
        &self,
        videos: Vec<RawVideoRecord>,
        now: DateTime<Utc>,
        logger: &BatchLogger,
    ) -> ScoreResult<ScoredBatch> {
        if videos.is_empty() {
            logger.log_stage("ingest", "empty batch, skipping");
            return Ok(ScoredBatch::empty());
        }

        logger.log_start();
        let result = self.score(videos, now, logger);
        match &result {
            Ok(batch) => logger.log_completion(&batch.summary, batch.top10.len()),
            Err(e) => logger.log_error(&e.to_string()),
        }
        result
    }

    fn score(
        &self,
        videos: Vec<RawVideoRecord>,
        now: DateTime<Utc>,
        logger: &BatchLogger,
    ) -> ScoreResult<ScoredBatch> {
        let config = &self.config;
        let size = videos.len();

        let ingested = ingest::normalize_batch(videos, now);
        logger.log_stage(
            "ingest",
            &format!(
                "{} of {} records have a usable publish date",
                ingested.iter().filter(|v| v.days_since_published.is_some()).count(),
                size
            ),
        );

        let (contributions, distribution) = contribution::score_batch(&ingested, config);
        match &distribution {
            Some(d) => logger.log_stage(
                "contribution",
                &format!("mean={:.4} std={:.4} samples={}", d.mean, d.std, d.samples),
            ),
            None => logger.log_stage("contribution", "no valid ratio samples"),
        }

        let (sustained, cutoff) = sustain::classify_batch(&ingested, config);
        match &cutoff {
            Some(c) => logger.log_stage(
                "sustain",
                &format!("threshold={:.4} candidates={}", c.threshold, c.candidates),
            ),
            None => logger.log_stage("sustain", "no mature candidates"),
        }

        let exposures: Vec<Exposure> = ingested
            .iter()
            .zip(&sustained)
            .map(|(video, is_sustained)| exposure::score(video, *is_sustained, config))
            .collect();

        // The zip below would silently truncate on a short stage output
        for (stage, produced) in [
            ("ingest", ingested.len()),
            ("contribution", contributions.len()),
            ("sustain", sustained.len()),
            ("exposure", exposures.len()),
        ] {
            ScoreError::ensure_aligned(stage, size, produced)?;
        }

        let results: Vec<EnrichedRecord> = ingested
            .into_iter()
            .zip(contributions)
            .zip(sustained)
            .zip(exposures)
            .map(|(((video, contribution), is_sustained), exposure)| {
                enrich(video, contribution, is_sustained, exposure, config)
            })
            .collect();

        let top10 = ranker::top_ids(&results, config.top_n);

        let summary = BatchSummary {
            size,
            ratio_samples: distribution.map(|d| d.samples).unwrap_or(0),
            sustain_threshold: cutoff.map(|c| c.threshold),
            sustained: results.iter().filter(|r| r.is_sustained).count(),
        };

        Ok(ScoredBatch {
            results,
            top10,
            summary,
        })
    }
}

/// Scores a batch on behalf of a caller-supplied batch context.
///
/// [`ScoringPipeline`] is the production implementation; the seam lets hosts
/// such as the HTTP service hold any scorer behind an `Arc<dyn BatchScorer>`.
pub trait BatchScorer: Send + Sync {
    fn score_batch(
        &self,
        videos: Vec<RawVideoRecord>,
        now: DateTime<Utc>,
        logger: &BatchLogger,
    ) -> ScoreResult<ScoredBatch>;
}

impl BatchScorer for ScoringPipeline {
    fn score_batch(
        &self,
        videos: Vec<RawVideoRecord>,
        now: DateTime<Utc>,
        logger: &BatchLogger,
    ) -> ScoreResult<ScoredBatch> {
        self.run_logged(videos, now, logger)
    }
}

fn enrich(
    video: IngestedVideo,
    contribution: Contribution,
    is_sustained: bool,
    exposure: Exposure,
    config: &ScoringConfig,
) -> EnrichedRecord {
    EnrichedRecord {
        id: video.id,
        views: video.views,
        subs: video.subs,
        published_at: video.published_at,
        days_since_published: video.days_since_published,
        views_per_day: video.views_per_day,
        ratio: contribution.ratio,
        log_ratio: contribution.log_ratio,
        ratio_z: contribution.ratio_z,
        ratio_level: contribution.ratio_level,
        is_sustained,
        exposure_score: exposure.score,
        exposure_level: exposure.level,
        combined_score: ranker::combined_score(contribution.ratio_level, exposure.level, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ScoringConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(ScoringPipeline::new(config).is_err());
    }

    #[test]
    fn test_empty_batch_short_circuits() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let batch = ScoringPipeline::default().run(Vec::new(), now).unwrap();

        assert!(batch.results.is_empty());
        assert!(batch.top10.is_empty());
        assert_eq!(batch.summary, BatchSummary::default());
    }

    #[test]
    fn test_batch_scorer_matches_run() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let videos = vec![
            RawVideoRecord::new("a", 9_000.0, 1_000.0, Some("2024-12-01".into())),
            RawVideoRecord::new("b", 300.0, 1_000.0, Some("2024-06-01".into())),
        ];
        let pipeline = ScoringPipeline::default();
        let scorer: &dyn BatchScorer = &pipeline;

        let logger = BatchLogger::new("req-1", videos.len());
        let via_trait = scorer.score_batch(videos.clone(), now, &logger).unwrap();
        assert_eq!(via_trait, pipeline.run(videos, now).unwrap());
    }

    #[test]
    fn test_summary_counts() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let videos = vec![
            RawVideoRecord::new("old", 50_000.0, 1_000.0, Some("2024-01-01T00:00:00Z".into())),
            RawVideoRecord::new("new", 500.0, 1_000.0, Some("2024-12-25T00:00:00Z".into())),
            RawVideoRecord::new("none", 0.0, 1_000.0, None),
        ];
        let batch = ScoringPipeline::default().run(videos, now).unwrap();

        assert_eq!(batch.summary.size, 3);
        assert_eq!(batch.summary.ratio_samples, 2);
        assert!(batch.summary.sustain_threshold.is_some());
        assert_eq!(batch.summary.sustained, 1);
        assert!(batch.results[0].is_sustained);
    }
}
