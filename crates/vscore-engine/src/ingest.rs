//! Ingest stage: raw records to a uniform shape with age and view rate.

use chrono::{DateTime, Utc};
use vscore_models::{parse_published_at, RawVideoRecord};

/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// A record after coercion, carrying age and view-rate.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedVideo {
    pub id: String,
    pub views: f64,
    pub subs: f64,
    pub published_at: Option<String>,
    /// Whole days since publication, floored at 1; `None` if the date is unusable
    pub days_since_published: Option<i64>,
    pub views_per_day: Option<f64>,
}

impl IngestedVideo {
    /// True when the video is known to be at least `min_days` old.
    pub fn is_older_than(&self, min_days: i64) -> bool {
        self.days_since_published.is_some_and(|d| d >= min_days)
    }
}

/// Whole days elapsed between `published` and `now`, never less than 1.
///
/// Future timestamps also yield 1, so a view rate is always defined.
pub fn days_since(published: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed_ms = (now - published).num_milliseconds();
    elapsed_ms.div_euclid(MS_PER_DAY).max(1)
}

/// Normalize one record.
pub fn normalize(raw: RawVideoRecord, now: DateTime<Utc>) -> IngestedVideo {
    let views = raw.view_count;
    let days_since_published = raw
        .published_at
        .as_deref()
        .and_then(parse_published_at)
        .map(|published| days_since(published, now));
    let views_per_day = days_since_published.map(|days| views / days as f64);

    IngestedVideo {
        id: raw.id,
        views,
        subs: raw.subscriber_count,
        published_at: raw.published_at,
        days_since_published,
        views_per_day,
    }
}

/// Normalize a batch, preserving order.
pub fn normalize_batch(raw: Vec<RawVideoRecord>, now: DateTime<Utc>) -> Vec<IngestedVideo> {
    raw.into_iter().map(|record| normalize(record, now)).collect()
}
