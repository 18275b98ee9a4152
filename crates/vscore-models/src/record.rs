//! Video performance records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::{count_field, id_field, non_empty_string_field};
use crate::level::Level;

const ID_KEYS: &[&str] = &["id", "videoId"];
const VIEW_KEYS: &[&str] = &["viewCount", "viewCountRaw"];
const SUBSCRIBER_KEYS: &[&str] = &["subscriberCount", "subscriberCountRaw"];
const PUBLISHED_KEYS: &[&str] = &["publishedAt", "publishedAtRaw"];

/// A single video's raw statistics after type coercion.
///
/// Counts are always finite and non-negative; `published_at` is kept verbatim
/// so it can be echoed back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawVideoRecord {
    /// Video identifier (may be empty)
    #[serde(default)]
    pub id: String,

    /// Total views
    #[serde(default)]
    pub view_count: f64,

    /// Channel subscriber count at fetch time
    #[serde(default)]
    pub subscriber_count: f64,

    /// Publish timestamp as sent by the client
    #[serde(default)]
    pub published_at: Option<String>,
}

impl RawVideoRecord {
    pub fn new(
        id: impl Into<String>,
        view_count: f64,
        subscriber_count: f64,
        published_at: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            view_count,
            subscriber_count,
            published_at,
        }
    }

    /// Build a record from an arbitrary JSON value.
    ///
    /// Never fails. Non-object values produce a record with every field at
    /// its default.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            id: id_field(obj, ID_KEYS),
            view_count: count_field(obj, VIEW_KEYS),
            subscriber_count: count_field(obj, SUBSCRIBER_KEYS),
            published_at: non_empty_string_field(obj, PUBLISHED_KEYS),
        }
    }
}

/// A scored video record.
///
/// Every derived field is always present in the JSON output, using `null`
/// where the input did not allow a value to be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecord {
    pub id: String,
    pub views: f64,
    pub subs: f64,
    pub published_at: Option<String>,

    /// Whole days since publication, at least 1
    pub days_since_published: Option<i64>,
    pub views_per_day: Option<f64>,

    /// views / subs, when both are positive
    pub ratio: Option<f64>,
    pub log_ratio: Option<f64>,
    /// Standard score of `log_ratio` within the batch
    pub ratio_z: Option<f64>,
    pub ratio_level: Level,

    pub is_sustained: bool,

    pub exposure_score: f64,
    pub exposure_level: Level,

    /// Weighted blend of the two levels in `[0, 1]`
    pub combined_score: f64,
}
