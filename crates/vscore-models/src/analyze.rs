//! Analyze request/response payloads.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{EnrichedRecord, RawVideoRecord};

/// Request to score one channel's batch of videos.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeRequest {
    pub videos: Vec<RawVideoRecord>,
}

impl AnalyzeRequest {
    /// Parse a request body.
    ///
    /// An empty (or all-whitespace) body is treated as `{}`. The only error is
    /// a body that is not valid JSON.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from_value(&value))
    }

    /// Extract the batch from a parsed payload.
    ///
    /// A payload that is not an object, or whose `videos` is missing or not
    /// an array, yields an empty batch.
    pub fn from_value(value: &Value) -> Self {
        let videos = value
            .get("videos")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(RawVideoRecord::from_value).collect())
            .unwrap_or_default();

        Self { videos }
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

/// Scored batch returned to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeResponse {
    /// One entry per input video, in input order
    pub results: Vec<EnrichedRecord>,
    /// Identifiers of the highest combined scores, best first
    pub top10: Vec<String>,
}

impl AnalyzeResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_is_empty_batch() {
        assert!(AnalyzeRequest::from_slice(b"").unwrap().is_empty());
        assert!(AnalyzeRequest::from_slice(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(AnalyzeRequest::from_slice(b"{videos: [").is_err());
    }

    #[test]
    fn test_non_array_videos_is_empty_batch() {
        assert!(AnalyzeRequest::from_value(&json!({"videos": "nope"})).is_empty());
        assert!(AnalyzeRequest::from_value(&json!({"items": []})).is_empty());
        assert!(AnalyzeRequest::from_value(&json!([1, 2, 3])).is_empty());
        assert!(AnalyzeRequest::from_value(&json!(null)).is_empty());
    }

    #[test]
    fn test_videos_keep_order() {
        let request = AnalyzeRequest::from_slice(
            br#"{"videos": [{"id": "a"}, 7, {"id": "c", "viewCount": "10"}]}"#,
        )
        .unwrap();

        let ids: Vec<&str> = request.videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "", "c"]);
        assert_eq!(request.videos[2].view_count, 10.0);
    }

    #[test]
    fn test_empty_response_shape() {
        let value = serde_json::to_value(AnalyzeResponse::empty()).unwrap();
        assert_eq!(value, json!({"results": [], "top10": []}));
    }

    #[test]
    fn test_response_schema_lists_fields() {
        let schema = schemars::schema_for!(AnalyzeResponse);
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json["properties"]["results"].is_object());
        assert!(json["properties"]["top10"].is_object());
    }
}
