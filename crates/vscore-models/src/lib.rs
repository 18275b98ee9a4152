//! Shared data models for the vscore backend.
//!
//! This crate provides Serde-serializable types for:
//! - Raw video performance records and their lenient coercion
//! - Enriched (scored) records
//! - Score levels and threshold tables
//! - Analyze request/response payloads

pub mod analyze;
pub mod coerce;
pub mod level;
pub mod record;
pub mod timestamp;

// Re-export common types
pub use analyze::{AnalyzeRequest, AnalyzeResponse};
pub use level::{Level, LevelError, LevelTable};
pub use record::{EnrichedRecord, RawVideoRecord};
pub use timestamp::parse_published_at;
