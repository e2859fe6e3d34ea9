//! Append-only, tag-indexed time-series point storage.
//!
//! The store holds immutable [`Point`]s: a store-assigned timestamp, a tag
//! map indexing identity, and a field map carrying the measurement. Queries
//! are expressed as [`Predicate`]s over tags and time. Two backends
//! implement the [`SeriesStore`] contract: an in-memory store for tests and
//! a JSON-lines file store for persistence.
//!
//! # Mutual exclusion
//!
//! Each backend guards its point log with a single `tokio::sync::RwLock`.
//! All mutations (insert, remove) take the write guard, so no two mutations
//! interleave at the storage layer; reads take the shared guard. Tokio's
//! lock is FIFO-fair, so no writer is starved.

mod file;
mod memory;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::clock::Clock;
use crate::config::StorageConfig;
use crate::error::Result;

/// Milliseconds since the Unix epoch, UTC.
pub type Timestamp = i64;

/// A single field value.
///
/// Serialized untagged, so JSON integers restore as `Integer` and JSON
/// floats as `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    /// Returns the value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
        }
    }

    /// Returns the value as an integer, or `None` for floats.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            FieldValue::Float(_) => None,
        }
    }
}

/// One stored record: store-assigned time plus tag and field maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub time: Timestamp,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
}

/// A query predicate over stored points.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every point.
    All,
    /// Matches points whose tag `key` equals `value`.
    TagEquals(String, String),
    /// Matches points with `time > after` (exclusive).
    TimeAfter(Timestamp),
}

impl Predicate {
    /// Tag-equality predicate on the given key.
    pub fn tag_equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::TagEquals(key.into(), value.into())
    }

    pub(crate) fn matches(&self, point: &Point) -> bool {
        match self {
            Predicate::All => true,
            Predicate::TagEquals(key, value) => {
                point.tags.get(key).map(|v| v == value).unwrap_or(false)
            }
            Predicate::TimeAfter(after) => point.time > *after,
        }
    }
}

/// Contract for time-series point storage.
///
/// Insert never fails on well-formed input; only I/O failures surface, as
/// [`Error::Storage`](crate::Error::Storage). When `sorted` is set, search
/// results are ordered by timestamp ascending; callers needing descending
/// order reverse the result. `limit` caps the result after ordering.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// Appends a new point with a store-assigned timestamp.
    async fn insert(
        &self,
        tags: BTreeMap<String, String>,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<()>;

    /// Returns all points matching the predicate.
    async fn search(
        &self,
        predicate: &Predicate,
        sorted: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Point>>;

    /// Deletes all points matching the predicate, returning the count
    /// removed.
    async fn remove(&self, predicate: &Predicate) -> Result<usize>;
}

/// Creates a store backend from configuration.
pub async fn create_store(
    config: &StorageConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn SeriesStore>> {
    match config {
        StorageConfig::InMemory => Ok(Arc::new(MemoryStore::new(clock))),
        StorageConfig::File(file_config) => {
            let store = FileStore::open(&file_config.path, clock).await?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_with_tag(time: Timestamp, id: &str) -> Point {
        Point {
            time,
            tags: BTreeMap::from([("id".to_string(), id.to_string())]),
            fields: BTreeMap::new(),
        }
    }

    #[test]
    fn should_match_tag_equality() {
        // given
        let point = point_with_tag(0, "car_1");

        // when / then
        assert!(Predicate::tag_equals("id", "car_1").matches(&point));
        assert!(!Predicate::tag_equals("id", "car_2").matches(&point));
        assert!(!Predicate::tag_equals("name", "car_1").matches(&point));
    }

    #[test]
    fn should_match_time_after_exclusively() {
        // given
        let point = point_with_tag(100, "car_1");

        // when / then
        assert!(Predicate::TimeAfter(99).matches(&point));
        assert!(!Predicate::TimeAfter(100).matches(&point));
    }

    #[test]
    fn should_widen_integer_fields_to_float() {
        // given / when / then
        assert_eq!(FieldValue::Integer(80).as_float(), Some(80.0));
        assert_eq!(FieldValue::Float(0.5).as_integer(), None);
    }

    #[test]
    fn should_round_trip_point_through_json() {
        // given
        let point = Point {
            time: 42,
            tags: BTreeMap::from([("id".to_string(), "car_1".to_string())]),
            fields: BTreeMap::from([
                ("battery".to_string(), FieldValue::Float(79.5)),
                ("status".to_string(), FieldValue::Integer(1)),
            ]),
        };

        // when
        let json = serde_json::to_string(&point).unwrap();
        let restored: Point = serde_json::from_str(&json).unwrap();

        // then
        assert_eq!(restored, point);
    }
}
