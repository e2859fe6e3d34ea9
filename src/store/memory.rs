//! In-memory store backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{FieldValue, Point, Predicate, SeriesStore};
use crate::clock::Clock;
use crate::error::Result;

/// Volatile store keeping all points in a single flat log.
///
/// A flat append-only log avoids per-unit partitioning; acceptable because
/// fleet size and query volume are small.
pub struct MemoryStore {
    clock: Arc<dyn Clock>,
    points: RwLock<Vec<Point>>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            points: RwLock::new(Vec::new()),
        }
    }
}

/// Filters, orders, and caps a point log for a search. Shared by both
/// backends.
pub(super) fn run_search(
    points: &[Point],
    predicate: &Predicate,
    sorted: bool,
    limit: Option<usize>,
) -> Vec<Point> {
    let mut matched: Vec<Point> = points
        .iter()
        .filter(|p| predicate.matches(p))
        .cloned()
        .collect();
    if sorted {
        // Insertion order is already time order under a monotonic clock,
        // but the contract promises ascending timestamps regardless.
        matched.sort_by_key(|p| p.time);
    }
    if let Some(limit) = limit {
        matched.truncate(limit);
    }
    matched
}

#[async_trait]
impl SeriesStore for MemoryStore {
    async fn insert(
        &self,
        tags: BTreeMap<String, String>,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<()> {
        let point = Point {
            time: self.clock.now_millis(),
            tags,
            fields,
        };
        self.points.write().await.push(point);
        Ok(())
    }

    async fn search(
        &self,
        predicate: &Predicate,
        sorted: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Point>> {
        let points = self.points.read().await;
        Ok(run_search(&points, predicate, sorted, limit))
    }

    async fn remove(&self, predicate: &Predicate) -> Result<usize> {
        let mut points = self.points.write().await;
        let before = points.len();
        points.retain(|p| !predicate.matches(p));
        Ok(before - points.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use std::time::{Duration, UNIX_EPOCH};

    fn tags(id: &str) -> BTreeMap<String, String> {
        BTreeMap::from([("id".to_string(), id.to_string())])
    }

    fn fields(battery: f64) -> BTreeMap<String, FieldValue> {
        BTreeMap::from([("battery".to_string(), FieldValue::Float(battery))])
    }

    #[tokio::test]
    async fn should_assign_store_timestamps_on_insert() {
        // given
        let clock = Arc::new(MockClock::with_time(UNIX_EPOCH));
        let store = MemoryStore::new(clock.clone());

        // when
        store.insert(tags("car_1"), fields(80.0)).await.unwrap();
        clock.advance(Duration::from_millis(250));
        store.insert(tags("car_1"), fields(79.0)).await.unwrap();

        // then
        let points = store.search(&Predicate::All, true, None).await.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].time, 0);
        assert_eq!(points[1].time, 250);
    }

    #[tokio::test]
    async fn should_filter_by_tag() {
        // given
        let store = MemoryStore::new(Arc::new(MockClock::new()));
        store.insert(tags("car_1"), fields(80.0)).await.unwrap();
        store.insert(tags("car_2"), fields(50.0)).await.unwrap();

        // when
        let points = store
            .search(&Predicate::tag_equals("id", "car_2"), true, None)
            .await
            .unwrap();

        // then
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].tags["id"], "car_2");
    }

    #[tokio::test]
    async fn should_cap_results_with_limit() {
        // given
        let store = MemoryStore::new(Arc::new(MockClock::new()));
        for i in 0..5 {
            store.insert(tags("car_1"), fields(i as f64)).await.unwrap();
        }

        // when
        let points = store.search(&Predicate::All, true, Some(3)).await.unwrap();

        // then
        assert_eq!(points.len(), 3);
    }

    #[tokio::test]
    async fn should_keep_identical_payloads_as_distinct_points() {
        // given - the store never deduplicates
        let store = MemoryStore::new(Arc::new(MockClock::new()));
        store.insert(tags("car_1"), fields(80.0)).await.unwrap();
        store.insert(tags("car_1"), fields(80.0)).await.unwrap();

        // when
        let points = store.search(&Predicate::All, false, None).await.unwrap();

        // then
        assert_eq!(points.len(), 2);
    }

    #[tokio::test]
    async fn should_remove_matching_points_and_report_count() {
        // given
        let store = MemoryStore::new(Arc::new(MockClock::new()));
        store.insert(tags("car_1"), fields(80.0)).await.unwrap();
        store.insert(tags("car_1"), fields(79.0)).await.unwrap();
        store.insert(tags("car_2"), fields(50.0)).await.unwrap();

        // when
        let removed = store
            .remove(&Predicate::tag_equals("id", "car_1"))
            .await
            .unwrap();

        // then
        assert_eq!(removed, 2);
        let remaining = store.search(&Predicate::All, false, None).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].tags["id"], "car_2");
    }

    #[tokio::test]
    async fn should_sort_by_time_when_clock_goes_backwards() {
        // given - a non-monotonic clock must not break the sorted contract
        let clock = Arc::new(MockClock::with_time(UNIX_EPOCH + Duration::from_millis(100)));
        let store = MemoryStore::new(clock.clone());
        store.insert(tags("car_1"), fields(80.0)).await.unwrap();
        clock.set_time(UNIX_EPOCH);
        store.insert(tags("car_1"), fields(79.0)).await.unwrap();

        // when
        let points = store.search(&Predicate::All, true, None).await.unwrap();

        // then
        assert_eq!(points[0].time, 0);
        assert_eq!(points[1].time, 100);
    }
}
