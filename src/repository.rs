//! Domain-level repository over the time-series store.
//!
//! Translates [`UnitReport`]s to and from the store's tag/field shape and
//! implements the composite recent-history queries the HTTP API serves.
//!
//! # Ordering contract
//!
//! Every recent-history query returns reports **newest-first**. This is the
//! single canonical order for the whole service, matching how the dashboard
//! consumes the data.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::Result;
use crate::model::UnitReport;
use crate::store::{Point, Predicate, SeriesStore, Timestamp};

/// Tag key carrying the unit identity on every stored point.
const UNIT_TAG: &str = "id";

const MILLIS_PER_HOUR: i64 = 3_600_000;

pub struct UnitRepository {
    store: Arc<dyn SeriesStore>,
    clock: Arc<dyn Clock>,
}

impl UnitRepository {
    pub fn new(store: Arc<dyn SeriesStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Stores one report for the given unit. The timestamp is assigned by
    /// the store.
    pub async fn insert(&self, unit_id: &str, report: &UnitReport) -> Result<()> {
        let tags = BTreeMap::from([(UNIT_TAG.to_string(), unit_id.to_string())]);
        self.store.insert(tags, report.to_fields()).await
    }

    /// Returns up to `count` most recent reports for one unit,
    /// newest-first. An unknown unit yields an empty vector.
    pub async fn get_recent(&self, unit_id: &str, count: usize) -> Result<Vec<UnitReport>> {
        let points = self
            .store
            .search(&Predicate::tag_equals(UNIT_TAG, unit_id), true, None)
            .await?;

        // Ascending result; the newest `count` live at the tail.
        let reports = points
            .iter()
            .rev()
            .take(count)
            .filter_map(decode_point)
            .collect();
        Ok(reports)
    }

    /// Returns up to `count_per_unit` most recent reports per unit, for
    /// reports strictly newer than `since`. Each unit's bucket is
    /// newest-first.
    pub async fn get_recent_all_units(
        &self,
        count_per_unit: usize,
        since: Timestamp,
    ) -> Result<HashMap<String, Vec<UnitReport>>> {
        let points = self
            .store
            .search(&Predicate::TimeAfter(since), true, None)
            .await?;

        // Walk the ascending result backwards so buckets fill newest-first
        // and can be capped as they fill.
        let mut grouped: HashMap<String, Vec<UnitReport>> = HashMap::new();
        for point in points.iter().rev() {
            let Some(unit_id) = point.tags.get(UNIT_TAG) else {
                tracing::warn!(time = point.time, "stored point without unit tag, skipping");
                continue;
            };
            let bucket = grouped.entry(unit_id.clone()).or_default();
            if bucket.len() >= count_per_unit {
                continue;
            }
            if let Some(report) = decode_point(point) {
                bucket.push(report);
            }
        }
        Ok(grouped)
    }

    /// Recent reports per unit since the start of the current hour (UTC).
    ///
    /// The window deliberately starts at the top of the hour, not midnight.
    pub async fn get_recent_today(
        &self,
        count_per_unit: usize,
    ) -> Result<HashMap<String, Vec<UnitReport>>> {
        let now = self.clock.now_millis();
        let hour_start = now - now % MILLIS_PER_HOUR;
        self.get_recent_all_units(count_per_unit, hour_start).await
    }

    /// Deletes every report for one unit, returning the number removed.
    pub async fn delete_unit(&self, unit_id: &str) -> Result<usize> {
        self.store
            .remove(&Predicate::tag_equals(UNIT_TAG, unit_id))
            .await
    }

    /// Deletes every report for every unit, returning the number removed.
    pub async fn delete_all(&self) -> Result<usize> {
        self.store.remove(&Predicate::All).await
    }
}

fn decode_point(point: &Point) -> Option<UnitReport> {
    let report = UnitReport::from_fields(&point.fields);
    if report.is_none() {
        tracing::warn!(
            time = point.time,
            tags = ?point.tags,
            "stored point with malformed fields, skipping"
        );
    }
    report
}
