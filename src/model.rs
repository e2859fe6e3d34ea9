//! Core domain types for the fleet service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::FieldValue;

/// One observed state of a unit at a point in time.
///
/// Reports are immutable once stored; "updating" a unit means inserting a
/// new report. The timestamp is assigned by the store at insertion and is
/// not part of the payload.
///
/// # Canonical schema
///
/// - `status` is an integer flag: `0` offline, `1` online. JSON booleans
///   are rejected rather than coerced.
/// - `battery` is a float percentage in `0.0..=100.0`.
/// - `at_home` defaults to `0` when absent from the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitReport {
    pub latitude: f64,
    pub longitude: f64,
    pub status: i64,
    pub battery: f64,
    #[serde(default)]
    pub at_home: i64,
}

impl UnitReport {
    /// Validates field ranges beyond what deserialization enforces.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::InvalidInput(format!(
                "latitude out of range: {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::InvalidInput(format!(
                "longitude out of range: {}",
                self.longitude
            )));
        }
        if !self.battery.is_finite() || !(0.0..=100.0).contains(&self.battery) {
            return Err(Error::InvalidInput(format!(
                "battery out of range: {}",
                self.battery
            )));
        }
        Ok(())
    }

    /// Converts the report to the store's field map shape.
    pub fn to_fields(&self) -> BTreeMap<String, FieldValue> {
        BTreeMap::from([
            ("latitude".to_string(), FieldValue::Float(self.latitude)),
            ("longitude".to_string(), FieldValue::Float(self.longitude)),
            ("status".to_string(), FieldValue::Integer(self.status)),
            ("battery".to_string(), FieldValue::Float(self.battery)),
            ("at_home".to_string(), FieldValue::Integer(self.at_home)),
        ])
    }

    /// Reconstructs a report from a stored field map.
    ///
    /// Returns `None` if a required field is missing or has an unexpected
    /// type; callers skip such points rather than failing the whole read.
    pub fn from_fields(fields: &BTreeMap<String, FieldValue>) -> Option<Self> {
        Some(Self {
            latitude: fields.get("latitude")?.as_float()?,
            longitude: fields.get("longitude")?.as_float()?,
            status: fields.get("status")?.as_integer()?,
            battery: fields.get("battery")?.as_float()?,
            at_home: fields.get("at_home").and_then(FieldValue::as_integer)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> UnitReport {
        UnitReport {
            latitude: 45.75,
            longitude: 3.03,
            status: 1,
            battery: 80.0,
            at_home: 0,
        }
    }

    #[test]
    fn should_round_trip_through_fields() {
        // given
        let report = sample_report();

        // when
        let fields = report.to_fields();
        let restored = UnitReport::from_fields(&fields);

        // then
        assert_eq!(restored, Some(report));
    }

    #[test]
    fn should_default_at_home_to_zero() {
        // given
        let json = r#"{"latitude": 1.0, "longitude": 2.0, "status": 1, "battery": 50}"#;

        // when
        let report: UnitReport = serde_json::from_str(json).unwrap();

        // then
        assert_eq!(report.at_home, 0);
    }

    #[test]
    fn should_reject_boolean_status() {
        // given - booleans are not part of the canonical schema
        let json = r#"{"latitude": 1.0, "longitude": 2.0, "status": true, "battery": 50}"#;

        // when
        let result: std::result::Result<UnitReport, _> = serde_json::from_str(json);

        // then
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_out_of_range_latitude() {
        // given
        let report = UnitReport {
            latitude: 123.0,
            ..sample_report()
        };

        // when / then
        assert!(report.validate().is_err());
    }

    #[test]
    fn should_reject_out_of_range_battery() {
        // given
        let report = UnitReport {
            battery: 150.0,
            ..sample_report()
        };

        // when / then
        assert!(report.validate().is_err());
    }

    #[test]
    fn should_return_none_for_missing_field() {
        // given
        let mut fields = sample_report().to_fields();
        fields.remove("latitude");

        // when / then
        assert_eq!(UnitReport::from_fields(&fields), None);
    }
}
