//! HTTP request types for the fleet server.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::UnitReport;

/// Query parameters for per-unit recent-history requests.
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    /// Maximum number of reports to return.
    pub count: Option<usize>,
}

impl RecentParams {
    pub fn count(&self) -> usize {
        self.count.unwrap_or(10)
    }
}

/// Query parameters for the all-units recent-history request.
#[derive(Debug, Deserialize)]
pub struct TodayParams {
    /// Maximum number of reports to return per unit.
    pub count_by_cart: Option<usize>,
}

impl TodayParams {
    pub fn count_by_cart(&self) -> usize {
        self.count_by_cart.unwrap_or(10)
    }
}

/// A validated upsert payload.
#[derive(Debug)]
pub struct UpsertRequest {
    pub report: UnitReport,
}

impl UpsertRequest {
    /// Parses and validates an upsert body.
    ///
    /// Malformed JSON and out-of-range fields map to
    /// [`Error::InvalidInput`] before any store interaction.
    pub fn from_body(body: &[u8]) -> Result<Self, Error> {
        let report: UnitReport = serde_json::from_slice(body)
            .map_err(|e| Error::InvalidInput(format!("invalid report JSON: {}", e)))?;
        report.validate()?;
        Ok(Self { report })
    }
}

/// An inbound live-channel message: an upsert payload carrying its unit id.
///
/// The same shape is echoed to subscribers for every accepted write,
/// whichever path it arrived on.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportMessage {
    pub id: String,
    #[serde(flatten)]
    pub report: UnitReport,
}

impl ReportMessage {
    /// Parses and validates a live-channel message, using the same
    /// validation as HTTP upserts.
    pub fn from_text(text: &str) -> Result<Self, Error> {
        let message: ReportMessage = serde_json::from_str(text)
            .map_err(|e| Error::InvalidInput(format!("invalid report message: {}", e)))?;
        message.report.validate()?;
        Ok(message)
    }

    /// Serializes the broadcast payload.
    pub fn to_payload(&self) -> String {
        // UnitReport serialization cannot fail; all fields are plain
        // numbers and strings.
        serde_json::to_string(self).unwrap_or_default()
    }
}
