//! Prometheus metrics for the fleet server.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

/// Container for all Prometheus metrics.
pub struct Metrics {
    registry: Registry,

    /// Counter of reports accepted and written to the store.
    pub reports_written_total: Counter,

    /// Counter of reports removed by delete operations.
    pub reports_deleted_total: Counter,

    /// Counter of payloads fanned out to live subscribers.
    pub broadcast_payloads_total: Counter,

    /// Gauge of currently connected live subscribers.
    pub live_subscribers: Gauge,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let reports_written_total = Counter::default();
        registry.register(
            "fleet_reports_written",
            "Reports accepted and written to the store",
            reports_written_total.clone(),
        );

        let reports_deleted_total = Counter::default();
        registry.register(
            "fleet_reports_deleted",
            "Reports removed by delete operations",
            reports_deleted_total.clone(),
        );

        let broadcast_payloads_total = Counter::default();
        registry.register(
            "fleet_broadcast_payloads",
            "Payloads fanned out to live subscribers",
            broadcast_payloads_total.clone(),
        );

        let live_subscribers = Gauge::default();
        registry.register(
            "fleet_live_subscribers",
            "Currently connected live subscribers",
            live_subscribers.clone(),
        );

        Self {
            registry,
            reports_written_total,
            reports_deleted_total,
            broadcast_payloads_total,
            live_subscribers,
        }
    }

    /// Encodes all metrics in the Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut output = String::new();
        // Encoding only fails on a formatter error, which String never
        // produces.
        let _ = encode(&mut output, &self.registry);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_encode_registered_metrics() {
        // given
        let metrics = Metrics::new();
        metrics.reports_written_total.inc();
        metrics.live_subscribers.set(2);

        // when
        let output = metrics.encode();

        // then
        assert!(output.contains("fleet_reports_written_total 1"));
        assert!(output.contains("fleet_live_subscribers 2"));
    }
}
