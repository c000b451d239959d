use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated across the life of one grid runtime.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    passes: u64,
    passes_skipped: u64,
    items_placed: u64,
    fillers_emitted: u64,
    swaps_performed: u64,
    signals_coalesced: u64,
}

impl PassMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&mut self, items_placed: usize, fillers_emitted: usize, swaps: usize) {
        self.passes = self.passes.saturating_add(1);
        self.items_placed = self.items_placed.saturating_add(items_placed as u64);
        self.fillers_emitted = self.fillers_emitted.saturating_add(fillers_emitted as u64);
        self.swaps_performed = self.swaps_performed.saturating_add(swaps as u64);
    }

    pub fn record_skip(&mut self) {
        self.passes_skipped = self.passes_skipped.saturating_add(1);
    }

    /// A resize signal landed while an earlier one was still waiting out
    /// the debounce delay.
    pub fn record_coalesced_signal(&mut self) {
        self.signals_coalesced = self.signals_coalesced.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            passes: self.passes,
            passes_skipped: self.passes_skipped,
            items_placed: self.items_placed,
            fillers_emitted: self.fillers_emitted,
            swaps_performed: self.swaps_performed,
            signals_coalesced: self.signals_coalesced,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub passes: u64,
    pub passes_skipped: u64,
    pub items_placed: u64,
    pub fillers_emitted: u64,
    pub swaps_performed: u64,
    pub signals_coalesced: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "grid_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("passes".to_string(), json!(self.passes));
        map.insert("passes_skipped".to_string(), json!(self.passes_skipped));
        map.insert("items_placed".to_string(), json!(self.items_placed));
        map.insert("fillers_emitted".to_string(), json!(self.fillers_emitted));
        map.insert("swaps_performed".to_string(), json!(self.swaps_performed));
        map.insert(
            "signals_coalesced".to_string(),
            json!(self.signals_coalesced),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_across_passes() {
        let mut metrics = PassMetrics::new();
        metrics.record_pass(10, 3, 1);
        metrics.record_pass(10, 2, 0);
        metrics.record_skip();
        metrics.record_coalesced_signal();

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.uptime_ms, 1500);
        assert_eq!(snapshot.passes, 2);
        assert_eq!(snapshot.passes_skipped, 1);
        assert_eq!(snapshot.items_placed, 20);
        assert_eq!(snapshot.fillers_emitted, 5);
        assert_eq!(snapshot.swaps_performed, 1);
        assert_eq!(snapshot.signals_coalesced, 1);
    }

    #[test]
    fn snapshots_log_every_counter() {
        let snapshot = PassMetrics::new().snapshot(Duration::ZERO);
        let event = snapshot.to_log_event("bento::metrics");
        assert_eq!(event.message, "grid_metrics");
        assert_eq!(event.fields.len(), 7);
    }
}
