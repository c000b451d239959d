use serde_json::json;

use crate::logging::{LogLevel, Logger, event_with_fields, json_kv, json_str};

use super::{PassObserver, PassReport, PassTrigger, SkipReason};

/// Logs pass lifecycle events for observability/debugging.
///
/// Registered like any other observer; useful when the embedding host
/// wants per-pass records without wiring its own observer.
pub struct PassLogObserver {
    logger: Logger,
    level: LogLevel,
    log_skips: bool,
}

impl PassLogObserver {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            log_skips: true,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn log_skips(mut self, enabled: bool) -> Self {
        self.log_skips = enabled;
        self
    }

    fn emit(&self, message: &str, fields: impl IntoIterator<Item = (String, serde_json::Value)>) {
        let event = event_with_fields(self.level, "bento::runtime.lifecycle", message, fields);
        let _ = self.logger.log_event(event);
    }
}

impl PassObserver for PassLogObserver {
    fn pass_completed(&mut self, report: &PassReport) {
        self.emit(
            "pass.completed",
            [
                json_str("trigger", report.trigger.as_str()),
                json_kv("total_columns", json!(report.total_columns)),
                json_kv("max_row", json!(report.max_row)),
                json_kv("items_placed", json!(report.items_placed)),
                json_kv("items_restyled", json!(report.items_restyled)),
                json_kv("fillers_emitted", json!(report.fillers_emitted)),
                json_kv("swaps_performed", json!(report.swaps_performed)),
            ],
        );
    }

    fn pass_skipped(&mut self, trigger: PassTrigger, reason: SkipReason) {
        if !self.log_skips {
            return;
        }
        self.emit(
            "pass.skipped",
            [
                json_str("trigger", trigger.as_str()),
                json_str("reason", reason.as_str()),
            ],
        );
    }
}
