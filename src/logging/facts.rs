use log::Level;
use serde_json::Value;

/// Sink for structured facts (one JSON object per event).
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Sink for human-readable log lines.
///
/// `critical` is the channel for unrecoverable outcomes; sinks that do not
/// distinguish it from errors can rely on the default.
pub trait AuditSink: Send + Sync {
    fn log(&self, level: Level, msg: &str);

    fn critical(&self, msg: &str) {
        self.log(Level::Error, msg);
    }
}

/// Discards every fact and log line.
#[derive(Default)]
pub struct NullSink;

impl FactsEmitter for NullSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for NullSink {
    fn log(&self, _level: Level, _msg: &str) {}
}

/// Forwards log lines and facts to the `log` facade.
///
/// Critical lines go to the `distroswap::critical` target so a logger backend can
/// route them to a dedicated sink.
#[derive(Default, Clone, Copy)]
pub struct LogSink;

impl AuditSink for LogSink {
    fn log(&self, level: Level, msg: &str) {
        log::log!(target: "distroswap", level, "{msg}");
    }

    fn critical(&self, msg: &str) {
        log::error!(target: "distroswap::critical", "{msg}");
    }
}

impl FactsEmitter for LogSink {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        log::debug!(target: "distroswap::facts", "{subsystem} {event} {decision} {fields}");
    }
}
