use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

pub fn now_iso() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Return a timestamp for facts emission.
/// - Analysis: constant zero timestamp so repeated dry runs produce identical facts.
/// - Conversion: real, current timestamp in RFC3339.
pub fn ts_for_mode(analysis: bool) -> String {
    if analysis {
        TS_ZERO.to_string()
    } else {
        now_iso()
    }
}

/// Apply redactions to a fact event for comparison and safe logging.
/// Zeroes timestamps, drops run-specific identifiers and volatile timings.
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("run_id");
        obj.remove("duration_ms");
        if let Some(diag) = obj.get_mut("diagnostics").and_then(Value::as_object_mut) {
            diag.remove("duration_ms");
        }
    }
    v
}
