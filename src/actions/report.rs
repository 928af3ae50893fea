//! Human summary and YAML export of action results.
use log::Level;

use crate::logging::AuditSink;
use crate::types::{ActionResult, Severity};

/// Log every non-success finding, grouped from most to least severe.
///
/// Returns the number of findings logged.
pub fn summary(results: &[ActionResult], audit: &dyn AuditSink) -> usize {
    let mut logged = 0;
    audit.log(Level::Info, "Pre-conversion analysis report");
    for severity in Severity::DESCENDING {
        if severity == Severity::Success {
            continue;
        }
        for r in results.iter().filter(|r| r.severity == severity) {
            let id = r.error_id.as_deref().unwrap_or("-");
            audit.log(
                severity.log_level(),
                &format!("({severity}) {}.{id}: {}", r.action_id, r.message),
            );
            logged += 1;
        }
    }
    if logged == 0 {
        audit.log(Level::Info, "No problems detected during the analysis!");
    }
    logged
}

/// YAML sequence of `{action_id, severity, error_id, message}` mappings for artifacts.
/// Keys without a value are left out.
#[must_use]
pub fn to_yaml(results: &[ActionResult]) -> String {
    use serde_yaml::{Mapping, Value as Y};
    let items: Vec<Y> = results
        .iter()
        .map(|r| {
            let mut map = Mapping::new();
            map.insert("action_id".into(), r.action_id.clone().into());
            map.insert("severity".into(), r.severity.as_str().into());
            if let Some(id) = &r.error_id {
                map.insert("error_id".into(), id.clone().into());
            }
            if !r.message.is_empty() {
                map.insert("message".into(), r.message.clone().into());
            }
            Y::Mapping(map)
        })
        .collect();
    serde_yaml::to_string(&Y::Sequence(items)).unwrap_or_else(|_| "[]\n".to_string())
}
