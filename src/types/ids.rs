//! Identifiers for runs and check sets.
use uuid::Uuid;

use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Random identifier for one invocation of the tool.
#[must_use]
pub fn new_run_id() -> Uuid {
    Uuid::new_v4()
}

/// Deterministic UUIDv5 over the ordered action ids of a registry.
///
/// Two runs executing the same checks in the same order share this id, which lets
/// reports from different hosts be grouped by check set.
#[must_use]
pub fn check_set_id<'a>(action_ids: impl IntoIterator<Item = &'a str>) -> Uuid {
    let mut s = String::new();
    for id in action_ids {
        s.push_str(id);
        s.push('\n');
    }
    Uuid::new_v5(&namespace(), s.as_bytes())
}
