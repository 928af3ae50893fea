use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::Level;

use super::{Action, ActionContext, ActionRegistry};
use crate::types::{panic_message, ActionResult, Outcome, Severity};

/// Error id of a result produced for an action that failed or panicked.
pub const UNEXPECTED_ERROR_ID: &str = "UNEXPECTED_ERROR";
/// Error id of a result produced for an action whose dependency did not succeed.
pub const SKIP_ID: &str = "SKIP";

fn unexpected(action_id: &str, text: &str) -> ActionResult {
    ActionResult::from_outcome(
        action_id,
        Outcome::error(
            UNEXPECTED_ERROR_ID,
            format!("Unhandled failure in action '{action_id}': {text}"),
        ),
    )
}

fn skipped(action_id: &str, failed: &[&str]) -> ActionResult {
    ActionResult::from_outcome(
        action_id,
        Outcome::new(
            Severity::Skip,
            SKIP_ID,
            format!("Skipped because {} was not successful", failed.join(", ")),
        ),
    )
}

fn invoke(action: &dyn Action, ctx: &ActionContext<'_>) -> ActionResult {
    ctx.log(Level::Debug, &format!("Running action {}.", action.id()));
    match catch_unwind(AssertUnwindSafe(|| action.run(ctx))) {
        Ok(Ok(outcome)) => ActionResult::from_outcome(action.id(), outcome),
        Ok(Err(e)) => unexpected(action.id(), &e.msg),
        Err(payload) => unexpected(action.id(), &panic_message(payload.as_ref())),
    }
}

/// Run every registered action once and return their results in wave order.
///
/// With `parallel` set, the actions of one wave run on scoped threads; the call
/// still returns only when the whole wave is done, and the output order does not
/// depend on completion order.
pub fn run_actions(registry: &ActionRegistry, ctx: &ActionContext<'_>, parallel: bool) -> Vec<ActionResult> {
    let mut finished: HashMap<String, Severity> = HashMap::with_capacity(registry.len());
    let mut results = Vec::with_capacity(registry.len());

    for wave in registry.waves() {
        let mut slots: Vec<Option<ActionResult>> = vec![None; wave.len()];
        let mut runnable: Vec<(usize, &dyn Action)> = Vec::with_capacity(wave.len());
        for (slot, action) in wave.iter().enumerate() {
            let failed: Vec<&str> = action
                .dependencies()
                .iter()
                .copied()
                .filter(|d| finished.get(*d).is_some_and(|s| *s >= Severity::Skip))
                .collect();
            if failed.is_empty() {
                runnable.push((slot, *action));
            } else {
                slots[slot] = Some(skipped(action.id(), &failed));
            }
        }

        if parallel && runnable.len() > 1 {
            std::thread::scope(|s| {
                let handles: Vec<_> = runnable
                    .iter()
                    .map(|&(slot, action)| (slot, action.id(), s.spawn(move || invoke(action, ctx))))
                    .collect();
                for (slot, id, handle) in handles {
                    let res = handle
                        .join()
                        .unwrap_or_else(|p| unexpected(id, &panic_message(p.as_ref())));
                    slots[slot] = Some(res);
                }
            });
        } else {
            for &(slot, action) in &runnable {
                slots[slot] = Some(invoke(action, ctx));
            }
        }

        for res in slots.into_iter().flatten() {
            finished.insert(res.action_id.clone(), res.severity);
            results.push(res);
        }
    }
    results
}

/// Results at or above `threshold`, in their original order.
#[must_use]
pub fn find_actions_of_severity(results: &[ActionResult], threshold: Severity) -> Vec<&ActionResult> {
    results.iter().filter(|r| r.severity >= threshold).collect()
}
