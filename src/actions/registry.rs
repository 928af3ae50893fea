use std::collections::{HashMap, HashSet};

use super::Action;
use crate::types::ids::check_set_id;

/// Registration faults. These are programming errors and are reported before any
/// action runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("action id '{0}' is registered more than once")]
    DuplicateId(String),
    #[error("action '{action}' depends on unknown action '{dependency}'")]
    UnknownDependency { action: String, dependency: String },
    #[error("dependency cycle among actions: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

/// Validated set of actions with a precomputed execution plan.
///
/// Wave `n` holds the actions whose dependencies all sit in waves `< n`. Inside a wave
/// registration order is kept, so the plan is deterministic.
pub struct ActionRegistry {
    actions: Vec<Box<dyn Action>>,
    waves: Vec<Vec<usize>>,
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let waves: Vec<Vec<&str>> = self
            .waves
            .iter()
            .map(|w| w.iter().map(|&i| self.actions[i].id()).collect())
            .collect();
        f.debug_struct("ActionRegistry").field("waves", &waves).finish()
    }
}

impl ActionRegistry {
    /// # Errors
    /// Returns a `RegistryError` on duplicate ids, unknown dependencies or cycles.
    pub fn new(actions: Vec<Box<dyn Action>>) -> Result<Self, RegistryError> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(actions.len());
        for (i, a) in actions.iter().enumerate() {
            if index.insert(a.id(), i).is_some() {
                return Err(RegistryError::DuplicateId(a.id().to_string()));
            }
        }
        for a in &actions {
            if let Some(dep) = a.dependencies().iter().find(|d| !index.contains_key(**d)) {
                return Err(RegistryError::UnknownDependency {
                    action: a.id().to_string(),
                    dependency: (*dep).to_string(),
                });
            }
        }

        let mut placed: HashSet<usize> = HashSet::with_capacity(actions.len());
        let mut waves: Vec<Vec<usize>> = Vec::new();
        while placed.len() < actions.len() {
            let wave: Vec<usize> = (0..actions.len())
                .filter(|i| !placed.contains(i))
                .filter(|&i| {
                    actions[i]
                        .dependencies()
                        .iter()
                        .all(|d| index.get(d).is_some_and(|j| placed.contains(j)))
                })
                .collect();
            if wave.is_empty() {
                let stuck = (0..actions.len())
                    .filter(|i| !placed.contains(i))
                    .map(|i| actions[i].id().to_string())
                    .collect();
                return Err(RegistryError::Cycle(stuck));
            }
            placed.extend(wave.iter().copied());
            waves.push(wave);
        }
        Ok(Self { actions, waves })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Execution plan as slices of actions, earliest wave first.
    pub fn waves(&self) -> impl Iterator<Item = Vec<&dyn Action>> + '_ {
        self.waves
            .iter()
            .map(|w| w.iter().map(|&i| self.actions[i].as_ref()).collect())
    }

    /// Action ids in execution order.
    #[must_use]
    pub fn ordered_ids(&self) -> Vec<&str> {
        self.waves
            .iter()
            .flatten()
            .map(|&i| self.actions[i].id())
            .collect()
    }

    /// Deterministic identifier of this set of checks, stable across runs.
    #[must_use]
    pub fn check_set_id(&self) -> uuid::Uuid {
        check_set_id(self.ordered_ids())
    }
}
