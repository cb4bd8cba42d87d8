//! Trigger detection over input events, tracked per node.

use crate::common::ends_with_ci;
use crate::dom::NodeId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    /// The trigger is present and has already fired for the cached value.
    ArmedSuppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Fire,
    Ignore,
}

/// Recognises the moment a field's text starts ending with the trigger.
///
/// Keeps the last value that fired per node so repeated input events for an
/// unchanged value do not reopen the picker.
#[derive(Debug, Clone)]
pub struct TriggerDetector {
    trigger: String,
    last_seen: HashMap<NodeId, String>,
}

impl TriggerDetector {
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            last_seen: HashMap::new(),
        }
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Feed one input event. `overlay_open` reflects the re-entrancy guard.
    pub fn on_input(&mut self, node: NodeId, current: &str, overlay_open: bool) -> TriggerOutcome {
        if !ends_with_ci(current, &self.trigger) {
            if self.last_seen.remove(&node).is_some() {
                tracing::debug!(?node, "trigger cleared");
            }
            return TriggerOutcome::Ignore;
        }
        if overlay_open {
            return TriggerOutcome::Ignore;
        }
        if self.last_seen.get(&node).map(String::as_str) == Some(current) {
            return TriggerOutcome::Ignore;
        }
        self.last_seen.insert(node, current.to_string());
        tracing::debug!(?node, "trigger fired");
        TriggerOutcome::Fire
    }

    pub fn state(&self, node: NodeId) -> TriggerState {
        if self.last_seen.contains_key(&node) {
            TriggerState::ArmedSuppressed
        } else {
            TriggerState::Idle
        }
    }

    /// Drop the cached value for `node`, e.g. when the picker closes.
    pub fn forget(&mut self, node: NodeId) {
        self.last_seen.remove(&node);
    }

    /// Number of nodes currently armed.
    pub fn tracked(&self) -> usize {
        self.last_seen.len()
    }
}
