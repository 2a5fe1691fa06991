use std::collections::BTreeMap;

use crate::{Transport, STAGE_COUNT};

/// Key names that always quit and cannot be rebound.
pub const QUIT_KEYS: [&str; 2] = ["q", "esc"];

/// Routes key names (as produced by the front-end, e.g. `"left"`, `"space"`,
/// `"G"`) to transport actions.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    bindings: BTreeMap<String, Transport>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = BTreeMap::new();
        for (key, action) in [
            ("home", Transport::JumpToStart),
            ("g", Transport::JumpToStart),
            ("left", Transport::StepBack),
            ("h", Transport::StepBack),
            ("space", Transport::TogglePlay),
            ("p", Transport::TogglePlay),
            ("right", Transport::StepForward),
            ("l", Transport::StepForward),
            ("end", Transport::JumpToEnd),
            ("G", Transport::JumpToEnd),
        ] {
            bindings.insert(key.to_string(), action);
        }
        for number in 1..=STAGE_COUNT {
            bindings.insert(number.to_string(), Transport::Scrub((number - 1) as f32));
        }
        Self { bindings }
    }
}

impl KeyBindings {
    /// Default bindings with `overrides` layered on top.
    pub fn with_overrides(overrides: &BTreeMap<String, Transport>) -> Self {
        let mut keys = Self::default();
        for (key, action) in overrides {
            keys.bind(key.clone(), *action);
        }
        keys
    }

    pub fn bind(&mut self, key: impl Into<String>, action: Transport) {
        self.bindings.insert(key.into(), action);
    }

    pub fn resolve(&self, key: &str) -> Option<Transport> {
        self.bindings.get(key).copied()
    }

    /// Keys bound to `action`, in sorted order. Used for on-screen hints.
    pub fn keys_for(&self, action: Transport) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| key.as_str())
            .collect()
    }
}
