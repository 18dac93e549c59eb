// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline construction settings.

use crate::engine::PropertyMap;
use serde::{Deserialize, Serialize};

/// Settings passed to [`crate::AnimationEngine::timeline`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineVars {
    /// Create the timeline paused
    pub paused: bool,
    /// Repeat count (`-1` repeats forever)
    pub repeat: i32,
    /// Delay between repeats in seconds
    pub repeat_delay: f32,
    /// Alternate direction on every repeat
    pub yoyo: bool,
    /// Start delay in seconds
    pub delay: f32,
    /// Playback speed multiplier
    pub time_scale: f32,
    /// Properties the engine applies to every child by default
    pub defaults: PropertyMap,
}

impl TimelineVars {
    /// Builder: start paused
    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Builder: repeat count
    pub fn repeat(mut self, repeat: i32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Builder: alternate direction on repeat
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Builder: child defaults
    pub fn defaults(mut self, defaults: PropertyMap) -> Self {
        self.defaults = defaults;
        self
    }
}

impl Default for TimelineVars {
    fn default() -> Self {
        Self {
            paused: false,
            repeat: 0,
            repeat_delay: 0.0,
            yoyo: false,
            delay: 0.0,
            time_scale: 1.0,
            defaults: PropertyMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron() {
        let vars: TimelineVars = ron::from_str("(repeat: -1, yoyo: true)").unwrap();
        assert_eq!(vars.repeat, -1);
        assert!(vars.yoyo);
        assert_eq!(vars.time_scale, 1.0);
        assert!(vars.defaults.is_empty());
    }
}
