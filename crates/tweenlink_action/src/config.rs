// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry configuration.
//!
//! A [`MotionConfig`] describes the default timeline and any named timelines
//! to register up front. It is stored as RON:
//!
//! ```ron
//! (
//!     version: 1,
//!     default_timeline: (paused: true),
//!     timelines: {
//!         "hero": (repeat: -1, yoyo: true),
//!         "footer": (defaults: {"duration": 0.25}),
//!     },
//! )
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tweenlink_sequencer::{Result, TimelineVars, TweenError};

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Timelines to create when a [`crate::Motion`] is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Format version
    pub version: u32,
    /// Settings of the unnamed default timeline
    pub default_timeline: TimelineVars,
    /// Named timelines, registered in declaration order
    pub timelines: IndexMap<String, TimelineVars>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            default_timeline: TimelineVars::default(),
            timelines: IndexMap::new(),
        }
    }
}

impl MotionConfig {
    /// Add a named timeline, builder style
    pub fn with_timeline(mut self, name: impl Into<String>, vars: TimelineVars) -> Self {
        self.timelines.insert(name.into(), vars);
        self
    }

    /// Parse from a RON string
    pub fn from_ron(s: &str) -> Result<Self> {
        let config: MotionConfig = ron::from_str(s)?;
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(TweenError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }
        Ok(config)
    }

    /// Serialize to a RON string
    pub fn to_ron(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::default().struct_names(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tweenlink_sequencer::PropertyMap;

    #[test]
    fn test_parse_example() {
        let config = MotionConfig::from_ron(
            r#"(
                version: 1,
                default_timeline: (paused: true),
                timelines: {
                    "hero": (repeat: -1, yoyo: true),
                    "footer": (defaults: {"duration": 0.25}),
                },
            )"#,
        )
        .unwrap();

        assert!(config.default_timeline.paused);
        let names: Vec<_> = config.timelines.keys().cloned().collect();
        assert_eq!(names, vec!["hero", "footer"]);
        assert_eq!(config.timelines["hero"].repeat, -1);
        assert_eq!(config.timelines["footer"].defaults.number("duration"), Some(0.25));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MotionConfig::from_ron("()").unwrap();
        assert_eq!(config, MotionConfig::default());
    }

    #[test]
    fn test_serialization() {
        let config = MotionConfig::default().with_timeline(
            "intro",
            TimelineVars::default().repeat(2).defaults(PropertyMap::new().with("ease", "power1")),
        );
        let ron = config.to_ron().unwrap();
        let loaded = MotionConfig::from_ron(&ron).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = MotionConfig::from_ron("(version: 99)").unwrap_err();
        assert!(matches!(err, TweenError::UnsupportedVersion { found: 99, .. }));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motion.ron");
        let config = MotionConfig::default()
            .with_timeline("hero", TimelineVars::default().repeat(-1))
            .with_timeline("footer", TimelineVars::default().paused(true));

        config.save(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("hero"));
        assert_eq!(MotionConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MotionConfig::load(Path::new("/nonexistent/tweenlink.ron")).unwrap_err();
        assert!(matches!(err, TweenError::Io(_)));
    }
}
