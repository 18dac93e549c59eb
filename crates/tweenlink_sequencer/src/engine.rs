// SPDX-License-Identifier: MIT OR Apache-2.0
//! The animation engine seam.
//!
//! tweenlink never interpolates anything itself. It builds tweens and
//! timelines through [`AnimationEngine`] and drives them through
//! [`TweenHandle`] and [`TimelineHandle`].

use crate::error::EngineError;
use crate::vars::TimelineVars;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A single animatable property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Numeric value (positions, opacity, durations)
    Number(f32),
    /// Boolean flag
    Bool(bool),
    /// Textual value (colors, units, easing names)
    Text(String),
}

impl PropertyValue {
    /// Get as number if possible
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PropertyValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as text if possible
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value as f32)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Number(value as f32)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

/// Insertion-ordered property map handed to the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(IndexMap<String, PropertyValue>);

impl PropertyMap {
    /// Create an empty property map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a property
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Get a property
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// Get a numeric property
    pub fn number(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(PropertyValue::as_number)
    }

    /// Iterate properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyMap
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Insertion point of a child in a timeline.
///
/// Opaque to the sequencer: it is handed to the engine untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    /// Absolute time in seconds
    Time(f32),
    /// Named label
    Label(String),
    /// Relative expression such as `"-=0.5"`, `"<"` or `"intro+=1"`
    Relative(String),
}

impl Position {
    /// Classify a position string. Empty strings mean "no position".
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if value.starts_with('<')
            || value.starts_with('>')
            || value.contains("+=")
            || value.contains("-=")
        {
            return Some(Position::Relative(value.to_string()));
        }
        match value.parse::<f32>() {
            Ok(time) => Some(Position::Time(time)),
            Err(_) => Some(Position::Label(value.to_string())),
        }
    }
}

impl From<f32> for Position {
    fn from(time: f32) -> Self {
        Position::Time(time)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Time(t) => write!(f, "{t}"),
            Position::Label(s) | Position::Relative(s) => f.write_str(s),
        }
    }
}

/// Timeline lifecycle events a callback can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineEvent {
    /// Playback started
    Start,
    /// Playhead moved
    Update,
    /// A repeat cycle began
    Repeat,
    /// Reverse playback reached the start
    ReverseComplete,
    /// Playback reached the end
    Complete,
}

/// Callback registered on a timeline event
pub type TimelineCallback = Arc<dyn Fn() + Send + Sync>;

/// A live tween owned by the engine
pub trait TweenHandle {
    /// Stop the tween and release it
    fn kill(&mut self);

    /// Whether [`TweenHandle::kill`] has been called
    fn is_killed(&self) -> bool;
}

/// A live timeline owned by the engine
pub trait TimelineHandle {
    /// Child type accepted by [`TimelineHandle::add`]
    type Child;

    /// Remove every child
    fn clear(&mut self);
    /// Insert a child at `position`, or at the natural append point
    fn add(&mut self, child: Self::Child, position: Option<&Position>);
    /// Remove one child. Returns whether it was present.
    fn remove(&mut self, child: &Self::Child) -> bool;
    /// Number of children
    fn child_count(&self) -> usize;

    // Transport calls return the events they reached instead of running
    // callbacks, so the owner can run them after releasing its own locks.

    /// Start playing forward
    fn play(&mut self) -> Vec<TimelineEvent>;
    /// Pause playback
    fn pause(&mut self);
    /// Resume in the current direction
    fn resume(&mut self) -> Vec<TimelineEvent>;
    /// Flip playback direction
    fn reverse(&mut self) -> Vec<TimelineEvent>;
    /// Jump to the start and play
    fn restart(&mut self) -> Vec<TimelineEvent>;
    /// Move the playhead to a position
    fn seek(&mut self, position: &Position) -> Vec<TimelineEvent>;

    /// Progress in `[0, 1]`
    fn progress(&self) -> f32;
    /// Set progress in `[0, 1]`
    fn set_progress(&mut self, progress: f32);
    /// Duration of one iteration
    fn duration(&self) -> f32;
    /// Duration including repeats and repeat delays
    fn total_duration(&self) -> f32;
    /// Playhead time
    fn time(&self) -> f32;
    /// Set playhead time
    fn set_time(&mut self, time: f32);
    /// Playback speed multiplier
    fn time_scale(&self) -> f32;
    /// Set playback speed multiplier
    fn set_time_scale(&mut self, scale: f32);
    /// Repeat count (`-1` repeats forever)
    fn repeat(&self) -> i32;
    /// Set repeat count
    fn set_repeat(&mut self, repeat: i32);
    /// Delay between repeats
    fn repeat_delay(&self) -> f32;
    /// Set delay between repeats
    fn set_repeat_delay(&mut self, delay: f32);
    /// Whether repeats alternate direction
    fn yoyo(&self) -> bool;
    /// Set alternating repeats
    fn set_yoyo(&mut self, yoyo: bool);
    /// Start delay
    fn delay(&self) -> f32;
    /// Set start delay
    fn set_delay(&mut self, delay: f32);

    /// Add a label at `position`, or at the append point
    fn add_label(&mut self, name: &str, position: Option<&Position>);
    /// Remove a label
    fn remove_label(&mut self, name: &str);
    /// Time of a label
    fn label_time(&self, name: &str) -> Option<f32>;
    /// All labels with their times
    fn labels(&self) -> Vec<(String, f32)>;

    /// Register or clear an event callback
    fn set_callback(&mut self, event: TimelineEvent, callback: Option<TimelineCallback>);
    /// Registered callback for an event
    fn callback(&self, event: TimelineEvent) -> Option<TimelineCallback>;

    /// Stop the timeline and release its children
    fn kill(&mut self);
    /// Flush cached starting values
    fn invalidate(&mut self);
    /// Whether the timeline is currently playing
    fn is_active(&self) -> bool;
    /// Whether the timeline is paused
    fn paused(&self) -> bool;
}

/// Factory for tweens and timelines.
///
/// Engines are shared between sequencers and the detach callbacks they hand
/// out, hence the thread-safety bounds.
pub trait AnimationEngine: Send + Sync + 'static {
    /// Element type tweens target
    type Element: Clone + Send + Sync + 'static;
    /// Native tween handle
    type Tween: TweenHandle + Send + 'static;
    /// Native timeline
    type Timeline: TimelineHandle<Child = Self::Tween> + Send + 'static;

    /// Tween from the current state to `vars`
    fn to(&self, target: &Self::Element, vars: &PropertyMap) -> Result<Self::Tween, EngineError>;
    /// Tween from `vars` to the current state
    fn from(&self, target: &Self::Element, vars: &PropertyMap) -> Result<Self::Tween, EngineError>;
    /// Tween from `from` to `to`
    fn from_to(
        &self,
        target: &Self::Element,
        from: &PropertyMap,
        to: &PropertyMap,
    ) -> Result<Self::Tween, EngineError>;
    /// Apply `vars` instantly
    fn set(&self, target: &Self::Element, vars: &PropertyMap) -> Result<Self::Tween, EngineError>;

    /// Create an empty timeline
    fn timeline(&self, vars: &TimelineVars) -> Result<Self::Timeline, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parse() {
        assert_eq!(Position::parse(""), None);
        assert_eq!(Position::parse("   "), None);
        assert_eq!(Position::parse("1.5"), Some(Position::Time(1.5)));
        assert_eq!(Position::parse("intro"), Some(Position::Label("intro".into())));
        assert_eq!(Position::parse("-=0.5"), Some(Position::Relative("-=0.5".into())));
        assert_eq!(Position::parse("<"), Some(Position::Relative("<".into())));
        assert_eq!(
            Position::parse("intro+=1"),
            Some(Position::Relative("intro+=1".into()))
        );
    }

    #[test]
    fn test_property_map_order() {
        let map = PropertyMap::new().with("x", 100).with("opacity", 0.5).with("ease", "power2");
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["x", "opacity", "ease"]);
        assert_eq!(map.number("x"), Some(100.0));
        assert_eq!(map.get("ease").and_then(PropertyValue::as_text), Some("power2"));
    }

    #[test]
    fn test_property_map_ron() {
        let map: PropertyMap = ron::from_str(r#"{"duration": 1.0, "yoyo": true, "ease": "none"}"#).unwrap();
        assert_eq!(map.number("duration"), Some(1.0));
        assert_eq!(map.get("yoyo"), Some(&PropertyValue::Bool(true)));
        assert_eq!(map.len(), 3);
    }
}
