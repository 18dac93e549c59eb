// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory animation engine.
//!
//! Records what a real engine would be asked to do: which tweens were built,
//! where each landed on a timeline, and how often each was killed. There is
//! no interpolation; [`MemoryTimeline::tick`] only moves a playhead.

use crate::descriptor::TweenKind;
use crate::engine::{
    AnimationEngine, Position, PropertyMap, TimelineCallback, TimelineEvent, TimelineHandle,
    TweenHandle,
};
use crate::error::EngineError;
use crate::vars::TimelineVars;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Tween duration when neither the tween nor the timeline defaults set one
pub const DEFAULT_DURATION: f32 = 0.5;

#[derive(Debug)]
struct TweenRecord<T> {
    serial: u64,
    kind: TweenKind,
    target: T,
    vars: PropertyMap,
    from: Option<PropertyMap>,
    kills: AtomicUsize,
}

/// Tween handle produced by [`MemoryEngine`]. Clones share one record.
#[derive(Debug)]
pub struct MemoryTween<T> {
    record: Arc<TweenRecord<T>>,
}

impl<T> Clone for MemoryTween<T> {
    fn clone(&self) -> Self {
        Self {
            record: self.record.clone(),
        }
    }
}

impl<T> MemoryTween<T> {
    /// Creation serial, unique per engine
    pub fn serial(&self) -> u64 {
        self.record.serial
    }

    /// Which operation built this tween
    pub fn kind(&self) -> TweenKind {
        self.record.kind
    }

    /// Target element
    pub fn target(&self) -> &T {
        &self.record.target
    }

    /// Destination values (`to` side for from-to tweens)
    pub fn vars(&self) -> &PropertyMap {
        &self.record.vars
    }

    /// Starting values of a from-to tween
    pub fn from_vars(&self) -> Option<&PropertyMap> {
        self.record.from.as_ref()
    }

    /// How many times `kill` was called
    pub fn kill_count(&self) -> usize {
        self.record.kills.load(Ordering::SeqCst)
    }

    /// Duration declared on the tween itself
    fn declared_duration(&self) -> Option<f32> {
        match self.record.kind {
            TweenKind::Set => Some(0.0),
            _ => self.record.vars.number("duration"),
        }
    }
}

impl<T> TweenHandle for MemoryTween<T> {
    fn kill(&mut self) {
        self.record.kills.fetch_add(1, Ordering::SeqCst);
    }

    fn is_killed(&self) -> bool {
        self.kill_count() > 0
    }
}

/// A child placed on a [`MemoryTimeline`]
#[derive(Debug, Clone)]
pub struct MemoryChild<T> {
    /// The tween
    pub tween: MemoryTween<T>,
    /// Position it was added with
    pub position: Option<Position>,
    /// Resolved start time
    pub start: f32,
    /// Resolved duration
    pub duration: f32,
}

impl<T> MemoryChild<T> {
    /// End time
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }
}

/// Timeline produced by [`MemoryEngine`]
pub struct MemoryTimeline<T> {
    children: Vec<MemoryChild<T>>,
    labels: IndexMap<String, f32>,
    callbacks: HashMap<TimelineEvent, TimelineCallback>,
    defaults: PropertyMap,
    time: f32,
    time_scale: f32,
    repeat: i32,
    repeat_delay: f32,
    yoyo: bool,
    delay: f32,
    iteration: i32,
    paused: bool,
    reversed: bool,
    killed: bool,
    invalidations: usize,
}

impl<T> MemoryTimeline<T> {
    fn new(vars: &TimelineVars) -> Self {
        Self {
            children: Vec::new(),
            labels: IndexMap::new(),
            callbacks: HashMap::new(),
            defaults: vars.defaults.clone(),
            time: 0.0,
            time_scale: vars.time_scale,
            repeat: vars.repeat,
            repeat_delay: vars.repeat_delay,
            yoyo: vars.yoyo,
            delay: vars.delay,
            iteration: 0,
            paused: vars.paused,
            reversed: false,
            killed: false,
            invalidations: 0,
        }
    }

    /// Children in insertion order
    pub fn children(&self) -> &[MemoryChild<T>] {
        &self.children
    }

    /// Whether the timeline was killed
    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// How many times `invalidate` was called
    pub fn invalidation_count(&self) -> usize {
        self.invalidations
    }

    /// Advance the playhead by `delta` seconds of wall time.
    ///
    /// Returns the events reached, in order. Callbacks are not run here.
    pub fn tick(&mut self, delta: f32) -> Vec<TimelineEvent> {
        let mut fired = Vec::new();
        if self.paused || self.killed {
            return fired;
        }

        let duration = self.duration();
        let step = delta * self.time_scale;
        self.time += if self.reversed { -step } else { step };
        fired.push(TimelineEvent::Update);

        if !self.reversed && self.time >= duration {
            let overshoot = self.time - duration;
            if self.repeat < 0 || self.iteration < self.repeat {
                self.iteration += 1;
                fired.push(TimelineEvent::Repeat);
                if self.yoyo {
                    self.reversed = true;
                    self.time = (duration - overshoot).max(0.0);
                } else {
                    self.time = overshoot.min(duration);
                }
            } else {
                self.time = duration;
                self.paused = true;
                fired.push(TimelineEvent::Complete);
            }
        } else if self.reversed && self.time <= 0.0 {
            let overshoot = -self.time;
            if self.yoyo && (self.repeat < 0 || self.iteration < self.repeat) {
                self.iteration += 1;
                fired.push(TimelineEvent::Repeat);
                self.reversed = false;
                self.time = overshoot.min(duration);
            } else {
                self.time = 0.0;
                self.paused = true;
                fired.push(if self.yoyo {
                    TimelineEvent::Complete
                } else {
                    TimelineEvent::ReverseComplete
                });
            }
        }
        fired
    }

    /// Natural append point: end of the latest child
    fn end(&self) -> f32 {
        self.children.iter().map(MemoryChild::end).fold(0.0, f32::max)
    }

    /// Resolve a position to a time.
    ///
    /// `Err` carries the name of a plain label that does not exist yet.
    fn resolve(&self, position: Option<&Position>) -> Result<f32, String> {
        let time = match position {
            None => self.end(),
            Some(Position::Time(time)) => *time,
            Some(Position::Label(name)) => match self.labels.get(name) {
                Some(time) => *time,
                None => return Err(name.clone()),
            },
            Some(Position::Relative(expr)) => self.resolve_relative(expr),
        };
        Ok(time.max(0.0))
    }

    fn resolve_relative(&self, expr: &str) -> f32 {
        let last = self.children.last();
        if let Some(rest) = expr.strip_prefix('<') {
            return last.map_or(0.0, |c| c.start) + parse_offset(rest);
        }
        if let Some(rest) = expr.strip_prefix('>') {
            return last.map_or(0.0, MemoryChild::end) + parse_offset(rest);
        }

        let split = expr.find("+=").or_else(|| expr.find("-=")).unwrap_or(expr.len());
        let (anchor, offset) = expr.split_at(split);
        let base = if anchor.is_empty() {
            self.end()
        } else {
            self.labels.get(anchor).copied().unwrap_or_else(|| self.end())
        };
        base + parse_offset(offset)
    }
}

/// Parse `"+=1"`, `"-=0.5"` or a bare number. Anything else is no offset.
fn parse_offset(text: &str) -> f32 {
    let text = text.trim();
    if let Some(value) = text.strip_prefix("+=") {
        value.trim().parse::<f32>().unwrap_or(0.0)
    } else if let Some(value) = text.strip_prefix("-=") {
        -value.trim().parse::<f32>().unwrap_or(0.0)
    } else {
        text.parse::<f32>().unwrap_or(0.0)
    }
}

impl<T> TimelineHandle for MemoryTimeline<T> {
    type Child = MemoryTween<T>;

    /// Removes children only; labels survive so label positions stay stable
    /// across rebuilds.
    fn clear(&mut self) {
        self.children.clear();
    }

    fn add(&mut self, child: MemoryTween<T>, position: Option<&Position>) {
        let start = match self.resolve(position) {
            Ok(start) => start,
            Err(label) => {
                let end = self.end();
                self.labels.insert(label, end);
                end
            }
        };
        let duration = child
            .declared_duration()
            .or_else(|| self.defaults.number("duration"))
            .unwrap_or(DEFAULT_DURATION);

        self.children.push(MemoryChild {
            tween: child,
            position: position.cloned(),
            start,
            duration,
        });
    }

    fn remove(&mut self, child: &MemoryTween<T>) -> bool {
        let before = self.children.len();
        self.children
            .retain(|c| !Arc::ptr_eq(&c.tween.record, &child.record));
        self.children.len() != before
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn play(&mut self) -> Vec<TimelineEvent> {
        let fired = if self.time <= 0.0 {
            vec![TimelineEvent::Start]
        } else {
            Vec::new()
        };
        self.paused = false;
        self.reversed = false;
        fired
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) -> Vec<TimelineEvent> {
        self.paused = false;
        Vec::new()
    }

    fn reverse(&mut self) -> Vec<TimelineEvent> {
        self.reversed = !self.reversed;
        self.paused = false;
        Vec::new()
    }

    fn restart(&mut self) -> Vec<TimelineEvent> {
        self.time = 0.0;
        self.iteration = 0;
        self.reversed = false;
        self.paused = false;
        vec![TimelineEvent::Start]
    }

    fn seek(&mut self, position: &Position) -> Vec<TimelineEvent> {
        if let Ok(time) = self.resolve(Some(position)) {
            self.time = time.min(self.duration());
        }
        Vec::new()
    }

    fn progress(&self) -> f32 {
        let duration = self.duration();
        if duration <= 0.0 {
            0.0
        } else {
            (self.time / duration).clamp(0.0, 1.0)
        }
    }

    fn set_progress(&mut self, progress: f32) {
        self.time = progress.clamp(0.0, 1.0) * self.duration();
    }

    fn duration(&self) -> f32 {
        self.end()
    }

    fn total_duration(&self) -> f32 {
        if self.repeat < 0 {
            return f32::INFINITY;
        }
        let cycles = self.repeat as f32;
        self.duration() * (cycles + 1.0) + self.repeat_delay * cycles
    }

    fn time(&self) -> f32 {
        self.time
    }

    fn set_time(&mut self, time: f32) {
        self.time = time.clamp(0.0, self.duration());
    }

    fn time_scale(&self) -> f32 {
        self.time_scale
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    fn repeat(&self) -> i32 {
        self.repeat
    }

    fn set_repeat(&mut self, repeat: i32) {
        self.repeat = repeat;
    }

    fn repeat_delay(&self) -> f32 {
        self.repeat_delay
    }

    fn set_repeat_delay(&mut self, delay: f32) {
        self.repeat_delay = delay;
    }

    fn yoyo(&self) -> bool {
        self.yoyo
    }

    fn set_yoyo(&mut self, yoyo: bool) {
        self.yoyo = yoyo;
    }

    fn delay(&self) -> f32 {
        self.delay
    }

    fn set_delay(&mut self, delay: f32) {
        self.delay = delay;
    }

    fn add_label(&mut self, name: &str, position: Option<&Position>) {
        let time = self.resolve(position).unwrap_or_else(|_| self.end());
        self.labels.insert(name.to_string(), time);
    }

    fn remove_label(&mut self, name: &str) {
        self.labels.shift_remove(name);
    }

    fn label_time(&self, name: &str) -> Option<f32> {
        self.labels.get(name).copied()
    }

    fn labels(&self) -> Vec<(String, f32)> {
        self.labels.iter().map(|(name, time)| (name.clone(), *time)).collect()
    }

    fn set_callback(&mut self, event: TimelineEvent, callback: Option<TimelineCallback>) {
        match callback {
            Some(callback) => {
                self.callbacks.insert(event, callback);
            }
            None => {
                self.callbacks.remove(&event);
            }
        }
    }

    fn callback(&self, event: TimelineEvent) -> Option<TimelineCallback> {
        self.callbacks.get(&event).cloned()
    }

    fn kill(&mut self) {
        for child in &mut self.children {
            child.tween.kill();
        }
        self.children.clear();
        self.killed = true;
        self.paused = true;
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }

    fn is_active(&self) -> bool {
        if self.paused || self.killed {
            return false;
        }
        if self.reversed {
            self.time > 0.0
        } else {
            self.time < self.duration()
        }
    }

    fn paused(&self) -> bool {
        self.paused
    }
}

/// Engine that records every tween it builds
pub struct MemoryEngine<T = String> {
    next_serial: AtomicU64,
    created: Mutex<Vec<MemoryTween<T>>>,
    timelines: AtomicUsize,
}

impl<T> MemoryEngine<T> {
    /// Create an engine with an empty log
    pub fn new() -> Self {
        Self {
            next_serial: AtomicU64::new(0),
            created: Mutex::new(Vec::new()),
            timelines: AtomicUsize::new(0),
        }
    }

    /// Every tween built so far, in creation order
    pub fn created(&self) -> Vec<MemoryTween<T>> {
        self.created.lock().clone()
    }

    /// Number of tweens built so far
    pub fn created_count(&self) -> usize {
        self.created.lock().len()
    }

    /// Forget every logged tween and return how many were dropped.
    ///
    /// Each rebuild logs a fresh tween per child, so long-running hosts
    /// should clear the log once they are done inspecting it.
    pub fn clear_log(&self) -> usize {
        let mut created = self.created.lock();
        let dropped = created.len();
        created.clear();
        dropped
    }

    /// Number of timelines built so far
    pub fn timeline_count(&self) -> usize {
        self.timelines.load(Ordering::SeqCst)
    }

    fn build(
        &self,
        kind: TweenKind,
        target: &T,
        from: Option<&PropertyMap>,
        vars: &PropertyMap,
    ) -> Result<MemoryTween<T>, EngineError>
    where
        T: Clone,
    {
        validate(vars)?;
        if let Some(from) = from {
            validate(from)?;
        }

        let tween = MemoryTween {
            record: Arc::new(TweenRecord {
                serial: self.next_serial.fetch_add(1, Ordering::SeqCst),
                kind,
                target: target.clone(),
                vars: vars.clone(),
                from: from.cloned(),
                kills: AtomicUsize::new(0),
            }),
        };
        self.created.lock().push(tween.clone());
        Ok(tween)
    }
}

impl<T> Default for MemoryEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(vars: &PropertyMap) -> Result<(), EngineError> {
    for (name, value) in vars.iter() {
        if let Some(number) = value.as_number() {
            if !number.is_finite() {
                return Err(EngineError::InvalidProperty {
                    property: name.to_string(),
                    reason: format!("{number} is not a finite number"),
                });
            }
        }
    }
    if vars.number("duration").is_some_and(|d| d < 0.0) {
        return Err(EngineError::InvalidProperty {
            property: "duration".to_string(),
            reason: "duration cannot be negative".to_string(),
        });
    }
    Ok(())
}

impl<T> AnimationEngine for MemoryEngine<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Element = T;
    type Tween = MemoryTween<T>;
    type Timeline = MemoryTimeline<T>;

    fn to(&self, target: &T, vars: &PropertyMap) -> Result<MemoryTween<T>, EngineError> {
        self.build(TweenKind::To, target, None, vars)
    }

    fn from(&self, target: &T, vars: &PropertyMap) -> Result<MemoryTween<T>, EngineError> {
        self.build(TweenKind::From, target, None, vars)
    }

    fn from_to(
        &self,
        target: &T,
        from: &PropertyMap,
        to: &PropertyMap,
    ) -> Result<MemoryTween<T>, EngineError> {
        self.build(TweenKind::FromTo, target, Some(from), to)
    }

    fn set(&self, target: &T, vars: &PropertyMap) -> Result<MemoryTween<T>, EngineError> {
        self.build(TweenKind::Set, target, None, vars)
    }

    fn timeline(&self, vars: &TimelineVars) -> Result<MemoryTimeline<T>, EngineError> {
        if !vars.time_scale.is_finite() || vars.time_scale <= 0.0 {
            return Err(EngineError::Rejected(format!(
                "time scale must be positive, got {}",
                vars.time_scale
            )));
        }
        self.timelines.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryTimeline::new(vars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tween(engine: &MemoryEngine<&'static str>, duration: f32) -> MemoryTween<&'static str> {
        engine
            .to(&"box", &PropertyMap::new().with("x", 10).with("duration", duration))
            .unwrap()
    }

    #[test]
    fn test_append_and_positions() {
        let engine = MemoryEngine::new();
        let mut timeline = engine.timeline(&TimelineVars::default()).unwrap();

        timeline.add(tween(&engine, 1.0), None);
        timeline.add(tween(&engine, 1.0), None);
        timeline.add(tween(&engine, 0.5), Some(&Position::Relative("-=0.5".into())));
        timeline.add(tween(&engine, 0.5), Some(&Position::Relative("<".into())));
        timeline.add(tween(&engine, 0.5), Some(&Position::Time(4.0)));

        let starts: Vec<f32> = timeline.children().iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0.0, 1.0, 1.5, 1.5, 4.0]);
        assert_eq!(timeline.duration(), 4.5);
    }

    #[test]
    fn test_missing_label_created_at_append_point() {
        let engine = MemoryEngine::new();
        let mut timeline = engine.timeline(&TimelineVars::default()).unwrap();

        timeline.add(tween(&engine, 2.0), None);
        timeline.add(tween(&engine, 1.0), Some(&Position::Label("outro".into())));
        timeline.add(tween(&engine, 1.0), Some(&Position::Relative("outro+=0.5".into())));

        assert_eq!(timeline.label_time("outro"), Some(2.0));
        assert_eq!(timeline.children()[2].start, 2.5);

        // Labels survive clear
        timeline.clear();
        assert_eq!(timeline.child_count(), 0);
        assert_eq!(timeline.label_time("outro"), Some(2.0));
    }

    #[test]
    fn test_defaults_and_set_duration() {
        let engine = MemoryEngine::new();
        let vars = TimelineVars::default().defaults(PropertyMap::new().with("duration", 2.0));
        let mut timeline = engine.timeline(&vars).unwrap();

        timeline.add(engine.to(&"a", &PropertyMap::new().with("x", 1)).unwrap(), None);
        timeline.add(engine.set(&"a", &PropertyMap::new().with("x", 0)).unwrap(), None);
        timeline.add(engine.to(&"a", &PropertyMap::new().with("y", 1)).unwrap(), None);

        let durations: Vec<f32> = timeline.children().iter().map(|c| c.duration).collect();
        assert_eq!(durations, vec![2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let engine: MemoryEngine<&str> = MemoryEngine::new();
        let err = engine.to(&"a", &PropertyMap::new().with("x", f32::NAN)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidProperty { ref property, .. } if property == "x"));
        assert_eq!(engine.created_count(), 0);

        let err = engine
            .from_to(&"a", &PropertyMap::new().with("x", f32::INFINITY), &PropertyMap::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidProperty { .. }));
    }

    #[test]
    fn test_transport_and_completion() {
        let engine = MemoryEngine::new();
        let mut timeline = engine.timeline(&TimelineVars::default()).unwrap();
        timeline.add(tween(&engine, 1.0), None);

        assert_eq!(timeline.play(), vec![TimelineEvent::Start]);
        assert_eq!(timeline.tick(0.25), vec![TimelineEvent::Update]);
        assert!((timeline.progress() - 0.25).abs() < 1e-6);
        assert!(timeline.is_active());

        // Mid-playback play does not start again
        assert!(timeline.play().is_empty());

        assert_eq!(
            timeline.tick(1.0),
            vec![TimelineEvent::Update, TimelineEvent::Complete]
        );
        assert_eq!(timeline.time(), 1.0);
        assert!(!timeline.is_active());
        assert!(timeline.tick(1.0).is_empty());
    }

    #[test]
    fn test_repeat_and_total_duration() {
        let engine = MemoryEngine::new();
        let mut timeline = engine.timeline(&TimelineVars::default().repeat(2)).unwrap();
        timeline.add(tween(&engine, 1.0), None);
        timeline.set_repeat_delay(0.5);
        assert_eq!(timeline.total_duration(), 4.0);

        timeline.set_repeat(-1);
        assert!(timeline.total_duration().is_infinite());
    }

    #[test]
    fn test_remove_child() {
        let engine = MemoryEngine::new();
        let mut timeline = engine.timeline(&TimelineVars::default()).unwrap();
        let first = tween(&engine, 1.0);
        timeline.add(first.clone(), None);
        timeline.add(tween(&engine, 1.0), None);

        assert!(timeline.remove(&first));
        assert!(!timeline.remove(&first));
        assert_eq!(timeline.child_count(), 1);
        assert_eq!(timeline.children()[0].tween.serial(), 1);
    }

    #[test]
    fn test_clear_log() {
        let engine = MemoryEngine::new();
        let mut timeline = engine.timeline(&TimelineVars::default()).unwrap();
        let kept = tween(&engine, 1.0);
        timeline.add(kept.clone(), None);
        tween(&engine, 1.0);

        assert_eq!(engine.clear_log(), 2);
        assert_eq!(engine.created_count(), 0);
        assert_eq!(engine.clear_log(), 0);

        // Live handles are untouched and serials keep increasing
        assert_eq!(timeline.child_count(), 1);
        assert_eq!(tween(&engine, 1.0).serial(), 2);
        assert_eq!(kept.kill_count(), 0);
    }

    #[test]
    fn test_kill_kills_children() {
        let engine = MemoryEngine::new();
        let mut timeline = engine.timeline(&TimelineVars::default()).unwrap();
        timeline.add(tween(&engine, 1.0), None);
        timeline.kill();

        assert!(timeline.is_killed());
        assert_eq!(timeline.child_count(), 0);
        assert_eq!(engine.created()[0].kill_count(), 1);
    }
}
