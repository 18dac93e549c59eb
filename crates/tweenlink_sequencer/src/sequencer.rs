// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequencer: an engine timeline kept in resolved order.
//!
//! Every add or remove clears the engine timeline and rebuilds it from the
//! store, sorted by effective order. After any mutation the timeline's
//! children match the store exactly.

use crate::descriptor::{AnimationDescriptor, AnimationId, TweenMethod};
use crate::detach::Detach;
use crate::engine::{AnimationEngine, Position, TimelineCallback, TimelineEvent, TimelineHandle};
use crate::error::Result;
use crate::ordering::{resolve_order, Ordered};
use crate::store::AnimationStore;
use crate::vars::TimelineVars;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequencerId(pub Uuid);

impl SequencerId {
    /// Create a new random sequencer ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SequencerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SequencerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct SequencerState<E: AnimationEngine> {
    timeline: E::Timeline,
    store: AnimationStore<E::Element>,
}

/// Handle to an ordering-aware timeline.
///
/// Clones share the same timeline and store, which is what lets detach
/// callbacks outlive the call that created them.
pub struct Sequencer<E: AnimationEngine> {
    id: SequencerId,
    name: Option<String>,
    engine: Arc<E>,
    state: Arc<Mutex<SequencerState<E>>>,
}

impl<E: AnimationEngine> Clone for Sequencer<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            engine: self.engine.clone(),
            state: self.state.clone(),
        }
    }
}

impl<E: AnimationEngine> fmt::Debug for Sequencer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("len", &self.len())
            .finish()
    }
}

impl<E: AnimationEngine> Sequencer<E> {
    /// Create a sequencer with a fresh engine timeline
    pub fn new(engine: Arc<E>, name: Option<String>, vars: &TimelineVars) -> Result<Self> {
        let timeline = engine.timeline(vars)?;
        let sequencer = Self {
            id: SequencerId::new(),
            name,
            engine,
            state: Arc::new(Mutex::new(SequencerState {
                timeline,
                store: AnimationStore::new(),
            })),
        };
        tracing::debug!("Created sequencer {}", sequencer.label());
        Ok(sequencer)
    }

    /// Unique ID
    pub fn id(&self) -> SequencerId {
        self.id
    }

    /// Registry name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The engine this sequencer builds tweens with
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("'{name}' ({})", self.id),
            None => self.id.to_string(),
        }
    }

    /// Schedule an animation and rebuild.
    ///
    /// The returned [`Detach`] removes the animation and rebuilds again.
    /// Engine failures during the rebuild are returned as-is and the
    /// descriptor stays scheduled.
    pub fn add_animation(
        &self,
        method: TweenMethod,
        element: E::Element,
        order: Option<i64>,
        position: Option<Position>,
    ) -> Result<Detach> {
        let id = {
            let mut state = self.state.lock();
            let id = state.store.generate_id();
            tracing::debug!(
                "Sequencer {}: add {} {} (order {:?}, position {:?})",
                self.label(),
                method.kind().name(),
                id,
                order,
                position
            );
            state
                .store
                .add(AnimationDescriptor::new(id, method, element, order, position));
            self.rebuild_locked(&mut state)?;
            id
        };

        let sequencer = self.clone();
        Ok(Detach::new(move || sequencer.remove(id)))
    }

    /// Unschedule an animation. Returns `false` if it was already gone.
    pub fn remove(&self, id: AnimationId) -> Result<bool> {
        let mut state = self.state.lock();
        if !state.store.remove(id) {
            tracing::trace!("Sequencer {}: {} already removed", self.label(), id);
            return Ok(false);
        }
        tracing::debug!("Sequencer {}: removed {}", self.label(), id);
        self.rebuild_locked(&mut state)?;
        Ok(true)
    }

    /// Unschedule everything
    pub fn clear(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.store.clear();
        self.rebuild_locked(&mut state)
    }

    /// Rebuild the engine timeline from the store.
    ///
    /// Running it twice without a mutation in between gives the same child
    /// sequence and positions; tween handles are fresh each time.
    pub fn rebuild(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.rebuild_locked(&mut state)
    }

    fn rebuild_locked(&self, state: &mut SequencerState<E>) -> Result<()> {
        let SequencerState { timeline, store } = state;
        timeline.clear();

        let ordered = resolve_order(store.snapshot());
        for descriptor in &ordered {
            let tween = descriptor
                .method()
                .materialize(self.engine.as_ref(), descriptor.element())?;
            tracing::trace!(
                "Sequencer {}: placing {} at {:?}",
                self.label(),
                descriptor.id(),
                descriptor.position()
            );
            timeline.add(tween, descriptor.position());
        }

        tracing::debug!(
            "Sequencer {}: rebuilt timeline with {} children",
            self.label(),
            ordered.len()
        );
        Ok(())
    }

    /// Number of scheduled animations
    pub fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Whether nothing is scheduled
    pub fn is_empty(&self) -> bool {
        self.state.lock().store.is_empty()
    }

    /// Scheduled IDs in execution order
    pub fn resolved_order(&self) -> Vec<AnimationId> {
        let state = self.state.lock();
        resolve_order(state.store.snapshot())
            .into_iter()
            .map(|d| Ordered::id(&d))
            .collect()
    }

    /// Run `f` with the engine timeline
    pub fn with_timeline<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&E::Timeline) -> R,
    {
        f(&self.state.lock().timeline)
    }

    /// Run `f` with the engine timeline, mutably.
    ///
    /// Children added here are dropped by the next rebuild. The sequencer is
    /// locked while `f` runs, so `f` must not call back into it; pass any
    /// events the timeline reports to [`Sequencer::dispatch`] afterwards.
    pub fn with_timeline_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut E::Timeline) -> R,
    {
        f(&mut self.state.lock().timeline)
    }

    /// Run the callbacks registered for `events`, in order.
    ///
    /// Callbacks are looked up under the lock and run after it is released,
    /// so they may call back into this sequencer.
    pub fn dispatch(&self, events: &[TimelineEvent]) {
        if events.is_empty() {
            return;
        }
        let callbacks: Vec<TimelineCallback> = {
            let state = self.state.lock();
            events
                .iter()
                .filter_map(|event| state.timeline.callback(*event))
                .collect()
        };
        for callback in callbacks {
            callback();
        }
    }

    fn transport<F>(&self, f: F)
    where
        F: FnOnce(&mut E::Timeline) -> Vec<TimelineEvent>,
    {
        let fired = self.with_timeline_mut(f);
        self.dispatch(&fired);
    }

    // Playback passthroughs

    /// Start playing forward
    pub fn play(&self) {
        self.transport(|tl| tl.play());
    }

    /// Pause playback
    pub fn pause(&self) {
        self.with_timeline_mut(|tl| tl.pause());
    }

    /// Resume in the current direction
    pub fn resume(&self) {
        self.transport(|tl| tl.resume());
    }

    /// Flip playback direction
    pub fn reverse(&self) {
        self.transport(|tl| tl.reverse());
    }

    /// Jump to the start and play
    pub fn restart(&self) {
        self.transport(|tl| tl.restart());
    }

    /// Move the playhead
    pub fn seek(&self, position: impl Into<Position>) {
        let position = position.into();
        self.transport(|tl| tl.seek(&position));
    }

    /// Progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.with_timeline(|tl| tl.progress())
    }

    /// Set progress in `[0, 1]`
    pub fn set_progress(&self, progress: f32) {
        self.with_timeline_mut(|tl| tl.set_progress(progress));
    }

    /// Duration of one iteration
    pub fn duration(&self) -> f32 {
        self.with_timeline(|tl| tl.duration())
    }

    /// Duration including repeats
    pub fn total_duration(&self) -> f32 {
        self.with_timeline(|tl| tl.total_duration())
    }

    /// Playhead time
    pub fn time(&self) -> f32 {
        self.with_timeline(|tl| tl.time())
    }

    /// Set playhead time
    pub fn set_time(&self, time: f32) {
        self.with_timeline_mut(|tl| tl.set_time(time));
    }

    /// Playback speed multiplier
    pub fn time_scale(&self) -> f32 {
        self.with_timeline(|tl| tl.time_scale())
    }

    /// Set playback speed multiplier
    pub fn set_time_scale(&self, scale: f32) {
        self.with_timeline_mut(|tl| tl.set_time_scale(scale));
    }

    /// Repeat count
    pub fn repeat(&self) -> i32 {
        self.with_timeline(|tl| tl.repeat())
    }

    /// Set repeat count (`-1` repeats forever)
    pub fn set_repeat(&self, repeat: i32) {
        self.with_timeline_mut(|tl| tl.set_repeat(repeat));
    }

    /// Delay between repeats
    pub fn repeat_delay(&self) -> f32 {
        self.with_timeline(|tl| tl.repeat_delay())
    }

    /// Set delay between repeats
    pub fn set_repeat_delay(&self, delay: f32) {
        self.with_timeline_mut(|tl| tl.set_repeat_delay(delay));
    }

    /// Whether repeats alternate direction
    pub fn yoyo(&self) -> bool {
        self.with_timeline(|tl| tl.yoyo())
    }

    /// Set alternating repeats
    pub fn set_yoyo(&self, yoyo: bool) {
        self.with_timeline_mut(|tl| tl.set_yoyo(yoyo));
    }

    /// Start delay
    pub fn delay(&self) -> f32 {
        self.with_timeline(|tl| tl.delay())
    }

    /// Set start delay
    pub fn set_delay(&self, delay: f32) {
        self.with_timeline_mut(|tl| tl.set_delay(delay));
    }

    /// Add a label at `position`, or at the append point
    pub fn add_label(&self, name: &str, position: Option<Position>) {
        self.with_timeline_mut(|tl| tl.add_label(name, position.as_ref()));
    }

    /// Remove a label
    pub fn remove_label(&self, name: &str) {
        self.with_timeline_mut(|tl| tl.remove_label(name));
    }

    /// Time of a label
    pub fn label_time(&self, name: &str) -> Option<f32> {
        self.with_timeline(|tl| tl.label_time(name))
    }

    /// All labels with their times
    pub fn labels(&self) -> Vec<(String, f32)> {
        self.with_timeline(|tl| tl.labels())
    }

    /// Register an event callback
    pub fn on<F>(&self, event: TimelineEvent, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let callback: TimelineCallback = Arc::new(callback);
        self.with_timeline_mut(|tl| tl.set_callback(event, Some(callback)));
    }

    /// Clear an event callback
    pub fn off(&self, event: TimelineEvent) {
        self.with_timeline_mut(|tl| tl.set_callback(event, None));
    }

    /// Registered callback for an event
    pub fn callback(&self, event: TimelineEvent) -> Option<TimelineCallback> {
        self.with_timeline(|tl| tl.callback(event))
    }

    /// Number of children on the engine timeline
    pub fn child_count(&self) -> usize {
        self.with_timeline(|tl| tl.child_count())
    }

    /// Kill the engine timeline
    pub fn kill(&self) {
        self.with_timeline_mut(|tl| tl.kill());
    }

    /// Flush cached starting values
    pub fn invalidate(&self) {
        self.with_timeline_mut(|tl| tl.invalidate());
    }

    /// Whether the timeline is playing
    pub fn is_active(&self) -> bool {
        self.with_timeline(|tl| tl.is_active())
    }

    /// Whether the timeline is paused
    pub fn paused(&self) -> bool {
        self.with_timeline(|tl| tl.paused())
    }
}
