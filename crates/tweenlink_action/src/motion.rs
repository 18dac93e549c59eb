// SPDX-License-Identifier: MIT OR Apache-2.0
//! Facade and timeline registry.
//!
//! [`Motion`] is the context object an application builds once and passes
//! around. It owns the engine, an always-present default timeline, and a
//! name to sequencer registry guarded by a lock so it can be shared across
//! threads.

use crate::builder::{Animate, SequencerExt, TimelineAnimate};
use crate::config::MotionConfig;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tweenlink_sequencer::{AnimationEngine, PropertyMap, Result, Sequencer, TimelineVars};

/// Entry point to tweenlink
pub struct Motion<E: AnimationEngine> {
    engine: Arc<E>,
    default_timeline: Sequencer<E>,
    timelines: RwLock<IndexMap<String, Sequencer<E>>>,
}

impl<E: AnimationEngine> Motion<E> {
    /// Create a facade with a default timeline and an empty registry
    pub fn new(engine: E) -> Result<Self> {
        Self::from_config(engine, &MotionConfig::default())
    }

    /// Create a facade and register every timeline named in `config`
    pub fn from_config(engine: E, config: &MotionConfig) -> Result<Self> {
        let engine = Arc::new(engine);
        let default_timeline = Sequencer::new(engine.clone(), None, &config.default_timeline)?;
        let motion = Self {
            engine,
            default_timeline,
            timelines: RwLock::new(IndexMap::new()),
        };
        for (name, vars) in &config.timelines {
            motion.create_timeline(name.as_str(), vars)?;
        }
        tracing::info!(
            "Motion initialized with {} named timelines",
            motion.timelines.read().len()
        );
        Ok(motion)
    }

    /// The shared engine
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Tween `target` to `vars` right away
    pub fn to(&self, target: &E::Element, vars: &PropertyMap) -> Result<E::Tween> {
        Ok(self.engine.to(target, vars)?)
    }

    /// Tween `target` from `vars` right away
    pub fn from(&self, target: &E::Element, vars: &PropertyMap) -> Result<E::Tween> {
        Ok(self.engine.from(target, vars)?)
    }

    /// Tween `target` between two states right away
    pub fn from_to(
        &self,
        target: &E::Element,
        from: &PropertyMap,
        to: &PropertyMap,
    ) -> Result<E::Tween> {
        Ok(self.engine.from_to(target, from, to)?)
    }

    /// Apply `vars` to `target` right away
    pub fn set(&self, target: &E::Element, vars: &PropertyMap) -> Result<E::Tween> {
        Ok(self.engine.set(target, vars)?)
    }

    /// Start a standalone chain
    pub fn animate(&self) -> Animate<E> {
        Animate::new(self.engine.clone())
    }

    /// The unnamed default timeline
    pub fn timeline(&self) -> &Sequencer<E> {
        &self.default_timeline
    }

    /// Start a chain bound to the default timeline
    pub fn sequence(&self) -> TimelineAnimate<E> {
        self.default_timeline.animate()
    }

    /// Create a timeline without registering it
    pub fn new_timeline(&self, vars: &TimelineVars) -> Result<Sequencer<E>> {
        Sequencer::new(self.engine.clone(), None, vars)
    }

    /// Create a timeline and register it under `name`.
    ///
    /// A timeline already registered under that name is replaced; existing
    /// handles to it keep working but can no longer be looked up.
    pub fn create_timeline(
        &self,
        name: impl Into<String>,
        vars: &TimelineVars,
    ) -> Result<Sequencer<E>> {
        let name = name.into();
        let sequencer = Sequencer::new(self.engine.clone(), Some(name.clone()), vars)?;
        if self
            .timelines
            .write()
            .insert(name.clone(), sequencer.clone())
            .is_some()
        {
            tracing::warn!("Replaced timeline '{}' in registry", name);
        } else {
            tracing::info!("Registered timeline '{}'", name);
        }
        Ok(sequencer)
    }

    /// Look up a registered timeline
    pub fn get_timeline(&self, name: &str) -> Option<Sequencer<E>> {
        self.timelines.read().get(name).cloned()
    }

    /// Unregister a timeline
    pub fn remove_timeline(&self, name: &str) -> Option<Sequencer<E>> {
        let removed = self.timelines.write().shift_remove(name);
        if removed.is_some() {
            tracing::info!("Unregistered timeline '{}'", name);
        }
        removed
    }

    /// Registered names in registration order
    pub fn timeline_names(&self) -> Vec<String> {
        self.timelines.read().keys().cloned().collect()
    }
}
