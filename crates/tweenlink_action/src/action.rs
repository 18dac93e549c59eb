// SPDX-License-Identifier: MIT OR Apache-2.0
//! Attachment bridge: turns declared chains into engine work once an element
//! exists, and hands back the matching cleanup.

use crate::builder::ChainEntry;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tweenlink_sequencer::{AnimationEngine, Detach, Result, Sequencer, TweenHandle};

enum Binding<E: AnimationEngine> {
    Standalone { engine: Arc<E> },
    Timeline { sequencer: Sequencer<E> },
}

impl<E: AnimationEngine> Clone for Binding<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Standalone { engine } => Self::Standalone {
                engine: engine.clone(),
            },
            Self::Timeline { sequencer } => Self::Timeline {
                sequencer: sequencer.clone(),
            },
        }
    }
}

/// A finished chain, ready to be attached to elements.
///
/// Attaching is the only thing an action does: it is immutable, cheap to
/// clone, and each [`Action::attach`] call is independent.
pub struct Action<E: AnimationEngine> {
    binding: Binding<E>,
    entries: Arc<[ChainEntry]>,
}

impl<E: AnimationEngine> Clone for Action<E> {
    fn clone(&self) -> Self {
        Self {
            binding: self.binding.clone(),
            entries: self.entries.clone(),
        }
    }
}

impl<E: AnimationEngine> fmt::Debug for Action<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let binding = match &self.binding {
            Binding::Standalone { .. } => "standalone",
            Binding::Timeline { .. } => "timeline",
        };
        f.debug_struct("Action")
            .field("binding", &binding)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<E: AnimationEngine> Action<E> {
    pub(crate) fn standalone(engine: Arc<E>, entries: Vec<ChainEntry>) -> Self {
        Self {
            binding: Binding::Standalone { engine },
            entries: entries.into(),
        }
    }

    pub(crate) fn timeline(sequencer: Sequencer<E>, entries: Vec<ChainEntry>) -> Self {
        Self {
            binding: Binding::Timeline { sequencer },
            entries: entries.into(),
        }
    }

    /// Declared entries in chain order
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Whether this action registers with a sequencer
    pub fn is_timeline_bound(&self) -> bool {
        matches!(self.binding, Binding::Timeline { .. })
    }

    /// Materialize every entry against `element`.
    ///
    /// Standalone actions build one engine tween per entry and the returned
    /// [`Detach`] kills them all. Timeline-bound actions register one
    /// descriptor per entry and the returned [`Detach`] removes them all.
    /// Engine errors are returned as-is; entries materialized before the
    /// failure are not rolled back.
    pub fn attach(&self, element: E::Element) -> Result<Detach> {
        match &self.binding {
            Binding::Standalone { engine } => self.attach_standalone(engine, &element),
            Binding::Timeline { sequencer } => self.attach_timeline(sequencer, element),
        }
    }

    fn attach_standalone(&self, engine: &Arc<E>, element: &E::Element) -> Result<Detach> {
        let mut tweens = Vec::with_capacity(self.entries.len());
        for entry in self.entries.iter() {
            tweens.push(entry.method.materialize(engine.as_ref(), element)?);
        }
        tracing::debug!("Attached {} standalone tweens", tweens.len());

        let tweens = Mutex::new(tweens);
        Ok(Detach::new(move || {
            let mut tweens = std::mem::take(&mut *tweens.lock());
            if tweens.is_empty() {
                return Ok(false);
            }
            for tween in &mut tweens {
                tween.kill();
            }
            tracing::debug!("Killed {} standalone tweens", tweens.len());
            Ok(true)
        }))
    }

    fn attach_timeline(&self, sequencer: &Sequencer<E>, element: E::Element) -> Result<Detach> {
        let mut detaches = Vec::with_capacity(self.entries.len());
        for entry in self.entries.iter() {
            detaches.push(sequencer.add_animation(
                entry.method.clone(),
                element.clone(),
                entry.placement.order,
                entry.placement.position.clone(),
            )?);
        }
        Ok(Detach::combine(detaches))
    }

    /// Convert into a plain function value for hosts that expect one
    pub fn into_fn(self) -> impl Fn(E::Element) -> Result<Detach> + Send + Sync + 'static {
        move |element| self.attach(element)
    }
}
