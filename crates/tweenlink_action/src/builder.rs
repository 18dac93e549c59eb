// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chainable animation builders.
//!
//! Two flavors share one accumulation shape:
//! - [`Animate`] calls the engine directly when attached
//! - [`TimelineAnimate`] registers each entry with a [`Sequencer`], with an
//!   optional position and order per entry
//!
//! Builders are consumed by each call and finished with `build()`, which
//! yields an [`Action`].

use crate::action::Action;
use std::sync::Arc;
use tweenlink_sequencer::{AnimationEngine, Placement, PropertyMap, Sequencer, TweenMethod};

/// One declared animation waiting for an element
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEntry {
    /// Engine operation and arguments
    pub method: TweenMethod,
    /// Position and order on the timeline
    pub placement: Placement,
}

impl ChainEntry {
    /// Entry with no placement
    pub fn new(method: TweenMethod) -> Self {
        Self {
            method,
            placement: Placement::default(),
        }
    }

    /// Entry with a placement
    pub fn placed(method: TweenMethod, placement: Placement) -> Self {
        Self { method, placement }
    }
}

/// Standalone builder: no sequencer, no ordering
pub struct Animate<E: AnimationEngine> {
    engine: Arc<E>,
    entries: Vec<ChainEntry>,
}

impl<E: AnimationEngine> Animate<E> {
    /// Start an empty chain
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            entries: Vec::new(),
        }
    }

    fn push(mut self, method: TweenMethod) -> Self {
        self.entries.push(ChainEntry::new(method));
        self
    }

    /// Tween to `vars`
    pub fn to(self, vars: PropertyMap) -> Self {
        self.push(TweenMethod::To(vars))
    }

    /// Tween from `vars`
    pub fn from(self, vars: PropertyMap) -> Self {
        self.push(TweenMethod::From(vars))
    }

    /// Tween from `from` to `to`
    pub fn from_to(self, from: PropertyMap, to: PropertyMap) -> Self {
        self.push(TweenMethod::FromTo { from, to })
    }

    /// Apply `vars` instantly
    pub fn set(self, vars: PropertyMap) -> Self {
        self.push(TweenMethod::Set(vars))
    }

    /// Declared entries
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Finish the chain
    pub fn build(self) -> Action<E> {
        Action::standalone(self.engine, self.entries)
    }
}

/// Sequencer-bound builder: every entry may carry a position and an order
pub struct TimelineAnimate<E: AnimationEngine> {
    sequencer: Sequencer<E>,
    entries: Vec<ChainEntry>,
}

impl<E: AnimationEngine> TimelineAnimate<E> {
    /// Start an empty chain bound to `sequencer`
    pub fn new(sequencer: Sequencer<E>) -> Self {
        Self {
            sequencer,
            entries: Vec::new(),
        }
    }

    fn push(mut self, method: TweenMethod, placement: Placement) -> Self {
        self.entries.push(ChainEntry::placed(method, placement));
        self
    }

    /// Tween to `vars` at the append point
    pub fn to(self, vars: PropertyMap) -> Self {
        self.push(TweenMethod::To(vars), Placement::default())
    }

    /// Tween to `vars` with a position and/or order.
    ///
    /// `placement` accepts a position string or time, a `(position, order)`
    /// pair, or a full [`Placement`].
    pub fn to_at(self, vars: PropertyMap, placement: impl Into<Placement>) -> Self {
        self.push(TweenMethod::To(vars), placement.into())
    }

    /// Tween from `vars` at the append point
    pub fn from(self, vars: PropertyMap) -> Self {
        self.push(TweenMethod::From(vars), Placement::default())
    }

    /// Tween from `vars` with a position and/or order
    pub fn from_at(self, vars: PropertyMap, placement: impl Into<Placement>) -> Self {
        self.push(TweenMethod::From(vars), placement.into())
    }

    /// Tween from `from` to `to` at the append point
    pub fn from_to(self, from: PropertyMap, to: PropertyMap) -> Self {
        self.push(TweenMethod::FromTo { from, to }, Placement::default())
    }

    /// Tween from `from` to `to` with a position and/or order
    pub fn from_to_at(
        self,
        from: PropertyMap,
        to: PropertyMap,
        placement: impl Into<Placement>,
    ) -> Self {
        self.push(TweenMethod::FromTo { from, to }, placement.into())
    }

    /// Apply `vars` instantly at the append point
    pub fn set(self, vars: PropertyMap) -> Self {
        self.push(TweenMethod::Set(vars), Placement::default())
    }

    /// Apply `vars` instantly with a position and/or order
    pub fn set_at(self, vars: PropertyMap, placement: impl Into<Placement>) -> Self {
        self.push(TweenMethod::Set(vars), placement.into())
    }

    /// Apply `vars` instantly at the append point, with an explicit order
    pub fn set_ordered(self, vars: PropertyMap, order: i64) -> Self {
        self.push(TweenMethod::Set(vars), Placement::new().order(order))
    }

    /// Declared entries
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Finish the chain
    pub fn build(self) -> Action<E> {
        Action::timeline(self.sequencer, self.entries)
    }
}

/// Start timeline-bound chains from a [`Sequencer`]
pub trait SequencerExt<E: AnimationEngine> {
    /// Begin a chain whose entries register with this sequencer
    fn animate(&self) -> TimelineAnimate<E>;
}

impl<E: AnimationEngine> SequencerExt<E> for Sequencer<E> {
    fn animate(&self) -> TimelineAnimate<E> {
        TimelineAnimate::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tweenlink_sequencer::memory::MemoryEngine;
    use tweenlink_sequencer::{Position, TimelineVars};

    fn sequencer() -> Sequencer<MemoryEngine<&'static str>> {
        Sequencer::new(Arc::new(MemoryEngine::new()), None, &TimelineVars::default()).unwrap()
    }

    #[test]
    fn test_standalone_accumulates_without_engine_calls() {
        let engine = Arc::new(MemoryEngine::<&'static str>::new());
        let chain = Animate::new(engine.clone())
            .to(PropertyMap::new().with("x", 1))
            .from(PropertyMap::new().with("opacity", 0))
            .set(PropertyMap::new().with("visible", true));

        assert_eq!(chain.entries().len(), 3);
        assert!(chain.entries().iter().all(|e| e.placement == Placement::default()));

        let _action = chain.build();
        assert_eq!(engine.created_count(), 0);
    }

    #[test]
    fn test_each_entry_keeps_its_own_placement() {
        let chain = sequencer()
            .animate()
            .to_at(PropertyMap::new().with("x", 1), ("intro", 2))
            .from_at(PropertyMap::new(), Placement::new().at("-=0.5").order(1))
            .to_at(PropertyMap::new(), 3.0_f32)
            .to(PropertyMap::new());

        let placements: Vec<_> = chain.entries().iter().map(|e| e.placement.clone()).collect();
        assert_eq!(
            placements,
            vec![
                Placement { position: Some(Position::Label("intro".into())), order: Some(2) },
                Placement { position: Some(Position::Relative("-=0.5".into())), order: Some(1) },
                Placement { position: Some(Position::Time(3.0)), order: None },
                Placement::default(),
            ]
        );
    }

    #[test]
    fn test_numeric_property_is_never_a_position() {
        // A trailing numeric argument stays inside the property map
        let chain = sequencer().animate().to(PropertyMap::new().with("duration", 2.0));
        let entry = &chain.entries()[0];
        assert_eq!(entry.placement.position, None);
        assert_eq!(entry.method, TweenMethod::To(PropertyMap::new().with("duration", 2.0)));
    }

    #[test]
    fn test_set_keeps_its_placement() {
        let entry = ChainEntry::placed(
            TweenMethod::Set(PropertyMap::new()),
            Placement::new().at("outro").order(4),
        );
        assert_eq!(entry.placement, Placement::new().at("outro").order(4));

        let chain = sequencer()
            .animate()
            .set_at(PropertyMap::new(), 2.0_f32)
            .set_ordered(PropertyMap::new(), 7);
        assert_eq!(
            chain.entries()[0].placement,
            Placement { position: Some(Position::Time(2.0)), order: None }
        );
        assert_eq!(chain.entries()[1].placement.order, Some(7));
        assert_eq!(chain.entries()[1].placement.position, None);
    }
}
