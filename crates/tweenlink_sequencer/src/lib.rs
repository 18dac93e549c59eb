// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordering-aware timeline sequencer for tweenlink.
//!
//! This crate owns the part of tweenlink that has real invariants:
//! - Animation descriptors (what to animate, on which element, in which order)
//! - Ordering resolution (explicit orders first, declaration order after)
//! - An insertion-ordered animation store
//! - The sequencer that rebuilds an engine timeline on every mutation
//!
//! ## Architecture
//!
//! The animation engine is an external collaborator reached through the
//! [`AnimationEngine`], [`TweenHandle`] and [`TimelineHandle`] traits.
//! [`memory::MemoryEngine`] is an in-memory implementation used by tests and
//! the demo binary.

pub mod descriptor;
pub mod detach;
pub mod engine;
pub mod error;
pub mod memory;
pub mod ordering;
pub mod sequencer;
pub mod store;
pub mod vars;

pub use descriptor::{AnimationDescriptor, AnimationId, TweenKind, TweenMethod};
pub use detach::Detach;
pub use engine::{
    AnimationEngine, Position, PropertyMap, PropertyValue, TimelineCallback, TimelineEvent,
    TimelineHandle, TweenHandle,
};
pub use error::{EngineError, Result, TweenError};
pub use ordering::{
    effective_order, max_explicit_order, resolve_order, resolve_placement, Ordered, Placement,
    PlacementArg,
};
pub use sequencer::{Sequencer, SequencerId};
pub use store::AnimationStore;
pub use vars::TimelineVars;
