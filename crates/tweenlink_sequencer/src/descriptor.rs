// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation descriptors: pending animations recorded by a sequencer.

use crate::engine::{AnimationEngine, Position, PropertyMap};
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a descriptor, unique and increasing within one store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// Get the raw ID value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The four tween construction operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TweenKind {
    /// Tween to target values
    To,
    /// Tween from given values
    From,
    /// Tween between two explicit states
    FromTo,
    /// Instant set
    Set,
}

impl TweenKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::To => "to",
            Self::From => "from",
            Self::FromTo => "fromTo",
            Self::Set => "set",
        }
    }
}

/// Engine operation plus its typed arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TweenMethod {
    /// Tween from the current state to these values
    To(PropertyMap),
    /// Tween from these values to the current state
    From(PropertyMap),
    /// Tween between two explicit states
    FromTo {
        /// Starting values
        from: PropertyMap,
        /// Ending values
        to: PropertyMap,
    },
    /// Apply these values instantly
    Set(PropertyMap),
}

impl TweenMethod {
    /// Which operation this is
    pub fn kind(&self) -> TweenKind {
        match self {
            Self::To(_) => TweenKind::To,
            Self::From(_) => TweenKind::From,
            Self::FromTo { .. } => TweenKind::FromTo,
            Self::Set(_) => TweenKind::Set,
        }
    }

    /// Build the native tween for `target`
    pub fn materialize<E: AnimationEngine>(
        &self,
        engine: &E,
        target: &E::Element,
    ) -> Result<E::Tween, EngineError> {
        match self {
            Self::To(vars) => engine.to(target, vars),
            Self::From(vars) => engine.from(target, vars),
            Self::FromTo { from, to } => engine.from_to(target, from, to),
            Self::Set(vars) => engine.set(target, vars),
        }
    }
}

/// A scheduled animation bound to an element.
///
/// Fields are read-only once the descriptor is stored; changing one means
/// removing the descriptor and adding a new one.
#[derive(Debug, Clone)]
pub struct AnimationDescriptor<T> {
    id: AnimationId,
    method: TweenMethod,
    element: T,
    order: Option<i64>,
    position: Option<Position>,
}

impl<T> AnimationDescriptor<T> {
    /// Create a descriptor
    pub fn new(
        id: AnimationId,
        method: TweenMethod,
        element: T,
        order: Option<i64>,
        position: Option<Position>,
    ) -> Self {
        Self {
            id,
            method,
            element,
            order,
            position,
        }
    }

    /// Unique ID
    pub fn id(&self) -> AnimationId {
        self.id
    }

    /// Engine operation and arguments
    pub fn method(&self) -> &TweenMethod {
        &self.method
    }

    /// Target element
    pub fn element(&self) -> &T {
        &self.element
    }

    /// Explicit order, if declared
    pub fn order(&self) -> Option<i64> {
        self.order
    }

    /// Insertion position, if declared
    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }
}
