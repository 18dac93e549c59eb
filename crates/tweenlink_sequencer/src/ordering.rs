// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordering resolution.
//!
//! Descriptors with an explicit order sort by that value. Descriptors without
//! one are pushed past the highest explicit order and keep declaration order
//! among themselves:
//!
//! ```text
//! effective = order                       (explicit)
//! effective = max_explicit + 1 + id       (implicit, some explicit order exists)
//! effective = id                          (implicit, no explicit order at all)
//! ```
//!
//! Ties between equal explicit orders fall back to ascending id. The sort
//! key leads with "is implicit", so implicit descriptors stay after explicit
//! ones even where the arithmetic saturates near `i64::MAX`.

use crate::descriptor::{AnimationDescriptor, AnimationId};
use crate::engine::Position;

/// Anything that can be placed in a resolved sequence
pub trait Ordered {
    /// Declaration id
    fn id(&self) -> AnimationId;
    /// Explicit order, if any
    fn order(&self) -> Option<i64>;
}

impl<T> Ordered for AnimationDescriptor<T> {
    fn id(&self) -> AnimationId {
        AnimationDescriptor::id(self)
    }

    fn order(&self) -> Option<i64> {
        AnimationDescriptor::order(self)
    }
}

impl<O: Ordered + ?Sized> Ordered for &O {
    fn id(&self) -> AnimationId {
        (**self).id()
    }

    fn order(&self) -> Option<i64> {
        (**self).order()
    }
}

/// Highest explicit order in `items`, `None` when nothing declares one
pub fn max_explicit_order<'a, O, I>(items: I) -> Option<i64>
where
    O: Ordered + 'a,
    I: IntoIterator<Item = &'a O>,
{
    items.into_iter().filter_map(Ordered::order).max()
}

/// Effective sort key of one item given the set's highest explicit order
pub fn effective_order<O: Ordered + ?Sized>(item: &O, max_explicit: Option<i64>) -> i64 {
    match item.order() {
        Some(order) => order,
        None => {
            let base = max_explicit.map_or(0, |max| max.saturating_add(1));
            base.saturating_add(item.id().value() as i64)
        }
    }
}

/// Sort `items` into execution order
pub fn resolve_order<O: Ordered>(mut items: Vec<O>) -> Vec<O> {
    let max_explicit = max_explicit_order(items.iter());
    items.sort_by_key(|item| {
        (
            item.order().is_none(),
            effective_order(item, max_explicit),
            item.id(),
        )
    });
    items
}

/// Where a declared animation goes and in which order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    /// Timeline insertion point
    pub position: Option<Position>,
    /// Explicit execution order
    pub order: Option<i64>,
}

impl Placement {
    /// No position, no order
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the position. Empty strings count as no position.
    pub fn at(mut self, position: &str) -> Self {
        self.position = Position::parse(position);
        self
    }

    /// Builder: set an absolute start time
    pub fn at_time(mut self, time: f32) -> Self {
        self.position = Some(Position::Time(time));
        self
    }

    /// Builder: set the explicit order
    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

/// The shapes a caller may use for position and order
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementArg {
    /// Nothing given
    None,
    /// A bare position; order comes from the trailing argument
    Position(Position),
    /// An options value carrying both fields
    Options(Placement),
}

/// Normalize a position argument and a trailing order into a [`Placement`].
///
/// An options value wins outright: its order is used even when absent, and
/// the trailing order is ignored.
pub fn resolve_placement(arg: PlacementArg, trailing_order: Option<i64>) -> Placement {
    match arg {
        PlacementArg::Options(options) => options,
        PlacementArg::Position(position) => Placement {
            position: Some(position),
            order: trailing_order,
        },
        PlacementArg::None => Placement {
            position: None,
            order: trailing_order,
        },
    }
}

impl From<&str> for PlacementArg {
    fn from(value: &str) -> Self {
        match Position::parse(value) {
            Some(position) => PlacementArg::Position(position),
            None => PlacementArg::None,
        }
    }
}

impl From<f32> for PlacementArg {
    fn from(time: f32) -> Self {
        PlacementArg::Position(Position::Time(time))
    }
}

impl From<Position> for PlacementArg {
    fn from(position: Position) -> Self {
        PlacementArg::Position(position)
    }
}

impl From<Placement> for PlacementArg {
    fn from(options: Placement) -> Self {
        PlacementArg::Options(options)
    }
}

impl From<&str> for Placement {
    fn from(value: &str) -> Self {
        resolve_placement(value.into(), None)
    }
}

impl From<f32> for Placement {
    fn from(time: f32) -> Self {
        resolve_placement(time.into(), None)
    }
}

impl From<Position> for Placement {
    fn from(position: Position) -> Self {
        resolve_placement(position.into(), None)
    }
}

impl<P: Into<PlacementArg>> From<(P, i64)> for Placement {
    fn from((arg, order): (P, i64)) -> Self {
        resolve_placement(arg.into(), Some(order))
    }
}
