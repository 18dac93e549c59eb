// SPDX-License-Identifier: MIT OR Apache-2.0
//! Element-lifecycle actions for tweenlink.
//!
//! Declare animations with a chainable builder, turn the chain into an
//! [`Action`], and hand the action to whatever mounts your elements:
//!
//! ```ignore
//! let motion = Motion::new(engine)?;
//! let fade_in = motion
//!     .animate()
//!     .from(PropertyMap::new().with("opacity", 0))
//!     .to(PropertyMap::new().with("y", 0))
//!     .build();
//!
//! let detach = fade_in.attach(element)?; // on mount
//! detach.call()?;                        // on unmount
//! ```
//!
//! Timeline-bound chains register their animations with a [`Sequencer`]
//! instead, so declaration order and execution order can differ.

pub mod action;
pub mod builder;
pub mod config;
pub mod motion;

pub use action::Action;
pub use builder::{Animate, ChainEntry, SequencerExt, TimelineAnimate};
pub use config::{MotionConfig, CONFIG_FORMAT_VERSION};
pub use motion::Motion;

pub use tweenlink_sequencer::{
    AnimationEngine, Detach, Placement, Position, PropertyMap, PropertyValue, Result, Sequencer,
    TimelineEvent, TimelineVars, TweenError, TweenMethod,
};
