// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types shared by the sequencer and the attachment layer.

use thiserror::Error;

/// Rejection raised by an animation engine while constructing a tween or timeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A property value the engine cannot animate
    #[error("Invalid property '{property}': {reason}")]
    InvalidProperty {
        /// Property name
        property: String,
        /// Why the engine refused it
        reason: String,
    },

    /// Any other engine-side refusal
    #[error("Engine rejected animation: {0}")]
    Rejected(String),
}

/// Errors returned by fallible tweenlink operations
#[derive(Debug, Error)]
pub enum TweenError {
    /// Engine construction failure, propagated unchanged
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Configuration could not be parsed
    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Configuration could not be serialized
    #[error("Config serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Configuration written by a newer format version
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },

    /// Configuration file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tweenlink operations
pub type Result<T> = std::result::Result<T, TweenError>;
