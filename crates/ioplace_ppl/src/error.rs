//! Error types for pin placement.

use ioplace_common::InternalError;

/// Errors that stop pin placement. The design is left untouched when one is
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    /// The design declares no `DIEAREA`, so it has no boundary to place on.
    #[error("design `{0}` has no die area")]
    NoDieArea(String),

    /// Neither horizontal nor vertical placement layers were given.
    #[error("no placement layers were given")]
    NoLayers,

    /// A placement layer is not defined in the technology.
    #[error("layer `{0}` is not defined in the technology")]
    UnknownLayer(String),

    /// A placement layer exists but is not a routing layer.
    #[error("layer `{0}` is not a routing layer")]
    NotRoutingLayer(String),

    /// A placement layer lacks a property needed to build pin shapes or slots.
    #[error("layer `{layer}` has no {property}")]
    IncompleteLayer {
        /// The layer name.
        layer: String,
        /// The missing LEF property, e.g. `WIDTH`.
        property: &'static str,
    },

    /// A region string is malformed or does not fit on its edge.
    #[error("invalid region `{region}`: {reason}")]
    InvalidRegion {
        /// The region as written.
        region: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A constraint string is malformed.
    #[error("invalid constraint `{text}`: {reason}")]
    InvalidConstraint {
        /// The constraint as written.
        text: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No allowed layer provides any slot inside a constraint's region.
    #[error("region `{region}` has no slots on the allowed layers")]
    NoSlotsInRegion {
        /// The region as written.
        region: String,
    },

    /// More pins must go into a region than it has free slots.
    #[error("{needed} pins must be placed in `{region}` but only {available} slots are free")]
    InsufficientSlots {
        /// The region as written, or `*` for the whole boundary.
        region: String,
        /// Pins that need a slot.
        needed: usize,
        /// Free slots left in the region.
        available: usize,
    },

    /// An invariant of the placer was broken.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
