// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for building map operations.

use crate::model::{EntityId, NodeKind};

/// Result type alias for building map operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Where in the document a node lives when its id cannot be used to name it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePath {
    Document,
    Section { section: usize },
    Floor { section: usize, floor: usize },
    Unit { section: usize, floor: usize, unit: usize },
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodePath::Document => f.write_str("document"),
            NodePath::Section { section } => write!(f, "sections[{section}]"),
            NodePath::Floor { section, floor } => {
                write!(f, "sections[{section}].floors[{floor}]")
            }
            NodePath::Unit {
                section,
                floor,
                unit,
            } => write!(f, "sections[{section}].floors[{floor}].units[{unit}]"),
        }
    }
}

/// A building document does not satisfy the structural invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaViolation {
    /// The document (or a node) is not a JSON object.
    #[error("{path}: expected an object")]
    NotAnObject { path: NodePath },

    /// A node has no `id`, or the id is neither a string nor an integer.
    #[error("{path}: missing or invalid id")]
    MissingId { path: NodePath },

    /// The `type` discriminant names another kind of node.
    #[error("{kind} {id}: unexpected type tag {found:?}")]
    WrongTag {
        kind: NodeKind,
        id: EntityId,
        found: String,
    },

    /// A required array field is absent or not an array.
    #[error("{path}: missing array field `{field}`")]
    MissingArray { path: NodePath, field: &'static str },

    /// A field is present but has the wrong JSON type.
    #[error("{kind} {id}: field `{field}` has an invalid value")]
    InvalidField {
        kind: NodeKind,
        id: EntityId,
        field: &'static str,
    },

    /// Two nodes of the same kind share an id.
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: NodeKind, id: EntityId },

    /// A floor declares index 0.
    #[error("floor {floor} in section {section} has index 0")]
    ZeroFloorIndex { section: EntityId, floor: EntityId },

    /// Two units of the same unit type share a label.
    #[error("unit {unit}: label {label:?} is already used")]
    DuplicateLabel { label: String, unit: EntityId },

    /// Floors of a section are not stored in strictly decreasing index order.
    #[error("floor {floor} in section {section}: index {index} does not follow {previous} in decreasing order")]
    FloorOrder {
        section: EntityId,
        floor: EntityId,
        previous: i32,
        index: i32,
    },
}

/// A caller-supplied argument violates an operation's preconditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("section name must not be empty")]
    EmptySectionName,

    /// `min_floor` or `max_floor` is zero.
    #[error("{0} must be a non-zero floor index")]
    ZeroFloorBound(&'static str),

    #[error("units per floor must not be negative, got {0}")]
    NegativeUnitsPerFloor(i32),

    #[error("min floor {min} is above max floor {max}")]
    InvertedFloorRange { min: i32, max: i32 },

    #[error("{floors} floors requested, at most {limit} allowed")]
    TooManyFloors { floors: usize, limit: usize },

    #[error("{units} units per floor requested, at most {limit} allowed")]
    TooManyUnits { units: usize, limit: usize },

    /// A unit cannot be placed on floor index 0.
    #[error("floor index must not be 0")]
    ZeroFloorIndex,

    #[error("unit {0} not found")]
    UnitNotFound(EntityId),

    #[error("section {0} not found")]
    SectionNotFound(EntityId),

    #[error("floor {floor} not found in section {section}")]
    FloorNotFound { section: EntityId, floor: EntityId },
}

/// Errors that can occur during building map operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
