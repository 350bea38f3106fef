use serde_json::Number;
use thiserror::Error;

use crate::model::KeyKind;

/// Errors raised while loading a project definition.
///
/// Every variant aborts the whole load. `entity` always describes the
/// entity being built, including its enclosing object when there is one
/// (e.g. `property <email> of object <User>`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// A field was supplied more than once for the same entity.
    #[error("{field} of {entity} is already defined")]
    DuplicateDefinition { entity: String, field: String },
    /// A string field is empty once trimmed.
    #[error("{field} of {entity} is empty")]
    EmptyValue { entity: String, field: String },
    /// A raw value does not have the expected shape.
    #[error("{field} of {entity} is not {expected}")]
    InvalidShape {
        entity: String,
        field: String,
        expected: &'static str,
    },
    /// An identifier contains whitespace.
    #[error("invalid {field} <{value}> of {entity} (spaces forbidden)")]
    InvalidIdentifier {
        entity: String,
        field: String,
        value: String,
    },
    /// A required field was never supplied.
    #[error("{field} of {entity} is not defined")]
    MissingRequiredField { entity: String, field: String },
    /// A fragment declared a key its entity does not know.
    #[error("unknown attribute <{key}> in {entity}")]
    UnknownAttribute { entity: String, key: String },
    /// A property names a data type the project does not define.
    #[error("unknown data type <{name}> for {entity}")]
    UnknownDataType { entity: String, name: String },
    /// A link names a target object the project does not define.
    #[error("target <{target}> of {entity} does not exist")]
    UnresolvedLinkTarget { entity: String, target: String },
    /// An index key names a property or link missing from its object.
    #[error("{kind} reference <{reference}> in {entity} does not exist")]
    UnresolvedIndexKey {
        entity: String,
        kind: KeyKind,
        reference: String,
    },
    /// `minimum` is greater than `maximum`.
    #[error("minimum {minimum} of {entity} exceeds maximum {maximum}")]
    RangeViolation {
        entity: String,
        minimum: Number,
        maximum: Number,
    },
    /// Project-level required fields or lists are missing after pass 1.
    #[error("project is incomplete: {reason}")]
    IncompleteProject { reason: String },
}

impl LoadError {
    /// Stable snake_case code for logs and reports.
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::DuplicateDefinition { .. } => "duplicate_definition",
            LoadError::EmptyValue { .. } => "empty_value",
            LoadError::InvalidShape { .. } => "invalid_shape",
            LoadError::InvalidIdentifier { .. } => "invalid_identifier",
            LoadError::MissingRequiredField { .. } => "missing_required_field",
            LoadError::UnknownAttribute { .. } => "unknown_attribute",
            LoadError::UnknownDataType { .. } => "unknown_data_type",
            LoadError::UnresolvedLinkTarget { .. } => "unresolved_link_target",
            LoadError::UnresolvedIndexKey { .. } => "unresolved_index_key",
            LoadError::RangeViolation { .. } => "range_violation",
            LoadError::IncompleteProject { .. } => "incomplete_project",
        }
    }
}

/// Convenience alias for results returned by the loader.
pub type Result<T> = std::result::Result<T, LoadError>;
