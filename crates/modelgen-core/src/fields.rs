//! Single-field loaders shared by every entity builder.
//!
//! Each loader writes one `Option` slot of a draft entity. A slot that is
//! already `Some` means the field was declared twice in the same fragment.

use serde_json::Number;

use crate::definition::Definition;
use crate::error::{LoadError, Result};
use crate::model::Scalar;

pub(crate) fn ensure_unset<T>(slot: &Option<T>, entity: &str, field: &str) -> Result<()> {
    if slot.is_some() {
        return Err(LoadError::DuplicateDefinition {
            entity: entity.to_string(),
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Trimmed, non-empty string value.
pub(crate) fn text(raw: &Definition, entity: &str, field: &str) -> Result<String> {
    let value = raw.as_str().ok_or_else(|| LoadError::InvalidShape {
        entity: entity.to_string(),
        field: field.to_string(),
        expected: "a string",
    })?;
    let value = value.trim();
    if value.is_empty() {
        return Err(LoadError::EmptyValue {
            entity: entity.to_string(),
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Trimmed, non-empty string without embedded whitespace.
pub(crate) fn identifier(raw: &Definition, entity: &str, field: &str) -> Result<String> {
    let value = text(raw, entity, field)?;
    if value.chars().any(char::is_whitespace) {
        return Err(LoadError::InvalidIdentifier {
            entity: entity.to_string(),
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

pub(crate) fn load_text(
    slot: &mut Option<String>,
    raw: &Definition,
    entity: &str,
    field: &str,
) -> Result<()> {
    ensure_unset(slot, entity, field)?;
    *slot = Some(text(raw, entity, field)?);
    Ok(())
}

pub(crate) fn load_identifier(
    slot: &mut Option<String>,
    raw: &Definition,
    entity: &str,
    field: &str,
) -> Result<()> {
    ensure_unset(slot, entity, field)?;
    *slot = Some(identifier(raw, entity, field)?);
    Ok(())
}

pub(crate) fn load_bool(
    slot: &mut Option<bool>,
    raw: &Definition,
    entity: &str,
    field: &str,
) -> Result<()> {
    ensure_unset(slot, entity, field)?;
    let value = raw.as_bool().ok_or_else(|| LoadError::InvalidShape {
        entity: entity.to_string(),
        field: field.to_string(),
        expected: "a boolean",
    })?;
    *slot = Some(value);
    Ok(())
}

pub(crate) fn load_number(
    slot: &mut Option<Number>,
    raw: &Definition,
    entity: &str,
    field: &str,
) -> Result<()> {
    ensure_unset(slot, entity, field)?;
    let value = raw.as_number().ok_or_else(|| LoadError::InvalidShape {
        entity: entity.to_string(),
        field: field.to_string(),
        expected: "a number",
    })?;
    *slot = Some(value.clone());
    Ok(())
}

/// Stores any scalar verbatim; strings are not trimmed.
pub(crate) fn load_scalar(
    slot: &mut Option<Scalar>,
    raw: &Definition,
    entity: &str,
    field: &str,
) -> Result<()> {
    ensure_unset(slot, entity, field)?;
    let value = match raw {
        Definition::Bool(value) => Scalar::Bool(*value),
        Definition::Number(value) => Scalar::Number(value.clone()),
        Definition::String(value) => Scalar::String(value.clone()),
        _ => {
            return Err(LoadError::InvalidShape {
                entity: entity.to_string(),
                field: field.to_string(),
                expected: "a scalar",
            });
        }
    };
    *slot = Some(value);
    Ok(())
}

pub(crate) fn required<T>(slot: Option<T>, entity: &str, field: &str) -> Result<T> {
    slot.ok_or_else(|| LoadError::MissingRequiredField {
        entity: entity.to_string(),
        field: field.to_string(),
    })
}
