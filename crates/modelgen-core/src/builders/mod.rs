//! Entity builders: one raw fragment in, one validated entity out.

mod attributes;
mod data_type;
mod file;
mod index;
mod link;
mod object;
mod property;

pub(crate) use attributes::build_attribute_map;
pub(crate) use data_type::build_data_type;
pub(crate) use file::build_file;
pub(crate) use index::build_index;
pub(crate) use link::build_link;
pub(crate) use object::{ObjectFragments, build_object};

use crate::definition::Definition;
use crate::error::{LoadError, Result};

/// Entries of a mapping fragment, in file order.
pub(crate) fn entries<'a>(
    raw: &'a Definition,
    entity: &str,
    field: &str,
) -> Result<&'a [(String, Definition)]> {
    raw.as_mapping().ok_or_else(|| LoadError::InvalidShape {
        entity: entity.to_string(),
        field: field.to_string(),
        expected: "a mapping",
    })
}

/// Items of a sequence fragment.
pub(crate) fn items<'a>(raw: &'a Definition, entity: &str, field: &str) -> Result<&'a [Definition]> {
    raw.as_sequence().ok_or_else(|| LoadError::InvalidShape {
        entity: entity.to_string(),
        field: field.to_string(),
        expected: "a sequence",
    })
}

/// `kind <name>` once the name is known, `kind n°position` before.
pub(crate) fn label(kind: &str, name: Option<&str>, position: usize) -> String {
    match name {
        Some(name) => format!("{kind} <{name}>"),
        None => format!("{kind} n°{position}"),
    }
}

pub(crate) fn unknown(entity: &str, key: &str) -> LoadError {
    LoadError::UnknownAttribute {
        entity: entity.to_string(),
        key: key.to_string(),
    }
}
