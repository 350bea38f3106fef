use crate::definition::Definition;
use crate::error::{LoadError, Result};
use crate::fields::{ensure_unset, identifier, load_identifier, required};
use crate::model::{AttributeMap, Scalar};

use super::{entries, label, unknown};

/// Builds an attribute map owned by `owner`.
///
/// Accepts the mapping form `{key: value}` and the list form
/// `[{name: key, value: value}]`.
pub(crate) fn build_attribute_map(raw: &Definition, owner: &str) -> Result<AttributeMap> {
    let mut map = AttributeMap::new();
    match raw {
        Definition::Mapping(pairs) => {
            for (key, value) in pairs {
                let entity = format!("attribute <{key}> of {owner}");
                let name = identifier(&Definition::String(key.clone()), &entity, "name")?;
                let value = attribute_value(value, &entity)?;
                insert(&mut map, name, value, owner)?;
            }
        }
        Definition::Sequence(list) => {
            for (idx, item) in list.iter().enumerate() {
                let (name, value) = build_attribute_entry(item, idx + 1, owner)?;
                insert(&mut map, name, value, owner)?;
            }
        }
        _ => {
            return Err(LoadError::InvalidShape {
                entity: owner.to_string(),
                field: "attributes".to_string(),
                expected: "a mapping or a sequence",
            });
        }
    }
    Ok(map)
}

fn build_attribute_entry(raw: &Definition, position: usize, owner: &str) -> Result<(String, Scalar)> {
    let mut name: Option<String> = None;
    let mut value: Option<Scalar> = None;

    let fragment = entries(raw, &format!("{} of {owner}", label("attribute", None, position)), "definition")?;
    for (key, raw_value) in fragment {
        let entity = format!("{} of {owner}", label("attribute", name.as_deref(), position));
        match key.as_str() {
            "name" => load_identifier(&mut name, raw_value, &entity, "name")?,
            "value" => {
                ensure_unset(&value, &entity, "value")?;
                value = Some(attribute_value(raw_value, &entity)?);
            }
            _ => return Err(unknown(&entity, key)),
        }
    }

    let entity = format!("{} of {owner}", label("attribute", name.as_deref(), position));
    let name = required(name, &entity, "name")?;
    let value = required(value, &entity, "value")?;
    Ok((name, value))
}

fn attribute_value(raw: &Definition, entity: &str) -> Result<Scalar> {
    match raw {
        Definition::Bool(value) => Ok(Scalar::Bool(*value)),
        Definition::Number(value) => Ok(Scalar::Number(value.clone())),
        Definition::String(value) => {
            let value = value.trim();
            if value.is_empty() {
                return Err(LoadError::EmptyValue {
                    entity: entity.to_string(),
                    field: "value".to_string(),
                });
            }
            Ok(Scalar::String(value.to_string()))
        }
        _ => Err(LoadError::InvalidShape {
            entity: entity.to_string(),
            field: "value".to_string(),
            expected: "a scalar",
        }),
    }
}

fn insert(map: &mut AttributeMap, name: String, value: Scalar, owner: &str) -> Result<()> {
    let field = format!("attribute <{name}>");
    if !map.insert(name, value) {
        return Err(LoadError::DuplicateDefinition {
            entity: owner.to_string(),
            field,
        });
    }
    Ok(())
}
