use crate::definition::Definition;
use crate::error::{LoadError, Result};
use crate::fields::{ensure_unset, load_identifier, required, text};
use crate::model::{DataType, DataTypeKind};

use super::{entries, items, label, unknown};

/// Builds one user data type. `existing` holds built-ins plus the types
/// declared before this one.
pub(crate) fn build_data_type(
    fragment: &Definition,
    position: usize,
    existing: &[DataType],
) -> Result<DataType> {
    let describe = |name: Option<&str>| label("data type", name, position);

    let mut name: Option<String> = None;
    let mut kind: Option<DataTypeKind> = None;
    let mut values: Option<Vec<String>> = None;

    for (key, raw) in entries(fragment, &describe(None), "definition")? {
        let entity = describe(name.as_deref());
        match key.as_str() {
            "name" => load_identifier(&mut name, raw, &entity, "name")?,
            "type" => {
                ensure_unset(&kind, &entity, "type")?;
                kind = Some(data_type_kind(raw, &entity)?);
            }
            "values" => {
                ensure_unset(&values, &entity, "values")?;
                values = Some(build_values(raw, &entity)?);
            }
            _ => return Err(unknown(&entity, key)),
        }
    }

    let entity = describe(name.as_deref());
    let name = required(name, &entity, "name")?;
    let kind = required(kind, &entity, "type")?;
    let values = match kind {
        DataTypeKind::Enumeration => {
            required(values.filter(|values| !values.is_empty()), &entity, "values")?
        }
        _ => values.unwrap_or_default(),
    };

    if let Some(previous) = existing.iter().find(|data_type| data_type.name == name) {
        let entity = if previous.internal {
            "built-in data types".to_string()
        } else {
            "project".to_string()
        };
        return Err(LoadError::DuplicateDefinition {
            entity,
            field: format!("data type <{name}>"),
        });
    }

    Ok(DataType {
        name,
        kind,
        values,
        internal: false,
    })
}

fn data_type_kind(raw: &Definition, entity: &str) -> Result<DataTypeKind> {
    match text(raw, entity, "type")?.as_str() {
        "enumeration" => Ok(DataTypeKind::Enumeration),
        _ => Err(LoadError::InvalidShape {
            entity: entity.to_string(),
            field: "type".to_string(),
            expected: "one of: enumeration",
        }),
    }
}

/// Enumeration values, as `{value: text}` items or bare strings.
fn build_values(raw: &Definition, entity: &str) -> Result<Vec<String>> {
    let list = items(raw, entity, "values")?;
    let mut values: Vec<String> = Vec::with_capacity(list.len());
    for (idx, item) in list.iter().enumerate() {
        let value_entity = format!("{} of {entity}", label("value", None, idx + 1));
        let value = match item {
            Definition::Mapping(pairs) => {
                let mut value: Option<String> = None;
                for (key, raw_value) in pairs {
                    match key.as_str() {
                        "value" => {
                            ensure_unset(&value, &value_entity, "value")?;
                            value = Some(text(raw_value, &value_entity, "value")?);
                        }
                        _ => return Err(unknown(&value_entity, key)),
                    }
                }
                required(value, &value_entity, "value")?
            }
            _ => text(item, &value_entity, "value")?,
        };
        if values.contains(&value) {
            return Err(LoadError::DuplicateDefinition {
                entity: entity.to_string(),
                field: format!("value <{value}>"),
            });
        }
        values.push(value);
    }
    Ok(values)
}
