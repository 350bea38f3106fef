use serde_json::Number;

use crate::definition::Definition;
use crate::error::{LoadError, Result};
use crate::fields::{
    ensure_unset, load_bool, load_identifier, load_number, load_scalar, load_text, required, text,
};
use crate::model::{AttributeMap, DataType, DataTypeId, Property, Scalar};

use super::{build_attribute_map, entries, items, label, unknown};

#[derive(Default)]
struct PropertyDraft {
    name: Option<String>,
    data_type: Option<DataTypeId>,
    mandatory: Option<bool>,
    default_value: Option<Scalar>,
    secret: Option<bool>,
    pattern: Option<String>,
    minimum: Option<Number>,
    maximum: Option<Number>,
    attributes: Option<AttributeMap>,
}

/// Builds the property list of an object and stamps `is_last`.
pub(crate) fn build_property_list(
    raw: &Definition,
    object: &str,
    data_types: &[DataType],
) -> Result<Vec<Property>> {
    let list = items(raw, object, "properties")?;
    let mut properties = Vec::with_capacity(list.len());
    for (idx, fragment) in list.iter().enumerate() {
        properties.push(build_property(fragment, idx + 1, object, data_types)?);
    }
    if let Some(last) = properties.last_mut() {
        last.is_last = true;
    }
    Ok(properties)
}

pub(crate) fn build_property(
    fragment: &Definition,
    position: usize,
    object: &str,
    data_types: &[DataType],
) -> Result<Property> {
    let mut draft = PropertyDraft::default();
    let describe =
        |name: Option<&str>| format!("{} of {object}", label("property", name, position));

    for (key, raw) in entries(fragment, &describe(None), "definition")? {
        let entity = describe(draft.name.as_deref());
        match key.as_str() {
            "name" => load_identifier(&mut draft.name, raw, &entity, "name")?,
            "type" => load_property_type(&mut draft.data_type, raw, &entity, data_types)?,
            "mandatory" => load_bool(&mut draft.mandatory, raw, &entity, "mandatory")?,
            "default" => load_scalar(&mut draft.default_value, raw, &entity, "default")?,
            "secret" => load_bool(&mut draft.secret, raw, &entity, "secret")?,
            "pattern" => load_text(&mut draft.pattern, raw, &entity, "pattern")?,
            "minimum" => load_number(&mut draft.minimum, raw, &entity, "minimum")?,
            "maximum" => load_number(&mut draft.maximum, raw, &entity, "maximum")?,
            "attributes" => {
                ensure_unset(&draft.attributes, &entity, "attributes")?;
                draft.attributes = Some(build_attribute_map(raw, &entity)?);
            }
            _ => return Err(unknown(&entity, key)),
        }
    }

    let entity = describe(draft.name.as_deref());
    let name = required(draft.name, &entity, "name")?;
    let data_type = required(draft.data_type, &entity, "type")?;

    if let (Some(minimum), Some(maximum)) = (&draft.minimum, &draft.maximum) {
        if exceeds(minimum, maximum) {
            return Err(LoadError::RangeViolation {
                entity,
                minimum: minimum.clone(),
                maximum: maximum.clone(),
            });
        }
    }

    Ok(Property {
        name,
        data_type,
        mandatory: draft.mandatory.unwrap_or(true),
        default_value: draft.default_value,
        secret: draft.secret.unwrap_or(false),
        pattern: draft.pattern,
        minimum: draft.minimum,
        maximum: draft.maximum,
        attributes: draft.attributes.unwrap_or_default(),
        is_last: false,
    })
}

/// Resolves a property type against the data types loaded so far.
pub(crate) fn load_property_type(
    slot: &mut Option<DataTypeId>,
    raw: &Definition,
    entity: &str,
    data_types: &[DataType],
) -> Result<()> {
    ensure_unset(slot, entity, "type")?;
    let name = text(raw, entity, "type")?;
    let id = data_types
        .iter()
        .position(|data_type| data_type.name == name)
        .ok_or_else(|| LoadError::UnknownDataType {
            entity: entity.to_string(),
            name,
        })?;
    *slot = Some(DataTypeId(id));
    Ok(())
}

fn exceeds(minimum: &Number, maximum: &Number) -> bool {
    match (minimum.as_i64(), maximum.as_i64()) {
        (Some(min), Some(max)) => min > max,
        _ => match (minimum.as_f64(), maximum.as_f64()) {
            (Some(min), Some(max)) => min > max,
            _ => false,
        },
    }
}
