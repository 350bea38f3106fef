use crate::definition::Definition;
use crate::error::Result;
use crate::fields::{ensure_unset, load_identifier, required};
use crate::model::{AttributeMap, DataType, Object, Property};

use super::property::build_property_list;
use super::{build_attribute_map, entries, label, unknown};

/// Raw `links` and `indexes` of an object, kept for passes 2 and 3.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ObjectFragments<'a> {
    pub links: Option<&'a Definition>,
    pub indexes: Option<&'a Definition>,
}

/// Pass 1 object builder: name, properties and attributes.
pub(crate) fn build_object<'a>(
    fragment: &'a Definition,
    position: usize,
    data_types: &[DataType],
) -> Result<(Object, ObjectFragments<'a>)> {
    let describe = |name: Option<&str>| label("object", name, position);

    let mut name: Option<String> = None;
    let mut properties: Option<Vec<Property>> = None;
    let mut attributes: Option<AttributeMap> = None;
    let mut fragments = ObjectFragments::default();

    for (key, raw) in entries(fragment, &describe(None), "definition")? {
        let entity = describe(name.as_deref());
        match key.as_str() {
            "name" => load_identifier(&mut name, raw, &entity, "name")?,
            "properties" => {
                ensure_unset(&properties, &entity, "properties")?;
                properties = Some(build_property_list(raw, &entity, data_types)?);
            }
            "attributes" => {
                ensure_unset(&attributes, &entity, "attributes")?;
                attributes = Some(build_attribute_map(raw, &entity)?);
            }
            // resolved by the link and index passes
            "links" => {
                ensure_unset(&fragments.links, &entity, "links")?;
                fragments.links = Some(raw);
            }
            "indexes" => {
                ensure_unset(&fragments.indexes, &entity, "indexes")?;
                fragments.indexes = Some(raw);
            }
            _ => return Err(unknown(&entity, key)),
        }
    }

    let entity = describe(name.as_deref());
    let name = required(name, &entity, "name")?;
    let properties = required(
        properties.filter(|properties| !properties.is_empty()),
        &entity,
        "properties",
    )?;

    let object = Object {
        name,
        properties,
        links: Vec::new(),
        reverse_links: Vec::new(),
        indexes: Vec::new(),
        attributes: attributes.unwrap_or_default(),
    };
    Ok((object, fragments))
}
