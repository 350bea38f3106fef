use crate::definition::Definition;
use crate::error::{LoadError, Result};
use crate::fields::{ensure_unset, load_bool, load_identifier, required, text};
use crate::model::{Index, IndexKey, KeyKind, KeyReference, LinkId, Object, ObjectId, PropertyId};

use super::{entries, items, label, unknown};

/// Builds one index of `object`. Keys resolve against that object only.
pub(crate) fn build_index(
    fragment: &Definition,
    position: usize,
    object_id: ObjectId,
    object: &Object,
) -> Result<Index> {
    let owner = format!("object <{}>", object.name);
    let describe = |name: Option<&str>| format!("{} of {owner}", label("index", name, position));

    let mut name: Option<String> = None;
    let mut unique: Option<bool> = None;
    let mut keys: Option<Vec<IndexKey>> = None;

    for (key, raw) in entries(fragment, &describe(None), "definition")? {
        let entity = describe(name.as_deref());
        match key.as_str() {
            "name" => load_identifier(&mut name, raw, &entity, "name")?,
            "unique" => load_bool(&mut unique, raw, &entity, "unique")?,
            "keys" => {
                ensure_unset(&keys, &entity, "keys")?;
                keys = Some(build_index_key_list(raw, &entity, object_id, object)?);
            }
            _ => return Err(unknown(&entity, key)),
        }
    }

    let entity = describe(name.as_deref());
    let name = required(name, &entity, "name")?;
    let keys = required(keys.filter(|keys| !keys.is_empty()), &entity, "keys")?;

    Ok(Index {
        name,
        unique: unique.unwrap_or(true),
        keys,
        object: object_id,
    })
}

fn build_index_key_list(
    raw: &Definition,
    index: &str,
    object_id: ObjectId,
    object: &Object,
) -> Result<Vec<IndexKey>> {
    let list = items(raw, index, "keys")?;
    let mut keys = Vec::with_capacity(list.len());
    for (idx, fragment) in list.iter().enumerate() {
        keys.push(build_index_key(fragment, idx + 1, index, object_id, object)?);
    }
    if let Some(last) = keys.last_mut() {
        last.is_last = true;
    }
    Ok(keys)
}

/// Builds the key at 1-based `position`; it must name exactly one of
/// `property` or `link`.
pub(crate) fn build_index_key(
    fragment: &Definition,
    position: usize,
    index: &str,
    object_id: ObjectId,
    object: &Object,
) -> Result<IndexKey> {
    let entity = format!("{} of {index}", label("key", None, position));
    let mut reference: Option<KeyReference> = None;

    for (key, raw) in entries(fragment, &entity, "definition")? {
        let kind = match key.as_str() {
            "property" => KeyKind::Property,
            "link" => KeyKind::Link,
            _ => return Err(unknown(&entity, key)),
        };
        ensure_unset(&reference, &entity, "reference")?;
        reference = Some(resolve_key_reference(kind, raw, &entity, object_id, object)?);
    }

    let reference = required(reference, &entity, "property or link")?;
    Ok(IndexKey {
        position,
        reference,
        is_last: false,
    })
}

fn resolve_key_reference(
    kind: KeyKind,
    raw: &Definition,
    entity: &str,
    object_id: ObjectId,
    object: &Object,
) -> Result<KeyReference> {
    let name = text(raw, entity, kind.as_str())?;
    let resolved = match kind {
        KeyKind::Property => object
            .properties
            .iter()
            .position(|property| property.name == name)
            .map(|index| {
                KeyReference::Property(PropertyId {
                    object: object_id,
                    index,
                })
            }),
        KeyKind::Link => object
            .links
            .iter()
            .position(|link| link.name == name)
            .map(|index| {
                KeyReference::Link(LinkId {
                    object: object_id,
                    index,
                })
            }),
    };
    resolved.ok_or_else(|| LoadError::UnresolvedIndexKey {
        entity: entity.to_string(),
        kind,
        reference: name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeMap, DataTypeId, Property};

    fn user() -> Object {
        let property = |name: &str| Property {
            name: name.to_string(),
            data_type: DataTypeId(0),
            mandatory: true,
            default_value: None,
            secret: false,
            pattern: None,
            minimum: None,
            maximum: None,
            attributes: AttributeMap::new(),
            is_last: false,
        };
        Object {
            name: "User".to_string(),
            properties: vec![property("id"), property("email")],
            links: Vec::new(),
            reverse_links: Vec::new(),
            indexes: Vec::new(),
            attributes: AttributeMap::new(),
        }
    }

    fn build(text: &str) -> Result<Index> {
        let fragment: Definition = serde_yaml::from_str(text).expect("parse yaml");
        build_index(&fragment, 1, ObjectId(0), &user())
    }

    #[test]
    fn keys_are_positioned_and_last_is_stamped() {
        let index = build("name: by_both\nkeys:\n  - property: email\n  - property: id\n")
            .expect("build");
        assert!(index.unique);
        let positions: Vec<usize> = index.keys.iter().map(|key| key.position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert!(!index.keys[0].is_last);
        assert!(index.keys[1].is_last);
        assert_eq!(
            index.keys[0].reference,
            KeyReference::Property(PropertyId {
                object: ObjectId(0),
                index: 1
            })
        );
    }

    #[test]
    fn empty_key_list_is_missing() {
        let err = build("name: nothing\nkeys: []\n").expect_err("no keys");
        assert!(matches!(
            err,
            LoadError::MissingRequiredField { ref field, .. } if field == "keys"
        ));
    }

    #[test]
    fn key_naming_both_kinds_is_a_duplicate() {
        let err = build("name: bad\nkeys:\n  - property: id\n    link: owner\n").expect_err("both");
        assert_eq!(err.code(), "duplicate_definition");
    }

    #[test]
    fn unknown_link_key_is_unresolved() {
        let err = build("name: by_owner\nkeys:\n  - link: owner\n").expect_err("unresolved");
        assert!(matches!(
            err,
            LoadError::UnresolvedIndexKey { kind: KeyKind::Link, ref reference, .. }
                if reference == "owner"
        ));
    }
}
