use crate::definition::Definition;
use crate::error::{LoadError, Result};
use crate::fields::{ensure_unset, load_bool, load_identifier, required, text};
use crate::model::{Link, Object, ObjectId};

use super::{entries, label, unknown};

/// Builds one link of `source`, resolving its target against `objects`.
pub(crate) fn build_link(
    fragment: &Definition,
    position: usize,
    source: ObjectId,
    objects: &[Object],
) -> Result<Link> {
    let owner = format!("object <{}>", objects[source.0].name);
    let describe = |name: Option<&str>| format!("{} of {owner}", label("link", name, position));

    let mut name: Option<String> = None;
    let mut target: Option<ObjectId> = None;
    let mut mandatory: Option<bool> = None;

    for (key, raw) in entries(fragment, &describe(None), "definition")? {
        let entity = describe(name.as_deref());
        match key.as_str() {
            "name" => load_identifier(&mut name, raw, &entity, "name")?,
            "target" => load_link_target(&mut target, raw, &entity, objects)?,
            "mandatory" => load_bool(&mut mandatory, raw, &entity, "mandatory")?,
            _ => return Err(unknown(&entity, key)),
        }
    }

    let entity = describe(name.as_deref());
    let name = required(name, &entity, "name")?;
    let target = required(target, &entity, "target")?;

    Ok(Link {
        name,
        source,
        target,
        mandatory: mandatory.unwrap_or(true),
    })
}

fn load_link_target(
    slot: &mut Option<ObjectId>,
    raw: &Definition,
    entity: &str,
    objects: &[Object],
) -> Result<()> {
    ensure_unset(slot, entity, "target")?;
    let target = text(raw, entity, "target")?;
    let id = objects
        .iter()
        .position(|object| object.name == target)
        .ok_or_else(|| LoadError::UnresolvedLinkTarget {
            entity: entity.to_string(),
            target,
        })?;
    *slot = Some(ObjectId(id));
    Ok(())
}
