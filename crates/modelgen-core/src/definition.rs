use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Number;

/// Schema-free definition tree handed to the loader.
///
/// Mappings are kept as ordered entry lists: file order is preserved and
/// a key that appears twice is kept twice, so the builders can report it.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Definition>),
    Mapping(Vec<(String, Definition)>),
}

impl Definition {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Definition::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Definition::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Definition::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Definition]> {
        match self {
            Definition::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(String, Definition)]> {
        match self {
            Definition::Mapping(entries) => Some(entries.as_slice()),
            _ => None,
        }
    }

    /// First value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Definition> {
        self.as_mapping()?
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Short shape name used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Definition::Null => "null",
            Definition::Bool(_) => "boolean",
            Definition::Number(_) => "number",
            Definition::String(_) => "string",
            Definition::Sequence(_) => "sequence",
            Definition::Mapping(_) => "mapping",
        }
    }

    fn into_key(self) -> Option<String> {
        match self {
            Definition::String(value) => Some(value),
            Definition::Bool(value) => Some(value.to_string()),
            Definition::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }
}

impl From<&str> for Definition {
    fn from(value: &str) -> Self {
        Definition::String(value.to_string())
    }
}

impl From<bool> for Definition {
    fn from(value: bool) -> Self {
        Definition::Bool(value)
    }
}

impl From<i64> for Definition {
    fn from(value: i64) -> Self {
        Definition::Number(value.into())
    }
}

impl<'de> Deserialize<'de> for Definition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DefinitionVisitor)
    }
}

struct DefinitionVisitor;

impl<'de> Visitor<'de> for DefinitionVisitor {
    type Value = Definition;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar, a sequence or a mapping")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Definition, E> {
        Ok(Definition::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Definition, E> {
        Ok(Definition::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Definition, D::Error>
    where
        D: Deserializer<'de>,
    {
        Definition::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Definition, E> {
        Ok(Definition::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Definition, E> {
        Ok(Definition::Number(value.into()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Definition, E> {
        Ok(Definition::Number(value.into()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Definition, E> {
        Number::from_f64(value)
            .map(Definition::Number)
            .ok_or_else(|| E::custom(format!("non-finite number {value}")))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Definition, E> {
        Ok(Definition::String(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Definition, E> {
        Ok(Definition::String(value))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Definition, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Definition>()? {
            items.push(item);
        }
        Ok(Definition::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Definition, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<Definition, Definition>()? {
            let shape = key.shape();
            let key = key
                .into_key()
                .ok_or_else(|| de::Error::custom(format!("mapping key must be a scalar, found {shape}")))?;
            entries.push((key, value));
        }
        Ok(Definition::Mapping(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_mapping_order_and_duplicate_keys() {
        let definition: Definition =
            serde_yaml::from_str("name: a\ntype: string\ntype: integer\n").expect("parse yaml");

        let keys: Vec<&str> = definition
            .as_mapping()
            .expect("mapping")
            .iter()
            .map(|(key, _)| key.as_str())
            .collect();
        assert_eq!(keys, vec!["name", "type", "type"]);
        assert_eq!(definition.get("type"), Some(&Definition::from("string")));
    }

    #[test]
    fn reads_scalars() {
        let definition: Definition =
            serde_yaml::from_str("flag: true\ncount: 3\nratio: 0.5\nnothing: ~\n").expect("parse");
        assert_eq!(definition.get("flag").and_then(Definition::as_bool), Some(true));
        assert_eq!(
            definition.get("count").and_then(Definition::as_number),
            Some(&Number::from(3))
        );
        assert_eq!(
            definition
                .get("ratio")
                .and_then(Definition::as_number)
                .and_then(Number::as_f64),
            Some(0.5)
        );
        assert_eq!(definition.get("nothing"), Some(&Definition::Null));
    }

    #[test]
    fn rejects_sequence_keys() {
        let result: Result<Definition, _> = serde_yaml::from_str("? [a, b]\n: value\n");
        assert!(result.is_err());
    }
}
