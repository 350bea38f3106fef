use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Number;

/// Handle of an object inside its project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Handle of a data type inside its project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataTypeId(pub usize);

/// Handle of a property: owning object plus position in its property list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId {
    pub object: ObjectId,
    pub index: usize,
}

/// Handle of a link: source object plus position in its link list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId {
    pub object: ObjectId,
    pub index: usize,
}

/// Scalar value accepted by attribute maps and property defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Number(value) => write!(f, "{value}"),
            Scalar::String(value) => f.write_str(value),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Bool(value) => serializer.serialize_bool(*value),
            Scalar::Number(value) => value.serialize(serializer),
            Scalar::String(value) => serializer.serialize_str(value),
        }
    }
}

/// Ordered name → scalar mapping with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    entries: Vec<(String, Scalar)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts a new entry; returns `false` when the key already exists.
    pub fn insert(&mut self, name: String, value: Scalar) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Underlying kind of a data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataTypeKind {
    String,
    Integer,
    Real,
    Boolean,
    Date,
    Time,
    Datetime,
    Enumeration,
}

impl DataTypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DataTypeKind::String => "string",
            DataTypeKind::Integer => "integer",
            DataTypeKind::Real => "real",
            DataTypeKind::Boolean => "boolean",
            DataTypeKind::Date => "date",
            DataTypeKind::Time => "time",
            DataTypeKind::Datetime => "datetime",
            DataTypeKind::Enumeration => "enumeration",
        }
    }
}

impl fmt::Display for DataTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in data types seeded into every project, with their kind.
pub const BUILTIN_DATA_TYPES: &[(&str, DataTypeKind)] = &[
    ("string", DataTypeKind::String),
    ("integer", DataTypeKind::Integer),
    ("uuid", DataTypeKind::String),
    ("id", DataTypeKind::Integer),
    ("boolean", DataTypeKind::Boolean),
    ("date", DataTypeKind::Date),
    ("text", DataTypeKind::String),
    ("time", DataTypeKind::Time),
    ("datetime", DataTypeKind::Datetime),
    ("email", DataTypeKind::String),
    ("image", DataTypeKind::String),
    ("real", DataTypeKind::Real),
    ("price", DataTypeKind::Real),
];

/// A named primitive or enumeration type usable by properties.
#[derive(Debug, Clone, PartialEq)]
pub struct DataType {
    pub name: String,
    pub kind: DataTypeKind,
    /// Enumeration values; empty for primitive types.
    pub values: Vec<String>,
    pub internal: bool,
}

impl DataType {
    pub fn builtin(name: &str, kind: DataTypeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            values: Vec::new(),
            internal: true,
        }
    }
}

/// Typed scalar field of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub data_type: DataTypeId,
    pub mandatory: bool,
    pub default_value: Option<Scalar>,
    pub secret: bool,
    pub pattern: Option<String>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub attributes: AttributeMap,
    /// Set on the final property of its object.
    pub is_last: bool,
}

/// Directed reference from one object to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub name: String,
    pub source: ObjectId,
    pub target: ObjectId,
    pub mandatory: bool,
}

/// Kind of entity an index key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Property,
    Link,
}

impl KeyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyKind::Property => "property",
            KeyKind::Link => "link",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved target of an index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyReference {
    Property(PropertyId),
    Link(LinkId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexKey {
    /// 1-based position within the index.
    pub position: usize,
    pub reference: KeyReference,
    /// Set on the final key of its index.
    pub is_last: bool,
}

impl IndexKey {
    pub fn kind(&self) -> KeyKind {
        match self.reference {
            KeyReference::Property(_) => KeyKind::Property,
            KeyReference::Link(_) => KeyKind::Link,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    pub keys: Vec<IndexKey>,
    pub object: ObjectId,
}

/// Named domain entity with properties, links and indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub properties: Vec<Property>,
    pub links: Vec<Link>,
    /// Links of other objects (or this one) whose target is this object.
    pub reverse_links: Vec<LinkId>,
    pub indexes: Vec<Index>,
    pub attributes: AttributeMap,
}

impl Object {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.name == name)
    }

    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|index| index.name == name)
    }
}

/// Whether an output file is generated once per project or once per object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileScope {
    Project,
    Object,
}

impl FileScope {
    pub fn as_str(self) -> &'static str {
        match self {
            FileScope::Project => "project",
            FileScope::Object => "object",
        }
    }
}

impl fmt::Display for FileScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output file declaration: input template and output path template.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub scope: FileScope,
    pub input: String,
    pub output: String,
}

/// Root of a loaded definition. Owns every entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub attributes: AttributeMap,
    pub data_types: Vec<DataType>,
    pub objects: Vec<Object>,
    pub files: Vec<File>,
}

impl Project {
    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.0]
    }

    pub fn data_type(&self, id: DataTypeId) -> &DataType {
        &self.data_types[id.0]
    }

    pub fn property(&self, id: PropertyId) -> &Property {
        &self.objects[id.object.0].properties[id.index]
    }

    pub fn link(&self, id: LinkId) -> &Link {
        &self.objects[id.object.0].links[id.index]
    }

    pub fn find_object(&self, name: &str) -> Option<(ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .find(|(_, object)| object.name == name)
            .map(|(idx, object)| (ObjectId(idx), object))
    }

    pub fn find_data_type(&self, name: &str) -> Option<(DataTypeId, &DataType)> {
        self.data_types
            .iter()
            .enumerate()
            .find(|(_, data_type)| data_type.name == name)
            .map(|(idx, data_type)| (DataTypeId(idx), data_type))
    }

    /// Name of the property or link an index key points at.
    pub fn key_reference_name(&self, key: &IndexKey) -> &str {
        match key.reference {
            KeyReference::Property(id) => self.property(id).name.as_str(),
            KeyReference::Link(id) => self.link(id).name.as_str(),
        }
    }

    /// Data types declared by the definition (built-ins excluded).
    pub fn user_data_types(&self) -> impl Iterator<Item = &DataType> {
        self.data_types.iter().filter(|data_type| !data_type.internal)
    }
}
