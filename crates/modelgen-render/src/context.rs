//! Serializable views of a loaded project handed to templates.
//!
//! Field names are camelCase. Cross references (link targets, index key
//! references) are flattened to `{ name }` so the views stay acyclic.

use modelgen_core::{
    AttributeMap, DataType, File, Index, Link, Object, Project, Property, Scalar,
};
use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::Serialize;
use serde_json::{Map, Value};

/// Reference to another entity by name.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct NameRef {
    pub name: String,
}

impl NameRef {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataTypeView {
    pub name: String,
    /// `string`, `integer`, `real`, `boolean`, `date`, `time`, `datetime` or `enumeration`.
    pub kind: String,
    /// Allowed values of an enumeration, in declaration order.
    pub values: Vec<String>,
    /// True for built-in types.
    pub internal: bool,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyView {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataTypeView,
    pub mandatory: bool,
    pub secret: bool,
    pub default_value: Option<Value>,
    pub pattern: Option<String>,
    pub minimum: Option<Value>,
    pub maximum: Option<Value>,
    pub attributes: Map<String, Value>,
    /// True for the last property of its object.
    pub is_last: bool,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkView {
    pub name: String,
    pub source: NameRef,
    pub target: NameRef,
    pub mandatory: bool,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndexKeyView {
    /// 1-based position inside the index.
    pub position: usize,
    /// `property` or `link`.
    pub kind: String,
    pub reference: NameRef,
    pub is_last: bool,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndexView {
    pub name: String,
    pub unique: bool,
    pub keys: Vec<IndexKeyView>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectView {
    pub name: String,
    pub properties: Vec<PropertyView>,
    pub links: Vec<LinkView>,
    /// Links declared on other objects that target this one.
    pub reverse_links: Vec<LinkView>,
    pub indexes: Vec<IndexView>,
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileView {
    /// `project` or `object`.
    pub scope: String,
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub name: String,
    pub attributes: Map<String, Value>,
    /// Built-in and user-defined data types.
    pub data_types: Vec<DataTypeView>,
    pub objects: Vec<ObjectView>,
    pub files: Vec<FileView>,
}

/// Context of a project-scope file.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ProjectScope<'a> {
    pub project: &'a ProjectView,
}

/// Context of an object-scope file: the current object plus its project.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ObjectScope<'a> {
    pub project: &'a ProjectView,
    pub object: &'a ObjectView,
}

/// JSON schema of the richest template context (object scope).
pub fn context_schema() -> RootSchema {
    schemars::schema_for!(ObjectScope<'static>)
}

impl ProjectView {
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            attributes: attribute_map(&project.attributes),
            data_types: project.data_types.iter().map(data_type_view).collect(),
            objects: project
                .objects
                .iter()
                .map(|object| object_view(project, object))
                .collect(),
            files: project.files.iter().map(file_view).collect(),
        }
    }
}

fn scalar_value(value: &Scalar) -> Value {
    match value {
        Scalar::Bool(value) => Value::Bool(*value),
        Scalar::Number(value) => Value::Number(value.clone()),
        Scalar::String(value) => Value::String(value.clone()),
    }
}

fn attribute_map(attributes: &AttributeMap) -> Map<String, Value> {
    attributes
        .iter()
        .map(|(name, value)| (name.to_string(), scalar_value(value)))
        .collect()
}

fn data_type_view(data_type: &DataType) -> DataTypeView {
    DataTypeView {
        name: data_type.name.clone(),
        kind: data_type.kind.as_str().to_string(),
        values: data_type.values.clone(),
        internal: data_type.internal,
    }
}

fn property_view(project: &Project, property: &Property) -> PropertyView {
    PropertyView {
        name: property.name.clone(),
        data_type: data_type_view(project.data_type(property.data_type)),
        mandatory: property.mandatory,
        secret: property.secret,
        default_value: property.default_value.as_ref().map(scalar_value),
        pattern: property.pattern.clone(),
        minimum: property.minimum.clone().map(Value::Number),
        maximum: property.maximum.clone().map(Value::Number),
        attributes: attribute_map(&property.attributes),
        is_last: property.is_last,
    }
}

fn link_view(project: &Project, link: &Link) -> LinkView {
    LinkView {
        name: link.name.clone(),
        source: NameRef::new(&project.object(link.source).name),
        target: NameRef::new(&project.object(link.target).name),
        mandatory: link.mandatory,
    }
}

fn index_view(project: &Project, index: &Index) -> IndexView {
    IndexView {
        name: index.name.clone(),
        unique: index.unique,
        keys: index
            .keys
            .iter()
            .map(|key| IndexKeyView {
                position: key.position,
                kind: key.kind().as_str().to_string(),
                reference: NameRef::new(project.key_reference_name(key)),
                is_last: key.is_last,
            })
            .collect(),
    }
}

fn object_view(project: &Project, object: &Object) -> ObjectView {
    ObjectView {
        name: object.name.clone(),
        properties: object
            .properties
            .iter()
            .map(|property| property_view(project, property))
            .collect(),
        links: object
            .links
            .iter()
            .map(|link| link_view(project, link))
            .collect(),
        reverse_links: object
            .reverse_links
            .iter()
            .map(|id| link_view(project, project.link(*id)))
            .collect(),
        indexes: object
            .indexes
            .iter()
            .map(|index| index_view(project, index))
            .collect(),
        attributes: attribute_map(&object.attributes),
    }
}

fn file_view(file: &File) -> FileView {
    FileView {
        scope: file.scope.as_str().to_string(),
        input: file.input.clone(),
        output: file.output.clone(),
    }
}
