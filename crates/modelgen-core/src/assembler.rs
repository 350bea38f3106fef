//! Three-pass project assembler.
//!
//! Pass 1 builds data types, objects (name, properties, attributes),
//! project attributes and files. Pass 2 resolves links against the whole
//! object set, so a link may target an object declared later in the file.
//! Pass 3 resolves index keys against the properties and links of the
//! owning object only.

use tracing::debug;

use crate::builders::{
    ObjectFragments, build_attribute_map, build_data_type, build_file, build_index, build_link,
    build_object, entries, items, label, unknown,
};
use crate::definition::Definition;
use crate::error::{LoadError, Result};
use crate::fields::{ensure_unset, load_text};
use crate::model::{
    AttributeMap, BUILTIN_DATA_TYPES, DataType, File, LinkId, Object, ObjectId, Project,
};

/// Loader behaviour that the definition format leaves open.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Reject two indexes with the same name on one object.
    pub enforce_unique_index_names: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            enforce_unique_index_names: true,
        }
    }
}

/// Progress of an assembly. A failed pass leaves no usable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStage {
    Unstarted,
    Pass1Complete,
    Pass2Complete,
    Pass3Complete,
    Ready,
}

/// Load a project definition with default options.
pub fn load_project(definition: &Definition) -> Result<Project> {
    load_project_with_options(definition, &LoadOptions::default())
}

/// Load a project definition. The whole graph is built or nothing is.
pub fn load_project_with_options(definition: &Definition, options: &LoadOptions) -> Result<Project> {
    ProjectAssembler::new(definition, options.clone()).run()
}

/// Drives the three passes over one raw definition.
pub struct ProjectAssembler<'a> {
    definition: &'a Definition,
    options: LoadOptions,
    stage: AssemblyStage,
    name: Option<String>,
    attributes: Option<AttributeMap>,
    data_types: Vec<DataType>,
    objects: Vec<Object>,
    fragments: Vec<ObjectFragments<'a>>,
    files: Option<Vec<File>>,
    data_types_loaded: bool,
    objects_loaded: bool,
}

impl<'a> ProjectAssembler<'a> {
    pub fn new(definition: &'a Definition, options: LoadOptions) -> Self {
        let data_types = BUILTIN_DATA_TYPES
            .iter()
            .map(|(name, kind)| DataType::builtin(name, *kind))
            .collect();
        Self {
            definition,
            options,
            stage: AssemblyStage::Unstarted,
            name: None,
            attributes: None,
            data_types,
            objects: Vec::new(),
            fragments: Vec::new(),
            files: None,
            data_types_loaded: false,
            objects_loaded: false,
        }
    }

    pub fn stage(&self) -> AssemblyStage {
        self.stage
    }

    /// Runs every remaining pass and returns the linked project.
    pub fn run(mut self) -> Result<Project> {
        loop {
            self.stage = match self.stage {
                AssemblyStage::Unstarted => {
                    self.load_structure()?;
                    AssemblyStage::Pass1Complete
                }
                AssemblyStage::Pass1Complete => {
                    self.load_links()?;
                    AssemblyStage::Pass2Complete
                }
                AssemblyStage::Pass2Complete => {
                    self.load_indexes()?;
                    AssemblyStage::Pass3Complete
                }
                AssemblyStage::Pass3Complete => AssemblyStage::Ready,
                AssemblyStage::Ready => break,
            };
            debug!(event = "assembly_stage", stage = ?self.stage);
        }

        Ok(Project {
            name: self.name.unwrap_or_default(),
            attributes: self.attributes.unwrap_or_default(),
            data_types: self.data_types,
            objects: self.objects,
            files: self.files.unwrap_or_default(),
        })
    }

    fn project_label(&self) -> String {
        match &self.name {
            Some(name) => format!("project <{name}>"),
            None => "project".to_string(),
        }
    }

    fn load_structure(&mut self) -> Result<()> {
        let definition = self.definition;
        for (key, raw) in entries(definition, "project", "definition")? {
            let entity = self.project_label();
            match key.as_str() {
                "name" => load_text(&mut self.name, raw, &entity, "name")?,
                "datatypes" => self.load_data_types(raw, &entity)?,
                "attributes" => {
                    ensure_unset(&self.attributes, &entity, "attributes")?;
                    self.attributes = Some(build_attribute_map(raw, &entity)?);
                }
                "objects" => self.load_objects(raw, &entity)?,
                "files" => {
                    ensure_unset(&self.files, &entity, "files")?;
                    let list = items(raw, &entity, "files")?;
                    let mut files = Vec::with_capacity(list.len());
                    for (idx, fragment) in list.iter().enumerate() {
                        files.push(build_file(fragment, idx + 1)?);
                    }
                    self.files = Some(files);
                }
                _ => return Err(unknown(&entity, key)),
            }
        }

        if self.name.is_none() {
            return Err(LoadError::IncompleteProject {
                reason: "project name is not defined".to_string(),
            });
        }
        if self.objects.is_empty() {
            return Err(LoadError::IncompleteProject {
                reason: format!("object list of {} is empty", self.project_label()),
            });
        }
        if self.files.as_ref().is_none_or(Vec::is_empty) {
            return Err(LoadError::IncompleteProject {
                reason: format!("file list of {} is empty", self.project_label()),
            });
        }

        debug!(
            event = "pass_complete",
            pass = 1,
            data_types = self.data_types.len(),
            objects = self.objects.len(),
            files = self.files.as_ref().map_or(0, Vec::len),
        );
        Ok(())
    }

    fn load_data_types(&mut self, raw: &Definition, entity: &str) -> Result<()> {
        if std::mem::replace(&mut self.data_types_loaded, true) {
            return Err(LoadError::DuplicateDefinition {
                entity: entity.to_string(),
                field: "datatypes".to_string(),
            });
        }
        for (idx, fragment) in items(raw, entity, "datatypes")?.iter().enumerate() {
            let data_type = build_data_type(fragment, idx + 1, &self.data_types)?;
            self.data_types.push(data_type);
        }
        Ok(())
    }

    fn load_objects(&mut self, raw: &'a Definition, entity: &str) -> Result<()> {
        if std::mem::replace(&mut self.objects_loaded, true) {
            return Err(LoadError::DuplicateDefinition {
                entity: entity.to_string(),
                field: "objects".to_string(),
            });
        }
        for (idx, fragment) in items(raw, entity, "objects")?.iter().enumerate() {
            let (object, fragments) = build_object(fragment, idx + 1, &self.data_types)?;
            if self.objects.iter().any(|existing| existing.name == object.name) {
                return Err(LoadError::DuplicateDefinition {
                    entity: self.project_label(),
                    field: format!("object <{}>", object.name),
                });
            }
            self.objects.push(object);
            self.fragments.push(fragments);
        }
        Ok(())
    }

    fn load_links(&mut self) -> Result<()> {
        let mut count = 0;
        for idx in 0..self.objects.len() {
            let source = ObjectId(idx);
            let Some(raw) = self.fragments[idx].links else {
                continue;
            };
            let entity = format!("object <{}>", self.objects[idx].name);
            for (position, fragment) in items(raw, &entity, "links")?.iter().enumerate() {
                let link = build_link(fragment, position + 1, source, &self.objects)?;
                if self.objects[idx].link(&link.name).is_some() {
                    return Err(LoadError::DuplicateDefinition {
                        entity,
                        field: label("link", Some(link.name.as_str()), position + 1),
                    });
                }
                let id = LinkId {
                    object: source,
                    index: self.objects[idx].links.len(),
                };
                let target = link.target;
                self.objects[idx].links.push(link);
                self.objects[target.0].reverse_links.push(id);
                count += 1;
            }
        }
        debug!(event = "pass_complete", pass = 2, links = count);
        Ok(())
    }

    fn load_indexes(&mut self) -> Result<()> {
        let mut count = 0;
        for idx in 0..self.objects.len() {
            let Some(raw) = self.fragments[idx].indexes else {
                continue;
            };
            let entity = format!("object <{}>", self.objects[idx].name);
            for (position, fragment) in items(raw, &entity, "indexes")?.iter().enumerate() {
                let index = build_index(fragment, position + 1, ObjectId(idx), &self.objects[idx])?;
                if self.options.enforce_unique_index_names
                    && self.objects[idx].index(&index.name).is_some()
                {
                    return Err(LoadError::DuplicateDefinition {
                        entity,
                        field: label("index", Some(index.name.as_str()), position + 1),
                    });
                }
                self.objects[idx].indexes.push(index);
                count += 1;
            }
        }
        debug!(event = "pass_complete", pass = 3, indexes = count);
        Ok(())
    }
}
