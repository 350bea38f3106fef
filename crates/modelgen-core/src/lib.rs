//! Core contracts for modelgen.
//!
//! This crate turns a schema-free project definition into a validated,
//! cross-referenced `Project`: data types, objects with their properties,
//! links and indexes, and the output files to generate.

pub mod assembler;
mod builders;
pub mod definition;
pub mod dump;
pub mod error;
mod fields;
pub mod model;

pub use assembler::{
    AssemblyStage, LoadOptions, ProjectAssembler, load_project, load_project_with_options,
};
pub use definition::Definition;
pub use dump::dump_project;
pub use error::{LoadError, Result};
pub use model::{
    AttributeMap, BUILTIN_DATA_TYPES, DataType, DataTypeId, DataTypeKind, File, FileScope, Index,
    IndexKey, KeyKind, KeyReference, Link, LinkId, Object, ObjectId, Project, Property,
    PropertyId, Scalar,
};
