//! Template render driver for loaded modelgen projects.

pub mod case;
pub mod context;
pub mod engine;
pub mod errors;
pub mod helpers;
pub mod model;
mod output;

pub use context::{ObjectScope, ObjectView, ProjectScope, ProjectView, context_schema};
pub use engine::RenderDriver;
pub use errors::{RenderError, RenderResult};
pub use model::{CaseNaming, RenderOptions, RenderReport, RenderedFile};
