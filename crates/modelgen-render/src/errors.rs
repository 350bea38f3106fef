use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by the render driver.
///
/// `target` names the file declaration being rendered, e.g. `file n°2` or
/// `file n°2 for object <User>`.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot read template <{}> of {target}: {source}", .path.display())]
    ReadTemplate {
        target: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot expand output path of {target}: {source}")]
    OutputPath {
        target: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },
    #[error("output path of {target} expands to nothing")]
    EmptyOutputPath { target: String },
    #[error("cannot render template <{}> of {target}: {source}", .path.display())]
    Template {
        target: String,
        path: PathBuf,
        #[source]
        source: Box<handlebars::RenderError>,
    },
    #[error("cannot write <{}>: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type RenderResult<T> = Result<T, RenderError>;
