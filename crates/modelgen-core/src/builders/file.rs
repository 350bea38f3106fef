use crate::definition::Definition;
use crate::error::{LoadError, Result};
use crate::fields::{ensure_unset, load_text, required, text};
use crate::model::{File, FileScope};

use super::{entries, label, unknown};

pub(crate) fn build_file(fragment: &Definition, position: usize) -> Result<File> {
    let entity = label("file", None, position);

    let mut scope: Option<FileScope> = None;
    let mut input: Option<String> = None;
    let mut output: Option<String> = None;

    for (key, raw) in entries(fragment, &entity, "definition")? {
        match key.as_str() {
            "scope" => {
                ensure_unset(&scope, &entity, "scope")?;
                scope = Some(file_scope(raw, &entity)?);
            }
            "input" => load_text(&mut input, raw, &entity, "input")?,
            "output" => load_text(&mut output, raw, &entity, "output")?,
            _ => return Err(unknown(&entity, key)),
        }
    }

    Ok(File {
        scope: required(scope, &entity, "scope")?,
        input: required(input, &entity, "input")?,
        output: required(output, &entity, "output")?,
    })
}

fn file_scope(raw: &Definition, entity: &str) -> Result<FileScope> {
    match text(raw, entity, "scope")?.as_str() {
        "project" => Ok(FileScope::Project),
        "object" => Ok(FileScope::Object),
        _ => Err(LoadError::InvalidShape {
            entity: entity.to_string(),
            field: "scope".to_string(),
            expected: "one of: project, object",
        }),
    }
}
