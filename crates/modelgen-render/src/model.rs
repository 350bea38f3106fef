use std::path::PathBuf;

use chrono::{DateTime, Utc};
use modelgen_core::FileScope;
use serde::{Deserialize, Serialize};

/// Naming convention of the upper-case helpers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseNaming {
    /// `upperKebabCase` joins with `-`, `upperSnakeCase` joins with `_`.
    #[default]
    Standard,
    /// `upperKebabCase` joins with `_`, `upperSnakeCase` joins with `-`.
    Legacy,
}

/// Options for the render driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Directory template inputs are resolved against.
    pub template_dir: PathBuf,
    /// Directory expanded output paths are resolved against.
    pub output_dir: PathBuf,
    /// Fail on missing template fields instead of rendering them empty.
    pub strict: bool,
    /// Render everything but write nothing.
    pub dry_run: bool,
    pub case_naming: CaseNaming,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            strict: false,
            dry_run: false,
            case_naming: CaseNaming::Standard,
        }
    }
}

/// One rendered output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedFile {
    /// 1-based position of the file declaration.
    pub position: usize,
    pub scope: FileScope,
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    pub bytes: u64,
    pub written: bool,
}

/// Report for a render run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub files: Vec<RenderedFile>,
}

impl RenderReport {
    pub fn new(run_id: String, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            started_at,
            files: Vec::new(),
        }
    }

    pub fn record(&mut self, file: RenderedFile) {
        self.files.push(file);
    }

    pub fn count(&self, scope: FileScope) -> usize {
        self.files.iter().filter(|file| file.scope == scope).count()
    }

    pub fn bytes_total(&self) -> u64 {
        self.files.iter().map(|file| file.bytes).sum()
    }
}
