use std::path::{Path, PathBuf};
use std::time::Instant;

use handlebars::Handlebars;
use modelgen_core::{File, FileScope, Project};
use serde::Serialize;
use tracing::{debug, info};

use crate::context::{ObjectScope, ProjectScope, ProjectView};
use crate::errors::{RenderError, RenderResult};
use crate::helpers::register_case_helpers;
use crate::model::{RenderOptions, RenderReport, RenderedFile};
use crate::output::write_bytes_atomic;

/// Renders the output files of a loaded project.
///
/// Files are processed in declaration order. A project-scope file renders
/// once; an object-scope file renders once per object, in object order. The
/// output path is itself a template expanded with the same context. The
/// first failure aborts the run; files already written stay on disk.
pub struct RenderDriver {
    options: RenderOptions,
    registry: Handlebars<'static>,
}

struct FileJob<'a> {
    position: usize,
    file: &'a File,
    input: &'a Path,
    template: &'a str,
    object: Option<&'a str>,
}

impl FileJob<'_> {
    fn target(&self) -> String {
        match self.object {
            Some(object) => format!("file n°{} for object <{object}>", self.position),
            None => format!("file n°{}", self.position),
        }
    }
}

impl RenderDriver {
    pub fn new(options: RenderOptions) -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(options.strict);
        register_case_helpers(&mut registry, options.case_naming);
        Self { options, registry }
    }

    pub async fn run(&self, project: &Project) -> RenderResult<RenderReport> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = RenderReport::new(run_id.clone(), chrono::Utc::now());
        info!(
            event = "render_started",
            run_id = %run_id,
            project = %project.name,
            files = project.files.len(),
            dry_run = self.options.dry_run,
        );

        let view = ProjectView::from_project(project);
        for (idx, file) in project.files.iter().enumerate() {
            let position = idx + 1;
            let input = self.options.template_dir.join(&file.input);
            let template = read_template(&input, position).await?;
            let mut job = FileJob {
                position,
                file,
                input: &input,
                template: &template,
                object: None,
            };

            match file.scope {
                FileScope::Project => {
                    let context = ProjectScope { project: &view };
                    report.record(self.render_job(&job, &context).await?);
                }
                FileScope::Object => {
                    for object in &view.objects {
                        job.object = Some(object.name.as_str());
                        let context = ObjectScope {
                            project: &view,
                            object,
                        };
                        report.record(self.render_job(&job, &context).await?);
                    }
                }
            }
        }

        info!(
            event = "render_finished",
            run_id = %run_id,
            files = report.files.len(),
            bytes = report.bytes_total(),
            elapsed_ms = start.elapsed().as_millis() as u64,
        );
        Ok(report)
    }

    async fn render_job<T: Serialize>(
        &self,
        job: &FileJob<'_>,
        context: &T,
    ) -> RenderResult<RenderedFile> {
        let expanded = self
            .registry
            .render_template(&job.file.output, context)
            .map_err(|source| RenderError::OutputPath {
                target: job.target(),
                source: Box::new(source),
            })?;
        let expanded = expanded.trim();
        if expanded.is_empty() {
            return Err(RenderError::EmptyOutputPath {
                target: job.target(),
            });
        }
        let output = self.options.output_dir.join(expanded);

        let content = self
            .registry
            .render_template(job.template, context)
            .map_err(|source| RenderError::Template {
                target: job.target(),
                path: job.input.to_path_buf(),
                source: Box::new(source),
            })?;

        let written = !self.options.dry_run;
        if written {
            write_bytes_atomic(&output, content.as_bytes())
                .await
                .map_err(|source| RenderError::Write {
                    path: output.clone(),
                    source,
                })?;
        }
        debug!(
            event = "file_rendered",
            position = job.position,
            object = job.object.unwrap_or(""),
            output = %output.display(),
            bytes = content.len(),
            written,
        );

        Ok(RenderedFile {
            position: job.position,
            scope: job.file.scope,
            input: job.input.to_path_buf(),
            output,
            object: job.object.map(str::to_string),
            bytes: content.len() as u64,
            written,
        })
    }
}

async fn read_template(path: &Path, position: usize) -> RenderResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RenderError::ReadTemplate {
            target: format!("file n°{position}"),
            path: PathBuf::from(path),
            source,
        })
}
