mod logging;
mod settings;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use logging::{LoggingError, init_logging};
use modelgen_core::{Definition, LoadError, Project, dump_project, load_project_with_options};
use modelgen_render::{RenderDriver, RenderError, context_schema};
use settings::{SettingsError, load_settings};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Settings(#[from] SettingsError),
    #[error("{0}")]
    Logging(#[from] LoggingError),
    #[error("can't read project file: {0}")]
    Read(#[source] std::io::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "modelgen", version, about = "Generate files from a YAML project model")]
struct Cli {
    /// Print the loaded project and debug events.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,
    /// Append JSON log events to this file.
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a project definition and render its files.
    Generate(GenerateArgs),
    /// Load and validate a project definition without rendering.
    Check(CheckArgs),
    /// Print the JSON schema of the template context.
    ContextSchema(ContextSchemaArgs),
}

impl Command {
    fn definition(&self) -> Option<&Path> {
        match self {
            Command::Generate(args) => Some(&args.definition),
            Command::Check(args) => Some(&args.definition),
            Command::ContextSchema(_) => None,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Project definition (YAML).
    #[arg(value_name = "DEFINITION")]
    definition: PathBuf,
    /// Settings file; defaults to modelgen.toml beside the definition.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory template inputs are read from.
    #[arg(long, value_name = "DIR")]
    template_dir: Option<PathBuf>,
    /// Directory outputs are written to.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Fail on template fields missing from the context.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Render without writing any file.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Project definition (YAML).
    #[arg(value_name = "DEFINITION")]
    definition: PathBuf,
    /// Settings file; defaults to modelgen.toml beside the definition.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the loaded project.
    #[arg(long, default_value_t = false)]
    dump: bool,
}

#[derive(Args, Debug)]
struct ContextSchemaArgs {
    /// Write the schema here instead of stdout.
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let definition = cli.command.definition().map(Path::to_path_buf);

    if let Err(err) = run(cli).await {
        match definition {
            Some(path) => eprintln!("error: {err} in project file <{}>", path.display()),
            None => eprintln!("error: {err}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    if cli.verbose {
        println!("modelgen V{}", env!("CARGO_PKG_VERSION"));
    }

    match cli.command {
        Command::Generate(args) => run_generate(args, cli.verbose).await,
        Command::Check(args) => run_check(args, cli.verbose).await,
        Command::ContextSchema(args) => run_context_schema(args).await,
    }
}

async fn read_definition(path: &Path) -> Result<Definition, CliError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(CliError::Read)?;
    Ok(serde_yaml::from_str(&content)?)
}

async fn load(path: &Path, config: Option<&Path>) -> Result<(Project, settings::Settings), CliError> {
    let settings = load_settings(config, path)?;
    let definition = read_definition(path).await?;
    let project = load_project_with_options(&definition, &settings.load.to_options())?;
    info!(
        event = "project_loaded",
        project = %project.name,
        objects = project.objects.len(),
        files = project.files.len(),
    );
    Ok((project, settings))
}

async fn run_generate(args: GenerateArgs, verbose: bool) -> Result<(), CliError> {
    let (project, settings) = load(&args.definition, args.config.as_deref()).await?;
    if verbose {
        println!("{}", dump_project(&project));
    }

    let mut options = settings.render;
    if let Some(template_dir) = args.template_dir {
        options.template_dir = template_dir;
    }
    if let Some(output_dir) = args.output_dir {
        options.output_dir = output_dir;
    }
    options.strict |= args.strict;
    options.dry_run |= args.dry_run;

    let report = RenderDriver::new(options).run(&project).await?;
    for file in &report.files {
        let verb = if file.written { "Generated" } else { "Rendered" };
        println!("* {verb} {} file {}", file.scope, file.output.display());
    }
    println!("{} file(s), run {}", report.files.len(), report.run_id);
    Ok(())
}

async fn run_check(args: CheckArgs, verbose: bool) -> Result<(), CliError> {
    let (project, _) = load(&args.definition, args.config.as_deref()).await?;
    if args.dump || verbose {
        println!("{}", dump_project(&project));
    }
    println!(
        "project <{}> is valid: {} object(s), {} file(s)",
        project.name,
        project.objects.len(),
        project.files.len()
    );
    Ok(())
}

async fn run_context_schema(args: ContextSchemaArgs) -> Result<(), CliError> {
    let schema = serde_json::to_string_pretty(&context_schema())?;
    match args.out {
        Some(path) => {
            tokio::fs::write(&path, schema).await?;
            info!(event = "context_schema_written", path = %path.display());
        }
        None => println!("{schema}"),
    }
    Ok(())
}
