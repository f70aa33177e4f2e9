use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use schema_modelgen_core::{
    CompositionPolicy, Document, DumpFormat, GenModel, ModelError, ModelOptions, build_definition,
    dump,
};
use schema_modelgen_loader::{GenConfig, load_document};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "modelgen", version)]
#[command(about = "Resolve JSON-Schema definitions into code generation models")]
struct Cli {
    /// Enable verbose logging (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the definitions selected for building.
    List(ListArgs),
    /// Build models and dump them as JSON or YAML.
    Dump(DumpArgs),
    /// Build every selected model and report failures.
    Check(CheckArgs),
}

/// Inputs shared by every subcommand.
#[derive(Debug, Args)]
struct SourceArgs {
    /// Interface description (JSON/YAML file) or directory of definition files.
    #[arg(long)]
    spec: PathBuf,
    /// Generator configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Definition to build (repeatable). Overrides the configured list.
    #[arg(long = "definition")]
    definitions: Vec<String>,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Debug, Args)]
struct DumpArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Dump format (default: from config, else json).
    #[arg(long)]
    format: Option<DumpFormat>,
    /// Write one file per model into this directory instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Package prefix for referenced model types.
    #[arg(long)]
    models_package: Option<String>,
    /// Treatment of oneOf/anyOf.
    #[arg(long)]
    composition: Option<CompositionPolicy>,
    /// Dump the models that build and report the others instead of failing.
    #[arg(long)]
    keep_going: bool,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Treatment of oneOf/anyOf.
    #[arg(long)]
    composition: Option<CompositionPolicy>,
}

/// Wrapper written around every dump.
#[derive(Debug, Serialize)]
struct DumpEnvelope<'a> {
    tool_version: &'a str,
    generated_at: String,
    spec: String,
    models: Vec<&'a GenModel>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::List(args) => run_list(args),
        Command::Dump(args) => run_dump(args),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_list(args: ListArgs) -> Result<(), String> {
    let (document, config) = load_inputs(&args.source)?;
    for name in config.select(&document) {
        println!("{name}");
    }
    Ok(())
}

fn run_dump(args: DumpArgs) -> Result<(), String> {
    let (document, mut config) = load_inputs(&args.source)?;
    if let Some(models_package) = args.models_package {
        config.models_package = models_package;
    }
    if let Some(composition) = args.composition {
        config.composition = composition;
    }
    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {e}"))?;
    let format = args.format.unwrap_or(config.dump.format);

    let (models, failures) = build_all(&document, &config);
    if !failures.is_empty() && !args.keep_going {
        let (name, err) = &failures[0];
        return Err(format!(
            "Failed to build '{name}': {err} ({} failure(s) total, use --keep-going to dump the rest)",
            failures.len()
        ));
    }

    let spec = args.source.spec.display().to_string();
    match &args.output {
        Some(dir) => {
            let names: Vec<&str> = models.iter().map(|model| model.name.as_str()).collect();
            let files = output_file_names(&names, format)?;
            fs::create_dir_all(dir).map_err(|err| {
                format!("Failed to create output directory '{}': {err}", dir.display())
            })?;
            for (model, file) in models.iter().zip(&files) {
                write_dump(&dir.join(file), &envelope(&spec, vec![model]), format)?;
            }
            println!(
                "Wrote {} model dump(s) to '{}'.",
                models.len(),
                dir.display()
            );
        }
        None => {
            let raw = dump::format_value(&envelope(&spec, models.iter().collect()), format)?;
            println!("{raw}");
        }
    }

    report_failures(&failures);
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let (document, mut config) = load_inputs(&args.source)?;
    if let Some(composition) = args.composition {
        config.composition = composition;
    }

    let (models, failures) = build_all(&document, &config);
    for model in &models {
        println!("ok    {}", model.name);
    }
    report_failures(&failures);
    println!(
        "Checked {} definition(s): {} ok, {} failed.",
        models.len() + failures.len(),
        models.len(),
        failures.len()
    );

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} definition(s) failed to build", failures.len()))
    }
}

fn load_inputs(source: &SourceArgs) -> Result<(Document, GenConfig), String> {
    let document = load_document(&source.spec)
        .map_err(|e| format!("Failed to load spec '{}': {e}", source.spec.display()))?;
    let mut config = match &source.config {
        Some(path) => GenConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => GenConfig::default(),
    };
    if !source.definitions.is_empty() {
        config.definitions = source.definitions.clone();
    }
    tracing::debug!(
        definitions = document.len(),
        selected = config.select(&document).len(),
        "loaded inputs"
    );
    Ok((document, config))
}

/// Builds every selected definition in parallel. Results keep the sorted
/// selection order.
fn build_all(
    document: &Document,
    config: &GenConfig,
) -> (Vec<GenModel>, Vec<(String, ModelError)>) {
    let options: ModelOptions = config.model_options();
    let results: Vec<(String, Result<GenModel, ModelError>)> = config
        .select(document)
        .par_iter()
        .map(|name| (name.to_string(), build_definition(document, name, &options)))
        .collect();

    let mut models = Vec::new();
    let mut failures = Vec::new();
    for (name, result) in results {
        match result {
            Ok(model) => models.push(model),
            Err(err) => failures.push((name, err)),
        }
    }
    (models, failures)
}

fn envelope<'a>(spec: &str, models: Vec<&'a GenModel>) -> DumpEnvelope<'a> {
    DumpEnvelope {
        tool_version: PACKAGE_VERSION,
        generated_at: chrono::Utc::now().to_rfc3339(),
        spec: spec.to_string(),
        models,
    }
}

fn write_dump(path: &Path, envelope: &DumpEnvelope<'_>, format: DumpFormat) -> Result<(), String> {
    let raw = dump::format_value(envelope, format)?;
    fs::write(path, raw).map_err(|err| format!("Failed to write '{}': {err}", path.display()))
}

fn report_failures(failures: &[(String, ModelError)]) {
    if failures.is_empty() {
        return;
    }
    eprintln!("{} definition(s) failed:", failures.len());
    for (name, err) in failures {
        eprintln!("  {name}: {err}");
    }
}

/// One dump file per definition. Fails when two definitions sanitize to the
/// same file name, compared case-insensitively.
fn output_file_names(names: &[&str], format: DumpFormat) -> Result<Vec<String>, String> {
    let mut claimed: HashMap<String, &str> = HashMap::new();
    let mut files = Vec::with_capacity(names.len());
    for &name in names {
        let file = format!(
            "{}.{}",
            sanitize_filename_segment(name),
            format.extension()
        );
        if let Some(other) = claimed.insert(file.to_lowercase(), name) {
            return Err(format!(
                "Definitions '{other}' and '{name}' would both be written to '{file}'"
            ));
        }
        files.push(file);
    }
    Ok(files)
}

fn sanitize_filename_segment(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '-' || c == '.');
    if cleaned.is_empty() {
        "definition".to_string()
    } else {
        cleaned.to_string()
    }
}
