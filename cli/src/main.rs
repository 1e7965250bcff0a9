use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use form_schema_core::{FormPlan, FormRequest};
use form_schema_db::{
    FileFormat, SchemaDatabase, declaration_files, load_request, read_declarations,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI output format with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "form-schema")]
#[command(version, about = "Inspect form schemas and check submissions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the schemas declared in files or directories.
    List(ListArgs),
    /// Check that declaration files compile and register.
    Validate(ValidateArgs),
    /// Print the resolved form plan of one schema.
    Describe(DescribeArgs),
    /// Validate a values object against one schema.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Declaration files and/or directories containing them.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Structured output format (default: one line per schema).
    #[arg(long)]
    format: Option<CliOutputFormat>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Declaration files and/or directories containing them.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct FormArgs {
    /// Declaration files and/or directories containing them.
    #[arg(long, required = true, num_args = 1..)]
    schemas: Vec<PathBuf>,
    /// Name of the schema to build.
    #[arg(long)]
    schema: String,
    /// Request file with options, overrides and default values.
    #[arg(long)]
    request: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    #[command(flatten)]
    form: FormArgs,
    /// Only print fields that are not hidden.
    #[arg(long)]
    visible_only: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    form: FormArgs,
    /// JSON or YAML file with the submitted values (`-` reads JSON from stdin).
    #[arg(long)]
    values: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Serialize)]
struct SchemaSummary<'a> {
    name: &'a str,
    fields: Vec<&'a str>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::List(args) => run_list(args),
        Command::Validate(args) => run_validate(args),
        Command::Describe(args) => run_describe(args),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (default: warnings only).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_list(args: ListArgs) -> Result<(), String> {
    let (db, _) = load_database(&args.inputs)?;

    let summaries: Vec<SchemaSummary<'_>> = db
        .registry()
        .schemas()
        .map(|schema| SchemaSummary {
            name: &schema.name,
            fields: schema.keys().collect(),
        })
        .collect();

    match args.format {
        Some(format) => print!("{}", format_output(&summaries, format)?),
        None => {
            for summary in &summaries {
                println!("{} ({} field(s))", summary.name, summary.fields.len());
            }
        }
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let (db, files) = load_database(&args.inputs)?;
    println!(
        "Validated {} schema(s) from {} file(s).",
        db.len(),
        files
    );
    Ok(())
}

fn run_describe(args: DescribeArgs) -> Result<(), String> {
    let mut plan = build_plan(&args.form)?;
    if args.visible_only {
        plan.fields.retain(|field| !field.hidden);
    }
    print!("{}", format_output(&plan, args.format)?);
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let plan = build_plan(&args.form)?;
    let values = read_values(&args.values)?;
    let result = plan.check_submission(&values);
    print!("{}", format_output(&result, args.format)?);
    if result.is_success() {
        Ok(())
    } else {
        Err(format!("submission rejected by schema '{}'", plan.schema))
    }
}

fn build_plan(args: &FormArgs) -> Result<FormPlan, String> {
    let (db, _) = load_database(&args.schemas)?;
    let request = match &args.request {
        Some(path) => load_request(path)
            .map_err(|err| format!("Failed to load request '{}': {err}", path.display()))?,
        None => FormRequest::default(),
    };
    db.into_registry()
        .build_form(&args.schema, &request)
        .map_err(|err| err.to_string())
}

/// Loads every declaration found under `inputs` into one database.
///
/// Returns the database and the number of files read.
fn load_database(inputs: &[PathBuf]) -> Result<(SchemaDatabase, usize), String> {
    let paths = collect_declaration_paths(inputs)?;
    if paths.is_empty() {
        return Err("No declaration files found (expected *.yaml, *.yml or *.json)".to_string());
    }

    let mut declarations = Vec::new();
    for path in &paths {
        let loaded = read_declarations(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
        debug!(file = %path.display(), schemas = loaded.len(), "loaded declarations");
        declarations.extend(loaded);
    }

    let db = SchemaDatabase::from_declarations(&declarations).map_err(|err| err.to_string())?;
    Ok((db, paths.len()))
}

fn collect_declaration_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = declaration_files(input)
                .map_err(|err| format!("Failed to read directory '{}': {err}", input.display()))?;
            paths.extend(found);
        } else if input.is_file() {
            paths.push(input.clone());
        } else {
            return Err(format!("No such file or directory: '{}'", input.display()));
        }
    }
    Ok(paths)
}

fn read_values(path: &Path) -> Result<Value, String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|err| format!("Failed to read stdin: {err}"))?;
        return serde_json::from_str(&raw).map_err(|err| format!("Invalid JSON on stdin: {err}"));
    }

    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    match FileFormat::from_path(path) {
        Some(FileFormat::Yaml) => serde_yaml::from_str(&raw)
            .map_err(|err| format!("Invalid YAML in '{}': {err}", path.display())),
        _ => serde_json::from_str(&raw)
            .map_err(|err| format!("Invalid JSON in '{}': {err}", path.display())),
    }
}

fn format_output<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|mut raw| {
                raw.push('\n');
                raw
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}
