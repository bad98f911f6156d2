use anyhow::{bail, Context, Result};
use apidoc_ts::ast::SourceUnit;
use apidoc_ts::emit::emit_unit;
use apidoc_ts::{PluginOptions, Project, TransformReport};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(author, version, about = "OpenAPI metadata synthesis for decorated TypeScript classes")]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Rewrite every unit of a program.
  Transform(TransformArgs),
}

#[derive(Args)]
struct TransformArgs {
  /// Program JSON: `{ "types": ..., "units": [...] }`.
  program: PathBuf,

  /// Plugin options JSON.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Derive descriptions, examples and summaries from doc comments.
  #[arg(long)]
  introspect_comments: bool,

  /// Do not mirror class-validator bounds.
  #[arg(long)]
  no_class_validator_shim: bool,

  /// Print rewritten units as JSON instead of TypeScript.
  #[arg(long)]
  json: bool,

  /// Write each unit to `<out-dir>/<path>` instead of stdout.
  #[arg(long)]
  out_dir: Option<PathBuf>,

  /// Emit tracing spans (JSON) on stderr.
  #[arg(long)]
  trace: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonUnit<'a> {
  #[serde(flatten)]
  unit: &'a SourceUnit,
  rewritten: bool,
  skipped_fields: usize,
  skipped_methods: usize,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  let result = match cli.command {
    Commands::Transform(args) => run_transform(args),
  };
  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(Level::DEBUG)
    .with_writer(std::io::stderr)
    .json()
    .with_ansi(false)
    .try_init();
}

fn load_options(args: &TransformArgs) -> Result<PluginOptions> {
  let mut options = match &args.config {
    Some(path) => PluginOptions::from_file(path)?,
    None => PluginOptions::default(),
  };
  if args.introspect_comments {
    options.introspect_comments = true;
  }
  if args.no_class_validator_shim {
    options.class_validator_shim = false;
  }
  Ok(options)
}

fn load_project(path: &Path) -> Result<Project> {
  let json =
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  Project::from_json(&json).with_context(|| format!("invalid program file {}", path.display()))
}

/// `<out_dir>/<unit path>`. Unit paths must stay relative and below `out_dir`.
fn output_path(out_dir: &Path, unit_path: &str) -> Result<PathBuf> {
  let mut path = out_dir.to_path_buf();
  for component in Path::new(unit_path).components() {
    match component {
      Component::Normal(segment) => path.push(segment),
      Component::CurDir => {}
      Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
        bail!("unit path {unit_path} would be written outside the output directory")
      }
    }
  }
  Ok(path)
}

fn write_unit(out_dir: &Path, unit: &SourceUnit, text: &str) -> Result<()> {
  let path = output_path(out_dir, &unit.path)?;
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
  debug!(path = %path.display(), "wrote unit");
  Ok(())
}

fn render_json(results: &[(SourceUnit, TransformReport)]) -> Result<String> {
  let units: Vec<JsonUnit> = results
    .iter()
    .map(|(unit, report)| JsonUnit {
      unit,
      rewritten: report.rewritten,
      skipped_fields: report.skipped_fields,
      skipped_methods: report.skipped_methods,
    })
    .collect();
  serde_json::to_string_pretty(&units).context("failed to serialize JSON")
}

fn run_transform(args: TransformArgs) -> Result<()> {
  init_tracing(args.trace);

  let options = load_options(&args)?;
  let project = load_project(&args.program)?;
  let results = project.transform(options);

  if args.json {
    let json = render_json(&results)?;
    match &args.out_dir {
      Some(out_dir) => {
        fs::create_dir_all(out_dir)
          .with_context(|| format!("failed to create {}", out_dir.display()))?;
        let path = out_dir.join("units.json");
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
      }
      None => println!("{json}"),
    }
    return Ok(());
  }

  for (unit, _) in &results {
    let text = emit_unit(unit);
    match &args.out_dir {
      Some(out_dir) => write_unit(out_dir, unit, &text)?,
      None => {
        println!("// {}", unit.path);
        print!("{text}");
      }
    }
  }
  Ok(())
}
