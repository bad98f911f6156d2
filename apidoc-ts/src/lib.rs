use ast::node::Node;
use ast::stmt::{ImportNames, ImportStmt, Stmt};
use ast::SourceUnit;
use decorators::{OPENAPI_NAMESPACE, OPENAPI_PACKAGE_NAME};
use loc::Loc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing::debug_span;

pub mod ast;
pub mod comments;
pub mod controller_class;
pub mod decorators;
pub mod emit;
pub mod enums;
pub mod error;
pub mod loc;
pub mod metadata;
pub mod model_class;
pub mod options;
pub mod resolve;
pub mod types;

pub use controller_class::rewrite_controller_classes;
pub use error::{ConfigError, InspectError};
pub use model_class::rewrite_model_classes;
pub use options::PluginOptions;
pub use types::{ProgramTypes, Type, TypeTable};

/// What a call to [`Plugin::transform_with_report`] did to one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformReport {
  /// Whether any pass ran; untouched files are returned as given.
  pub rewritten: bool,
  /// Fields left undescribed because they could not be inspected.
  pub skipped_fields: usize,
  /// Route handlers left as written because they could not be inspected.
  pub skipped_methods: usize,
}

/// Rewrites source units against a read-only program type table.
///
/// # Examples
///
/// ```
/// use apidoc_ts::ast::SourceUnit;
/// use apidoc_ts::{Plugin, PluginOptions, ProgramTypes};
///
/// let types = ProgramTypes::new();
/// let plugin = Plugin::new(&types, PluginOptions::default());
/// let unit = SourceUnit::new("src/app.service.ts", Vec::new());
/// assert_eq!(plugin.transform(&unit), unit);
/// ```
pub struct Plugin<'t> {
  table: &'t dyn TypeTable,
  options: PluginOptions,
}

impl<'t> Plugin<'t> {
  pub fn new(table: &'t dyn TypeTable, options: PluginOptions) -> Plugin<'t> {
    Plugin { table, options }
  }

  pub fn options(&self) -> &PluginOptions {
    &self.options
  }

  pub fn transform(&self, unit: &SourceUnit) -> SourceUnit {
    self.transform_with_report(unit).0
  }

  pub fn transform_with_report(&self, unit: &SourceUnit) -> (SourceUnit, TransformReport) {
    let span = debug_span!("transform", file = %unit.path);
    let _guard = span.enter();

    let mut report = TransformReport::default();
    let mut rewritten = unit.clone();
    if self.options.is_dto_file(&unit.path) {
      let _pass = debug_span!("model_pass").entered();
      report.skipped_fields = model_class::visit(&mut rewritten, self.table, &self.options);
      report.rewritten = true;
    }
    if self.options.is_controller_file(&unit.path) {
      let _pass = debug_span!("controller_pass").entered();
      report.skipped_methods = controller_class::visit(&mut rewritten, self.table, &self.options);
      report.rewritten = true;
    }
    if !report.rewritten {
      debug!("no pass applies");
      return (rewritten, report);
    }
    ensure_openapi_import(&mut rewritten);
    (rewritten, report)
  }
}

/// A whole program as handed over by the front end: the shared type table
/// plus every unit to rewrite.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Project {
  #[serde(default)]
  pub types: ProgramTypes,
  #[serde(default)]
  pub units: Vec<SourceUnit>,
}

impl Project {
  pub fn from_json(json: &str) -> serde_json::Result<Project> {
    serde_json::from_str(json)
  }

  /// Rewrites every unit in order, one unit at a time.
  pub fn transform(&self, options: PluginOptions) -> Vec<(SourceUnit, TransformReport)> {
    let plugin = Plugin::new(&self.types, options);
    self
      .units
      .iter()
      .map(|unit| plugin.transform_with_report(unit))
      .collect()
  }
}

fn is_openapi_import(stmt: &Stmt) -> bool {
  match stmt {
    Stmt::Import(import) => {
      import.stx.module == OPENAPI_PACKAGE_NAME
        && !import.stx.type_only
        && matches!(&import.stx.names, ImportNames::Namespace(alias) if alias == OPENAPI_NAMESPACE)
    }
    _ => false,
  }
}

/// Prepends `import * as openapi from "@nestjs/swagger";` unless present.
fn ensure_openapi_import(unit: &mut SourceUnit) {
  if unit.body.iter().any(|stmt| is_openapi_import(&stmt.stx)) {
    return;
  }
  let import = Node::new(Loc::default(), ImportStmt {
    type_only: false,
    names: ImportNames::Namespace(OPENAPI_NAMESPACE.to_string()),
    module: OPENAPI_PACKAGE_NAME.to_string(),
  })
  .wrap(Stmt::from);
  unit.body.insert(0, import);
}
