mod common;

use apidoc_ts::ast::class::ClassDecl;
use apidoc_ts::ast::node::Node;
use apidoc_ts::ast::stmt::{ImportNames, ImportStmt, Stmt};
use apidoc_ts::ast::type_expr::KeywordType;
use apidoc_ts::emit::emit_stmt;
use apidoc_ts::loc::Loc;
use apidoc_ts::{Plugin, PluginOptions, ProgramTypes, Project};
use common::*;

fn openapi_import() -> Node<Stmt> {
  Node::new(Loc::default(), ImportStmt {
    type_only: false,
    names: ImportNames::Namespace("openapi".to_string()),
    module: "@nestjs/swagger".to_string(),
  })
  .wrap(Stmt::from)
}

fn dto_class() -> Node<ClassDecl> {
  class("PageDto", vec![prop("page", Some(kw(KeywordType::Number))).build()])
}

#[test]
fn routes_by_file_name_and_adds_one_import() {
  let types = ProgramTypes::new();
  let plugin = Plugin::new(&types, PluginOptions::default());

  let (rewritten, report) = plugin.transform_with_report(&unit("src/page.dto.ts", vec![dto_class()]));
  assert!(report.rewritten);
  assert_eq!(
    emit_stmt(&rewritten.body[0]),
    "import * as openapi from \"@nestjs/swagger\";\n"
  );
  assert_eq!(
    factory_text(find_class(&rewritten, "PageDto")),
    "{ page: { required: true, type: () => Number } }"
  );

  // Already imported: nothing is added.
  let mut source = unit("src/page.entity.ts", vec![dto_class()]);
  source.body.insert(0, openapi_import());
  let again = plugin.transform(&source);
  assert_eq!(again.body.len(), 2);

  let service = unit("src/page.service.ts", vec![dto_class()]);
  let (untouched, report) = plugin.transform_with_report(&service);
  assert!(!report.rewritten);
  assert_eq!(untouched, service);
}

#[test]
fn custom_suffixes() {
  let types = ProgramTypes::new();
  let options = PluginOptions {
    dto_file_name_suffix: vec![".model.ts".to_string()],
    ..PluginOptions::default()
  };
  let plugin = Plugin::new(&types, options);
  assert!(!plugin.transform_with_report(&unit("src/page.dto.ts", vec![dto_class()])).1.rewritten);
  let rewritten = plugin.transform(&unit("src/page.model.ts", vec![dto_class()]));
  assert_eq!(
    factory_text(find_class(&rewritten, "PageDto")),
    "{ page: { required: true, type: () => Number } }"
  );
}

#[test]
fn report_counts_skipped_declarations() {
  let types = ProgramTypes::new();
  let plugin = Plugin::new(&types, PluginOptions::default());
  let source = unit("src/page.controller.ts", vec![class("PageController", vec![
    method("list", vec![deco("ApiResponse", vec![id("shared")])], None, None),
    method("get", vec![deco("Get", Vec::new())], None, None),
  ])]);
  let (_, report) = plugin.transform_with_report(&source);
  assert_eq!(report.skipped_methods, 1);
  assert_eq!(report.skipped_fields, 0);
}

#[test]
fn project_from_json() {
  let json = r#"{
    "types": {
      "files": {
        "src/a.dto.ts": { "inferred": { "A.count": { "$t": "Keyword", "keyword": "number" } } }
      }
    },
    "units": [
      {
        "path": "src/a.dto.ts",
        "body": [
          {
            "$t": "Class",
            "name": "A",
            "members": [
              {
                "key": { "$t": "Ident", "v": "count" },
                "val": { "$t": "Prop", "initializer": { "$t": "LitNum", "value": 0 } }
              }
            ]
          }
        ]
      },
      { "path": "src/a.service.ts" }
    ]
  }"#;
  let project = Project::from_json(json).unwrap();
  let results = project.transform(PluginOptions::default());
  assert_eq!(results.len(), 2);
  assert_eq!(
    factory_text(find_class(&results[0].0, "A")),
    "{ count: { required: true, type: () => Number, default: 0 } }"
  );
  assert!(!results[1].1.rewritten);
}
