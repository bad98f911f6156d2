use super::class::ClassDecl;
use super::expr::Expr;
use super::node::Node;
use derive_more::derive::From;
use derive_visitor::{Drive, DriveMut};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum Stmt {
  Import(Node<ImportStmt>),
  Class(Node<ClassDecl>),
  Enum(Node<EnumDecl>),
  Namespace(Node<NamespaceDecl>),
  Return(Node<ReturnStmt>),
  // Statements no pass looks into; printed back exactly as written.
  Verbatim(Node<VerbatimStmt>),
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ImportSpecifier {
  #[drive(skip)]
  pub imported: String,
  #[drive(skip)]
  #[serde(default)]
  pub local: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t", content = "v")]
pub enum ImportNames {
  // `import "module";`
  SideEffect,
  // `import * as alias from "module";`
  Namespace(#[drive(skip)] String),
  // `import Default, { a, b as c } from "module";`
  Named {
    #[drive(skip)]
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    specifiers: Vec<Node<ImportSpecifier>>,
  },
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ImportStmt {
  #[drive(skip)]
  #[serde(default)]
  pub type_only: bool,
  pub names: ImportNames,
  #[drive(skip)]
  pub module: String,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct EnumMember {
  #[drive(skip)]
  pub name: String,
  #[serde(default)]
  pub initializer: Option<Node<Expr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct EnumDecl {
  #[drive(skip)]
  #[serde(default)]
  pub export: bool,
  #[drive(skip)]
  #[serde(default)]
  pub const_: bool,
  #[drive(skip)]
  pub name: String,
  #[serde(default)]
  pub members: Vec<Node<EnumMember>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct NamespaceDecl {
  #[drive(skip)]
  #[serde(default)]
  pub export: bool,
  #[drive(skip)]
  pub name: String,
  #[serde(default)]
  pub body: Vec<Node<Stmt>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ReturnStmt {
  #[serde(default)]
  pub value: Option<Node<Expr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct VerbatimStmt {
  #[drive(skip)]
  pub text: String,
}
