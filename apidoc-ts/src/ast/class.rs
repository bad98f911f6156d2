use super::expr::{Expr, PropKey};
use super::node::Node;
use super::stmt::Stmt;
use super::type_expr::TypeExpr;
use derive_more::derive::From;
use derive_visitor::{Drive, DriveMut};
use serde::{Deserialize, Serialize};

/// `@expression`; the expression is usually a call such as `@Get(":id")`.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct Decorator {
  pub expression: Node<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
  Line,
  Block,
}

/// A comment as written, delimiters included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub kind: CommentKind,
  pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
  Public,
  Private,
  Protected,
}

impl Accessibility {
  pub fn as_str(self) -> &'static str {
    match self {
      Accessibility::Public => "public",
      Accessibility::Private => "private",
      Accessibility::Protected => "protected",
    }
  }
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassDecl {
  #[serde(default)]
  pub decorators: Vec<Node<Decorator>>,
  #[drive(skip)]
  #[serde(default)]
  pub export: bool,
  #[drive(skip)]
  #[serde(default)]
  pub export_default: bool,
  #[drive(skip)]
  #[serde(default)]
  pub abstract_: bool,
  // Can only be omitted in a default export.
  #[drive(skip)]
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub extends: Option<Node<Expr>>,
  #[drive(skip)]
  #[serde(default)]
  pub leading_comments: Vec<Comment>,
  #[serde(default)]
  pub members: Vec<Node<ClassMember>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassMember {
  #[serde(default)]
  pub decorators: Vec<Node<Decorator>>,
  pub key: PropKey,
  #[drive(skip)]
  #[serde(default)]
  pub static_: bool,
  #[drive(skip)]
  #[serde(default)]
  pub readonly: bool,
  #[drive(skip)]
  #[serde(default)]
  pub optional: bool,
  #[drive(skip)]
  #[serde(default)]
  pub accessibility: Option<Accessibility>,
  #[drive(skip)]
  #[serde(default)]
  pub leading_comments: Vec<Comment>,
  pub val: ClassVal,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum ClassVal {
  Prop(Node<ClassProp>),
  Method(Node<ClassMethod>),
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassProp {
  #[serde(default)]
  pub type_annotation: Option<Node<TypeExpr>>,
  #[serde(default)]
  pub initializer: Option<Node<Expr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct Param {
  #[serde(default)]
  pub decorators: Vec<Node<Decorator>>,
  #[drive(skip)]
  pub name: String,
  #[drive(skip)]
  #[serde(default)]
  pub optional: bool,
  #[serde(default)]
  pub type_annotation: Option<Node<TypeExpr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ClassMethod {
  #[drive(skip)]
  #[serde(default)]
  pub async_: bool,
  #[serde(default)]
  pub parameters: Vec<Node<Param>>,
  #[serde(default)]
  pub return_type: Option<Node<TypeExpr>>,
  // None for abstract methods and overload signatures.
  #[serde(default)]
  pub body: Option<Vec<Node<Stmt>>>,
}

impl ClassMember {
  pub fn as_prop(&self) -> Option<&Node<ClassProp>> {
    match &self.val {
      ClassVal::Prop(prop) => Some(prop),
      ClassVal::Method(_) => None,
    }
  }

  pub fn as_method(&self) -> Option<&Node<ClassMethod>> {
    match &self.val {
      ClassVal::Method(method) => Some(method),
      ClassVal::Prop(_) => None,
    }
  }
}
