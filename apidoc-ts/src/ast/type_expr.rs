use super::expr::PropKey;
use super::node::Node;
use derive_more::derive::From;
use derive_visitor::{Drive, DriveMut};
use serde::{Deserialize, Serialize};

/// Written type annotations.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum TypeExpr {
  Keyword(Node<TypeKeyword>),
  Reference(Node<TypeReference>),
  Array(Node<TypeArray>),
  Union(Node<TypeUnion>),
  ObjectLiteral(Node<TypeObjectLiteral>),
  Literal(Node<TypeLiteral>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordType {
  Any,
  BigInt,
  Boolean,
  Never,
  Null,
  Number,
  Object,
  String,
  Symbol,
  Undefined,
  Unknown,
  Void,
}

impl KeywordType {
  pub fn as_str(self) -> &'static str {
    match self {
      KeywordType::Any => "any",
      KeywordType::BigInt => "bigint",
      KeywordType::Boolean => "boolean",
      KeywordType::Never => "never",
      KeywordType::Null => "null",
      KeywordType::Number => "number",
      KeywordType::Object => "object",
      KeywordType::String => "string",
      KeywordType::Symbol => "symbol",
      KeywordType::Undefined => "undefined",
      KeywordType::Unknown => "unknown",
      KeywordType::Void => "void",
    }
  }
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeKeyword {
  #[drive(skip)]
  pub keyword: KeywordType,
}

/// `Name` or `ns.Name`, optionally with type arguments.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeReference {
  #[drive(skip)]
  pub name: String,
  #[serde(default)]
  pub type_arguments: Vec<Node<TypeExpr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeArray {
  pub element: Node<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeUnion {
  pub types: Vec<Node<TypeExpr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypePropertySignature {
  pub key: PropKey,
  #[drive(skip)]
  #[serde(default)]
  pub optional: bool,
  #[serde(default)]
  pub type_annotation: Option<Node<TypeExpr>>,
}

/// Inline structural type: `{ a: string; b?: number }`.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeObjectLiteral {
  #[serde(default)]
  pub members: Vec<Node<TypePropertySignature>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t", content = "v")]
pub enum LiteralValue {
  Str(#[drive(skip)] String),
  Num(#[drive(skip)] f64),
  Bool(#[drive(skip)] bool),
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct TypeLiteral {
  pub value: LiteralValue,
}

impl TypeExpr {
  pub fn is_null(&self) -> bool {
    matches!(self, TypeExpr::Keyword(k) if k.stx.keyword == KeywordType::Null)
  }
}
