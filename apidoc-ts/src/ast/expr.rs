use super::node::Node;
use super::type_expr::TypeExpr;
use crate::loc::Loc;
use derive_more::derive::From;
use derive_visitor::{Drive, DriveMut};
use serde::{Deserialize, Serialize};

/// Expressions that can appear in decorator arguments, property
/// initializers and synthesized metadata.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum Expr {
  Id(Node<IdExpr>),
  Member(Node<MemberExpr>),
  Call(Node<CallExpr>),
  New(Node<NewExpr>),
  Unary(Node<UnaryExpr>),
  LitStr(Node<LitStrExpr>),
  LitNum(Node<LitNumExpr>),
  LitBool(Node<LitBoolExpr>),
  LitNull(Node<LitNullExpr>),
  LitObj(Node<LitObjExpr>),
  LitArr(Node<LitArrExpr>),
  ArrowFunc(Node<ArrowFuncExpr>),
  As(Node<AsExpr>),
  // Pre-rendered expression text, emitted as-is.
  Verbatim(Node<VerbatimExpr>),
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct IdExpr {
  #[drive(skip)]
  pub name: String,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct MemberExpr {
  pub object: Node<Expr>,
  #[drive(skip)]
  pub property: String,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct CallExpr {
  pub callee: Node<Expr>,
  #[serde(default)]
  pub arguments: Vec<Node<Expr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct NewExpr {
  pub callee: Node<Expr>,
  #[serde(default)]
  pub arguments: Vec<Node<Expr>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
  #[serde(rename = "-")]
  Minus,
  #[serde(rename = "+")]
  Plus,
  #[serde(rename = "!")]
  Not,
  #[serde(rename = "typeof")]
  Typeof,
}

impl UnaryOperator {
  pub fn as_str(self) -> &'static str {
    match self {
      UnaryOperator::Minus => "-",
      UnaryOperator::Plus => "+",
      UnaryOperator::Not => "!",
      UnaryOperator::Typeof => "typeof",
    }
  }
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct UnaryExpr {
  #[drive(skip)]
  pub operator: UnaryOperator,
  pub argument: Node<Expr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitStrExpr {
  #[drive(skip)]
  pub value: String,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitNumExpr {
  #[drive(skip)]
  pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitBoolExpr {
  #[drive(skip)]
  pub value: bool,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitNullExpr {}

/// Property name of a class member, type member or object literal member.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
#[serde(tag = "$t", content = "v")]
pub enum PropKey {
  Ident(#[drive(skip)] String),
  Str(#[drive(skip)] String),
  Num(#[drive(skip)] f64),
  // `#name`; only valid on class members.
  Private(#[drive(skip)] String),
  Computed(Node<Expr>),
}

impl PropKey {
  /// The statically known name, if any. Computed keys have none.
  pub fn static_name(&self) -> Option<String> {
    match self {
      PropKey::Ident(name) | PropKey::Str(name) => Some(name.clone()),
      PropKey::Num(value) => Some(crate::emit::format_number(*value)),
      PropKey::Private(name) => Some(format!("#{name}")),
      PropKey::Computed(_) => None,
    }
  }

  /// Whether this key names `name` as written in source.
  pub fn is_named(&self, name: &str) -> bool {
    match self {
      PropKey::Ident(key) | PropKey::Str(key) => key == name,
      _ => false,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ObjMember {
  pub key: PropKey,
  pub value: Node<Expr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitObjExpr {
  #[serde(default)]
  pub members: Vec<Node<ObjMember>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitArrExpr {
  #[serde(default)]
  pub elements: Vec<Node<Expr>>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct ArrowFuncExpr {
  #[drive(skip)]
  #[serde(default)]
  pub parameters: Vec<String>,
  pub body: Node<Expr>,
}

/// `expression as Type`.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct AsExpr {
  pub expression: Node<Expr>,
  pub type_annotation: Node<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct VerbatimExpr {
  #[drive(skip)]
  pub text: String,
}

// Constructors for synthesized expressions.
impl Node<Expr> {
  pub fn id(loc: Loc, name: impl Into<String>) -> Self {
    Node::new(loc, IdExpr { name: name.into() }).wrap(Expr::from)
  }

  pub fn string(loc: Loc, value: impl Into<String>) -> Self {
    Node::new(loc, LitStrExpr {
      value: value.into(),
    })
    .wrap(Expr::from)
  }

  pub fn number(loc: Loc, value: f64) -> Self {
    Node::new(loc, LitNumExpr { value }).wrap(Expr::from)
  }

  pub fn boolean(loc: Loc, value: bool) -> Self {
    Node::new(loc, LitBoolExpr { value }).wrap(Expr::from)
  }

  pub fn null(loc: Loc) -> Self {
    Node::new(loc, LitNullExpr {}).wrap(Expr::from)
  }

  pub fn verbatim(loc: Loc, text: impl Into<String>) -> Self {
    Node::new(loc, VerbatimExpr { text: text.into() }).wrap(Expr::from)
  }

  pub fn member(loc: Loc, object: Node<Expr>, property: impl Into<String>) -> Self {
    Node::new(loc, MemberExpr {
      object,
      property: property.into(),
    })
    .wrap(Expr::from)
  }

  pub fn call(loc: Loc, callee: Node<Expr>, arguments: Vec<Node<Expr>>) -> Self {
    Node::new(loc, CallExpr { callee, arguments }).wrap(Expr::from)
  }

  pub fn object(loc: Loc, members: Vec<Node<ObjMember>>) -> Self {
    Node::new(loc, LitObjExpr { members }).wrap(Expr::from)
  }

  pub fn array(loc: Loc, elements: Vec<Node<Expr>>) -> Self {
    Node::new(loc, LitArrExpr { elements }).wrap(Expr::from)
  }

  /// `() => body`
  pub fn thunk(loc: Loc, body: Node<Expr>) -> Self {
    Node::new(loc, ArrowFuncExpr {
      parameters: Vec::new(),
      body,
    })
    .wrap(Expr::from)
  }

  pub fn as_object(&self) -> Option<&Node<LitObjExpr>> {
    match self.stx.as_ref() {
      Expr::LitObj(obj) => Some(obj),
      _ => None,
    }
  }
}

impl Node<ObjMember> {
  pub fn prop(loc: Loc, key: impl Into<String>, value: Node<Expr>) -> Self {
    Node::new(loc, ObjMember {
      key: PropKey::from_name(key.into()),
      value,
    })
  }
}

impl PropKey {
  /// Identifier key when `name` is a valid identifier, string key otherwise.
  pub fn from_name(name: String) -> PropKey {
    if crate::emit::is_identifier_name(&name) {
      PropKey::Ident(name)
    } else {
      PropKey::Str(name)
    }
  }
}

impl LitObjExpr {
  pub fn get(&self, key: &str) -> Option<&Node<Expr>> {
    self
      .members
      .iter()
      .find(|m| m.stx.key.is_named(key))
      .map(|m| &m.stx.value)
  }

  pub fn has_key(&self, key: &str) -> bool {
    self.members.iter().any(|m| m.stx.key.is_named(key))
  }
}
