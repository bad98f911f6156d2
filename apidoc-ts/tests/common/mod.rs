#![allow(dead_code)]

use apidoc_ts::ast::class::{
  ClassDecl, ClassMember, ClassMethod, ClassProp, ClassVal, Comment, CommentKind, Decorator,
};
use apidoc_ts::ast::expr::{AsExpr, Expr, ObjMember, PropKey};
use apidoc_ts::ast::node::Node;
use apidoc_ts::ast::stmt::Stmt;
use apidoc_ts::ast::type_expr::{
  KeywordType, TypeArray, TypeExpr, TypeKeyword, TypeObjectLiteral, TypePropertySignature,
  TypeReference, TypeUnion,
};
use apidoc_ts::ast::SourceUnit;
use apidoc_ts::emit::emit_expr;
use apidoc_ts::loc::Loc;
use apidoc_ts::model_class::METADATA_FACTORY_NAME;

pub fn loc() -> Loc {
  Loc::default()
}

pub fn kw(keyword: KeywordType) -> Node<TypeExpr> {
  Node::new(loc(), TypeKeyword { keyword }).wrap(TypeExpr::from)
}

pub fn tref(name: &str) -> Node<TypeExpr> {
  tref_args(name, Vec::new())
}

pub fn tref_args(name: &str, type_arguments: Vec<Node<TypeExpr>>) -> Node<TypeExpr> {
  Node::new(loc(), TypeReference {
    name: name.to_string(),
    type_arguments,
  })
  .wrap(TypeExpr::from)
}

pub fn tarray(element: Node<TypeExpr>) -> Node<TypeExpr> {
  Node::new(loc(), TypeArray { element }).wrap(TypeExpr::from)
}

pub fn tunion(types: Vec<Node<TypeExpr>>) -> Node<TypeExpr> {
  Node::new(loc(), TypeUnion { types }).wrap(TypeExpr::from)
}

/// `{ name: type; name?: type }`
pub fn tobject(members: Vec<(&str, bool, Node<TypeExpr>)>) -> Node<TypeExpr> {
  let members = members
    .into_iter()
    .map(|(name, optional, typ)| {
      Node::new(loc(), TypePropertySignature {
        key: PropKey::Ident(name.to_string()),
        optional,
        type_annotation: Some(typ),
      })
    })
    .collect();
  Node::new(loc(), TypeObjectLiteral { members }).wrap(TypeExpr::from)
}

pub fn num(value: f64) -> Node<Expr> {
  Node::<Expr>::number(loc(), value)
}

pub fn string(value: &str) -> Node<Expr> {
  Node::<Expr>::string(loc(), value)
}

pub fn id(name: &str) -> Node<Expr> {
  Node::<Expr>::id(loc(), name)
}

pub fn cast(expression: Node<Expr>, type_annotation: Node<TypeExpr>) -> Node<Expr> {
  Node::new(loc(), AsExpr {
    expression,
    type_annotation,
  })
  .wrap(Expr::from)
}

pub fn object(props: Vec<(&str, Node<Expr>)>) -> Node<Expr> {
  Node::<Expr>::object(
    loc(),
    props
      .into_iter()
      .map(|(key, value)| Node::<ObjMember>::prop(loc(), key, value))
      .collect(),
  )
}

/// `@name(args...)`
pub fn deco(name: &str, arguments: Vec<Node<Expr>>) -> Node<Decorator> {
  Node::new(loc(), Decorator {
    expression: Node::<Expr>::call(loc(), id(name), arguments),
  })
}

/// A leading comment; `// ...` text is a line comment, anything else a block.
pub fn doc(text: &str) -> Comment {
  let kind = if text.trim_start().starts_with("//") {
    CommentKind::Line
  } else {
    CommentKind::Block
  };
  Comment {
    kind,
    text: text.to_string(),
  }
}

/// Builder for a property member.
pub struct PropBuilder {
  member: ClassMember,
  prop: ClassProp,
}

pub fn prop(name: &str, typ: Option<Node<TypeExpr>>) -> PropBuilder {
  PropBuilder {
    member: ClassMember {
      decorators: Vec::new(),
      key: PropKey::Ident(name.to_string()),
      static_: false,
      readonly: false,
      optional: false,
      accessibility: None,
      leading_comments: Vec::new(),
      val: ClassVal::Prop(Node::new(loc(), ClassProp {
        type_annotation: None,
        initializer: None,
      })),
    },
    prop: ClassProp {
      type_annotation: typ,
      initializer: None,
    },
  }
}

impl PropBuilder {
  pub fn optional(mut self) -> Self {
    self.member.optional = true;
    self
  }

  pub fn static_(mut self) -> Self {
    self.member.static_ = true;
    self
  }

  pub fn key(mut self, key: PropKey) -> Self {
    self.member.key = key;
    self
  }

  pub fn init(mut self, initializer: Node<Expr>) -> Self {
    self.prop.initializer = Some(initializer);
    self
  }

  pub fn deco(mut self, decorator: Node<Decorator>) -> Self {
    self.member.decorators.push(decorator);
    self
  }

  pub fn doc(mut self, text: &str) -> Self {
    self.member.leading_comments.push(doc(text));
    self
  }

  pub fn build(self) -> Node<ClassMember> {
    let mut member = self.member;
    member.val = ClassVal::Prop(Node::new(loc(), self.prop));
    Node::new(loc(), member)
  }
}

pub fn method(
  name: &str,
  decorators: Vec<Node<Decorator>>,
  return_type: Option<Node<TypeExpr>>,
  comment: Option<&str>,
) -> Node<ClassMember> {
  Node::new(loc(), ClassMember {
    decorators,
    key: PropKey::Ident(name.to_string()),
    static_: false,
    readonly: false,
    optional: false,
    accessibility: None,
    leading_comments: comment.map(doc).into_iter().collect(),
    val: ClassVal::Method(Node::new(loc(), ClassMethod {
      async_: false,
      parameters: Vec::new(),
      return_type,
      body: Some(Vec::new()),
    })),
  })
}

pub fn class(name: &str, members: Vec<Node<ClassMember>>) -> Node<ClassDecl> {
  Node::new(loc(), ClassDecl {
    decorators: Vec::new(),
    export: true,
    export_default: false,
    abstract_: false,
    name: Some(name.to_string()),
    extends: None,
    leading_comments: Vec::new(),
    members,
  })
}

pub fn unit(path: &str, classes: Vec<Node<ClassDecl>>) -> SourceUnit {
  SourceUnit::new(path, classes.into_iter().map(|c| c.wrap(Stmt::from)).collect())
}

pub fn classes(unit: &SourceUnit) -> Vec<&ClassDecl> {
  unit
    .body
    .iter()
    .filter_map(|stmt| match stmt.stx.as_ref() {
      Stmt::Class(class) => Some(class.stx.as_ref()),
      _ => None,
    })
    .collect()
}

pub fn find_class<'u>(unit: &'u SourceUnit, name: &str) -> &'u ClassDecl {
  classes(unit)
    .into_iter()
    .find(|c| c.name.as_deref() == Some(name))
    .unwrap_or_else(|| panic!("class {name} not found"))
}

/// The object literal returned by the class's metadata factory, as text.
pub fn factory_text(class: &ClassDecl) -> String {
  let factories: Vec<_> = class
    .members
    .iter()
    .filter(|m| m.stx.key == PropKey::Ident(METADATA_FACTORY_NAME.to_string()))
    .collect();
  assert_eq!(factories.len(), 1, "expected exactly one factory");
  let factory = factories[0];
  assert!(factory.stx.static_);
  let body = factory
    .stx
    .as_method()
    .and_then(|m| m.stx.body.as_ref())
    .expect("factory has a body");
  match body[0].stx.as_ref() {
    Stmt::Return(ret) => match &ret.stx.value {
      Some(value) => emit_expr(value),
      None => panic!("factory returns nothing"),
    },
    other => panic!("unexpected factory body {other:?}"),
  }
}

/// Decorators of the named method, as text.
pub fn decorator_texts(class: &ClassDecl, method: &str) -> Vec<String> {
  let member = class
    .members
    .iter()
    .find(|m| m.stx.key == PropKey::Ident(method.to_string()))
    .unwrap_or_else(|| panic!("method {method} not found"));
  member
    .stx
    .decorators
    .iter()
    .map(|d| format!("@{}", emit_expr(&d.stx.expression)))
    .collect()
}
