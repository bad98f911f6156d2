use crate::ast::expr::{Expr, ObjMember};
use crate::ast::node::Node;
use crate::decorators::has_property_key;
use crate::loc::Loc;
use serde_json::Value;

/// `key: value` properties describing one field or one response.
///
/// Seeded with the hand-written properties of an existing decorator; a key
/// that is already present is never written again, so hand-written values
/// always win over synthesized ones.
#[derive(Clone, Debug)]
pub struct MetadataRecord {
  loc: Loc,
  properties: Vec<Node<ObjMember>>,
}

impl MetadataRecord {
  pub fn new(loc: Loc, existing: Vec<Node<ObjMember>>) -> MetadataRecord {
    MetadataRecord {
      loc,
      properties: existing,
    }
  }

  pub fn loc(&self) -> Loc {
    self.loc
  }

  pub fn has(&self, key: &str) -> bool {
    has_property_key(&self.properties, key)
  }

  /// Returns false (and drops `value`) if `key` is already present.
  pub fn insert(&mut self, key: &str, value: Node<Expr>) -> bool {
    if self.has(key) {
      return false;
    }
    self
      .properties
      .push(Node::<ObjMember>::prop(self.loc, key, value));
    true
  }

  pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
    self.properties.iter().filter_map(|p| p.stx.key.static_name())
  }

  pub fn into_properties(self) -> Vec<Node<ObjMember>> {
    self.properties
  }

  pub fn into_expr(self) -> Node<Expr> {
    Node::<Expr>::object(self.loc, self.properties)
  }
}

/// Builds a literal expression from a JSON value, recursing into arrays and objects.
pub fn literal_from_value(loc: Loc, value: &Value) -> Node<Expr> {
  match value {
    Value::Null => Node::<Expr>::null(loc),
    Value::Bool(b) => Node::<Expr>::boolean(loc, *b),
    Value::Number(n) => Node::<Expr>::number(loc, n.as_f64().unwrap_or(f64::NAN)),
    Value::String(s) => Node::<Expr>::string(loc, s.clone()),
    Value::Array(items) => Node::<Expr>::array(
      loc,
      items.iter().map(|item| literal_from_value(loc, item)).collect(),
    ),
    Value::Object(map) => Node::<Expr>::object(
      loc,
      map
        .iter()
        .map(|(k, v)| Node::<ObjMember>::prop(loc, k.clone(), literal_from_value(loc, v)))
        .collect(),
    ),
  }
}
