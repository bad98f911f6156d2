//! Inspection helpers for decorator lists.

use crate::ast::class::Decorator;
use crate::ast::expr::{Expr, LitObjExpr, ObjMember, PropKey};
use crate::ast::node::Node;
use crate::error::{InspectError, InspectResult};
use crate::loc::Loc;

/// Namespace the synthesized decorators are reached through.
pub const OPENAPI_NAMESPACE: &str = "openapi";
pub const OPENAPI_PACKAGE_NAME: &str = "@nestjs/swagger";

/// `Name` for `@Name(...)`, or the whole expression of a bare `@Name`.
pub fn decorator_callee(decorator: &Decorator) -> &Node<Expr> {
  match decorator.expression.stx.as_ref() {
    Expr::Call(call) => &call.stx.callee,
    _ => &decorator.expression,
  }
}

/// `Name` for `@Name`, `@Name(...)`, and `@ns.Name(...)`.
pub fn decorator_name(decorator: &Decorator) -> Option<&str> {
  match decorator_callee(decorator).stx.as_ref() {
    Expr::Id(id) => Some(id.stx.name.as_str()),
    Expr::Member(member) => Some(member.stx.property.as_str()),
    _ => None,
  }
}

pub fn find_decorator<'a>(
  decorators: &'a [Node<Decorator>],
  names: &[&str],
) -> Option<&'a Node<Decorator>> {
  decorators
    .iter()
    .find(|d| decorator_name(&d.stx).is_some_and(|name| names.contains(&name)))
}

pub fn has_decorator(decorators: &[Node<Decorator>], name: &str) -> bool {
  find_decorator(decorators, &[name]).is_some()
}

/// Call arguments; empty for a bare `@Name`.
pub fn decorator_arguments(decorator: &Decorator) -> &[Node<Expr>] {
  match decorator.expression.stx.as_ref() {
    Expr::Call(call) => &call.stx.arguments,
    _ => &[],
  }
}

pub fn first_argument(decorator: &Decorator) -> Option<&Node<Expr>> {
  decorator_arguments(decorator).first()
}

/// The object literal passed as first argument, if any argument was passed.
///
/// Anything else in that position (a variable, a call) cannot be merged
/// with and is reported as an error.
pub fn options_argument(decorator: &Decorator) -> InspectResult<Option<&Node<LitObjExpr>>> {
  let Some(arg) = first_argument(decorator) else {
    return Ok(None);
  };
  let name = || decorator_name(decorator).unwrap_or("<anonymous>").to_string();
  let obj = arg
    .as_object()
    .ok_or_else(|| InspectError::NonLiteralOptions { decorator: name() })?;
  if obj
    .stx
    .members
    .iter()
    .any(|m| matches!(m.stx.key, PropKey::Computed(_)))
  {
    return Err(InspectError::ComputedOptionKey { decorator: name() });
  }
  Ok(Some(obj))
}

/// Properties of the options object of the first decorator named in `names`.
pub fn existing_properties(
  decorators: &[Node<Decorator>],
  names: &[&str],
) -> InspectResult<Vec<Node<ObjMember>>> {
  let Some(decorator) = find_decorator(decorators, names) else {
    return Ok(Vec::new());
  };
  Ok(
    options_argument(&decorator.stx)?
      .map(|obj| obj.stx.members.clone())
      .unwrap_or_default(),
  )
}

pub fn has_property_key(properties: &[Node<ObjMember>], key: &str) -> bool {
  properties.iter().any(|p| p.stx.key.is_named(key))
}

/// `openapi.Name`
pub fn openapi_callee(loc: Loc, name: &str) -> Node<Expr> {
  Node::<Expr>::member(loc, Node::<Expr>::id(loc, OPENAPI_NAMESPACE), name)
}
