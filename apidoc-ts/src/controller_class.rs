//! Response and operation metadata for controller route handlers.

use crate::ast::class::{ClassDecl, ClassMember, ClassMethod, ClassVal, Decorator};
use crate::ast::expr::{Expr, ObjMember};
use crate::ast::node::Node;
use crate::ast::SourceUnit;
use crate::comments::main_comment;
use crate::decorators::{
  decorator_callee, decorator_name, existing_properties, find_decorator, first_argument,
  has_property_key, openapi_callee, options_argument,
};
use crate::error::InspectResult;
use crate::loc::Loc;
use crate::metadata::MetadataRecord;
use crate::options::PluginOptions;
use crate::resolve::type_reference;
use crate::types::TypeTable;
use derive_visitor::{DriveMut, VisitorMut};
use tracing::debug;

pub const API_OPERATION: &str = "ApiOperation";
pub const API_RESPONSE: &str = "ApiResponse";
pub const HTTP_CODE: &str = "HttpCode";
pub const POST: &str = "Post";

const STATUS_CREATED: f64 = 201.0;
const STATUS_OK: f64 = 200.0;

struct OperationSynthesizer<'a> {
  table: &'a dyn TypeTable,
  options: &'a PluginOptions,
  host: &'a str,
}

impl OperationSynthesizer<'_> {
  fn status(&self, decorators: &[Node<Decorator>], loc: Loc) -> Node<Expr> {
    let explicit = find_decorator(decorators, &[HTTP_CODE]).and_then(|d| first_argument(&d.stx));
    if let Some(code) = explicit {
      return code.clone();
    }
    let status = if find_decorator(decorators, &[POST]).is_some() {
      STATUS_CREATED
    } else {
      STATUS_OK
    };
    Node::<Expr>::number(loc, status)
  }

  fn response_type(
    &self,
    class: Option<&str>,
    member: &ClassMember,
    method: &ClassMethod,
  ) -> Option<String> {
    let typ = match &method.return_type {
      Some(annotation) => self.table.resolve_type(self.host, &annotation.stx)?,
      None => {
        let name = member.key.static_name()?;
        self.table.member_type(self.host, class?, &name)?
      }
    };
    type_reference(&typ, self.host)
  }

  /// `ApiOperation` carrying the leading comment under the summary key, or
  /// `None` when the method keeps whatever it already has.
  fn operation(&self, member: &ClassMember, loc: Loc) -> InspectResult<Option<Node<Decorator>>> {
    if !self.options.introspect_comments {
      return Ok(None);
    }
    let key = self.options.controller_key_of_comment.as_str();
    let existing = find_decorator(&member.decorators, &[API_OPERATION]);
    let existing_props = match existing {
      Some(decorator) => options_argument(&decorator.stx)?
        .map(|obj| obj.stx.members.clone())
        .unwrap_or_default(),
      None => Vec::new(),
    };
    if has_property_key(&existing_props, key) {
      return Ok(None);
    }
    let Some(summary) = main_comment(&member.leading_comments) else {
      return Ok(None);
    };
    let mut properties = vec![Node::<ObjMember>::prop(
      loc,
      key,
      Node::<Expr>::string(loc, summary),
    )];
    properties.extend(existing_props);
    // A replaced decorator keeps the name it was imported under.
    let callee = existing
      .map(|d| decorator_callee(&d.stx).clone())
      .unwrap_or_else(|| openapi_callee(loc, API_OPERATION));
    Ok(Some(decorator_call(loc, callee, properties)))
  }

  fn response(
    &self,
    class: Option<&str>,
    member: &ClassMember,
    method: &ClassMethod,
    loc: Loc,
  ) -> InspectResult<Node<Decorator>> {
    let existing = existing_properties(&member.decorators, &[API_RESPONSE])?;
    let mut record = MetadataRecord::new(loc, existing);
    record.insert("status", self.status(&member.decorators, loc));
    if let Some(reference) = self.response_type(class, member, method) {
      record.insert("type", Node::<Expr>::verbatim(loc, reference));
    }
    Ok(decorator_call(
      loc,
      openapi_callee(loc, API_RESPONSE),
      record.into_properties(),
    ))
  }

  /// The rewritten decorator list for one route handler.
  fn decorators(
    &self,
    class: Option<&str>,
    member: &ClassMember,
    method: &ClassMethod,
    loc: Loc,
  ) -> InspectResult<Vec<Node<Decorator>>> {
    let operation = self.operation(member, loc)?;
    let response = self.response(class, member, method, loc)?;
    let replaced_operation = operation.is_some();
    let mut decorators = Vec::with_capacity(member.decorators.len() + 2);
    decorators.extend(operation);
    decorators.extend(
      member
        .decorators
        .iter()
        .filter(|d| match decorator_name(&d.stx) {
          Some(API_RESPONSE) => false,
          Some(API_OPERATION) => !replaced_operation,
          _ => true,
        })
        .cloned(),
    );
    decorators.push(response);
    Ok(decorators)
  }
}

fn decorator_call(loc: Loc, callee: Node<Expr>, properties: Vec<Node<ObjMember>>) -> Node<Decorator> {
  Node::new(loc, Decorator {
    expression: Node::<Expr>::call(loc, callee, vec![Node::<Expr>::object(loc, properties)]),
  })
}

type ClassDeclNode = Node<ClassDecl>;
type ClassMemberNode = Node<ClassMember>;

#[derive(VisitorMut)]
#[visitor(ClassDeclNode(enter, exit), ClassMemberNode(enter))]
struct ControllerClassVisitor<'a> {
  synth: OperationSynthesizer<'a>,
  classes: Vec<Option<String>>,
  skipped: usize,
}

impl ControllerClassVisitor<'_> {
  fn enter_class_decl_node(&mut self, node: &mut ClassDeclNode) {
    self.classes.push(node.stx.name.clone());
  }

  fn exit_class_decl_node(&mut self, _node: &mut ClassDeclNode) {
    self.classes.pop();
  }

  fn enter_class_member_node(&mut self, node: &mut ClassMemberNode) {
    let loc = node.loc;
    let member = &node.stx;
    let ClassVal::Method(method) = &member.val else {
      return;
    };
    if member.decorators.is_empty() {
      return;
    }
    let class = self.classes.last().cloned().flatten();
    let method_name = member.key.static_name().unwrap_or_default();
    let result = self
      .synth
      .decorators(class.as_deref(), member, &method.stx, loc);
    match result {
      Ok(decorators) => node.stx.decorators = decorators,
      Err(err) => {
        debug!(
          class = class.as_deref().unwrap_or("<anonymous>"),
          method = %method_name,
          error = %err,
          "left route handler undescribed"
        );
        self.skipped += 1;
      }
    }
  }
}

/// Rewrites the decorators of every decorated method in `unit`. Returns the
/// number of methods that could not be inspected.
pub(crate) fn visit(unit: &mut SourceUnit, table: &dyn TypeTable, options: &PluginOptions) -> usize {
  let host = unit.path.clone();
  let mut visitor = ControllerClassVisitor {
    synth: OperationSynthesizer {
      table,
      options,
      host: &host,
    },
    classes: Vec::new(),
    skipped: 0,
  };
  unit.drive_mut(&mut visitor);
  visitor.skipped
}

/// Rewrites the route handlers of `unit`, leaving `unit` untouched.
pub fn rewrite_controller_classes(
  unit: &SourceUnit,
  table: &dyn TypeTable,
  options: &PluginOptions,
) -> SourceUnit {
  let mut rewritten = unit.clone();
  visit(&mut rewritten, table, options);
  rewritten
}
