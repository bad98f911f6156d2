//! Property metadata synthesis for model (DTO/entity) classes.
//!
//! Every class gains a static `_OPENAPI_METADATA_FACTORY()` method returning
//! one metadata record per eligible field:
//!
//! ```ts
//! class CreateUserDto {
//!   email: string;
//!   age?: number = 18;
//!   static _OPENAPI_METADATA_FACTORY() {
//!     return { email: { required: true, type: () => String }, age: { required: false, type: () => Number, default: 18 } };
//!   }
//! }
//! ```

use crate::ast::class::{ClassDecl, ClassMember, ClassMethod, ClassProp, ClassVal};
use crate::ast::expr::{Expr, ObjMember, PropKey};
use crate::ast::node::Node;
use crate::ast::stmt::{ReturnStmt, Stmt};
use crate::ast::type_expr::{TypeExpr, TypePropertySignature};
use crate::ast::SourceUnit;
use crate::comments::doc_comment;
use crate::decorators::{existing_properties, find_decorator, first_argument, has_decorator};
use crate::enums::unwrap_enum;
use crate::error::InspectResult;
use crate::loc::Loc;
use crate::metadata::{literal_from_value, MetadataRecord};
use crate::options::PluginOptions;
use crate::resolve::{declaration_reference, type_reference};
use crate::types::{Type, TypeTable};
use derive_visitor::{DriveMut, VisitorMut};
use tracing::debug;

pub const METADATA_FACTORY_NAME: &str = "_OPENAPI_METADATA_FACTORY";
pub const API_HIDE_PROPERTY: &str = "ApiHideProperty";
/// Decorators whose options object seeds a field's record.
pub const API_PROPERTY_DECORATORS: [&str; 3] =
  ["ApiProperty", "ApiPropertyOptional", "ApiResponseProperty"];

const VALIDATION_BOUNDS: [(&str, &str); 4] = [
  ("Min", "minimum"),
  ("Max", "maximum"),
  ("MinLength", "minLength"),
  ("MaxLength", "maxLength"),
];

/// The declaration a record is being built for.
struct FieldSite<'a> {
  class: &'a str,
  name: &'a str,
  optional: bool,
  annotation: Option<&'a Node<TypeExpr>>,
}

struct PropertySynthesizer<'a> {
  table: &'a dyn TypeTable,
  options: &'a PluginOptions,
  host: &'a str,
}

impl PropertySynthesizer<'_> {
  fn field_type(&self, site: &FieldSite) -> Option<Type> {
    let typ = match site.annotation {
      Some(annotation) => self.table.resolve_type(self.host, &annotation.stx),
      None => self.table.member_type(self.host, site.class, site.name),
    }?;
    Some(if site.optional { typ.into_optional() } else { typ })
  }

  fn property_record(
    &self,
    site: &FieldSite,
    member: &ClassMember,
    prop: &ClassProp,
    loc: Loc,
  ) -> InspectResult<Node<Expr>> {
    let existing = existing_properties(&member.decorators, &API_PROPERTY_DECORATORS)?;
    let mut record = MetadataRecord::new(loc, existing);
    let resolved = self.field_type(site);

    record.insert("required", Node::<Expr>::boolean(loc, !site.optional));
    self.add_type(&mut record, site);
    if self.options.introspect_comments {
      self.add_description_and_examples(&mut record, member, resolved.as_ref());
    }
    if let Some(initializer) = &prop.initializer {
      record.insert("default", default_value(initializer));
    }
    if let Some(resolved) = &resolved {
      self.add_enum(&mut record, resolved);
    }
    if self.options.class_validator_shim {
      add_validation_bounds(&mut record, member);
    }
    Ok(record.into_expr())
  }

  /// Record for one member of an inline structural type. Only the
  /// requiredness, type and enum rules apply here.
  fn signature_record(&self, class: &str, sig: &TypePropertySignature, loc: Loc) -> Node<Expr> {
    let name = sig.key.static_name().unwrap_or_default();
    let site = FieldSite {
      class,
      name: &name,
      optional: sig.optional,
      annotation: sig.type_annotation.as_ref(),
    };
    let mut record = MetadataRecord::new(loc, Vec::new());
    record.insert("required", Node::<Expr>::boolean(loc, !sig.optional));
    if site.annotation.is_some() {
      self.add_type(&mut record, &site);
      if let Some(resolved) = self.field_type(&site) {
        self.add_enum(&mut record, &resolved);
      }
    }
    record.into_expr()
  }

  fn add_type(&self, record: &mut MetadataRecord, site: &FieldSite) {
    if record.has("type") {
      return;
    }
    let loc = record.loc();
    match site.annotation.map(|a| a.stx.as_ref()) {
      Some(TypeExpr::ObjectLiteral(obj)) => {
        let members = obj
          .stx
          .members
          .iter()
          .filter_map(|sig| {
            let key = sig.stx.key.static_name()?;
            let value = self.signature_record(site.class, &sig.stx, loc);
            Some(Node::<ObjMember>::prop(loc, key, value))
          })
          .collect();
        record.insert(
          "type",
          Node::<Expr>::thunk(loc, Node::<Expr>::object(loc, members)),
        );
      }
      Some(TypeExpr::Union(union)) => {
        let nullable = union.stx.types.iter().any(|t| t.stx.is_null());
        let mut rest = union.stx.types.iter().filter(|t| !t.stx.is_null());
        // More than one non-null constituent is ambiguous; leave it to a hand-written annotation.
        let (Some(only), None) = (rest.next(), rest.next()) else {
          return;
        };
        self.add_type(record, &FieldSite {
          annotation: Some(only),
          ..*site
        });
        if nullable {
          record.insert("nullable", Node::<Expr>::boolean(loc, true));
        }
      }
      _ => {
        let Some(reference) = self
          .field_type(site)
          .and_then(|t| type_reference(&t, self.host))
        else {
          return;
        };
        record.insert(
          "type",
          Node::<Expr>::thunk(loc, Node::<Expr>::verbatim(loc, reference)),
        );
      }
    }
  }

  fn add_description_and_examples(
    &self,
    record: &mut MetadataRecord,
    member: &ClassMember,
    resolved: Option<&Type>,
  ) {
    let loc = record.loc();
    let string_typed = resolved.is_some_and(Type::is_string_like);
    let doc = doc_comment(&member.leading_comments, string_typed);
    if let Some(description) = doc.description {
      record.insert(
        &self.options.dto_key_of_comment,
        Node::<Expr>::string(loc, description),
      );
    }
    if record.has("example") || record.has("examples") {
      return;
    }
    match doc.examples.as_slice() {
      [] => {}
      [single] => {
        record.insert("example", literal_from_value(loc, single));
      }
      many => {
        let values = many.iter().map(|v| literal_from_value(loc, v)).collect();
        record.insert("examples", Node::<Expr>::array(loc, values));
      }
    }
  }

  fn add_enum(&self, record: &mut MetadataRecord, resolved: &Type) {
    if record.has("enum") {
      return;
    }
    let Some(shape) = unwrap_enum(self.table, resolved) else {
      return;
    };
    let Some(reference) = declaration_reference(shape.decl, self.host) else {
      return;
    };
    let loc = record.loc();
    record.insert("enum", Node::<Expr>::verbatim(loc, reference));
    if shape.is_array {
      record.insert("isArray", Node::<Expr>::boolean(loc, true));
    }
  }
}

/// The initializer, minus one level of `as` assertion.
fn default_value(initializer: &Node<Expr>) -> Node<Expr> {
  match initializer.stx.as_ref() {
    Expr::As(as_expr) => as_expr.stx.expression.clone(),
    _ => initializer.clone(),
  }
}

fn add_validation_bounds(record: &mut MetadataRecord, member: &ClassMember) {
  for (decorator, key) in VALIDATION_BOUNDS {
    let Some(found) = find_decorator(&member.decorators, &[decorator]) else {
      continue;
    };
    if let Some(argument) = first_argument(&found.stx) {
      record.insert(key, argument.clone());
    }
  }
}

/// Field name usable as a metadata key. Computed and private names have none.
fn field_name(key: &PropKey) -> Option<String> {
  match key {
    PropKey::Private(_) | PropKey::Computed(_) => None,
    other => other.static_name(),
  }
}

struct ClassMetadata {
  name: Option<String>,
  loc: Loc,
  fields: Vec<Node<ObjMember>>,
}

impl ClassMetadata {
  fn insert(&mut self, name: String, record: Node<Expr>) {
    let loc = record.loc;
    let field = Node::<ObjMember>::prop(loc, name, record);
    match self.fields.iter_mut().find(|f| f.stx.key == field.stx.key) {
      Some(existing) => *existing = field,
      None => self.fields.push(field),
    }
  }

  fn into_factory(self) -> Node<ClassMember> {
    let loc = self.loc;
    let body = vec![Node::new(loc, ReturnStmt {
      value: Some(Node::<Expr>::object(loc, self.fields)),
    })
    .wrap(Stmt::from)];
    let method = Node::new(loc, ClassMethod {
      async_: false,
      parameters: Vec::new(),
      return_type: None,
      body: Some(body),
    });
    Node::new(loc, ClassMember {
      decorators: Vec::new(),
      key: PropKey::Ident(METADATA_FACTORY_NAME.to_string()),
      static_: true,
      readonly: false,
      optional: false,
      accessibility: None,
      leading_comments: Vec::new(),
      val: ClassVal::Method(method),
    })
  }
}

type ClassDeclNode = Node<ClassDecl>;
type ClassMemberNode = Node<ClassMember>;

#[derive(VisitorMut)]
#[visitor(ClassDeclNode(enter, exit), ClassMemberNode(enter))]
struct ModelClassVisitor<'a> {
  synth: PropertySynthesizer<'a>,
  classes: Vec<ClassMetadata>,
  skipped: usize,
}

impl ModelClassVisitor<'_> {
  fn enter_class_decl_node(&mut self, node: &mut ClassDeclNode) {
    self.classes.push(ClassMetadata {
      name: node.stx.name.clone(),
      loc: node.loc.end(),
      fields: Vec::new(),
    });
  }

  fn exit_class_decl_node(&mut self, node: &mut ClassDeclNode) {
    let Some(metadata) = self.classes.pop() else {
      return;
    };
    node.stx.members.push(metadata.into_factory());
  }

  fn enter_class_member_node(&mut self, node: &mut ClassMemberNode) {
    let member = &node.stx;
    let ClassVal::Prop(prop) = &member.val else {
      return;
    };
    if member.static_ || has_decorator(&member.decorators, API_HIDE_PROPERTY) {
      return;
    }
    // Anonymous classes still get a factory, but nothing to put in it.
    let Some(class_name) = self.classes.last().and_then(|c| c.name.clone()) else {
      return;
    };
    let Some(name) = field_name(&member.key) else {
      return;
    };
    let site = FieldSite {
      class: &class_name,
      name: &name,
      optional: member.optional,
      annotation: prop.stx.type_annotation.as_ref(),
    };
    let record = match self
      .synth
      .property_record(&site, member, &prop.stx, node.loc.end())
    {
      Ok(record) => record,
      Err(err) => {
        debug!(class = %class_name, field = %name, error = %err, "left field undescribed");
        self.skipped += 1;
        return;
      }
    };
    if let Some(class) = self.classes.last_mut() {
      class.insert(name, record);
    }
  }
}

/// Appends a metadata factory to every class in `unit`. Returns the number
/// of fields that could not be inspected.
pub(crate) fn visit(unit: &mut SourceUnit, table: &dyn TypeTable, options: &PluginOptions) -> usize {
  let host = unit.path.clone();
  let mut visitor = ModelClassVisitor {
    synth: PropertySynthesizer {
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

/// Rewrites every class of `unit` with a metadata factory, leaving `unit` untouched.
pub fn rewrite_model_classes(
  unit: &SourceUnit,
  table: &dyn TypeTable,
  options: &PluginOptions,
) -> SourceUnit {
  let mut rewritten = unit.clone();
  visit(&mut rewritten, table, options);
  rewritten
}
