//! Whole-program static type information.
//!
//! Passes never ask a type checker directly. They go through [`TypeTable`],
//! a narrow read-only interface that resolves written annotations (and the
//! inferred types of unannotated members) into [`Type`] values. The
//! concrete [`ProgramTypes`] table is plain data: it can be deserialized
//! from JSON produced by an external checker, or built by hand in tests.

use crate::ast::node::Node;
use crate::ast::type_expr::{KeywordType, LiteralValue, TypeExpr};
use ahash::HashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Alias chains longer than this resolve to nothing. Keeps cyclic aliases
/// (`type A = B; type B = A;`) from recursing forever.
const MAX_RESOLVE_DEPTH: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
  // Ambient declaration from the standard library.
  Global,
  File(String),
}

/// A named declaration and where it lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclRef {
  pub name: String,
  pub origin: Origin,
}

impl DeclRef {
  pub fn file(&self) -> Option<&str> {
    match &self.origin {
      Origin::Global => None,
      Origin::File(path) => Some(path),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedKind {
  Class,
  Interface,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnionOrigin {
  // Written by hand, e.g. `string | number`.
  Declared,
  // Produced by the checker, e.g. the member set of an enum or `T | undefined` for an optional member.
  Synthesized,
}

/// Resolved static type.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
  Primitive(KeywordType),
  Literal(LiteralValue),
  Array(Box<Type>),
  Enum(DeclRef),
  EnumMember {
    parent: DeclRef,
    member: String,
  },
  Named {
    decl: DeclRef,
    kind: NamedKind,
    type_arguments: Vec<Type>,
  },
  // Anonymous structural type.
  Object,
  Union {
    types: Vec<Type>,
    origin: UnionOrigin,
  },
}

impl Type {
  pub fn is_nullish(&self) -> bool {
    matches!(
      self,
      Type::Primitive(KeywordType::Null) | Type::Primitive(KeywordType::Undefined)
    )
  }

  pub fn is_string_like(&self) -> bool {
    match self {
      Type::Primitive(KeywordType::String) | Type::Literal(LiteralValue::Str(_)) => true,
      Type::Union { types, .. } => {
        let mut rest = types.iter().filter(|t| !t.is_nullish()).peekable();
        rest.peek().is_some() && rest.all(|t| t.is_string_like())
      }
      _ => false,
    }
  }

  /// `T | undefined`, the type the checker gives an optional member declared as `T`.
  pub fn into_optional(self) -> Type {
    let undefined = Type::Primitive(KeywordType::Undefined);
    let has_undefined = match &self {
      Type::Union { types, .. } => types.contains(&undefined),
      other => *other == undefined,
    };
    if has_undefined {
      return self;
    }
    Type::Union {
      types: vec![undefined, self],
      origin: UnionOrigin::Synthesized,
    }
  }

  /// The enum every constituent of a union belongs to, if there is exactly one.
  pub fn enum_literal_parent(&self) -> Option<&DeclRef> {
    let Type::Union { types, .. } = self else {
      return None;
    };
    let mut parent = None;
    for t in types {
      let Type::EnumMember { parent: p, .. } = t else {
        return None;
      };
      match parent {
        None => parent = Some(p),
        Some(existing) if existing == p => {}
        Some(_) => return None,
      }
    }
    parent
  }
}

/// Read-only view over the program's types. Nothing here may mutate the
/// table: both passes share one instance for the whole program.
pub trait TypeTable {
  /// Resolves a written annotation as seen from `host` (the file path of the
  /// declaration carrying it).
  fn resolve_type(&self, host: &str, annotation: &TypeExpr) -> Option<Type>;

  /// Inferred type of an unannotated member `class.member` declared in `host`.
  fn member_type(&self, host: &str, class: &str, member: &str) -> Option<Type>;

  fn is_enum(&self, typ: &Type) -> bool {
    matches!(typ, Type::Enum(_))
  }

  fn array_element<'t>(&self, typ: &'t Type) -> Option<&'t Type> {
    match typ {
      Type::Array(element) => Some(element),
      _ => None,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Decl {
  Class,
  Interface,
  Enum {
    #[serde(default)]
    members: Vec<String>,
  },
  Alias {
    target: Node<TypeExpr>,
  },
}

/// `import { name as local } from "..."`, with the module already resolved
/// to a file path. `name` is `*` for namespace imports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportBinding {
  pub from: String,
  pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileTypes {
  #[serde(default)]
  pub decls: HashMap<String, Decl>,
  #[serde(default)]
  pub imports: HashMap<String, ImportBinding>,
  // Keyed by `Class.member`.
  #[serde(default)]
  pub inferred: HashMap<String, Node<TypeExpr>>,
}

static BUILTIN_GLOBALS: Lazy<HashMap<&'static str, Decl>> = Lazy::new(|| {
  let mut globals = HashMap::default();
  globals.insert("Date", Decl::Class);
  globals.insert("RegExp", Decl::Class);
  globals.insert("Error", Decl::Class);
  globals.insert("Buffer", Decl::Class);
  for name in ["Promise", "Map", "Set", "Function"] {
    globals.insert(name, Decl::Interface);
  }
  globals
});

/// The concrete whole-program type table.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProgramTypes {
  #[serde(default)]
  pub files: HashMap<String, FileTypes>,
  // Consulted after the per-file scopes and before the built-in library.
  #[serde(default)]
  pub globals: HashMap<String, Decl>,
}

enum Lookup<'p> {
  // The declaration and its name where it is declared, which an import may have renamed.
  Decl(&'p Decl, DeclRef),
  Namespace(&'p str),
}

impl ProgramTypes {
  pub fn new() -> ProgramTypes {
    ProgramTypes::default()
  }

  pub fn file_mut(&mut self, path: &str) -> &mut FileTypes {
    self.files.entry(path.to_string()).or_default()
  }

  pub fn declare(&mut self, path: &str, name: &str, decl: Decl) -> &mut Self {
    self.file_mut(path).decls.insert(name.to_string(), decl);
    self
  }

  pub fn import(&mut self, path: &str, local: &str, from: &str, name: &str) -> &mut Self {
    self.file_mut(path).imports.insert(local.to_string(), ImportBinding {
      from: from.to_string(),
      name: name.to_string(),
    });
    self
  }

  pub fn infer(&mut self, path: &str, class: &str, member: &str, typ: Node<TypeExpr>) -> &mut Self {
    self
      .file_mut(path)
      .inferred
      .insert(format!("{class}.{member}"), typ);
    self
  }

  fn lookup<'p>(&'p self, file: &'p str, name: &str, depth: usize) -> Option<Lookup<'p>> {
    if depth > MAX_RESOLVE_DEPTH {
      return None;
    }
    if let Some(scope) = self.files.get(file) {
      if let Some(decl) = scope.decls.get(name) {
        return Some(Lookup::Decl(decl, DeclRef {
          name: name.to_string(),
          origin: Origin::File(file.to_string()),
        }));
      }
      if let Some(binding) = scope.imports.get(name) {
        if binding.name == "*" {
          return Some(Lookup::Namespace(&binding.from));
        }
        // Follows re-exports through intermediate files.
        return self.lookup(&binding.from, &binding.name, depth + 1);
      }
    }
    let global = || DeclRef {
      name: name.to_string(),
      origin: Origin::Global,
    };
    if let Some(decl) = self.globals.get(name) {
      return Some(Lookup::Decl(decl, global()));
    }
    BUILTIN_GLOBALS
      .get(name)
      .map(|decl| Lookup::Decl(decl, global()))
  }

  fn resolve_in(&self, file: &str, expr: &TypeExpr, depth: usize) -> Option<Type> {
    if depth > MAX_RESOLVE_DEPTH {
      return None;
    }
    match expr {
      TypeExpr::Keyword(k) => Some(Type::Primitive(k.stx.keyword)),
      TypeExpr::Literal(l) => Some(Type::Literal(l.stx.value.clone())),
      TypeExpr::ObjectLiteral(_) => Some(Type::Object),
      TypeExpr::Array(a) => self
        .resolve_in(file, &a.stx.element.stx, depth + 1)
        .map(|t| Type::Array(Box::new(t))),
      TypeExpr::Union(u) => {
        let types = u
          .stx
          .types
          .iter()
          .map(|t| self.resolve_in(file, &t.stx, depth + 1))
          .collect::<Option<Vec<_>>>()?;
        Some(Type::Union {
          types,
          origin: UnionOrigin::Declared,
        })
      }
      TypeExpr::Reference(r) => {
        let args = &r.stx.type_arguments;
        match (r.stx.name.as_str(), args.as_slice()) {
          ("Array" | "ReadonlyArray", [element]) => {
            return self
              .resolve_in(file, &element.stx, depth + 1)
              .map(|t| Type::Array(Box::new(t)));
          }
          ("Record" | "Partial" | "Pick" | "Omit", _) => return Some(Type::Object),
          _ => {}
        };
        let type_arguments = args
          .iter()
          .filter_map(|t| self.resolve_in(file, &t.stx, depth + 1))
          .collect();
        self.resolve_name(file, &r.stx.name, type_arguments, depth)
      }
    }
  }

  fn resolve_name(
    &self,
    file: &str,
    name: &str,
    type_arguments: Vec<Type>,
    depth: usize,
  ) -> Option<Type> {
    let (qualifier, last) = match name.rsplit_once('.') {
      Some((qualifier, last)) => (Some(qualifier), last),
      None => (None, name),
    };
    if let Some(qualifier) = qualifier {
      return match self.lookup(file, qualifier, depth)? {
        // `Status.Active`
        Lookup::Decl(Decl::Enum { members }, parent) => {
          members.iter().any(|m| m == last).then(|| Type::EnumMember {
            parent,
            member: last.to_string(),
          })
        }
        // `ns.Name` through `import * as ns`.
        Lookup::Namespace(target) => self.resolve_name(target, last, type_arguments, depth + 1),
        Lookup::Decl(..) => None,
      };
    }

    let Lookup::Decl(decl, decl_ref) = self.lookup(file, name, depth)? else {
      return None;
    };
    match decl {
      Decl::Class => Some(Type::Named {
        decl: decl_ref,
        kind: NamedKind::Class,
        type_arguments,
      }),
      Decl::Interface => Some(Type::Named {
        decl: decl_ref,
        kind: NamedKind::Interface,
        type_arguments,
      }),
      Decl::Enum { .. } => Some(Type::Enum(decl_ref)),
      Decl::Alias { target } => {
        let alias_file = decl_ref.file().unwrap_or(file).to_string();
        self.resolve_in(&alias_file, &target.stx, depth + 1)
      }
    }
  }
}

impl TypeTable for ProgramTypes {
  fn resolve_type(&self, host: &str, annotation: &TypeExpr) -> Option<Type> {
    self.resolve_in(host, annotation, 0)
  }

  fn member_type(&self, host: &str, class: &str, member: &str) -> Option<Type> {
    let annotation = self
      .files
      .get(host)?
      .inferred
      .get(&format!("{class}.{member}"))?;
    self.resolve_in(host, &annotation.stx, 0)
  }
}
