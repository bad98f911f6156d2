use crate::types::{DeclRef, Type, TypeTable, UnionOrigin};

// Synthesized union, declared nullable union and array: each peel counts as one step.
const MAX_UNWRAP_STEPS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumShape<'t> {
  pub decl: &'t DeclRef,
  pub is_array: bool,
}

/// The one enum every non-nullish constituent belongs to, if any.
fn shared_enum<'t>(table: &dyn TypeTable, types: &'t [Type]) -> Option<&'t DeclRef> {
  let mut shared = None;
  for typ in types.iter().filter(|t| !t.is_nullish()) {
    let decl = match typ {
      Type::Enum(decl) if table.is_enum(typ) => decl,
      Type::EnumMember { parent, .. } => parent,
      _ => return None,
    };
    match shared {
      None => shared = Some(decl),
      Some(existing) if existing == decl => {}
      Some(_) => return None,
    }
  }
  shared
}

fn declaring_enum<'t>(table: &dyn TypeTable, typ: &'t Type) -> Option<&'t DeclRef> {
  match typ {
    Type::Enum(decl) if table.is_enum(typ) => Some(decl),
    Type::EnumMember { parent, .. } => Some(parent),
    Type::Union { types, .. } => shared_enum(table, types),
    _ => None,
  }
}

/// Detects "enum" and "array of enum" types.
///
/// A union the checker synthesized (`T | undefined` for an optional member)
/// is peeled by taking its last non-nullish constituent. A written union is
/// only looked through when it has a single non-nullish constituent
/// (`Role[] | null`); `string | Role` is not an enum whichever way round it
/// is written. One level of array is peeled by taking its element, and a
/// single enum member stands for its declaring enum.
pub fn unwrap_enum<'t>(table: &dyn TypeTable, typ: &'t Type) -> Option<EnumShape<'t>> {
  let mut current = typ;
  let mut is_array = false;
  for step in 0..=MAX_UNWRAP_STEPS {
    if let Some(decl) = declaring_enum(table, current) {
      return Some(EnumShape { decl, is_array });
    }
    if step == MAX_UNWRAP_STEPS {
      break;
    }
    current = match current {
      Type::Union {
        types,
        origin: UnionOrigin::Synthesized,
      } => types.iter().rev().find(|t| !t.is_nullish())?,
      Type::Union { types, .. } => {
        let mut rest = types.iter().filter(|t| !t.is_nullish());
        match (rest.next(), rest.next()) {
          (Some(only), None) => only,
          _ => return None,
        }
      }
      _ if !is_array => {
        let element = table.array_element(current)?;
        is_array = true;
        element
      }
      _ => return None,
    };
  }
  None
}
