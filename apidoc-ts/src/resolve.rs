//! Turns resolved types into expression text usable from the host file.

use crate::ast::type_expr::{KeywordType, LiteralValue};
use crate::types::{DeclRef, NamedKind, Origin, Type, UnionOrigin};

const VENDOR_DIR: &str = "node_modules";

/// Expression text referring to `typ` from `host`, or `None` when the type
/// cannot (or must not) be described.
///
/// Anything declared under `node_modules` resolves to `None` so library
/// internals never leak into emitted metadata.
pub fn type_reference(typ: &Type, host: &str) -> Option<String> {
  match typ {
    Type::Array(element) => type_reference(element, host).map(|e| format!("[{e}]")),
    Type::Primitive(keyword) => match keyword {
      KeywordType::Boolean => Some("Boolean".to_string()),
      KeywordType::Number => Some("Number".to_string()),
      KeywordType::BigInt => Some("BigInt".to_string()),
      KeywordType::String => Some("String".to_string()),
      KeywordType::Any | KeywordType::Unknown | KeywordType::Object => Some("Object".to_string()),
      _ => None,
    },
    Type::Literal(LiteralValue::Str(_)) => Some("String".to_string()),
    Type::Literal(LiteralValue::Num(_)) => Some("Number".to_string()),
    Type::Literal(LiteralValue::Bool(_)) => Some("Boolean".to_string()),
    Type::Named {
      decl,
      type_arguments,
      ..
    } if matches!(decl.name.as_str(), "Promise" | "Observable") => {
      type_reference(type_arguments.first()?, host)
    }
    Type::Named {
      decl,
      kind: NamedKind::Class,
      ..
    } => declaration_reference(decl, host),
    Type::Named {
      kind: NamedKind::Interface,
      ..
    }
    | Type::Object => Some("Object".to_string()),
    Type::Enum(_) | Type::EnumMember { .. } => None,
    Type::Union { types, origin } => {
      if typ.enum_literal_parent().is_some() {
        return None;
      }
      if *origin == UnionOrigin::Synthesized {
        return type_reference(types.last()?, host);
      }
      // `boolean | undefined` and friends describe a single type.
      let mut rest = types.iter().filter(|t| !t.is_nullish());
      match (rest.next(), rest.next()) {
        (Some(only), None) if !matches!(only, Type::Union { .. }) => type_reference(only, host),
        _ => Some("Object".to_string()),
      }
    }
  }
}

/// Reference to a named declaration: the bare name when it is ambient or
/// declared in `host` itself, `require("<relative>").Name` otherwise.
pub fn declaration_reference(decl: &DeclRef, host: &str) -> Option<String> {
  let file = match &decl.origin {
    Origin::Global => return Some(decl.name.clone()),
    Origin::File(file) => file,
  };
  if is_vendor_path(file) {
    return None;
  }
  if file == host {
    return Some(decl.name.clone());
  }
  let module = relative_module_path(host, file);
  Some(format!("require(\"{module}\").{}", decl.name))
}

pub fn is_vendor_path(path: &str) -> bool {
  path.split('/').any(|segment| segment == VENDOR_DIR)
}

fn strip_ts_extension(path: &str) -> &str {
  for ext in [".d.ts", ".tsx", ".ts"] {
    if let Some(stripped) = path.strip_suffix(ext) {
      return stripped;
    }
  }
  path
}

fn normalize(path: &str) -> Vec<&str> {
  let mut segments: Vec<&str> = Vec::new();
  for segment in path.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        if matches!(segments.last(), Some(last) if *last != "..") {
          segments.pop();
        } else {
          segments.push("..");
        }
      }
      other => segments.push(other),
    }
  }
  segments
}

/// Module specifier for `target` as imported from the file `host`.
///
/// Both paths are forward-slash separated and share a root. The result
/// always starts with `.` and carries no TypeScript extension.
pub fn relative_module_path(host: &str, target: &str) -> String {
  let host_segments = normalize(host);
  let host_dir = &host_segments[..host_segments.len().saturating_sub(1)];
  let target_segments = normalize(strip_ts_extension(target));

  let common = host_dir
    .iter()
    .zip(target_segments.iter())
    .take_while(|(a, b)| a == b)
    .count();

  let mut parts: Vec<&str> = Vec::new();
  parts.extend(std::iter::repeat("..").take(host_dir.len() - common));
  parts.extend(&target_segments[common..]);
  let relative = parts.join("/");
  if relative.starts_with('.') {
    relative
  } else {
    format!("./{relative}")
  }
}
