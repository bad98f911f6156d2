//! Prints rewritten units back to TypeScript source.
//!
//! Output is canonical rather than faithful: indentation is two spaces,
//! decorators sit on their own lines, and object literals are printed on a
//! single line. Verbatim statements and expressions are the only places where
//! original formatting survives.

use crate::ast::class::{ClassDecl, ClassMember, ClassMethod, ClassVal, Comment, Decorator, Param};
use crate::ast::expr::{Expr, PropKey, UnaryOperator};
use crate::ast::node::Node;
use crate::ast::stmt::{EnumDecl, ImportNames, ImportStmt, NamespaceDecl, Stmt};
use crate::ast::type_expr::{LiteralValue, TypeExpr};
use crate::ast::SourceUnit;

const INDENT: &str = "  ";

pub fn format_number(value: f64) -> String {
  if value.is_nan() {
    "NaN".to_string()
  } else if value.is_infinite() {
    if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
  } else {
    format!("{value}")
  }
}

fn is_identifier_start(c: char) -> bool {
  c == '$' || c == '_' || c.is_alphabetic()
}

fn is_identifier_part(c: char) -> bool {
  c == '$' || c == '_' || c.is_alphanumeric()
}

/// Whether `name` can be written as a bare property name.
pub fn is_identifier_name(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
    _ => false,
  }
}

/// Appends `value` as a double quoted string literal.
fn push_string_literal(out: &mut String, value: &str) {
  out.push('"');
  let mut chars = value.chars().peekable();
  while let Some(ch) = chars.next() {
    match ch {
      '\\' => out.push_str("\\\\"),
      '"' => out.push_str("\\\""),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\0' => {
        if chars.peek().is_some_and(|c| c.is_ascii_digit()) {
          out.push_str("\\x00");
        } else {
          out.push_str("\\0");
        }
      }
      '\u{2028}' => out.push_str("\\u2028"),
      '\u{2029}' => out.push_str("\\u2029"),
      ch if ch < '\u{20}' => out.push_str(&format!("\\x{:02X}", ch as u32)),
      ch => out.push(ch),
    }
  }
  out.push('"');
}

fn push_prop_key(out: &mut String, key: &PropKey) {
  match key {
    PropKey::Ident(name) => out.push_str(name),
    PropKey::Str(name) => push_string_literal(out, name),
    PropKey::Num(value) => out.push_str(&format_number(*value)),
    PropKey::Private(name) => {
      out.push('#');
      out.push_str(name);
    }
    PropKey::Computed(expr) => {
      out.push('[');
      push_expr(out, expr);
      out.push(']');
    }
  }
}

fn push_separated<T>(out: &mut String, items: &[T], sep: &str, mut f: impl FnMut(&mut String, &T)) {
  for (idx, item) in items.iter().enumerate() {
    if idx > 0 {
      out.push_str(sep);
    }
    f(out, item);
  }
}

// Expressions that must be parenthesized before `.` or `(`.
fn needs_parens(expr: &Expr) -> bool {
  matches!(
    expr,
    Expr::Unary(_) | Expr::As(_) | Expr::ArrowFunc(_) | Expr::LitObj(_) | Expr::LitNum(_)
  )
}

fn push_operand(out: &mut String, expr: &Node<Expr>) {
  if needs_parens(&expr.stx) {
    out.push('(');
    push_expr(out, expr);
    out.push(')');
  } else {
    push_expr(out, expr);
  }
}

fn push_expr(out: &mut String, expr: &Node<Expr>) {
  match expr.stx.as_ref() {
    Expr::Id(id) => out.push_str(&id.stx.name),
    Expr::Member(member) => {
      push_operand(out, &member.stx.object);
      out.push('.');
      out.push_str(&member.stx.property);
    }
    Expr::Call(call) => {
      push_operand(out, &call.stx.callee);
      out.push('(');
      push_separated(out, &call.stx.arguments, ", ", push_expr);
      out.push(')');
    }
    Expr::New(new) => {
      out.push_str("new ");
      push_operand(out, &new.stx.callee);
      out.push('(');
      push_separated(out, &new.stx.arguments, ", ", push_expr);
      out.push(')');
    }
    Expr::Unary(unary) => {
      out.push_str(unary.stx.operator.as_str());
      if unary.stx.operator == UnaryOperator::Typeof {
        out.push(' ');
      }
      let argument = &unary.stx.argument;
      if matches!(
        argument.stx.as_ref(),
        Expr::Unary(_) | Expr::As(_) | Expr::ArrowFunc(_)
      ) {
        out.push('(');
        push_expr(out, argument);
        out.push(')');
      } else {
        push_expr(out, argument);
      }
    }
    Expr::LitStr(lit) => push_string_literal(out, &lit.stx.value),
    Expr::LitNum(lit) => out.push_str(&format_number(lit.stx.value)),
    Expr::LitBool(lit) => out.push_str(if lit.stx.value { "true" } else { "false" }),
    Expr::LitNull(_) => out.push_str("null"),
    Expr::LitObj(obj) => {
      if obj.stx.members.is_empty() {
        out.push_str("{}");
        return;
      }
      out.push_str("{ ");
      push_separated(out, &obj.stx.members, ", ", |out, member| {
        push_prop_key(out, &member.stx.key);
        out.push_str(": ");
        push_expr(out, &member.stx.value);
      });
      out.push_str(" }");
    }
    Expr::LitArr(arr) => {
      out.push('[');
      push_separated(out, &arr.stx.elements, ", ", push_expr);
      out.push(']');
    }
    Expr::ArrowFunc(func) => {
      out.push('(');
      out.push_str(&func.stx.parameters.join(", "));
      out.push_str(") => ");
      if matches!(func.stx.body.stx.as_ref(), Expr::LitObj(_)) {
        out.push('(');
        push_expr(out, &func.stx.body);
        out.push(')');
      } else {
        push_expr(out, &func.stx.body);
      }
    }
    Expr::As(as_expr) => {
      push_expr(out, &as_expr.stx.expression);
      out.push_str(" as ");
      push_type(out, &as_expr.stx.type_annotation);
    }
    Expr::Verbatim(verbatim) => out.push_str(&verbatim.stx.text),
  }
}

fn push_type(out: &mut String, typ: &Node<TypeExpr>) {
  match typ.stx.as_ref() {
    TypeExpr::Keyword(keyword) => out.push_str(keyword.stx.keyword.as_str()),
    TypeExpr::Reference(reference) => {
      out.push_str(&reference.stx.name);
      if !reference.stx.type_arguments.is_empty() {
        out.push('<');
        push_separated(out, &reference.stx.type_arguments, ", ", push_type);
        out.push('>');
      }
    }
    TypeExpr::Array(array) => {
      let element = &array.stx.element;
      if matches!(element.stx.as_ref(), TypeExpr::Union(_)) {
        out.push('(');
        push_type(out, element);
        out.push(')');
      } else {
        push_type(out, element);
      }
      out.push_str("[]");
    }
    TypeExpr::Union(union) => push_separated(out, &union.stx.types, " | ", push_type),
    TypeExpr::ObjectLiteral(obj) => {
      if obj.stx.members.is_empty() {
        out.push_str("{}");
        return;
      }
      out.push_str("{ ");
      push_separated(out, &obj.stx.members, "; ", |out, sig| {
        push_prop_key(out, &sig.stx.key);
        if sig.stx.optional {
          out.push('?');
        }
        if let Some(annotation) = &sig.stx.type_annotation {
          out.push_str(": ");
          push_type(out, annotation);
        }
      });
      out.push_str(" }");
    }
    TypeExpr::Literal(lit) => match &lit.stx.value {
      LiteralValue::Str(value) => push_string_literal(out, value),
      LiteralValue::Num(value) => out.push_str(&format_number(*value)),
      LiteralValue::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
    },
  }
}

/// Line-oriented printer for statements and class bodies.
struct Printer {
  out: String,
  depth: usize,
}

impl Printer {
  fn line(&mut self, text: &str) {
    if !text.is_empty() {
      for _ in 0..self.depth {
        self.out.push_str(INDENT);
      }
      self.out.push_str(text);
    }
    self.out.push('\n');
  }

  fn block(&mut self, f: impl FnOnce(&mut Printer)) {
    self.depth += 1;
    f(self);
    self.depth -= 1;
  }

  fn verbatim(&mut self, text: &str) {
    for line in text.lines() {
      self.line(line.trim_end());
    }
  }

  fn comments(&mut self, comments: &[Comment]) {
    for comment in comments {
      for (idx, line) in comment.text.trim().lines().enumerate() {
        let line = line.trim();
        if idx > 0 && line.starts_with('*') {
          self.line(&format!(" {line}"));
        } else {
          self.line(line);
        }
      }
    }
  }

  fn decorators(&mut self, decorators: &[Node<Decorator>]) {
    for decorator in decorators {
      self.line(&decorator_text(&decorator.stx));
    }
  }

  fn stmts(&mut self, stmts: &[Node<Stmt>]) {
    let mut previous: Option<&Stmt> = None;
    for stmt in stmts {
      let current = stmt.stx.as_ref();
      if let Some(previous) = previous {
        // Imports stay grouped; everything else is separated by a blank line.
        let both_imports = matches!(previous, Stmt::Import(_)) && matches!(current, Stmt::Import(_));
        let in_body = matches!(current, Stmt::Return(_) | Stmt::Verbatim(_))
          && matches!(previous, Stmt::Return(_) | Stmt::Verbatim(_));
        if !both_imports && !in_body {
          self.line("");
        }
      }
      self.stmt(current);
      previous = Some(current);
    }
  }

  fn stmt(&mut self, stmt: &Stmt) {
    match stmt {
      Stmt::Import(import) => self.line(&import_text(&import.stx)),
      Stmt::Class(class) => self.class(&class.stx),
      Stmt::Enum(decl) => self.enum_decl(&decl.stx),
      Stmt::Namespace(decl) => self.namespace(&decl.stx),
      Stmt::Return(ret) => match &ret.stx.value {
        Some(value) => {
          let mut text = "return ".to_string();
          push_expr(&mut text, value);
          text.push(';');
          self.line(&text);
        }
        None => self.line("return;"),
      },
      Stmt::Verbatim(verbatim) => self.verbatim(&verbatim.stx.text),
    }
  }

  fn class(&mut self, class: &ClassDecl) {
    self.comments(&class.leading_comments);
    self.decorators(&class.decorators);
    let mut header = String::new();
    if class.export {
      header.push_str("export ");
    }
    if class.export_default {
      header.push_str("default ");
    }
    if class.abstract_ {
      header.push_str("abstract ");
    }
    header.push_str("class");
    if let Some(name) = &class.name {
      header.push(' ');
      header.push_str(name);
    }
    if let Some(extends) = &class.extends {
      header.push_str(" extends ");
      push_expr(&mut header, extends);
    }
    if class.members.is_empty() {
      header.push_str(" {}");
      self.line(&header);
      return;
    }
    header.push_str(" {");
    self.line(&header);
    self.block(|p| {
      for member in &class.members {
        p.class_member(&member.stx);
      }
    });
    self.line("}");
  }

  fn class_member(&mut self, member: &ClassMember) {
    self.comments(&member.leading_comments);
    self.decorators(&member.decorators);
    let mut head = String::new();
    if let Some(accessibility) = member.accessibility {
      head.push_str(accessibility.as_str());
      head.push(' ');
    }
    if member.static_ {
      head.push_str("static ");
    }
    if member.readonly {
      head.push_str("readonly ");
    }
    match &member.val {
      ClassVal::Prop(prop) => {
        push_prop_key(&mut head, &member.key);
        if member.optional {
          head.push('?');
        }
        if let Some(annotation) = &prop.stx.type_annotation {
          head.push_str(": ");
          push_type(&mut head, annotation);
        }
        if let Some(initializer) = &prop.stx.initializer {
          head.push_str(" = ");
          push_expr(&mut head, initializer);
        }
        head.push(';');
        self.line(&head);
      }
      ClassVal::Method(method) => self.method(head, &member.key, member.optional, &method.stx),
    }
  }

  fn method(&mut self, mut head: String, key: &PropKey, optional: bool, method: &ClassMethod) {
    if method.async_ {
      head.push_str("async ");
    }
    push_prop_key(&mut head, key);
    if optional {
      head.push('?');
    }
    head.push('(');
    push_separated(&mut head, &method.parameters, ", ", |out, param| {
      push_param(out, &param.stx)
    });
    head.push(')');
    if let Some(return_type) = &method.return_type {
      head.push_str(": ");
      push_type(&mut head, return_type);
    }
    match &method.body {
      None => {
        head.push(';');
        self.line(&head);
      }
      Some(body) if body.is_empty() => {
        head.push_str(" {}");
        self.line(&head);
      }
      Some(body) => {
        head.push_str(" {");
        self.line(&head);
        self.block(|p| p.stmts(body));
        self.line("}");
      }
    }
  }

  fn enum_decl(&mut self, decl: &EnumDecl) {
    let mut header = String::new();
    if decl.export {
      header.push_str("export ");
    }
    if decl.const_ {
      header.push_str("const ");
    }
    header.push_str("enum ");
    header.push_str(&decl.name);
    header.push_str(" {");
    self.line(&header);
    self.block(|p| {
      for member in &decl.members {
        let mut text = member.stx.name.clone();
        if let Some(initializer) = &member.stx.initializer {
          text.push_str(" = ");
          push_expr(&mut text, initializer);
        }
        text.push(',');
        p.line(&text);
      }
    });
    self.line("}");
  }

  fn namespace(&mut self, decl: &NamespaceDecl) {
    let export = if decl.export { "export " } else { "" };
    self.line(&format!("{export}namespace {} {{", decl.name));
    self.block(|p| p.stmts(&decl.body));
    self.line("}");
  }
}

fn push_param(out: &mut String, param: &Param) {
  for decorator in &param.decorators {
    out.push_str(&decorator_text(&decorator.stx));
    out.push(' ');
  }
  out.push_str(&param.name);
  if param.optional {
    out.push('?');
  }
  if let Some(annotation) = &param.type_annotation {
    out.push_str(": ");
    push_type(out, annotation);
  }
}

fn decorator_text(decorator: &Decorator) -> String {
  let mut text = "@".to_string();
  push_expr(&mut text, &decorator.expression);
  text
}

fn import_text(import: &ImportStmt) -> String {
  let mut text = "import ".to_string();
  if import.type_only {
    text.push_str("type ");
  }
  match &import.names {
    ImportNames::SideEffect => {}
    ImportNames::Namespace(alias) => {
      text.push_str("* as ");
      text.push_str(alias);
      text.push_str(" from ");
    }
    ImportNames::Named {
      default,
      specifiers,
    } => {
      if let Some(default) = default {
        text.push_str(default);
        if !specifiers.is_empty() {
          text.push_str(", ");
        }
      }
      if !specifiers.is_empty() || default.is_none() {
        text.push('{');
        if !specifiers.is_empty() {
          text.push(' ');
          push_separated(&mut text, specifiers, ", ", |out, spec| {
            out.push_str(&spec.stx.imported);
            if let Some(local) = &spec.stx.local {
              out.push_str(" as ");
              out.push_str(local);
            }
          });
          text.push(' ');
        }
        text.push('}');
      }
      text.push_str(" from ");
    }
  }
  push_string_literal(&mut text, &import.module);
  text.push(';');
  text
}

pub fn emit_expr(expr: &Node<Expr>) -> String {
  let mut out = String::new();
  push_expr(&mut out, expr);
  out
}

pub fn emit_type(typ: &Node<TypeExpr>) -> String {
  let mut out = String::new();
  push_type(&mut out, typ);
  out
}

pub fn emit_stmt(stmt: &Node<Stmt>) -> String {
  let mut printer = Printer {
    out: String::new(),
    depth: 0,
  };
  printer.stmt(&stmt.stx);
  printer.out
}

pub fn emit_unit(unit: &SourceUnit) -> String {
  let mut printer = Printer {
    out: String::new(),
    depth: 0,
  };
  printer.stmts(&unit.body);
  printer.out
}
