use crate::ast::class::{Comment, CommentKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EXAMPLE_TAG: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)^@example(?:\s+(?P<value>.*?))?\s*$").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@\w+").unwrap());

/// Description and `@example` values pulled from a declaration's leading comments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocComment {
  pub description: Option<String>,
  pub examples: Vec<Value>,
}

fn block_lines(text: &str) -> Vec<&str> {
  let inner = text.trim();
  let inner = inner
    .strip_prefix("/**")
    .or_else(|| inner.strip_prefix("/*"))
    .unwrap_or(inner);
  let inner = inner.strip_suffix("*/").unwrap_or(inner);
  inner
    .lines()
    .map(|line| {
      let line = line.trim_start();
      let line = line.strip_prefix('*').unwrap_or(line);
      line.strip_prefix(' ').unwrap_or(line).trim_end()
    })
    .collect()
}

fn comment_lines(comment: &Comment) -> Vec<&str> {
  match comment.kind {
    CommentKind::Block => block_lines(&comment.text),
    CommentKind::Line => {
      let text = comment.text.trim();
      vec![text.strip_prefix("//").unwrap_or(text).trim()]
    }
  }
}

fn description_of(comment: &Comment) -> Option<String> {
  let lines: Vec<&str> = comment_lines(comment)
    .into_iter()
    .filter(|line| !ANY_TAG.is_match(line.trim_start()))
    .collect();
  let description = lines.join("\n").trim().to_string();
  (!description.is_empty()).then_some(description)
}

fn unquote(raw: &str) -> Option<&str> {
  for quote in ['"', '\''] {
    if let Some(inner) = raw
      .strip_prefix(quote)
      .and_then(|rest| rest.strip_suffix(quote))
    {
      return Some(inner);
    }
  }
  None
}

fn parse_example(raw: &str, string_typed: bool) -> Value {
  if let Some(inner) = unquote(raw) {
    return Value::String(inner.to_string());
  }
  if string_typed {
    return Value::String(raw.to_string());
  }
  serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// The description of the last leading comment that has one.
pub fn main_comment(comments: &[Comment]) -> Option<String> {
  comments.iter().rev().find_map(description_of)
}

/// Description plus every `@example` tag, in source order.
///
/// With `string_typed` set, unquoted example text is kept verbatim rather
/// than parsed as JSON, so `@example 42` on a string field stays `"42"`.
pub fn doc_comment(comments: &[Comment], string_typed: bool) -> DocComment {
  let mut examples = Vec::new();
  for comment in comments {
    for line in comment_lines(comment) {
      let Some(captures) = EXAMPLE_TAG.captures(line.trim_start()) else {
        continue;
      };
      let raw = captures.name("value").map_or("", |m| m.as_str());
      if raw.is_empty() {
        continue;
      }
      examples.push(parse_example(raw, string_typed));
    }
  }
  DocComment {
    description: main_comment(comments),
    examples,
  }
}
