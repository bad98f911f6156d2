use derive_visitor::{Drive, DriveMut};
use node::Node;
use serde::{Deserialize, Serialize};
use stmt::Stmt;

pub mod class;
pub mod expr;
pub mod node;
pub mod stmt;
pub mod type_expr;

/// One compilation file. Passes never mutate a caller's unit; they rewrite
/// a clone and hand it back.
#[derive(Clone, Debug, PartialEq, Drive, DriveMut, Serialize, Deserialize)]
pub struct SourceUnit {
  // Forward-slash separated, as the module resolver sees it.
  #[drive(skip)]
  pub path: String,
  #[serde(default)]
  pub body: Vec<Node<Stmt>>,
}

impl SourceUnit {
  pub fn new(path: impl Into<String>, body: Vec<Node<Stmt>>) -> SourceUnit {
    SourceUnit {
      path: path.into(),
      body,
    }
  }
}
