use serde::{Deserialize, Serialize};
use std::cmp::{max, min};

/// A half-open byte range within a single source file.
///
/// Nodes created by a rewrite pass have no source text of their own. They
/// carry an empty range positioned at the node they were derived from, so
/// any later diagnostics still point somewhere sensible.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  /// An empty range at the end of this range.
  pub fn end(&self) -> Loc {
    Loc(self.1, self.1)
  }

  pub fn extend(self, other: Loc) -> Loc {
    Loc(min(self.0, other.0), max(self.1, other.1))
  }
}
