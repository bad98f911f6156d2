use std::path::PathBuf;
use thiserror::Error;

/// Why a single declaration could not be inspected.
///
/// Passes catch these per declaration and leave the declaration as written;
/// they never abort the rewrite of a file.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InspectError {
  #[error("@{decorator}() options must be an object literal")]
  NonLiteralOptions { decorator: String },
  #[error("@{decorator}() options contain a computed key")]
  ComputedOptionKey { decorator: String },
}

pub type InspectResult<T> = Result<T, InspectError>;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read plugin options from {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("invalid plugin options: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("plugin option `{option}` must not be empty")]
  Empty { option: &'static str },
}
