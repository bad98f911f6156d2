use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Plugin configuration, as found in a build's plugin options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
  /// Derive descriptions and examples from doc comments.
  pub introspect_comments: bool,
  /// Mirror `@Min`/`@Max`/`@MinLength`/`@MaxLength` bounds.
  pub class_validator_shim: bool,
  /// Key the field description is written under.
  pub dto_key_of_comment: String,
  /// Key the operation summary is written under.
  pub controller_key_of_comment: String,
  pub dto_file_name_suffix: Vec<String>,
  pub controller_file_name_suffix: Vec<String>,
}

impl Default for PluginOptions {
  fn default() -> Self {
    PluginOptions {
      introspect_comments: false,
      class_validator_shim: true,
      dto_key_of_comment: "description".to_string(),
      controller_key_of_comment: "summary".to_string(),
      dto_file_name_suffix: vec![".dto.ts".to_string(), ".entity.ts".to_string()],
      controller_file_name_suffix: vec![".controller.ts".to_string()],
    }
  }
}

impl PluginOptions {
  pub fn from_json(json: &str) -> Result<PluginOptions, ConfigError> {
    let options: PluginOptions = serde_json::from_str(json)?;
    options.validate()?;
    Ok(options)
  }

  pub fn from_file(path: &Path) -> Result<PluginOptions, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    PluginOptions::from_json(&json)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.dto_key_of_comment.is_empty() {
      return Err(ConfigError::Empty {
        option: "dtoKeyOfComment",
      });
    }
    if self.controller_key_of_comment.is_empty() {
      return Err(ConfigError::Empty {
        option: "controllerKeyOfComment",
      });
    }
    Ok(())
  }

  pub fn is_dto_file(&self, path: &str) -> bool {
    self.dto_file_name_suffix.iter().any(|s| path.ends_with(s.as_str()))
  }

  pub fn is_controller_file(&self, path: &str) -> bool {
    self
      .controller_file_name_suffix
      .iter()
      .any(|s| path.ends_with(s.as_str()))
  }
}
