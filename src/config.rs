//! Project layout configuration.
//!
//! Every default reproduces the conventions of the script corpus this tool
//! was written for: MATLAB sources under `code/`, `%` comments, and class
//! pages collected under `stimgen/`. A TOML file can override any field.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Source tree below the repository root.
    pub source_dir: String,
    /// Script extension, without the dot.
    pub extension: String,
    /// Comment marker character.
    pub comment: char,
    /// Text ending a documentation block (matched case-insensitively).
    pub end_marker: String,
    /// Token expanded to a four-space indent.
    pub placeholder: String,
    /// Case-insensitive file stem substring that marks a class file.
    pub class_marker: String,
    /// Directory name of the stimulus-generation area.
    pub class_area: String,
    /// Documentation directory with one page per class.
    pub class_docs_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: "code".to_owned(),
            extension: "m".to_owned(),
            comment: '%',
            end_marker: "end of documentation".to_owned(),
            placeholder: "XXXX".to_owned(),
            class_marker: "stimulusgeneration".to_owned(),
            class_area: "stimulus_generation".to_owned(),
            class_docs_dir: "stimgen".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.source_dir, "source_dir")?;
        require_non_empty(&self.extension, "extension")?;
        require_non_empty(&self.end_marker, "end_marker")?;
        require_non_empty(&self.class_docs_dir, "class_docs_dir")?;
        if self.comment.is_whitespace() {
            return Err(ConfigError::Validation(
                "comment cannot be a whitespace character".to_owned(),
            ));
        }
        Ok(())
    }

    /// Lowercased end marker, ready for `contains` checks on lowercased lines.
    pub(crate) fn end_marker_lower(&self) -> String {
        self.end_marker.to_lowercase()
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
