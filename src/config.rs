//! Parser and collection configuration
//!
//! Both structs have sensible defaults; [`CollectionConfig`] can also be
//! loaded from a YAML file, where every missing key falls back to its
//! default.

use crate::error::{CorpusError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the front matter parser and file reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Reject files whose first line is not `---` instead of warning
    pub strict_delimiter: bool,
    /// Maximum file size to read (in bytes)
    pub max_file_size: Option<u64>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_delimiter: false,
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
        }
    }
}

/// Configuration for populating a document collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Accepted file extensions, with or without the leading dot
    pub extensions: Vec<String>,
    /// Descend into subdirectories when a directory is added
    pub recursive: bool,
    /// Follow symbolic links while scanning
    pub follow_links: bool,
    /// Visit directory entries in file name order instead of filesystem order
    pub sort_entries: bool,
    /// Prefix for local image references in rendered content
    pub static_prefix: String,
    pub parser: ParserConfig,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            extensions: vec![".md".to_string(), ".markdown".to_string()],
            recursive: true,
            follow_links: false,
            sort_entries: false,
            static_prefix: String::new(),
            parser: ParserConfig::default(),
        }
    }
}

impl CollectionConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CorpusError::file_not_found(path));
        }
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = CollectionConfig::default();
        assert_eq!(config.extensions, vec![".md", ".markdown"]);
        assert!(config.recursive);
        assert!(!config.parser.strict_delimiter);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = CollectionConfig::from_yaml_str(
            "extensions: [txt]\nstatic_prefix: /static/\nparser:\n  strict_delimiter: true\n",
        )
        .unwrap();

        assert_eq!(config.extensions, vec!["txt"]);
        assert_eq!(config.static_prefix, "/static/");
        assert!(config.recursive);
        assert!(config.parser.strict_delimiter);
        assert_eq!(config.parser.max_file_size, Some(10 * 1024 * 1024));
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(
            CollectionConfig::from_yaml_str("").unwrap(),
            CollectionConfig::default()
        );
    }

    #[test]
    fn test_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "recursive: false\n").unwrap();
        let config = CollectionConfig::from_yaml_file(file.path()).unwrap();
        assert!(!config.recursive);

        let missing = CollectionConfig::from_yaml_file("/nonexistent/corpus.yml");
        assert!(matches!(missing, Err(CorpusError::FileNotFound { .. })));
    }
}
