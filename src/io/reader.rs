//! File reading and front matter parsing
//!
//! [`DocumentReader`] checks a path, enforces the size limit, reads the file
//! as UTF-8 and hands it to the [`FrontMatterParser`].

use crate::config::ParserConfig;
use crate::core::front_matter::{FrontMatterParser, MetadataDecoder};
use crate::core::Document;
use crate::error::{CorpusError, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Reads documents from disk or from strings
#[derive(Debug, Clone)]
pub struct DocumentReader {
    config: ParserConfig,
    parser: FrontMatterParser,
}

impl DocumentReader {
    /// Create a new reader with default configuration
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a new reader with custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            parser: FrontMatterParser::with_config(config.clone()),
            config,
        }
    }

    /// Replace the metadata decoder used by the parser
    pub fn with_decoder(mut self, decoder: impl MetadataDecoder + 'static) -> Self {
        self.parser = self.parser.with_decoder(decoder);
        self
    }

    /// Read a document from a file path
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CorpusError::file_not_found(path));
        }

        if !path.is_file() {
            return Err(CorpusError::invalid_file_format(path));
        }

        if let Some(max_size) = self.config.max_file_size {
            let metadata = fs::metadata(path)?;
            if metadata.len() > max_size {
                return Err(CorpusError::validation(format!(
                    "File too large: {} ({} bytes, limit: {} bytes)",
                    path.display(),
                    metadata.len(),
                    max_size
                )));
            }
        }

        debug!("Reading document: {}", path.display());
        let content = fs::read_to_string(path)?;
        self.parse_content(&content, Some(path))
    }

    /// Parse a document from string content
    ///
    /// `path` becomes the document's source path when given.
    pub fn parse_content(&self, content: &str, path: Option<&Path>) -> Result<Document> {
        let parsed = self.parser.parse(content, path)?;
        Ok(Document::from_parsed(path.map(Path::to_path_buf), parsed))
    }

    /// Get reader configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

impl Default for DocumentReader {
    fn default() -> Self {
        Self::new()
    }
}
