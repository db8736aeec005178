//! Splitting raw document text into metadata and content
//!
//! The file format is deliberately loose: the first line is always taken to
//! be the opening delimiter and discarded; everything up to the next line
//! that starts with `-` is the metadata block; the rest is content. A file
//! without a closing line has no metadata at all and its whole remainder is
//! content.

use crate::config::ParserConfig;
use crate::core::value::{parse_timestamp, FrontMatterValue, Metadata, TagList};
use crate::error::{CorpusError, Result};
use chrono::Local;
use log::{debug, warn};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

const DELIMITER: &str = "---";

/// Decodes the metadata block into an ordered mapping
pub trait MetadataDecoder: Send + Sync {
    fn decode(&self, text: &str) -> Result<serde_yaml::Mapping>;
}

/// `serde_yaml` backed decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl MetadataDecoder for YamlDecoder {
    fn decode(&self, text: &str) -> Result<serde_yaml::Mapping> {
        match serde_yaml::from_str::<serde_yaml::Value>(text)? {
            serde_yaml::Value::Mapping(map) => Ok(map),
            serde_yaml::Value::Null => Ok(serde_yaml::Mapping::new()),
            other => Err(CorpusError::invalid_front_matter(
                "<unknown>",
                format!("Expected mapping or null, found {:?}", other),
            )),
        }
    }
}

/// Result of splitting one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    pub metadata: Metadata,
    /// Value of the `title` key, promoted out of the metadata
    pub title: Option<String>,
    pub content: String,
}

/// Front matter parser with an injectable metadata decoder
#[derive(Clone)]
pub struct FrontMatterParser {
    config: ParserConfig,
    decoder: Arc<dyn MetadataDecoder>,
}

impl FrontMatterParser {
    /// Create a parser with default configuration and the YAML decoder
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            decoder: Arc::new(YamlDecoder),
        }
    }

    /// Replace the metadata decoder
    pub fn with_decoder(mut self, decoder: impl MetadataDecoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Split `raw` into metadata and content
    ///
    /// `path` is only used in diagnostics.
    pub fn parse(&self, raw: &str, path: Option<&Path>) -> Result<ParsedDocument> {
        let origin = path.unwrap_or_else(|| Path::new("<string>"));
        let mut lines = raw.split_inclusive('\n');

        if let Some(first) = lines.next() {
            if first.trim_end() != DELIMITER {
                if self.config.strict_delimiter {
                    return Err(CorpusError::invalid_front_matter(
                        origin,
                        format!("first line is not `{}`: {:?}", DELIMITER, first.trim_end()),
                    ));
                }
                warn!(
                    "{}: first line {:?} is not `{}`, discarding it anyway",
                    origin.display(),
                    first.trim_end(),
                    DELIMITER
                );
            }
        }

        let mut header = String::new();
        let mut closed = false;
        for line in lines.by_ref() {
            if line.starts_with('-') {
                closed = true;
                break;
            }
            header.push_str(line);
        }

        let mut parsed = ParsedDocument::default();
        if !closed {
            debug!("{}: no closing delimiter, treating as content", origin.display());
            parsed.content = header;
            return Ok(parsed);
        }

        let mapping = self.decoder.decode(&header).map_err(|e| match e {
            CorpusError::InvalidFrontMatter { reason, .. } => {
                CorpusError::invalid_front_matter(origin, reason)
            }
            other => other,
        })?;

        for (key, value) in mapping {
            let key = match key {
                serde_yaml::Value::String(key) => key,
                other => {
                    return Err(CorpusError::invalid_front_matter(
                        origin,
                        format!("Non-string key found: {:?}", other),
                    ))
                }
            };
            apply_field(
                &mut parsed.metadata,
                &mut parsed.title,
                key,
                FrontMatterValue::from_yaml(value),
            )?;
        }
        normalize_published(&mut parsed.metadata);

        parsed.content = lines.collect();
        Ok(parsed)
    }

    /// Get parser configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

impl Default for FrontMatterParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrontMatterParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrontMatterParser")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Store one decoded field, applying the `title` and `tags` rules
///
/// Later writes of the same key replace earlier ones.
pub(crate) fn apply_field(
    metadata: &mut Metadata,
    title: &mut Option<String>,
    key: String,
    value: FrontMatterValue,
) -> Result<()> {
    match key.as_str() {
        "title" => {
            *title = match value {
                FrontMatterValue::Null => None,
                FrontMatterValue::String(s) => Some(s),
                other => Some(other.to_string_representation()),
            };
        }
        "tags" => {
            metadata.insert(key, normalize_tags(value)?);
        }
        _ => {
            metadata.insert(key, value);
        }
    }
    Ok(())
}

fn normalize_tags(value: FrontMatterValue) -> Result<TagList> {
    match value {
        FrontMatterValue::String(s) => Ok(TagList::from_delimited(&s)),
        FrontMatterValue::List(items) => Ok(items.iter().collect()),
        FrontMatterValue::Tags(tags) => Ok(tags),
        FrontMatterValue::Null => Err(CorpusError::type_conversion("null", "tags")),
        FrontMatterValue::Bool(_) => Err(CorpusError::type_conversion("boolean", "tags")),
        FrontMatterValue::Number(_) => Err(CorpusError::type_conversion("number", "tags")),
        FrontMatterValue::Timestamp(_) => Err(CorpusError::type_conversion("timestamp", "tags")),
        FrontMatterValue::Other(_) => Err(CorpusError::type_conversion("mapping", "tags")),
    }
}

/// Coerce a present `published` key into a timestamp
///
/// Timestamp-like values are parsed; anything else becomes the current time.
pub(crate) fn normalize_published(metadata: &mut Metadata) {
    let Some(value) = metadata.get_mut("published") else {
        return;
    };
    if value.as_timestamp().is_some() {
        return;
    }
    let parsed = value.as_str().and_then(parse_timestamp);
    *value = FrontMatterValue::Timestamp(parsed.unwrap_or_else(|| Local::now().naive_local()));
}
