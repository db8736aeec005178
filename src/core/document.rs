//! Core document model
//!
//! A [`Document`] wraps one parsed file: its raw body, its metadata, and the
//! attributes derived from its path (filename, slug, title). Derived values
//! are recomputed on every read, so they always reflect the current path,
//! subdirectory and overrides.

use crate::core::front_matter::{apply_field, normalize_published, ParsedDocument};
use crate::core::record::{FieldSelection, Record};
use crate::core::slug::slugify;
use crate::core::value::{FrontMatterValue, Metadata, TagList};
use crate::error::Result;
use crate::io::reader::DocumentReader;
use crate::render::{image_references, Renderer};
use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

/// Record keys left out of [`Document::dump`]
const DUMP_EXCLUDED: [&str; 5] = ["full_path", "subdirectory", "content", "filename", "slug"];

/// A markdown document with front matter
#[derive(Debug, Clone, Default)]
pub struct Document {
    source_path: Option<PathBuf>,
    subdirectory: Vec<String>,
    metadata: Metadata,
    content: String,
    title_override: Option<String>,
    slug_override: Option<String>,
}

impl Document {
    /// Create a synthetic document with only body content
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Create a synthetic document from body and metadata
    ///
    /// Metadata goes through the same `title`/`tags`/`published` handling as
    /// parsed front matter.
    pub fn with_metadata(content: impl Into<String>, metadata: Metadata) -> Result<Self> {
        let mut document = Self::new(content);
        document.merge_metadata(metadata)?;
        Ok(document)
    }

    /// Build a document from parser output
    pub fn from_parsed(source_path: Option<PathBuf>, parsed: ParsedDocument) -> Self {
        Self {
            source_path,
            subdirectory: Vec::new(),
            metadata: parsed.metadata,
            content: parsed.content,
            title_override: parsed.title,
            slug_override: None,
        }
    }

    /// Read and parse a file with default settings
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        DocumentReader::new().read_file(path)
    }

    /// Read and parse a file, then apply supplemental metadata on top
    pub fn from_file_with<P: AsRef<Path>>(
        path: P,
        reader: &DocumentReader,
        extra: Metadata,
    ) -> Result<Self> {
        let mut document = reader.read_file(path)?;
        document.merge_metadata(extra)?;
        Ok(document)
    }

    /// Parse raw text with default settings
    pub fn parse_str(raw: &str) -> Result<Self> {
        DocumentReader::new().parse_content(raw, None)
    }

    /// Absolute or scan-relative path the document was read from
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Identity key: the source path, never the slug
    pub fn identity(&self) -> Option<&Path> {
        self.source_path()
    }

    pub fn subdirectory(&self) -> &[String] {
        &self.subdirectory
    }

    pub fn set_subdirectory<I, S>(&mut self, segments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subdirectory = segments.into_iter().map(Into::into).collect();
    }

    /// Basename without extension
    pub fn filename(&self) -> Option<&str> {
        self.source_path
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|stem| stem.to_str())
    }

    /// Lowercased extension, without the dot
    pub fn extension(&self) -> Option<String> {
        self.source_path
            .as_deref()
            .and_then(Path::extension)
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Title override, falling back to the filename
    pub fn title(&self) -> Option<&str> {
        self.title_override.as_deref().or_else(|| self.filename())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title_override = Some(title.into());
    }

    /// Slug override, or the slugified subdirectory and filename
    pub fn slug(&self) -> Option<String> {
        if let Some(slug) = &self.slug_override {
            return Some(slug.clone());
        }
        let filename = self.filename()?;
        if self.subdirectory.is_empty() {
            return Some(slugify(filename));
        }
        let dir_slug = self
            .subdirectory
            .iter()
            .map(|segment| slugify(segment))
            .collect::<Vec<_>>()
            .join("-");
        Some(format!("{}-{}", dir_slug, slugify(filename)))
    }

    /// Override the slug; the value is slugified first
    pub fn set_slug(&mut self, slug: &str) {
        self.slug_override = Some(slugify(slug));
    }

    /// Compare computed slugs; documents without a slug never match
    pub fn same_slug(&self, other: &Document) -> bool {
        match (self.slug(), other.slug()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Look up a metadata field
    pub fn get(&self, key: &str) -> Option<&FrontMatterValue> {
        self.metadata.get(key)
    }

    /// Store a metadata field verbatim
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<FrontMatterValue>) {
        self.metadata.insert(key, value);
    }

    /// Apply supplemental metadata; later values win
    pub fn merge_metadata(&mut self, extra: Metadata) -> Result<()> {
        for (key, value) in extra {
            apply_field(&mut self.metadata, &mut self.title_override, key, value)?;
        }
        normalize_published(&mut self.metadata);
        Ok(())
    }

    pub fn tags(&self) -> Option<&TagList> {
        self.metadata.tags()
    }

    pub fn published_at(&self) -> Option<NaiveDateTime> {
        self.metadata
            .get("published")
            .and_then(FrontMatterValue::as_timestamp)
            .copied()
    }

    /// Raw, unrendered body
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Image references found in the raw body
    pub fn images(&self) -> Vec<String> {
        image_references(&self.content)
    }

    /// Render the body with the document's own fields as context
    pub fn render(&self, renderer: &dyn Renderer) -> Result<String> {
        let context = self.fields(&FieldSelection::all());
        self.render_with(renderer, &context)
    }

    /// Render the body with an explicit context
    pub fn render_with(&self, renderer: &dyn Renderer, context: &Record) -> Result<String> {
        renderer.render(&self.content, context)
    }

    /// Flatten metadata and derived fields, without `content`
    pub fn fields(&self, selection: &FieldSelection) -> Record {
        let mut record = Record::new();
        let mut put = |key: &str, value: JsonValue| {
            if selection.allows(key) {
                record.insert(key.to_string(), value);
            }
        };

        put(
            "full_path",
            self.source_path
                .as_ref()
                .map(|p| JsonValue::String(p.to_string_lossy().into_owned()))
                .unwrap_or(JsonValue::Null),
        );
        put(
            "subdirectory",
            JsonValue::String(self.subdirectory.join("/")),
        );
        for (key, value) in self.metadata.iter() {
            put(key, value.to_json());
        }
        put("slug", optional_string(self.slug()));
        put("filename", optional_string(self.filename()));
        put("title", optional_string(self.title()));

        record
    }

    /// Flatten metadata and derived fields, rendering `content` if selected
    pub fn to_record(&self, renderer: &dyn Renderer, selection: &FieldSelection) -> Result<Record> {
        let mut record = self.fields(selection);
        if selection.allows("content") {
            record.insert("content".to_string(), JsonValue::String(self.render(renderer)?));
        }
        Ok(record)
    }

    /// Slugify one metadata field
    pub fn slugify_field(&self, key: &str) -> Option<String> {
        match self.metadata.get(key)? {
            FrontMatterValue::Null => None,
            FrontMatterValue::List(items) => Some(slugify(items)),
            FrontMatterValue::Tags(tags) => Some(slugify(tags.as_slice())),
            other => Some(slugify(&other.to_string_representation())),
        }
    }

    /// Store `<key>_slug` for each present field
    pub fn add_derived_slugs(&mut self, keys: &[&str]) {
        for key in keys {
            if let Some(slug) = self.slugify_field(key) {
                self.metadata.insert(format!("{}_slug", key), slug);
            }
        }
    }

    /// Re-export as front matter lines followed by the raw body
    ///
    /// The header is emitted by `serde_yaml`, so values that need quoting
    /// are quoted. Lists and tags are written comma-joined. Key order and
    /// formatting may differ from the file the document was read from.
    pub fn dump(&self) -> Result<Vec<String>> {
        let mut header = serde_yaml::Mapping::new();
        for (key, value) in self.metadata.iter() {
            if !DUMP_EXCLUDED.contains(&key) && key != "title" {
                header.insert(serde_yaml::Value::from(key), dump_value(value));
            }
        }
        if let Some(title) = self.title() {
            header.insert(serde_yaml::Value::from("title"), serde_yaml::Value::from(title));
        }

        let mut lines = vec!["---".to_string()];
        if !header.is_empty() {
            lines.extend(serde_yaml::to_string(&header)?.lines().map(str::to_string));
        }
        lines.push("---".to_string());
        lines.push(self.content.clone());
        Ok(lines)
    }

    /// [`Document::dump`] joined with newlines
    pub fn dump_string(&self) -> Result<String> {
        Ok(self.dump()?.join("\n"))
    }
}

/// Compare two documents by computed slug
pub fn same_slug(a: &Document, b: &Document) -> bool {
    a.same_slug(b)
}

fn optional_string<S: Into<String>>(value: Option<S>) -> JsonValue {
    value
        .map(|s| JsonValue::String(s.into()))
        .unwrap_or(JsonValue::Null)
}

fn dump_value(value: &FrontMatterValue) -> serde_yaml::Value {
    match value {
        FrontMatterValue::Null => serde_yaml::Value::Null,
        FrontMatterValue::Bool(b) => serde_yaml::Value::Bool(*b),
        FrontMatterValue::Number(n) => serde_yaml::Value::Number(n.clone()),
        FrontMatterValue::String(s) => serde_yaml::Value::String(s.clone()),
        // sequences would end the header at their leading `-`
        other => serde_yaml::Value::String(other.to_string_representation()),
    }
}
