//! Core types: documents, collections, queries and metadata values

pub mod collection;
pub mod document;
pub mod front_matter;
pub mod query;
pub mod record;
pub mod slug;
pub mod value;

pub use collection::DocumentCollection;
pub use document::{same_slug, Document};
pub use front_matter::{FrontMatterParser, MetadataDecoder, ParsedDocument, YamlDecoder};
pub use query::{matches_all, Constraint, Field, Operator, Query};
pub use record::{FieldSelection, Record};
pub use slug::{slugify, slugify_with, SlugOptions, SlugSource};
pub use value::{FrontMatterValue, Metadata, TagList};
