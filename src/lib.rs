//! mdcorpus: load a tree of markdown files into a queryable document collection
//!
//! Each file is split into a YAML front matter header and a body. Documents
//! derive a title, filename and URL-safe slug from their path and metadata,
//! and a [`DocumentCollection`] can be filtered, searched for distinct
//! values, flattened into records and saved into a slug-keyed store.
//!
//! # Quick Start
//!
//! ## Loading and Querying
//!
//! ```rust,no_run
//! use mdcorpus::{CollectionConfig, DocumentCollection, FieldSelection, Query, Result};
//!
//! fn main() -> Result<()> {
//!     let posts = DocumentCollection::open("posts/", CollectionConfig::default())?;
//!
//!     let python = posts.filter(Query::new().has("tags", "python"));
//!     let authors = posts.distinct("author", true);
//!     let first = posts.get(Query::new().eq("slug", "2021-intro"));
//!
//!     let records = python.to_list(&FieldSelection::all().exclude(["full_path"]))?;
//!     println!("{} posts, {} authors, {:?}", records.len(), authors.len(), first);
//!     Ok(())
//! }
//! ```
//!
//! ## Slugs
//!
//! ```rust
//! use mdcorpus::slugify;
//!
//! assert_eq!(slugify("Hello, World!"), "hello-world");
//! assert_eq!(slugify(&["2021", "Summer Trip"]), "2021-summer-trip");
//! ```
//!
//! ## Saving
//!
//! ```rust,no_run
//! use mdcorpus::{DocumentCollection, JsonFileStore, SaveOptions, Result};
//!
//! fn main() -> Result<()> {
//!     let mut posts = DocumentCollection::new();
//!     posts.add("posts/", true)?;
//!
//!     let mut store = JsonFileStore::open("site/posts.json")?;
//!     let report = posts.save(&mut store, &SaveOptions::sync())?;
//!     println!("{} saved, {} removed", report.upserted, report.removed);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: documents, collections, queries, slugs and metadata values
//! - [`io`]: finding eligible files, reading them, writing documents back
//! - [`render`]: content renderers (Markdown via `pulldown-cmark`, raw)
//! - [`store`]: the persistence port and its adapters
//! - [`config`]: parser and collection configuration
//! - [`error`]: the crate error type

// Public API exports
pub use error::{CorpusError, ErrorSeverity, Result};

// Core types
pub use core::{
    same_slug, slugify, slugify_with, Constraint, Document, DocumentCollection, Field,
    FieldSelection, FrontMatterParser, FrontMatterValue, Metadata, MetadataDecoder, Operator,
    ParsedDocument, Query, Record, SlugOptions, TagList, YamlDecoder,
};

// IO types
pub use io::{
    is_eligible, DocumentReader, DocumentWriter, FileResolver, ResolvedFile, ResolverConfig,
    WriteOptions, WriteResult, WriterConfig,
};

pub use config::{CollectionConfig, ParserConfig};
pub use render::{MarkdownRenderer, RawRenderer, Renderer};
pub use store::{sync_collection, DocumentStore, JsonFileStore, MemoryStore, SaveOptions, SyncReport};

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod render;
pub mod store;
