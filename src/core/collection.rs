//! Ordered, queryable collections of documents
//!
//! A [`DocumentCollection`] keeps documents in insertion order behind
//! `Arc`s, so query results share documents with the collection they came
//! from. Mutation goes through `Arc::make_mut` and never leaks into other
//! views.

use crate::config::CollectionConfig;
use crate::core::document::Document;
use crate::core::query::{matches_all, Constraint, Field};
use crate::core::record::{FieldSelection, Record};
use crate::core::value::FrontMatterValue;
use crate::error::{CorpusError, Result};
use crate::io::reader::DocumentReader;
use crate::io::resolver::{FileResolver, ResolverConfig};
use crate::render::{MarkdownRenderer, Renderer};
use crate::store::{sync_collection, DocumentStore, SaveOptions, SyncReport};
use log::{debug, info, warn};
use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::path::Path;
use std::sync::Arc;

/// Documents loaded from files or built in memory
#[derive(Clone)]
pub struct DocumentCollection {
    documents: Vec<Arc<Document>>,
    config: CollectionConfig,
    reader: DocumentReader,
    renderer: Arc<dyn Renderer>,
}

impl DocumentCollection {
    /// Create an empty collection with default configuration
    pub fn new() -> Self {
        Self::with_config(CollectionConfig::default())
    }

    /// Create an empty collection with custom configuration
    ///
    /// Content is rendered as Markdown with the configured static prefix.
    pub fn with_config(config: CollectionConfig) -> Self {
        let renderer = MarkdownRenderer::new().with_static_prefix(config.static_prefix.clone());
        Self {
            documents: Vec::new(),
            reader: DocumentReader::with_config(config.parser.clone()),
            renderer: Arc::new(renderer),
            config,
        }
    }

    /// Replace the renderer used by [`DocumentCollection::to_list`]
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Replace the reader used when adding files
    pub fn with_reader(mut self, reader: DocumentReader) -> Self {
        self.reader = reader;
        self
    }

    /// Build a collection from a file or directory
    pub fn open<P: AsRef<Path>>(path: P, config: CollectionConfig) -> Result<Self> {
        let path = path.as_ref();
        let mut collection = Self::with_config(config);
        if !collection.add_path(path)? {
            return Err(CorpusError::file_not_found(path));
        }
        Ok(collection)
    }

    pub fn push(&mut self, document: Document) {
        self.documents.push(Arc::new(document));
    }

    /// Add a file or every eligible file under a directory
    ///
    /// Returns `Ok(false)` when `path` does not exist. Documents found in a
    /// directory scan carry their subdirectory segments relative to `path`.
    /// If any file fails to load, nothing is added.
    pub fn add<P: AsRef<Path>>(&mut self, path: P, recursive: bool) -> Result<bool> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Skipping missing path: {}", path.display());
            return Ok(false);
        }

        if !path.is_dir() {
            let document = self.reader.read_file(path)?;
            self.push(document);
            return Ok(true);
        }

        let resolver = FileResolver::with_config(ResolverConfig {
            recursive,
            ..ResolverConfig::from(&self.config)
        });
        let files = resolver.scan(path)?;
        info!("Loading {} documents from {}", files.len(), path.display());

        let documents = files
            .into_iter()
            .map(|file| {
                let mut document = self.reader.read_file(&file.path).map_err(|e| {
                    warn!("Failed to load {} [{}]: {}", file.path.display(), e.severity(), e);
                    e
                })?;
                document.set_subdirectory(file.subdirectory);
                Ok(document)
            })
            .collect::<Result<Vec<_>>>()?;
        self.extend(documents);
        Ok(true)
    }

    /// [`DocumentCollection::add`] with the configured recursion setting
    pub fn add_path<P: AsRef<Path>>(&mut self, path: P) -> Result<bool> {
        self.add(path, self.config.recursive)
    }

    /// Documents matching every constraint, in order
    ///
    /// ```
    /// use mdcorpus::{Document, DocumentCollection, Query};
    ///
    /// let mut collection = DocumentCollection::new();
    /// collection.push(Document::parse_str("---\nauthor: Ann\n---\nbody").unwrap());
    /// collection.push(Document::parse_str("---\nauthor: Bob\n---\nbody").unwrap());
    ///
    /// let by_ann = collection.filter(Query::new().eq("author", "Ann"));
    /// assert_eq!(by_ann.count(), 1);
    /// ```
    pub fn filter<C: AsRef<[Constraint]>>(&self, constraints: C) -> Self {
        let constraints = constraints.as_ref();
        let documents = self
            .documents
            .iter()
            .filter(|document| matches_all(constraints, document))
            .cloned()
            .collect();
        self.view(documents)
    }

    /// Documents where every `(field, value)` pair differs
    pub fn exclude<I, F, V>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<Field>,
        V: Into<FrontMatterValue>,
    {
        let constraints: Vec<Constraint> = pairs
            .into_iter()
            .map(|(field, value)| Constraint::ne(field, value))
            .collect();
        self.filter(constraints)
    }

    /// First document matching every constraint
    pub fn get<C: AsRef<[Constraint]>>(&self, constraints: C) -> Option<&Document> {
        let constraints = constraints.as_ref();
        self.iter()
            .find(|document| matches_all(constraints, document))
    }

    /// Distinct values of `field`, in first-seen order
    ///
    /// Absent fields count as null. With `sparse`, null is left out.
    pub fn distinct(&self, field: impl Into<Field>, sparse: bool) -> Vec<FrontMatterValue> {
        let field = field.into();
        let mut values: Vec<FrontMatterValue> = Vec::new();
        for document in self.iter() {
            let value = field
                .resolve(document)
                .map(|v| v.into_owned())
                .unwrap_or(FrontMatterValue::Null);
            if sparse && value.is_null() {
                continue;
            }
            if !values.contains(&value) {
                values.push(value);
            }
        }
        values
    }

    /// One record per document, content rendered with the collection's renderer
    pub fn to_list(&self, selection: &FieldSelection) -> Result<Vec<Record>> {
        self.iter()
            .map(|document| document.to_record(&*self.renderer, selection))
            .collect()
    }

    /// Upsert every document into `store`
    pub fn save(&self, store: &mut dyn DocumentStore, options: &SaveOptions) -> Result<SyncReport> {
        sync_collection(store, self, options)
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn first(&self) -> Option<&Document> {
        self.documents.first().map(as_document)
    }

    pub fn iter(&self) -> Iter<'_> {
        self.documents
            .iter()
            .map(as_document as fn(&Arc<Document>) -> &Document)
    }

    /// Mutable access; documents shared with other views are cloned first
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.documents.iter_mut().map(Arc::make_mut)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Document> {
        self.documents.get_mut(index).map(Arc::make_mut)
    }

    /// A view over a range of positions; out-of-range bounds are clamped
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Self {
        let len = self.documents.len();
        let start = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&n) => n.saturating_add(1),
            Bound::Excluded(&n) => n,
            Bound::Unbounded => len,
        }
        .clamp(start, len);
        self.view(self.documents[start..end].to_vec())
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn renderer(&self) -> &dyn Renderer {
        &*self.renderer
    }

    fn view(&self, documents: Vec<Arc<Document>>) -> Self {
        Self {
            documents,
            config: self.config.clone(),
            reader: self.reader.clone(),
            renderer: Arc::clone(&self.renderer),
        }
    }
}

fn as_document(document: &Arc<Document>) -> &Document {
    document
}

/// Borrowing iterator over a collection
pub type Iter<'a> =
    std::iter::Map<std::slice::Iter<'a, Arc<Document>>, fn(&Arc<Document>) -> &Document>;

impl Default for DocumentCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DocumentCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCollection")
            .field("documents", &self.documents)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Extend<Document> for DocumentCollection {
    fn extend<I: IntoIterator<Item = Document>>(&mut self, iter: I) {
        self.documents.extend(iter.into_iter().map(Arc::new));
    }
}

impl FromIterator<Document> for DocumentCollection {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl<'a> IntoIterator for &'a DocumentCollection {
    type Item = &'a Document;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
