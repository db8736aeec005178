//! Integration tests for the mdcorpus library
//!
//! These exercise the public API end to end: scanning directory trees,
//! querying collections, rendering records, writing documents back and
//! saving collections into stores.

use mdcorpus::*;
use pretty_assertions::assert_eq;
use regex::Regex;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn blog(root: &Path) {
    write(
        root,
        "hello.md",
        "---\ntitle: Hello\nauthor: Ann\ntags: python, rust\npublished: 2012-11-05 10:30:00\n---\n# Hello\n\nFirst post.\n",
    );
    write(
        root,
        "2021/summer/trip.md",
        "---\ntitle: Summer Trip\nauthor: Bob\ntags: [travel, python]\n---\n![beach](img/beach.jpg)\n",
    );
    write(
        root,
        "2021/notes.markdown",
        "---\nauthor: Ann\ntags: rust\n---\nnotes\n",
    );
    write(root, "2021/.draft.md", "---\ntitle: Hidden\n---\n");
    write(root, "README.txt", "not a document");
}

#[test]
fn test_complete_workflow() {
    init_logging();
    let temp_dir = TempDir::new().unwrap();
    blog(temp_dir.path());

    let config = CollectionConfig {
        sort_entries: true,
        ..Default::default()
    };
    let collection = DocumentCollection::open(temp_dir.path(), config).unwrap();
    assert_eq!(collection.count(), 3);

    let slugs: Vec<String> = collection.iter().filter_map(Document::slug).collect();
    assert_eq!(slugs, vec!["2021-notes", "2021-summer-trip", "hello"]);

    let ann = collection.filter(Query::new().eq("author", "Ann"));
    assert_eq!(ann.count(), 2);

    let python_by_ann = ann.filter(Query::new().has("tags", "python"));
    assert_eq!(python_by_ann.count(), 1);
    assert_eq!(python_by_ann.first().unwrap().title(), Some("Hello"));

    let hello = collection.get(Query::new().eq("slug", "hello")).unwrap();
    let published = hello.published_at().unwrap();
    assert_eq!(published.to_string(), "2012-11-05 10:30:00");

    let records = collection
        .filter(Query::new().eq("slug", "hello"))
        .to_list(&FieldSelection::all().exclude(["full_path"]))
        .unwrap();
    let keys: Vec<&String> = records[0].keys().collect();
    assert_eq!(
        keys,
        vec!["subdirectory", "author", "tags", "published", "slug", "filename", "title", "content"]
    );
    assert_eq!(records[0]["published"], "2012-11-05 10:30:00");
    assert_eq!(records[0]["tags"], "python,rust");
}

#[test]
fn test_directory_scan_without_front_matter() {
    init_logging();
    let temp_dir = TempDir::new().unwrap();
    let posts = temp_dir.path().join("posts");
    write(&posts, "2021/intro.md", "Welcome\nto the blog.\n");

    let mut collection = DocumentCollection::new();
    assert!(collection.add(&posts, true).unwrap());
    assert_eq!(collection.count(), 1);

    let doc = collection.first().unwrap();
    assert_eq!(doc.subdirectory(), &["2021".to_string()]);
    assert_eq!(doc.filename(), Some("intro"));
    assert_eq!(doc.slug().as_deref(), Some("2021-intro"));
    assert_eq!(doc.title(), Some("intro"));
    assert_eq!(doc.content(), "to the blog.\n");
}

#[test]
fn test_duplicate_slugs_are_kept() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "a/hello.md", "---\n---\nfrom a");
    write(temp_dir.path(), "b/hello.md", "---\n---\nfrom b");

    let mut collection = DocumentCollection::new();
    collection.add(temp_dir.path().join("a"), true).unwrap();
    collection.add(temp_dir.path().join("b"), true).unwrap();

    assert_eq!(collection.count(), 2);
    assert_eq!(collection.distinct("slug", false).len(), 1);

    let docs: Vec<&Document> = collection.iter().collect();
    assert!(same_slug(docs[0], docs[1]));
    assert_ne!(docs[0].identity(), docs[1].identity());

    // saving keeps one record per slug
    let mut store = MemoryStore::new();
    collection.save(&mut store, &SaveOptions::sync()).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.find("hello").unwrap()["content"], "<p>from b</p>\n");
}

#[test]
fn test_distinct_sparse() {
    let mut collection = DocumentCollection::new();
    collection.push(Document::parse_str("---\ntitle: A\n---\n").unwrap());
    collection.push(Document::parse_str("---\ntitle: B\n---\n").unwrap());
    collection.push(Document::parse_str("---\ntitle: A\n---\n").unwrap());
    collection.push(Document::new("no title at all"));

    assert_eq!(
        collection.distinct("title", true),
        vec![FrontMatterValue::from("A"), FrontMatterValue::from("B")]
    );
    assert_eq!(collection.distinct("title", false).len(), 3);
    assert_eq!(collection.distinct("missing", true), Vec::<FrontMatterValue>::new());
}

#[test]
fn test_get_on_empty_collection() {
    let collection = DocumentCollection::new();
    assert!(collection.get(Query::new()).is_none());

    let temp_dir = TempDir::new().unwrap();
    blog(temp_dir.path());
    let collection = DocumentCollection::open(temp_dir.path(), CollectionConfig::default()).unwrap();
    let none = collection.filter(Query::new().eq("author", "Nobody"));
    assert!(none.is_empty());
    assert!(none.get(Query::new().eq("slug", "hello")).is_none());
}

#[test]
fn test_lookup_queries() {
    let temp_dir = TempDir::new().unwrap();
    blog(temp_dir.path());
    let collection = DocumentCollection::open(temp_dir.path(), CollectionConfig::default()).unwrap();

    let query = Query::new()
        .lookup("tags__has", "python")
        .unwrap()
        .lookup("author__ne", "Ann")
        .unwrap();
    let found = collection.filter(&query);
    assert_eq!(found.count(), 1);
    assert_eq!(found.first().unwrap().title(), Some("Summer Trip"));

    assert!(Query::new().lookup("tags__like", "py").is_err());
}

#[test]
fn test_slug_properties() {
    let pattern = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
    let printable: String = (0x20u8..0x7f).map(char::from).collect();

    let mut samples: Vec<String> = printable
        .as_bytes()
        .chunks(7)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect();
    samples.push(printable.clone());
    samples.push("  Hello,   World!  ".to_string());
    samples.push("<b>Bold</b> move".to_string());
    samples.push("Über café".to_string());

    for sample in &samples {
        let slug = slugify(sample.as_str());
        assert!(slug.is_empty() || pattern.is_match(&slug), "{:?} -> {:?}", sample, slug);
        assert_eq!(slugify(slug.as_str()), slug, "not idempotent for {:?}", sample);
    }
}

#[test]
fn test_title_and_tags_round_trip() {
    let doc = Document::parse_str("---\ntitle: X\ntags: \"a, b ,c\"\n---\nbody").unwrap();
    assert_eq!(doc.title(), Some("X"));
    assert!(!doc.metadata().contains_key("title"));
    assert_eq!(doc.tags().unwrap().as_slice(), &["a", "b", "c"]);
}

#[test]
fn test_path_validation() {
    let temp_dir = TempDir::new().unwrap();
    let extensions = CollectionConfig::default().extensions;

    assert!(is_eligible(temp_dir.path(), "post.md", &extensions));
    assert!(!is_eligible(temp_dir.path(), ".hidden.md", &extensions));
    assert!(!is_eligible(temp_dir.path(), "post.txt", &extensions));
}

#[test]
fn test_malformed_files() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "good.md", "---\ntitle: Good\n---\n");
    write(temp_dir.path(), "bad.md", "---\ntitle: [broken\n---\n");

    let mut collection = DocumentCollection::new();
    let err = collection.add(temp_dir.path(), true).unwrap_err();
    assert!(matches!(err, CorpusError::Yaml(_)));
    assert!(err.is_recoverable());
    assert_eq!(err.severity(), ErrorSeverity::High);
    assert!(collection.is_empty());

    write(temp_dir.path(), "bad.md", "---\ntags: 12\n---\n");
    let result = DocumentCollection::open(temp_dir.path(), CollectionConfig::default());
    assert!(matches!(result, Err(CorpusError::TypeConversion { .. })));
}

#[test]
fn test_strict_delimiter_from_config() {
    init_logging();
    let config = CollectionConfig::from_yaml_str("parser:\n  strict_delimiter: true\n").unwrap();
    assert!(config.recursive);

    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "loose.md", "title: Loose\n---\nbody");
    let result = DocumentCollection::open(temp_dir.path(), config);
    assert!(matches!(result, Err(CorpusError::InvalidFrontMatter { .. })));
}

#[test]
fn test_config_file() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "mdcorpus.yaml",
        "extensions: [txt]\nrecursive: false\nstatic_prefix: /assets/\n",
    );
    write(temp_dir.path(), "docs/one.txt", "---\n---\n![x](x.png)\n");
    write(temp_dir.path(), "docs/sub/two.txt", "---\n---\ntwo\n");
    write(temp_dir.path(), "docs/three.md", "---\n---\nthree\n");

    let config = CollectionConfig::from_yaml_file(temp_dir.path().join("mdcorpus.yaml")).unwrap();
    let collection = DocumentCollection::open(temp_dir.path().join("docs"), config).unwrap();
    assert_eq!(collection.count(), 1);

    let records = collection
        .to_list(&FieldSelection::all().include(["content"]))
        .unwrap();
    assert_eq!(
        records[0]["content"],
        "<p><img src=\"/assets/x.png\" alt=\"x\" /></p>\n"
    );
}

#[test]
fn test_supplemental_metadata() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "post.md", "---\ntitle: Post\nauthor: Ann\n---\nbody");

    let extra: Metadata = vec![
        ("author", FrontMatterValue::from("Bob")),
        ("tags", FrontMatterValue::from("x, y")),
    ]
    .into_iter()
    .collect();
    let doc =
        Document::from_file_with(temp_dir.path().join("post.md"), &DocumentReader::new(), extra)
            .unwrap();

    assert_eq!(doc.get("author"), Some(&FrontMatterValue::from("Bob")));
    assert_eq!(doc.tags().unwrap().as_slice(), &["x", "y"]);
    assert_eq!(doc.title(), Some("Post"));
}

#[test]
fn test_dump_and_write_back() {
    let temp_dir = TempDir::new().unwrap();
    blog(temp_dir.path());
    let collection = DocumentCollection::open(temp_dir.path(), CollectionConfig::default()).unwrap();
    let trip = collection.get(Query::new().eq("slug", "2021-summer-trip")).unwrap();

    let out = temp_dir.path().join("export").join("trip.md");
    let writer = DocumentWriter::new();
    let result = writer.write_file(trip, &out, None).unwrap();
    assert!(result.modified);

    let reread = Document::from_file(&out).unwrap();
    assert_eq!(reread.title(), Some("Summer Trip"));
    assert_eq!(reread.get("author"), Some(&FrontMatterValue::from("Bob")));
    assert_eq!(reread.tags().unwrap().as_slice(), &["travel", "python"]);
    assert_eq!(reread.content(), trip.content());
}

#[test]
fn test_json_store_sync() {
    init_logging();
    let temp_dir = TempDir::new().unwrap();
    blog(temp_dir.path());
    let store_path = temp_dir.path().join("site").join("posts.json");

    let collection = DocumentCollection::open(temp_dir.path(), CollectionConfig::default()).unwrap();
    let mut store = JsonFileStore::open(&store_path).unwrap();
    let report = collection.save(&mut store, &SaveOptions::sync()).unwrap();
    assert_eq!(report, SyncReport { upserted: 3, removed: 0 });

    // drop one document and sync again
    let rest = collection.exclude([("slug", "hello")]);
    let mut store = JsonFileStore::open(&store_path).unwrap();
    let report = rest.save(&mut store, &SaveOptions::sync()).unwrap();
    assert_eq!(report, SyncReport { upserted: 2, removed: 1 });

    let reopened = JsonFileStore::open(&store_path).unwrap();
    let mut slugs: Vec<&str> = reopened
        .records()
        .iter()
        .filter_map(|r| r["slug"].as_str())
        .collect();
    slugs.sort();
    assert_eq!(slugs, vec!["2021-notes", "2021-summer-trip"]);
}

#[test]
fn test_custom_renderer() {
    struct Shout;

    impl Renderer for Shout {
        fn render(&self, content: &str, context: &Record) -> Result<String> {
            let title = context.get("title").and_then(|v| v.as_str()).unwrap_or("");
            Ok(format!("{}: {}", title, content.to_uppercase()))
        }
    }

    let mut collection = DocumentCollection::new().with_renderer(Shout);
    collection.push(Document::parse_str("---\ntitle: Loud\n---\nquiet words").unwrap());

    let records = collection.to_list(&FieldSelection::all()).unwrap();
    assert_eq!(records[0]["content"], "Loud: QUIET WORDS");
}
