//! Deciding which files are documents, and finding them under a directory
//!
//! [`is_eligible`] is the per-entry predicate; [`FileResolver`] walks a
//! directory tree with `walkdir` and reports every eligible file together
//! with the subdirectory segments between the scan root and the file.

use crate::config::CollectionConfig;
use crate::error::{CorpusError, Result};
use log::debug;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Lowercase an extension and drop its leading dot
pub fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}

/// Check whether `filename` inside `directory` is an eligible document
///
/// Rejects when the directory does not exist, when the name without
/// extension is empty or hidden (starts with `.`), or when the lowercased
/// extension is not allowed. Allowed extensions may carry a leading dot.
pub fn is_eligible<S: AsRef<str>>(directory: &Path, filename: &str, allowed: &[S]) -> bool {
    if !directory.exists() {
        return false;
    }

    let name = Path::new(filename);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    if stem.is_empty() || stem.starts_with('.') {
        return false;
    }

    let Some(extension) = name.extension().map(|e| e.to_string_lossy()) else {
        return false;
    };
    let extension = normalize_extension(&extension);
    allowed
        .iter()
        .any(|a| normalize_extension(a.as_ref()) == extension)
}

/// [`is_eligible`] for a full path
pub fn is_eligible_path<S: AsRef<str>>(path: &Path, allowed: &[S]) -> bool {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match path.file_name().and_then(|n| n.to_str()) {
        Some(filename) => is_eligible(directory, filename, allowed),
        None => false,
    }
}

/// Path segments of `directory` below `root`
pub fn relative_subdirectories(root: &Path, directory: &Path) -> Vec<String> {
    directory
        .strip_prefix(root)
        .map(|relative| {
            relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Configuration for file resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Accepted extensions
    pub extensions: Vec<String>,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Follow symbolic links
    pub follow_links: bool,
    /// Visit entries in file name order
    pub sort_entries: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig::from(&CollectionConfig::default())
    }
}

impl From<&CollectionConfig> for ResolverConfig {
    fn from(config: &CollectionConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            recursive: config.recursive,
            follow_links: config.follow_links,
            sort_entries: config.sort_entries,
        }
    }
}

/// An eligible file found by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    /// Directory segments between the scan root and the file
    pub subdirectory: Vec<String>,
}

/// Finds eligible documents under a directory
#[derive(Debug, Clone, Default)]
pub struct FileResolver {
    config: ResolverConfig,
}

impl FileResolver {
    /// Create a new resolver with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new resolver with custom configuration
    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Walk `root` and collect every eligible file
    ///
    /// Unless `sort_entries` is set, the order is whatever the filesystem
    /// returns.
    pub fn scan(&self, root: &Path) -> Result<Vec<ResolvedFile>> {
        if !root.is_dir() {
            return Err(CorpusError::path_resolution(format!(
                "Not a directory: {}",
                root.display()
            )));
        }

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.config.follow_links);
        if !self.config.recursive {
            walker = walker.max_depth(1);
        }
        if self.config.sort_entries {
            walker = walker.sort_by_file_name();
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                CorpusError::path_resolution(format!("Error traversing directory: {}", e))
            })?;

            let path = entry.path();
            if entry.file_type().is_dir() || !path.is_file() {
                continue;
            }

            let directory = path.parent().unwrap_or(root);
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                debug!("Skipping non UTF-8 file name: {}", path.display());
                continue;
            };
            if !is_eligible(directory, filename, &self.config.extensions) {
                debug!("Skipping ineligible file: {}", path.display());
                continue;
            }

            files.push(ResolvedFile {
                path: path.to_path_buf(),
                subdirectory: relative_subdirectories(root, directory),
            });
        }

        Ok(files)
    }

    /// Get the resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const DEFAULT_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

    fn create_test_files(dir: &Path) -> Result<()> {
        fs::write(dir.join("test1.md"), "# Test 1")?;
        fs::write(dir.join("test2.MARKDOWN"), "# Test 2")?;
        fs::write(dir.join("readme.txt"), "Not markdown")?;
        fs::write(dir.join(".hidden.md"), "# Hidden")?;

        let subdir = dir.join("2021").join("summer");
        fs::create_dir_all(&subdir)?;
        fs::write(subdir.join("nested.md"), "# Nested")?;

        Ok(())
    }

    fn names(files: &[ResolvedFile]) -> Vec<String> {
        let mut names: Vec<String> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_is_eligible() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        assert!(is_eligible(dir, "post.md", &DEFAULT_EXTENSIONS));
        assert!(is_eligible(dir, "Post.MD", &DEFAULT_EXTENSIONS));
        assert!(is_eligible(dir, "post.markdown", &DEFAULT_EXTENSIONS));
        assert!(!is_eligible(dir, ".hidden.md", &DEFAULT_EXTENSIONS));
        assert!(!is_eligible(dir, "post.txt", &DEFAULT_EXTENSIONS));
        assert!(!is_eligible(dir, "post", &DEFAULT_EXTENSIONS));
        assert!(!is_eligible(dir, ".md", &DEFAULT_EXTENSIONS));
        assert!(!is_eligible(&dir.join("missing"), "post.md", &DEFAULT_EXTENSIONS));
    }

    #[test]
    fn test_custom_extensions() {
        let temp_dir = TempDir::new().unwrap();
        assert!(is_eligible(temp_dir.path(), "notes.txt", &["txt"]));
        assert!(!is_eligible(temp_dir.path(), "notes.md", &["txt"]));
    }

    #[test]
    fn test_is_eligible_path() {
        let temp_dir = TempDir::new().unwrap();
        assert!(is_eligible_path(&temp_dir.path().join("a.md"), &DEFAULT_EXTENSIONS));
        assert!(!is_eligible_path(&temp_dir.path().join(".a.md"), &DEFAULT_EXTENSIONS));
    }

    #[test]
    fn test_relative_subdirectories() {
        let root = Path::new("/posts");
        assert_eq!(
            relative_subdirectories(root, Path::new("/posts/2021/summer")),
            vec!["2021", "summer"]
        );
        assert!(relative_subdirectories(root, root).is_empty());
        assert!(relative_subdirectories(root, Path::new("/elsewhere")).is_empty());
    }

    #[test]
    fn test_scan_recursive() {
        let temp_dir = TempDir::new().unwrap();
        create_test_files(temp_dir.path()).unwrap();

        let files = FileResolver::new().scan(temp_dir.path()).unwrap();
        assert_eq!(names(&files), vec!["nested.md", "test1.md", "test2.MARKDOWN"]);

        let nested = files
            .iter()
            .find(|f| f.path.ends_with("nested.md"))
            .unwrap();
        assert_eq!(nested.subdirectory, vec!["2021", "summer"]);

        let top = files.iter().find(|f| f.path.ends_with("test1.md")).unwrap();
        assert!(top.subdirectory.is_empty());
    }

    #[test]
    fn test_scan_shallow() {
        let temp_dir = TempDir::new().unwrap();
        create_test_files(temp_dir.path()).unwrap();

        let resolver = FileResolver::with_config(ResolverConfig {
            recursive: false,
            ..Default::default()
        });
        let files = resolver.scan(temp_dir.path()).unwrap();
        assert_eq!(names(&files), vec!["test1.md", "test2.MARKDOWN"]);
    }

    #[test]
    fn test_scan_sorted() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["c.md", "a.md", "b.md"] {
            fs::write(temp_dir.path().join(name), "").unwrap();
        }

        let resolver = FileResolver::with_config(ResolverConfig {
            sort_entries: true,
            ..Default::default()
        });
        let files = resolver.scan(temp_dir.path()).unwrap();
        let order: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(order, vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn test_scan_requires_directory() {
        let result = FileResolver::new().scan(Path::new("/nonexistent/dir"));
        assert!(matches!(result, Err(CorpusError::PathResolution { .. })));
    }
}
