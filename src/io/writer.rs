//! Writing re-exported documents back to disk
//!
//! [`DocumentWriter`] writes [`Document::dump_string`] to a path, optionally
//! copying the previous file to a backup first. Writes go through a
//! temporary file in the target directory and are persisted by rename.

use crate::core::Document;
use crate::error::{CorpusError, Result};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Configuration for the document writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Copy the existing file before overwriting it
    pub backup_enabled: bool,
    /// Backup file suffix, `.bak` when unset
    pub backup_suffix: Option<String>,
    /// Backup directory (if None, backups go next to the file)
    pub backup_dir: Option<PathBuf>,
    /// Write to a temporary file first, then rename
    pub atomic_writes: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            backup_enabled: false,
            backup_suffix: None,
            backup_dir: None,
            atomic_writes: true,
        }
    }
}

/// Per-call overrides
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Override the configured backup setting
    pub backup: Option<bool>,
    /// Report what would change without writing
    pub dry_run: bool,
}

/// Result of a write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Whether the file content differs from what was there before
    pub modified: bool,
    pub output_path: PathBuf,
    pub backup_path: Option<PathBuf>,
}

/// Writes documents in their dumped form
#[derive(Debug, Clone, Default)]
pub struct DocumentWriter {
    config: WriterConfig,
}

impl DocumentWriter {
    /// Create a new writer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new writer with custom configuration
    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Write `document` to `path`
    ///
    /// Unchanged content is not rewritten and produces no backup.
    pub fn write_file<P: AsRef<Path>>(
        &self,
        document: &Document,
        path: P,
        options: Option<WriteOptions>,
    ) -> Result<WriteResult> {
        let path = path.as_ref();
        let options = options.unwrap_or_default();
        let new_content = document.dump_string()?;

        let original_content = if path.exists() {
            Some(fs::read_to_string(path)?)
        } else {
            None
        };
        let modified = original_content.as_deref() != Some(new_content.as_str());

        let mut result = WriteResult {
            modified,
            output_path: path.to_path_buf(),
            backup_path: None,
        };
        if options.dry_run || !modified {
            return Ok(result);
        }

        if options.backup.unwrap_or(self.config.backup_enabled) && original_content.is_some() {
            result.backup_path = Some(self.create_backup(path)?);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if self.config.atomic_writes {
            write_atomic(path, &new_content)?;
        } else {
            fs::write(path, &new_content)?;
        }
        debug!("Wrote document: {}", path.display());

        Ok(result)
    }

    fn create_backup(&self, original_path: &Path) -> Result<PathBuf> {
        let suffix = self.config.backup_suffix.as_deref().unwrap_or(".bak");
        let filename = original_path.file_name().ok_or_else(|| {
            CorpusError::path_resolution(format!(
                "Could not extract filename for backup: {}",
                original_path.display()
            ))
        })?;
        let backup_name = format!("{}{}", filename.to_string_lossy(), suffix);

        let backup_path = match &self.config.backup_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                dir.join(backup_name)
            }
            None => original_path.with_file_name(backup_name),
        };

        fs::copy(original_path, &backup_path)?;
        debug!("Backed up {} to {}", original_path.display(), backup_path.display());
        Ok(backup_path)
    }

    /// Get writer configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }
}

/// Replace `path` with `content` through a temporary file in the same directory
///
/// The directory must already exist.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|e| {
        CorpusError::Io(std::io::Error::other(format!(
            "Failed to persist temporary file: {}",
            e
        )))
    })?;
    Ok(())
}
