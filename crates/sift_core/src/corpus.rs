//! Corpus discovery and per-language partitioning.
//!
//! The corpus index is built once per scan by walking a root directory,
//! classifying each file by extension through the language registry, and
//! grouping the results into per-language partitions. The index is immutable
//! for the duration of the scan.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use thiserror::Error;

use crate::language::LanguageRegistry;
use crate::read::has_binary_extension;

/// A discovered candidate file with its inferred language.
#[derive(Debug, Clone)]
pub struct CorpusFile {
    /// Filesystem path as discovered under the corpus root.
    pub path: PathBuf,
    /// Language tag inferred from the file extension.
    pub language: Arc<str>,
}

/// Options controlling corpus discovery.
#[derive(Debug, Clone)]
pub struct CorpusOptions {
    /// Glob patterns excluded from the walk.
    pub excludes: Vec<String>,
    /// Honour `.gitignore` rules during the walk.
    pub respect_gitignore: bool,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            excludes: Vec::new(),
            respect_gitignore: true,
        }
    }
}

/// Errors that abort corpus discovery entirely.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus root could not be read; there is nothing to scan.
    #[error("corpus root '{path}' is unreadable: {source}")]
    RootUnreadable {
        /// The root path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An exclude glob could not be compiled.
    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidExclude {
        /// The offending glob pattern.
        pattern: String,
        /// The underlying glob compilation error.
        #[source]
        source: ignore::Error,
    },
}

/// The set of files eligible for scanning, partitioned by language.
#[derive(Debug, Default)]
pub struct CorpusIndex {
    files: Vec<CorpusFile>,
    partitions: HashMap<Arc<str>, Vec<usize>>,
}

impl CorpusIndex {
    /// Discovers every scannable file reachable from `root`.
    ///
    /// The walk is recursive and does not follow symbolic links, so link
    /// cycles cannot cause infinite traversal. Files whose extension is
    /// unmapped in `registry` or known to be binary are silently excluded -
    /// that is expected, not exceptional. Traversal errors on individual
    /// entries are logged and skipped; only the root itself being unreadable
    /// is fatal. Discovered files are sorted by path so partitions are
    /// deterministic.
    pub fn discover(
        root: &Path,
        registry: &LanguageRegistry,
        options: &CorpusOptions,
    ) -> Result<Self, CorpusError> {
        std::fs::metadata(root).map_err(|source| CorpusError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

        let walker = build_walker(root, options)?;
        let mut files = Vec::new();

        for result in walker {
            match result {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                        continue;
                    }
                    if let Some(file) = classify(entry.path(), registry) {
                        files.push(file);
                    }
                }
                Err(error) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%error, "skipping unreadable corpus entry");
                    #[cfg(not(feature = "tracing"))]
                    let _ = error;
                }
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(Self::from_files(files))
    }

    /// Creates an index directly from pre-classified files, preserving order.
    #[must_use]
    pub fn from_files(files: Vec<CorpusFile>) -> Self {
        let mut partitions: HashMap<Arc<str>, Vec<usize>> = HashMap::new();

        for (idx, file) in files.iter().enumerate() {
            partitions.entry(Arc::clone(&file.language)).or_default().push(idx);
        }

        Self { files, partitions }
    }

    /// Returns every discovered file in path order.
    #[must_use]
    pub fn files(&self) -> &[CorpusFile] {
        &self.files
    }

    /// Returns the files belonging to `language`, in path order.
    #[must_use]
    pub fn files_for(&self, language: &str) -> Vec<&CorpusFile> {
        self.partitions
            .get(language)
            .map(|indices| indices.iter().map(|&idx| &self.files[idx]).collect())
            .unwrap_or_default()
    }

    /// Returns the language tags present in the corpus, in no defined order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.partitions.keys().map(AsRef::as_ref)
    }

    /// Returns the total number of files in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no files were discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn build_walker(root: &Path, options: &CorpusOptions) -> Result<ignore::Walk, CorpusError> {
    let mut override_builder = OverrideBuilder::new(root);

    for pattern in &options.excludes {
        override_builder
            .add(&format!("!{pattern}"))
            .map_err(|source| CorpusError::InvalidExclude {
                pattern: pattern.clone(),
                source,
            })?;
    }

    let overrides = override_builder
        .build()
        .map_err(|source| CorpusError::InvalidExclude {
            pattern: options.excludes.join(", "),
            source,
        })?;

    Ok(WalkBuilder::new(root)
        .hidden(false)
        .follow_links(false)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .overrides(overrides)
        .build())
}

fn classify(path: &Path, registry: &LanguageRegistry) -> Option<CorpusFile> {
    if has_binary_extension(path) {
        return None;
    }

    let language = registry.language_for(path)?;

    Some(CorpusFile {
        path: path.to_path_buf(),
        language: Arc::clone(language),
    })
}
