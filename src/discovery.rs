use crate::{
    category::Category,
    config::Config,
    error::{Error, Result},
};
use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A document file found beneath the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DocumentFile {
    /// Absolute path to the file
    pub(crate) absolute_path: PathBuf,

    /// Path relative to the project root, `/`-separated
    pub(crate) relative_path: String,
}

/// Finds document files and sorts them into categories.
pub(crate) struct Discovery {
    root_dir: PathBuf,
    documents: GlobMatcher,
    excludes: GlobSet,
}

impl Discovery {
    /// Creates a discovery from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension or an exclusion pattern is not a
    /// valid glob, or if the root cannot be made absolute.
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let root_dir =
            std::path::absolute(&config.root_dir).map_err(|e| Error::io(&config.root_dir, e))?;

        let pattern = format!("**/*.{}", config.extension);
        let documents = Glob::new(&pattern)
            .map_err(|e| Error::invalid_pattern(&pattern, e.to_string()))?
            .compile_matcher();

        Ok(Self {
            root_dir,
            documents,
            excludes: Self::build_globset(&config.exclude_patterns)?,
        })
    }

    fn build_globset(patterns: &[String]) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob =
                Glob::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| Error::invalid_pattern(patterns.join(", "), e.to_string()))
    }

    /// Returns every document file beneath the root, sorted by relative path.
    ///
    /// No ignore files or hidden-path rules apply; the exclusion globs are
    /// the only filter. Symlinked files are included, symlinked directories
    /// are not descended into.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory does not exist or any part of
    /// the tree cannot be read.
    pub(crate) fn scan(&self) -> Result<Vec<DocumentFile>> {
        if !self.root_dir.is_dir() {
            return Err(Error::not_found(&self.root_dir));
        }

        debug!("Scanning {}", self.root_dir.display());

        let walker = WalkBuilder::new(&self.root_dir)
            .standard_filters(false)
            .follow_links(false)
            .build();

        let mut files = Vec::new();
        for result in walker {
            let entry = result.map_err(|e| walk_error(&self.root_dir, &e))?;

            let Some(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_symlink() && !entry.path().is_file() {
                debug!("Skipping symlink {}", entry.path().display());
                continue;
            }

            if !file_type.is_file() && !file_type.is_symlink() {
                continue;
            }

            if let Some(file) = self.classify_entry(entry.path()) {
                files.push(file);
            }
        }

        // Sort for deterministic ordering
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        debug!("Found {} document files", files.len());
        Ok(files)
    }

    fn classify_entry(&self, path: &Path) -> Option<DocumentFile> {
        let relative = pathdiff::diff_paths(path, &self.root_dir)
            .unwrap_or_else(|| path.to_path_buf());

        if !self.documents.is_match(&relative) {
            return None;
        }

        if self.excludes.is_match(&relative) {
            trace!("Excluded by pattern: {}", relative.display());
            return None;
        }

        Some(DocumentFile {
            absolute_path: path.to_path_buf(),
            relative_path: relative.to_string_lossy().replace('\\', "/"),
        })
    }

    /// Returns the files of `category`, keeping scan order.
    pub(crate) fn select(files: &[DocumentFile], category: Category) -> Vec<&DocumentFile> {
        files
            .iter()
            .filter(|file| category.matches_path(&file.relative_path))
            .collect()
    }
}

/// Converts a walk failure into an IO error naming the offending path.
fn walk_error(root: &Path, err: &ignore::Error) -> Error {
    Error::Io {
        path: error_path(err).unwrap_or(root).to_path_buf(),
        message: err.to_string(),
    }
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Partial(errs) => errs.iter().find_map(error_path),
        _ => None,
    }
}
