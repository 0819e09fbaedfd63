use crate::error::{Error, Result};
use globset::Glob;
use std::path::PathBuf;

const DEFAULT_PROJECT_DIR: &str = "lnegc";
const DEFAULT_OUTPUT_PATH: &str = "prompt.txt";
const DEFAULT_EXTENSION: &str = "lnegc";

/// Target language used when neither the caller nor the project names one.
pub const DEFAULT_LANGUAGE: &str = "python";

/// Which document survives when two files in a category share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// The later file replaces the earlier one, keeping its position
    #[default]
    LastWins,
    /// The earlier file is kept, later ones are dropped
    FirstWins,
}

/// Configuration for compiling an LNEGC project.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Project directory holding the category folders
    pub root_dir: PathBuf,

    /// Destination of the concatenated prompt
    pub output_path: PathBuf,

    /// Explicit target language, overriding the project configuration
    pub target_language: Option<String>,

    /// Target language used when nothing else names one
    pub default_language: String,

    /// Duplicate-name policy within a category
    pub dedup: DedupPolicy,

    /// Extension of document files, without the leading dot
    pub extension: String,

    /// Glob patterns (relative to the root) excluded from discovery
    pub exclude_patterns: Vec<String>,

    /// Directory with `<category>.tera` files overriding built-in templates
    pub template_dir: Option<PathBuf>,

    /// Append the built-in reference implementation when a document has none
    pub reference_fallback: bool,

    /// Dry run mode (no file writes)
    pub dry_run: bool,

    /// Keep a timestamped copy of an existing output file
    pub backup_existing: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lnegc::Config;
    ///
    /// let config = Config::builder()
    ///     .root_dir("./lnegc")
    ///     .target_language("go")
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Root directory doesn't exist or is not a directory
    /// - Extension or default language is empty
    /// - An exclusion pattern is not a valid glob
    /// - Template directory doesn't exist
    pub fn validate(&self) -> Result<()> {
        if !self.root_dir.exists() {
            return Err(Error::not_found(&self.root_dir));
        }

        if !self.root_dir.is_dir() {
            return Err(Error::config(format!(
                "Root path is not a directory: {}",
                self.root_dir.display()
            )));
        }

        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(Error::config(format!(
                "extension must be non-empty and given without a leading dot, got '{}'",
                self.extension
            )));
        }

        if self.default_language.trim().is_empty() {
            return Err(Error::config("default_language must not be empty"));
        }

        if let Some(language) = &self.target_language {
            if language.trim().is_empty() {
                return Err(Error::config("target_language must not be empty"));
            }
        }

        for pattern in &self.exclude_patterns {
            Glob::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
        }

        if let Some(dir) = &self.template_dir {
            if !dir.is_dir() {
                return Err(Error::config(format!(
                    "Template directory does not exist: {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_PROJECT_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            target_language: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
            dedup: DedupPolicy::default(),
            extension: DEFAULT_EXTENSION.to_string(),
            exclude_patterns: Vec::new(),
            template_dir: None,
            reference_fallback: false,
            dry_run: false,
            backup_existing: false,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root_dir: Option<PathBuf>,
    output_path: Option<PathBuf>,
    target_language: Option<String>,
    default_language: Option<String>,
    dedup: Option<DedupPolicy>,
    extension: Option<String>,
    exclude_patterns: Vec<String>,
    template_dir: Option<PathBuf>,
    reference_fallback: bool,
    dry_run: bool,
    backup_existing: bool,
}

impl ConfigBuilder {
    /// Sets the project directory.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Sets the output file path.
    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Sets an explicit target language.
    #[must_use]
    pub fn target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = Some(language.into());
        self
    }

    /// Sets an optional explicit target language.
    #[must_use]
    pub fn maybe_target_language(mut self, language: Option<String>) -> Self {
        self.target_language = language;
        self
    }

    /// Sets the last-resort target language.
    #[must_use]
    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = Some(language.into());
        self
    }

    /// Sets the deduplication policy.
    #[must_use]
    pub fn dedup(mut self, policy: DedupPolicy) -> Self {
        self.dedup = Some(policy);
        self
    }

    /// Sets the document file extension (without the leading dot).
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Sets glob patterns excluded from discovery.
    #[must_use]
    pub fn exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Sets the template override directory.
    ///
    /// Any `component.tera`, `entity.tera`, `interface.tera` or `test.tera`
    /// found there replaces the built-in template of that category.
    #[must_use]
    pub fn template_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(path.into());
        self
    }

    /// Enables or disables the built-in reference implementation fallback.
    #[must_use]
    pub fn reference_fallback(mut self, enabled: bool) -> Self {
        self.reference_fallback = enabled;
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Enables or disables backup of an existing output file.
    #[must_use]
    pub fn backup_existing(mut self, enabled: bool) -> Self {
        self.backup_existing = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            root_dir: self
                .root_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_DIR)),
            output_path: self
                .output_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            target_language: self.target_language,
            default_language: self
                .default_language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            dedup: self.dedup.unwrap_or_default(),
            extension: self
                .extension
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            exclude_patterns: self.exclude_patterns,
            template_dir: self.template_dir,
            reference_fallback: self.reference_fallback,
            dry_run: self.dry_run,
            backup_existing: self.backup_existing,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder().root_dir(temp.path()).build().unwrap();

        assert_eq!(config.default_language, DEFAULT_LANGUAGE);
        assert_eq!(config.dedup, DedupPolicy::LastWins);
        assert_eq!(config.extension, "lnegc");
        assert_eq!(config.output_path, PathBuf::from("prompt.txt"));
        assert!(config.target_language.is_none());
    }

    #[test]
    fn test_missing_root_dir_is_not_found() {
        let err = Config::builder()
            .root_dir("/nonexistent/path/that/should/not/exist")
            .build()
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_root_must_be_directory() {
        use assert_fs::prelude::*;

        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("file.txt");
        file.touch().unwrap();

        let err = Config::builder().root_dir(file.path()).build().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_extension() {
        let temp = assert_fs::TempDir::new().unwrap();

        let result = Config::builder()
            .root_dir(temp.path())
            .extension(".lnegc")
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_empty_languages_rejected() {
        let temp = assert_fs::TempDir::new().unwrap();

        assert!(Config::builder()
            .root_dir(temp.path())
            .default_language("  ")
            .build()
            .is_err());
        assert!(Config::builder()
            .root_dir(temp.path())
            .target_language("")
            .build()
            .is_err());
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let temp = assert_fs::TempDir::new().unwrap();

        let err = Config::builder()
            .root_dir(temp.path())
            .exclude_patterns(vec!["drafts/[".to_string()])
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_missing_template_dir() {
        let temp = assert_fs::TempDir::new().unwrap();

        let result = Config::builder()
            .root_dir(temp.path())
            .template_dir(temp.path().join("templates"))
            .build();

        assert!(result.is_err());
    }
}
