//! Locating the project configuration and resolving the target language.

use crate::document::{Document, strip_accents};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Conventional name of the project configuration document.
pub const CONFIG_FILE_NAME: &str = "config.lnegc";

/// Hidden folder that may hold the configuration document.
pub const CONFIG_DIR_NAME: &str = ".lnegc";

/// Section of the configuration document holding project settings.
const SETTINGS_SECTION: &str = "Configurações";

/// Labels naming the default target language, compared without case,
/// accents or the `_`/space distinction.
const LANGUAGE_LABELS: &[&str] = &["linguagem padrao", "linguagem", "default language"];

/// Returns every location the configuration document may live at, in probe
/// order: the project root, then its parent and grandparent, each checked
/// for the file directly and inside the hidden `.lnegc` folder.
///
/// # Errors
///
/// Returns an error if the current directory is needed to make `root`
/// absolute and cannot be determined.
pub fn config_candidates(root: &Path) -> Result<Vec<PathBuf>> {
    let root = std::path::absolute(root).map_err(|e| Error::io(root, e))?;

    let mut candidates = vec![
        root.join(CONFIG_FILE_NAME),
        root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
    ];

    for ancestor in root.ancestors().skip(1).take(2) {
        candidates.push(ancestor.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
        candidates.push(ancestor.join(CONFIG_FILE_NAME));
    }

    Ok(candidates)
}

/// Returns the first existing configuration document for `root`.
///
/// # Errors
///
/// Returns [`Error::ConfigNotFound`] listing every probed path if none exists.
pub fn locate_config(root: &Path) -> Result<PathBuf> {
    let candidates = config_candidates(root)?;

    match candidates.iter().find(|path| path.is_file()) {
        Some(found) => {
            info!("Loading configuration from {}", found.display());
            Ok(found.clone())
        }
        None => Err(Error::config_not_found(candidates)),
    }
}

/// Inputs available to the language resolvers.
#[derive(Debug, Clone, Copy)]
pub struct LanguageSources<'a> {
    /// Language supplied by the caller
    pub explicit: Option<&'a str>,
    /// Parsed project configuration document
    pub config: &'a Document,
    /// Last-resort default
    pub default: &'a str,
}

type Resolver = fn(&LanguageSources<'_>) -> Option<String>;

/// Resolvers in precedence order; the first one returning a value wins.
const RESOLVERS: &[(&str, Resolver)] = &[
    ("explicit override", from_explicit),
    ("configuration section", from_settings_section),
    ("configuration metadata", from_metadata),
    ("default", from_default),
];

/// Resolves the effective target language.
#[must_use]
pub fn resolve_language(sources: &LanguageSources<'_>) -> String {
    RESOLVERS
        .iter()
        .find_map(|(source, resolve)| {
            resolve(sources).map(|language| {
                debug!("Target language '{}' taken from {}", language, source);
                language
            })
        })
        .unwrap_or_else(|| sources.default.to_string())
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn from_explicit(sources: &LanguageSources<'_>) -> Option<String> {
    sources.explicit.and_then(non_empty)
}

fn from_settings_section(sources: &LanguageSources<'_>) -> Option<String> {
    sources
        .config
        .section(SETTINGS_SECTION)?
        .lines()
        .find_map(language_field)
}

fn from_metadata(sources: &LanguageSources<'_>) -> Option<String> {
    sources.config.field("linguagem").and_then(non_empty)
}

fn from_default(sources: &LanguageSources<'_>) -> Option<String> {
    non_empty(sources.default)
}

/// Reads `Label: value`, `- Label: value` or `- **Label**: value` when the
/// label names the default language.
fn language_field(line: &str) -> Option<String> {
    let line = line.trim();
    let line = line.strip_prefix("- ").unwrap_or(line);
    let (label, value) = line.split_once(':')?;

    let label = strip_accents(label.trim().trim_matches('*').trim())
        .to_lowercase()
        .replace('_', " ");

    if LANGUAGE_LABELS.contains(&label.as_str()) {
        non_empty(value)
    } else {
        None
    }
}
