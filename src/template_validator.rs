use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tera::Tera;

/// Maximum template file size (1MB)
const MAX_TEMPLATE_SIZE: u64 = 1024 * 1024;

/// Variables every prompt template has to use
const REQUIRED_VARIABLES: &[&str] = &["language", "name"];

/// Optional but commonly used variables
const OPTIONAL_VARIABLES: &[&str] = &[
    "version",
    "author",
    "kind",
    "sections",
    "extras",
    "reference",
    "tags",
];

/// Validates user supplied prompt templates.
pub(crate) struct TemplateValidator;

impl TemplateValidator {
    /// Validates a template file and returns its content.
    ///
    /// Checks that the file is readable, within the size limit, non-empty,
    /// compiles with Tera and uses the required variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the checks fails.
    pub(crate) fn load(path: &Path) -> Result<String> {
        let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;

        if !metadata.is_file() {
            return Err(Error::template_validation(
                path.to_string_lossy(),
                "Path is not a file",
            ));
        }

        if metadata.len() > MAX_TEMPLATE_SIZE {
            return Err(Error::template_validation(
                path.to_string_lossy(),
                format!(
                    "Template file too large: {} bytes (max: {} bytes)",
                    metadata.len(),
                    MAX_TEMPLATE_SIZE
                ),
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        if content.trim().is_empty() {
            return Err(Error::template_validation(
                path.to_string_lossy(),
                "Template file is empty",
            ));
        }

        let mut temp_tera = Tera::default();
        temp_tera
            .add_raw_template("validation", &content)
            .map_err(|e| {
                Error::template_validation(
                    path.to_string_lossy(),
                    format!("Template syntax error: {e}"),
                )
            })?;

        Self::check_required_variables(&content, path)?;
        Self::check_optional_variables(&content);

        Ok(content)
    }

    fn uses_variable(content: &str, var: &str) -> bool {
        content.contains(&format!("ctx.{var}"))
    }

    /// Heuristic check that the template references the required variables.
    fn check_required_variables(content: &str, path: &Path) -> Result<()> {
        let missing: Vec<&str> = REQUIRED_VARIABLES
            .iter()
            .filter(|var| !Self::uses_variable(content, var))
            .copied()
            .collect();

        if !missing.is_empty() {
            return Err(Error::template_validation(
                path.to_string_lossy(),
                format!(
                    "Template is missing required variables: {}. \
                    Prompt templates should name ctx.language and ctx.name.",
                    missing.join(", ")
                ),
            ));
        }

        Ok(())
    }

    fn check_optional_variables(content: &str) {
        for var in OPTIONAL_VARIABLES {
            if !Self::uses_variable(content, var) {
                tracing::debug!("Template does not use optional variable: {}", var);
            }
        }
    }
}
