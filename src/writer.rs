use crate::{
    config::Config,
    error::{Error, Result},
};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::SystemTime,
};
use tracing::{debug, info};

/// Separator placed between consecutive prompts in the output file.
pub const PROMPT_SEPARATOR: &str = "\n\n";

/// Writes the compiled prompt file with atomic operations.
pub(crate) struct Writer {
    output_path: PathBuf,
    backup_existing: bool,
}

impl Writer {
    /// Creates a new writer from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            output_path: config.output_path.clone(),
            backup_existing: config.backup_existing,
        }
    }

    /// Returns the destination path.
    pub(crate) fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Joins `prompts` and writes them to the output path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory cannot be created
    /// - The backup copy fails
    /// - File write operations fail
    pub(crate) fn write_prompts(&self, prompts: &[String]) -> Result<()> {
        if let Some(parent) = self
            .output_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let content = prompts.join(PROMPT_SEPARATOR);
        self.write_file_atomic(&self.output_path, &content)?;

        info!(
            "Wrote {} prompt(s) to {}",
            prompts.len(),
            self.output_path.display()
        );
        Ok(())
    }

    /// Writes a file atomically with optional backup.
    ///
    /// # Process
    ///
    /// 1. Creates backup if file exists and backup is enabled
    /// 2. Writes content to temporary file
    /// 3. Syncs temporary file to disk
    /// 4. Atomically renames temporary file to target path
    fn write_file_atomic(&self, path: &Path, content: &str) -> Result<()> {
        if path.exists() && self.backup_existing {
            Self::backup_file(path)?;
        }

        let temp_path = path.with_extension("tmp");
        let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| Error::io(&temp_path, e))?;

        temp_file
            .sync_all()
            .map_err(|e| Error::io(&temp_path, e))?;

        drop(temp_file);

        fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

        Ok(())
    }

    /// Creates a timestamped backup of an existing file.
    fn backup_file(path: &Path) -> Result<PathBuf> {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|e| Error::config(format!("System clock before UNIX epoch: {e}")))?
            .as_nanos();

        let filename = path
            .file_name()
            .ok_or_else(|| Error::config("Invalid file path"))?
            .to_string_lossy();

        let backup_path = path.with_file_name(format!("{filename}.backup.{timestamp}"));

        fs::copy(path, &backup_path).map_err(|e| Error::io(&backup_path, e))?;

        debug!("Created backup: {}", backup_path.display());
        Ok(backup_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn writer(output_path: &Path, backup_existing: bool) -> Writer {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder()
            .root_dir(temp.path())
            .output_path(output_path)
            .backup_existing(backup_existing)
            .build()
            .unwrap();
        Writer::new(&config)
    }

    fn prompts() -> Vec<String> {
        vec!["primeiro".to_string(), "segundo".to_string()]
    }

    #[test]
    fn test_writes_joined_prompts() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.child("prompt.txt");

        writer(output.path(), false).write_prompts(&prompts()).unwrap();

        output.assert("primeiro\n\nsegundo");
        temp.child("prompt.tmp").assert(predicates::path::missing());
    }

    #[test]
    fn test_creates_parent_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.child("saida/prompts/prompt.txt");

        writer(output.path(), false).write_prompts(&prompts()).unwrap();

        assert!(output.exists());
    }

    #[test]
    fn test_empty_prompt_list_writes_empty_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.child("prompt.txt");

        writer(output.path(), false).write_prompts(&[]).unwrap();

        output.assert("");
    }

    #[test]
    fn test_overwrites_without_backup() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.child("prompt.txt");
        output.write_str("old content").unwrap();

        writer(output.path(), false).write_prompts(&prompts()).unwrap();

        output.assert("primeiro\n\nsegundo");
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_creates_backup() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.child("prompt.txt");
        output.write_str("old content").unwrap();

        writer(output.path(), true).write_prompts(&prompts()).unwrap();

        let backups: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().contains("prompt.txt.backup."))
            .collect();

        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "old content");
        output.assert("primeiro\n\nsegundo");
    }
}
