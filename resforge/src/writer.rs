//! Writes generated files with force / dry-run / skip-existing semantics

use crate::error::Result;
use std::fmt;
use std::fs;
use std::path::Path;

/// What [`FileWriter::write`] did with a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Dry run; nothing touched
    DryRun,
    /// File existed and `force` was off
    Skipped,
    /// Content written
    Written,
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DryRun => "DRY",
            Self::Skipped => "SKIP",
            Self::Written => "WRITE",
        })
    }
}

/// Filesystem writer for generated content
#[derive(Debug, Default, Clone, Copy)]
pub struct FileWriter;

impl FileWriter {
    /// Create a writer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Write `content` to `path`
    ///
    /// In dry-run mode nothing is created. An existing file is left alone
    /// unless `force` is set. Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or the file cannot
    /// be written.
    #[allow(clippy::unused_self)]
    pub fn write(
        &self,
        path: &Path,
        content: &str,
        force: bool,
        dry_run: bool,
    ) -> Result<WriteOutcome> {
        if dry_run {
            tracing::info!(path = %path.display(), "dry run");
            return Ok(WriteOutcome::DryRun);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if path.is_file() && !force {
            tracing::warn!(path = %path.display(), "file exists, skipping");
            return Ok(WriteOutcome::Skipped);
        }

        fs::write(path, content)?;
        tracing::info!(path = %path.display(), bytes = content.len(), "wrote file");
        Ok(WriteOutcome::Written)
    }
}
