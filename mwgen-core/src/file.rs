use std::path::{Path, PathBuf};

use eyre::{Context, Result};

/// A file produced by the generator.
pub trait GeneratedFile {
    /// Location of the file under `base`.
    fn path(&self, base: &Path) -> PathBuf;

    fn rules(&self) -> FileRules;

    fn render(&self) -> String;

    /// Write the file under `base`, creating parent directories as needed.
    ///
    /// An existing file is replaced only if it carries the header from
    /// [`FileRules::header`]; anything else is left alone and reported as
    /// [`WriteResult::Skipped`].
    fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = self.path(base);
        let content = self.render();

        if path.exists() {
            let current = std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            if current == content {
                return Ok(WriteResult::Unchanged);
            }
            if !self.rules().may_replace(&current) {
                return Ok(WriteResult::Skipped);
            }
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, content)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        Ok(WriteResult::Written)
    }
}

/// Outcome of [`GeneratedFile::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    Written,
    /// The file already had identical content.
    Unchanged,
    /// An existing file was not generated by us.
    Skipped,
}

impl WriteResult {
    /// Word used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteResult::Written => "written",
            WriteResult::Unchanged => "unchanged",
            WriteResult::Skipped => "skipped",
        }
    }
}

/// How a generated file treats whatever already exists at its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRules {
    /// First line that marks a file as generated. `None` replaces any file.
    pub header: Option<&'static str>,
}

impl FileRules {
    /// Replace existing files unconditionally.
    pub fn always() -> Self {
        Self { header: None }
    }

    fn may_replace(&self, current: &str) -> bool {
        match self.header {
            Some(header) => current.lines().next() == Some(header),
            None => true,
        }
    }
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            header: Some(crate::GENERATED_HEADER),
        }
    }
}
