use std::path::{Path, PathBuf};

use mwgen_core::{FileRules, GeneratedFile};

use crate::aspect::Aspect;

/// One complete generated Go source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub aspect: Aspect,
    /// Name of the wrapped interface.
    pub interface: String,
    /// Package clause of the generated file.
    pub package: String,
    pub content: String,
}

impl GeneratedUnit {
    /// `log.go` or `trace.go`, depending on the aspect.
    pub fn file_name(&self) -> String {
        format!("{}.go", self.aspect.file_stem())
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A generated unit placed in an output directory, relative to the module
/// root it is written into.
#[derive(Debug, Clone)]
pub struct MiddlewareFile<'a> {
    output: PathBuf,
    unit: &'a GeneratedUnit,
}

impl<'a> MiddlewareFile<'a> {
    pub fn new(output: impl Into<PathBuf>, unit: &'a GeneratedUnit) -> Self {
        Self {
            output: output.into(),
            unit,
        }
    }
}

impl GeneratedFile for MiddlewareFile<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(&self.output).join(self.unit.file_name())
    }

    fn rules(&self) -> FileRules {
        FileRules::default()
    }

    fn render(&self) -> String {
        self.unit.content.clone()
    }
}

#[cfg(test)]
mod tests {
    use mwgen_core::WriteResult;
    use tempfile::TempDir;

    use super::*;

    fn unit(aspect: Aspect) -> GeneratedUnit {
        GeneratedUnit {
            aspect,
            interface: "Service".to_string(),
            package: "middleware".to_string(),
            content: "package middleware\n".to_string(),
        }
    }

    #[test]
    fn test_file_name_follows_aspect() {
        assert_eq!(unit(Aspect::Logging).file_name(), "log.go");
        assert_eq!(unit(Aspect::Tracing).file_name(), "trace.go");
    }

    #[test]
    fn test_write_creates_output_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let unit = unit(Aspect::Tracing);
        let file = MiddlewareFile::new("middleware", &unit);

        let result = file.write(temp_dir.path()).expect("Failed to write");
        assert_eq!(result, WriteResult::Written);

        let path = temp_dir.path().join("middleware").join("trace.go");
        assert_eq!(
            std::fs::read_to_string(&path).expect("Failed to read"),
            "package middleware\n"
        );

        let again = file.write(temp_dir.path()).expect("Failed to write");
        assert_eq!(again, WriteResult::Unchanged);
    }
}
