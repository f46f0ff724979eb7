//! Generate command report data structures.

use std::path::PathBuf;

use mwgen_codegen::Aspect;
use mwgen_core::{Diagnostic, Severity, WriteResult};

use super::output::{Output, Report};

/// Report data from wrapper generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Wrapped interface, qualified with its package name.
    pub interface: String,

    pub aspect: Aspect,

    /// Number of wrapped methods.
    pub method_count: usize,

    /// Diagnostics from synthesis.
    pub diagnostics: Vec<Diagnostic>,

    /// Whether info diagnostics are shown.
    pub show_notes: bool,

    /// Generation result (file written or preview).
    pub result: GenerationResult,
}

/// Result of wrapper generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// The unit was written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewFile),
}

/// Result when the unit was written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    pub path: PathBuf,
    pub status: WriteResult,
}

/// The unit in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    /// Path the unit would be written to.
    pub path: PathBuf,
    pub content: String,
}

impl GenerateReport {
    pub fn with_notes(mut self, show: bool) -> Self {
        self.show_notes = show;
        self
    }

    fn render_diagnostics(&self, out: &mut dyn Output) {
        for diag in &self.diagnostics {
            if diag.severity == Severity::Warning || self.show_notes {
                out.diagnostic(diag.severity, &diag.describe());
            }
        }
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        self.render_diagnostics(out);

        match &self.result {
            GenerationResult::Written(written) => {
                out.field("Interface", &self.interface);
                out.field("Aspect", self.aspect.as_str());
                out.field("Methods", &self.method_count.to_string());
                out.field(
                    "Generated",
                    &format!("{} ({})", written.path.display(), written.status.as_str()),
                );
            }
            GenerationResult::Preview(preview) => {
                out.divider(&preview.path.display().to_string());
                out.result(preview.content.trim_end());
                out.divider("Summary");
                out.result(&format!(
                    "{} with {} methods would be generated",
                    self.interface, self.method_count
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mwgen_core::Phase;

    use super::*;
    use crate::reports::output::BufferOutput;

    fn report(result: GenerationResult) -> GenerateReport {
        GenerateReport {
            interface: "orders.Service".to_string(),
            aspect: Aspect::Logging,
            method_count: 2,
            diagnostics: vec![
                Diagnostic::warning(Phase::Reflect, "embedded elements are not wrapped: io.Closer")
                    .at("Service"),
                Diagnostic::info(Phase::Synthesize, "Split returns 3 values; all of them are captured"),
            ],
            show_notes: false,
            result,
        }
    }

    #[test]
    fn test_render_written() {
        let mut out = BufferOutput::default();
        report(GenerationResult::Written(WrittenResult {
            path: "middleware/log.go".into(),
            status: WriteResult::Written,
        }))
        .render(&mut out);

        assert_eq!(
            out.stdout,
            vec![
                "Interface: orders.Service",
                "Aspect: logging",
                "Methods: 2",
                "Generated: middleware/log.go (written)",
            ]
        );
        assert_eq!(
            out.stderr,
            vec![(
                Severity::Warning,
                "embedded elements are not wrapped: io.Closer (at Service)".to_string()
            )]
        );
    }

    #[test]
    fn test_notes_only_when_requested() {
        let mut out = BufferOutput::default();
        report(GenerationResult::Preview(PreviewFile {
            path: "middleware/log.go".into(),
            content: "package middleware\n".to_string(),
        }))
        .with_notes(true)
        .render(&mut out);

        assert_eq!(out.stderr.len(), 2);
        assert_eq!(out.stderr[1].0, Severity::Info);
        assert!(out.stderr[1].1.starts_with("Split returns 3 values"));
        assert_eq!(out.stdout[0], "── middleware/log.go ──");
        assert_eq!(out.stdout[1], "package middleware");
    }
}
