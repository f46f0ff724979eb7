//! Generate operation - wrapper synthesis for one reflected interface.

use std::path::PathBuf;

use eyre::{Context, Result, bail};
use mwgen_codegen::{Aspect, MiddlewareFile, Synthesis, Synthesizer};
use mwgen_core::{GeneratedFile, WriteResult};
use mwgen_reflect::InterfaceDescriptor;
use tracing::info;

use crate::reports::{GenerateReport, GenerationResult, PreviewFile, WrittenResult};

/// Settings for the generate operation, already resolved against
/// `mwgen.toml` and the built-in defaults.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Package directory; the output directory is relative to it.
    pub dir: PathBuf,
    pub aspect: Aspect,
    /// Output directory for the generated file.
    pub output: PathBuf,
    /// Package clause of the generated file.
    pub package: String,
    /// Default label; the interface name when unset.
    pub label: Option<String>,
    pub layer: String,
    pub logger_import: String,
    pub tracer_import: String,
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Execute the generate operation.
///
/// Synthesizes the wrapper for `iface` and writes it unless this is a dry run.
pub fn generate(iface: &InterfaceDescriptor, opts: &GenerateOptions) -> Result<GenerateReport> {
    let mut synthesizer = Synthesizer::new(opts.aspect)
        .package(&opts.package)
        .layer(&opts.layer)
        .logger_import(&opts.logger_import)
        .tracer_import(&opts.tracer_import);
    if let Some(label) = &opts.label {
        synthesizer = synthesizer.label(label);
    }
    let Synthesis { unit, diagnostics } = synthesizer.synthesize(iface);

    let file = MiddlewareFile::new(&opts.output, &unit);
    let path = file.path(&opts.dir);

    let result = if opts.dry_run {
        GenerationResult::Preview(PreviewFile {
            path,
            content: unit.content.clone(),
        })
    } else {
        let status = file
            .write(&opts.dir)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        if status == WriteResult::Skipped {
            bail!(
                "{} exists and was not generated by mwgen; refusing to overwrite it",
                path.display()
            );
        }
        info!(path = %path.display(), status = status.as_str(), "wrote unit");
        GenerationResult::Written(WrittenResult { path, status })
    };

    Ok(GenerateReport {
        interface: format!("{}.{}", iface.package, iface.name),
        aspect: opts.aspect,
        method_count: iface.methods.len(),
        diagnostics,
        show_notes: false,
        result,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use mwgen_reflect::{MethodDescriptor, TypeExpr};
    use tempfile::TempDir;

    use super::*;

    fn service() -> InterfaceDescriptor {
        InterfaceDescriptor {
            name: "Service".to_string(),
            package: "orders".to_string(),
            import_path: Some("example.com/shop/orders".to_string()),
            file: "service.go".into(),
            imports: Vec::new(),
            methods: vec![MethodDescriptor::new("Ping").returns(TypeExpr::named("error"))],
            embedded: Vec::new(),
        }
    }

    fn options(dir: &TempDir, dry_run: bool) -> GenerateOptions {
        GenerateOptions {
            dir: dir.path().to_path_buf(),
            aspect: Aspect::Tracing,
            output: "middleware".into(),
            package: "middleware".to_string(),
            label: None,
            layer: "service".to_string(),
            logger_import: "github.com/sirupsen/logrus".to_string(),
            tracer_import: "go.opentelemetry.io/otel".to_string(),
            dry_run,
        }
    }

    #[test]
    fn test_generate_writes_unit() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let report = generate(&service(), &options(&temp_dir, false)).unwrap();

        let path = temp_dir.path().join("middleware/trace.go");
        match &report.result {
            GenerationResult::Written(written) => {
                assert_eq!(written.path, path);
                assert_eq!(written.status, WriteResult::Written);
            }
            GenerationResult::Preview(_) => panic!("expected a written unit"),
        }
        assert_eq!(report.interface, "orders.Service");
        assert_eq!(report.method_count, 1);

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("func (m *traceMiddleware) Ping() error {"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let report = generate(&service(), &options(&temp_dir, true)).unwrap();

        assert!(matches!(report.result, GenerationResult::Preview(_)));
        assert!(!temp_dir.path().join("middleware").exists());
    }

    #[test]
    fn test_refuses_to_replace_hand_written_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("middleware/trace.go");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "package middleware\n").unwrap();

        let err = generate(&service(), &options(&temp_dir, false)).unwrap_err();
        assert!(err.to_string().contains("not generated by mwgen"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "package middleware\n");
    }
}
