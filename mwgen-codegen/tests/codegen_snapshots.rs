//! Snapshot tests for wrapper synthesis.
//!
//! These tests verify that the generated Go code matches expected output.
//! Run `cargo insta review` to update snapshots when making intentional changes.

use std::fs;

use mwgen_codegen::{Aspect, MiddlewareFile, Synthesizer};
use mwgen_core::{GeneratedFile, WriteResult};
use mwgen_reflect::{GoModule, InterfaceDescriptor};
use tempfile::TempDir;

const SERVICE_GO: &str = r#"package orders

import (
	"context"
	"time"
)

// Service manages orders.
type Service interface {
	Add(ctx context.Context, item Item) error
	Get(ctx context.Context, id uint) (*Item, error)
	List(ctx context.Context, since time.Time, tags ...string) ([]Item, error)
	Notify(msg string)
}

type Item struct {
	ID   uint
	Name string
}
"#;

/// Reflect `name` from a package made of `files`.
fn reflect(files: &[(&str, &str)], name: &str) -> InterfaceDescriptor {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    for (file, content) in files {
        fs::write(temp_dir.path().join(file), content).expect("Failed to write source");
    }
    GoModule::open(temp_dir.path())
        .expect("Failed to load package")
        .with_import_path("example.com/shop/orders")
        .reflect(name)
        .expect("Failed to reflect interface")
}

fn generate(aspect: Aspect, iface: &InterfaceDescriptor) -> String {
    let synthesis = Synthesizer::new(aspect).label("orders").synthesize(iface);
    assert!(
        synthesis.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        synthesis.diagnostics
    );
    synthesis.unit.content
}

#[test]
fn test_logging_service() {
    let iface = reflect(&[("service.go", SERVICE_GO)], "Service");
    let content = generate(Aspect::Logging, &iface);
    insta::assert_snapshot!("logging_service", content);
}

#[test]
fn test_tracing_service() {
    let iface = reflect(&[("service.go", SERVICE_GO)], "Service");
    let content = generate(Aspect::Tracing, &iface);
    insta::assert_snapshot!("tracing_service", content);
}

#[test]
fn test_locals_avoid_parameter_names() {
    let iface = reflect(
        &[(
            "repo.go",
            "package orders\n\ntype Repo interface {\n\tSave(m Item, res string, span int) (string, error)\n}\n",
        )],
        "Repo",
    );

    let logging = generate(Aspect::Logging, &iface);
    assert!(logging.contains("func (mw *logMiddleware) Save(m orders.Item, res string, span int) (string, error) {"));
    assert!(logging.contains("res1, err := mw.next.Save(m, res, span)"));
    assert!(logging.contains("\"service\": mw.serviceName,"));
    assert!(logging.contains("return res1, err"));

    let tracing = generate(Aspect::Tracing, &iface);
    assert!(tracing.contains("tracer := otel.Tracer(mw.tracerName)"));
    assert!(tracing.contains("_, span1 := tracer.Start(context.Background(), \"Save\")"));
    assert!(tracing.contains("defer span1.End()"));
}

#[test]
fn test_unnamed_parameters_are_named() {
    let iface = reflect(
        &[(
            "store.go",
            "package orders\n\nimport \"context\"\n\ntype Store interface {\n\tPut(context.Context, string, []byte) error\n}\n",
        )],
        "Store",
    );

    let content = generate(Aspect::Tracing, &iface);
    assert!(content.contains(
        "func (m *traceMiddleware) Put(arg0 context.Context, arg1 string, arg2 []byte) error {"
    ));
    assert!(content.contains("arg0, span := tracer.Start(arg0, \"Put\")"));
    assert!(content.contains("err := m.next.Put(arg0, arg1, arg2)"));
}

#[test]
fn test_empty_interface() {
    let iface = reflect(
        &[("empty.go", "package orders\n\ntype Empty interface{}\n")],
        "Empty",
    );

    let logging = generate(Aspect::Logging, &iface);
    assert!(!logging.contains("github.com/sirupsen/logrus"));

    let content = generate(Aspect::Tracing, &iface);
    assert!(content.contains("\nimport \"example.com/shop/orders\"\n"));
    assert!(!content.contains("go.opentelemetry.io/otel"));
    assert!(content.contains("func NewTraceMiddleware(service orders.Empty, tracerName string) orders.Empty {"));
    assert!(!content.contains("func (m *traceMiddleware)"));
    assert!(content.ends_with("type traceMiddleware struct {\n\tnext       orders.Empty\n\ttracerName string\n}\n"));
}

#[test]
fn test_write_unit_to_output_directory() {
    let iface = reflect(&[("service.go", SERVICE_GO)], "Service");
    let synthesis = Synthesizer::new(Aspect::Logging).synthesize(&iface);

    let module = TempDir::new().expect("Failed to create temp dir");
    let file = MiddlewareFile::new("internal/middleware", &synthesis.unit);
    let result = file.write(module.path()).expect("Failed to write unit");
    assert_eq!(result, WriteResult::Written);

    let written = fs::read_to_string(module.path().join("internal/middleware/log.go"))
        .expect("Failed to read unit");
    assert_eq!(written, synthesis.unit.content);
}
