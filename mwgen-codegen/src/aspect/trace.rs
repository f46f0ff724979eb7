//! Distributed tracing: one span per call, named after the method.

use mwgen_reflect::{ImportSpec, MethodDescriptor};

use super::{Aspect, AspectOptions, AspectStrategy, MethodScope, WrapperNames, wrapper_preamble};
use crate::{
    builder::CodeFragment,
    go::{Import, quote},
};

const NAMES: WrapperNames = WrapperNames {
    constant: "DefaultTraceTracerName",
    constructor: "NewTraceMiddleware",
    wrapper: "traceMiddleware",
    label_field: "tracerName",
};

/// Opens a span around the delegate call.
///
/// When the method takes a call context, the span is started from it and
/// the context parameter is rebound to the span context, so the delegate
/// sees the span as its parent. Otherwise the span starts from
/// `context.Background()`.
#[derive(Debug, Clone)]
pub struct TracingStrategy {
    options: AspectOptions,
}

impl TracingStrategy {
    pub fn new(options: AspectOptions) -> Self {
        Self { options }
    }

    fn tracer_package(&self) -> String {
        ImportSpec::new(self.options.tracer_import.as_str())
            .local_name()
            .to_string()
    }
}

impl AspectStrategy for TracingStrategy {
    fn aspect(&self) -> Aspect {
        Aspect::Tracing
    }

    fn wrapper_type(&self) -> &'static str {
        NAMES.wrapper
    }

    fn imports(&self, methods: &[MethodDescriptor]) -> Vec<Import> {
        if methods.is_empty() {
            return Vec::new();
        }
        let mut imports = vec![Import::new(&self.options.tracer_import)];
        if methods.iter().any(|m| m.context_param().is_none()) {
            imports.push(Import::new("context"));
        }
        imports
    }

    fn render_preamble(&self, interface: &str, service: &str) -> Vec<CodeFragment> {
        wrapper_preamble(
            &NAMES,
            service,
            &self.options.label,
            format!(
                "{} is the tracer name used when none is given.",
                NAMES.constant
            ),
            format!(
                "{} returns a {} that records a span around every call to service.",
                NAMES.constructor, interface
            ),
        )
    }

    fn render_method(&self, scope: &mut MethodScope<'_>) -> Vec<CodeFragment> {
        let tracer = scope.fresh("tracer");
        let span = scope.fresh("span");
        let name = quote(scope.name());

        let start = match scope.context() {
            Some(ctx) => format!("{}, {} := {}.Start({}, {})", ctx, span, tracer, ctx, name),
            None => format!(
                "_, {} := {}.Start(context.Background(), {})",
                span, tracer, name
            ),
        };

        let capture = scope.capture();
        let mut body = vec![
            CodeFragment::line(format!(
                "{} := {}.Tracer({}.{})",
                tracer,
                self.tracer_package(),
                scope.receiver(),
                NAMES.label_field
            )),
            CodeFragment::line(start),
            CodeFragment::line(format!("defer {}.End()", span)),
            CodeFragment::blank(),
            CodeFragment::line(capture.call_line(&scope.delegate_call())),
        ];
        if let Some(ret) = capture.return_line() {
            body.push(CodeFragment::line(ret));
        }
        body
    }
}
