//! Aspect strategies: the cross-cutting behavior woven around each call.
//!
//! An [`Aspect`] tag selects a boxed [`AspectStrategy`]. The synthesizer
//! only talks to the trait, so adding an aspect means adding a variant and
//! a strategy.

mod capture;
mod logging;
mod scope;
mod trace;

use std::{fmt, str::FromStr};

use mwgen_core::{DEFAULT_LAYER, DEFAULT_LOGGER_IMPORT, DEFAULT_TRACER_IMPORT};
use mwgen_reflect::MethodDescriptor;
use serde::{Deserialize, Serialize};

pub use self::{
    capture::Capture, logging::LoggingStrategy, scope::MethodScope, trace::TracingStrategy,
};
use crate::{
    builder::{CodeFragment, Renderable},
    go::{CompositeLit, Func, Import, Struct, quote},
};

/// Supported aspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    /// Structured request/response logging.
    Logging,
    /// Distributed tracing spans.
    Tracing,
}

impl Aspect {
    pub const ALL: [Aspect; 2] = [Aspect::Logging, Aspect::Tracing];

    /// Returns the aspect identifier as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::Logging => "logging",
            Aspect::Tracing => "tracing",
        }
    }

    /// Stem of the generated file name (`log.go`, `trace.go`).
    pub fn file_stem(&self) -> &'static str {
        match self {
            Aspect::Logging => "log",
            Aspect::Tracing => "trace",
        }
    }

    /// The strategy implementing this aspect.
    pub fn strategy(&self, options: AspectOptions) -> Box<dyn AspectStrategy> {
        match self {
            Aspect::Logging => Box::new(LoggingStrategy::new(options)),
            Aspect::Tracing => Box::new(TracingStrategy::new(options)),
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Aspect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logging" => Ok(Aspect::Logging),
            "tracing" => Ok(Aspect::Tracing),
            _ => Err(format!(
                "unknown aspect '{}', expected 'logging' or 'tracing'",
                s
            )),
        }
    }
}

/// Settings shared by every strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectOptions {
    /// Default aspect label baked into the generated constant.
    pub label: String,
    /// Layer tag of log events.
    pub layer: String,
    /// Import path of the structured logger, imported as `log`.
    pub logger_import: String,
    /// Import path of the tracing API.
    pub tracer_import: String,
}

impl AspectOptions {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            layer: DEFAULT_LAYER.to_string(),
            logger_import: DEFAULT_LOGGER_IMPORT.to_string(),
            tracer_import: DEFAULT_TRACER_IMPORT.to_string(),
        }
    }
}

/// A cross-cutting behavior rendered around every delegated call.
pub trait AspectStrategy {
    fn aspect(&self) -> Aspect;

    /// Name of the generated (unexported) wrapper type.
    fn wrapper_type(&self) -> &'static str;

    /// Runtime packages the generated unit needs for `methods`.
    fn imports(&self, methods: &[MethodDescriptor]) -> Vec<Import>;

    /// Declarations emitted once: default label, constructor, wrapper type.
    ///
    /// `interface` is the wrapped interface's name and `service` its type as
    /// written from the generated package (e.g. `orders.Service`).
    fn render_preamble(&self, interface: &str, service: &str) -> Vec<CodeFragment>;

    /// Body statements of one wrapped method.
    fn render_method(&self, scope: &mut MethodScope<'_>) -> Vec<CodeFragment>;
}

/// Identifiers of one wrapper flavor.
struct WrapperNames {
    constant: &'static str,
    constructor: &'static str,
    wrapper: &'static str,
    label_field: &'static str,
}

/// Default-label constant, constructor and wrapper struct.
fn wrapper_preamble(
    names: &WrapperNames,
    service: &str,
    label: &str,
    constant_doc: String,
    constructor_doc: String,
) -> Vec<CodeFragment> {
    let constructor = Func::new(names.constructor)
        .doc(constructor_doc)
        .param("service", service)
        .param(names.label_field, "string")
        .result(service)
        .body(vec![
            CompositeLit::new(names.wrapper)
                .entry("next", "service")
                .entry(names.label_field, names.label_field)
                .wrap("return &", ""),
        ]);

    let wrapper = Struct::new(names.wrapper)
        .field("next", service)
        .field(names.label_field, "string");

    vec![
        CodeFragment::comment(constant_doc),
        CodeFragment::line(format!("const {} = {}", names.constant, quote(label))),
        CodeFragment::blank(),
        CodeFragment::sequence(constructor.to_fragments()),
        CodeFragment::blank(),
        CodeFragment::sequence(wrapper.to_fragments()),
    ]
}
