//! Wrapper synthesis for the mwgen middleware generator.
//!
//! Given an [`InterfaceDescriptor`](mwgen_reflect::InterfaceDescriptor),
//! the [`Synthesizer`] renders a Go file declaring a wrapper type that
//! implements the same interface and weaves an [`Aspect`] (logging or
//! tracing) around every delegated call.
//!
//! # Module Organization
//!
//! - [`builder`] - Indented code building (CodeBuilder, CodeFragment, ...)
//! - [`go`] - Go syntax helpers (imports, funcs, structs, literals)
//! - [`aspect`] - Aspect tag, strategies and arity-indexed result capture

pub mod aspect;
pub mod builder;
pub mod go;
mod synth;
mod unit;

pub use aspect::{Aspect, AspectOptions, AspectStrategy, Capture, MethodScope};
pub use synth::{Synthesis, Synthesizer, synthesize};
pub use unit::{GeneratedUnit, MiddlewareFile};
