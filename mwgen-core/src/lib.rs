//! Core utilities and types for the mwgen middleware generator.
//!
//! This crate provides the plumbing shared by the reflector, the code
//! generator and the command-line tool: writing generated files,
//! non-fatal diagnostics and the `mwgen.toml` configuration.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod diagnostic;
mod file;
mod utils;

/// Header placed at the top of every generated Go file.
///
/// Matches the pattern recognised by `go generate` tooling and linters.
pub const GENERATED_HEADER: &str = "// Code generated by mwgen; DO NOT EDIT.";

// Configuration
pub use config::{
    CONFIG_FILE_NAME, Config, ConfigError, DEFAULT_LAYER, DEFAULT_LOGGER_IMPORT, DEFAULT_OUTPUT,
    DEFAULT_TRACER_IMPORT,
};
// Diagnostics
pub use diagnostic::{Diagnostic, Phase, Severity};
// File operations
pub use file::{FileRules, GeneratedFile, WriteResult};
// String utilities
pub use utils::{is_go_identifier, package_name_from_dir};
