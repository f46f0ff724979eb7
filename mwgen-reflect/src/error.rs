use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::lexer::Span;

/// Result type for reflection (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds one file's content and display name so parser errors can point
/// at the offending token.
#[derive(Debug, Clone)]
pub struct SourceContext<'a> {
    src: &'a str,
    filename: String,
}

impl<'a> SourceContext<'a> {
    /// Create a new source context.
    pub fn new(src: &'a str, filename: impl Into<String>) -> Self {
        Self {
            src,
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &'a str {
        self.src
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.to_string())
    }

    /// Create a lexer error.
    pub fn lex_error(&self, message: impl Into<String>, span: Span) -> Box<Error> {
        Box::new(Error::Lex {
            src: self.named_source(),
            span: span.into(),
            message: message.into(),
        })
    }

    /// Create a syntax error.
    pub fn syntax_error(
        &self,
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Box<Error> {
        Box::new(Error::Syntax {
            src: self.named_source(),
            span: span.into(),
            expected: expected.into(),
            found: found.into(),
        })
    }

    /// Create a generic interface error.
    pub fn generic_interface_error(&self, name: impl Into<String>, span: Span) -> Box<Error> {
        Box::new(Error::GenericInterface {
            src: self.named_source(),
            span: span.into(),
            name: name.into(),
        })
    }

    /// Create a duplicate method error.
    pub fn duplicate_method_error(
        &self,
        name: impl Into<String>,
        first: Span,
        second: Span,
    ) -> Box<Error> {
        Box::new(Error::DuplicateMethod {
            src: self.named_source(),
            first_span: first.into(),
            second_span: second.into(),
            name: name.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(mwgen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no Go source files in '{dir}'")]
    #[diagnostic(
        code(mwgen::no_source_files),
        help("pass the directory that declares the interface with --dir")
    )]
    NoSourceFiles { dir: PathBuf },

    #[error("{message}")]
    #[diagnostic(code(mwgen::lex_error))]
    Lex {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(mwgen::syntax_error))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected {expected}")]
        span: SourceSpan,
        expected: String,
        found: String,
    },

    #[error("interface '{name}' not found in '{dir}'")]
    #[diagnostic(
        code(mwgen::interface_not_found),
        help("run 'mwgen list' to see the interfaces declared in this directory")
    )]
    InterfaceNotFound { name: String, dir: PathBuf },

    #[error("interface '{name}' has type parameters")]
    #[diagnostic(
        code(mwgen::generic_interface),
        help("generic interfaces cannot be wrapped; declare a non-generic interface for the instantiation you need")
    )]
    GenericInterface {
        #[source_code]
        src: NamedSource<String>,
        #[label("declared with type parameters here")]
        span: SourceSpan,
        name: String,
    },

    #[error("duplicate method '{name}'")]
    #[diagnostic(code(mwgen::duplicate_method))]
    DuplicateMethod {
        #[source_code]
        src: NamedSource<String>,
        #[label("first declared here")]
        first_span: SourceSpan,
        #[label("declared again here")]
        second_span: SourceSpan,
        name: String,
    },
}

impl Error {
    /// Whether this is a parse failure (as opposed to a lookup or I/O failure).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::Lex { .. }
                | Error::Syntax { .. }
                | Error::GenericInterface { .. }
                | Error::DuplicateMethod { .. }
        )
    }

    /// Whether the requested interface does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::InterfaceNotFound { .. })
    }
}
