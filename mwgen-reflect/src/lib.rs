//! Go interface reflection for the mwgen middleware generator.
//!
//! This crate reads the Go files of one package directory and produces an
//! ordered, structured description of a named interface: its methods with
//! parameter names and types and their return types. Bodies and
//! expressions are never parsed.
//!
//! ```no_run
//! let service = mwgen_reflect::reflect("./orders", "Service")?;
//! for method in &service.methods {
//!     println!("{}", method.signature());
//! }
//! # Ok::<(), Box<mwgen_reflect::Error>>(())
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod descriptor;
mod error;
mod lexer;
mod module;
mod parser;
mod types;

pub use descriptor::{
    CONTEXT_PARAM, ImportSpec, InterfaceDescriptor, MethodDescriptor, Param, SourceFile, TypeDecl,
    TypeDeclKind,
};
pub use error::{Error, Result, SourceContext};
pub use lexer::{LexError, Span, Spanned, Token, tokenize};
pub use module::{GoModule, LoadOptions, find_import_path, reflect};
pub use parser::parse_type;
pub use types::{ChanDir, FuncField, InterfaceElem, StructField, TypeExpr, UnionTerm};
