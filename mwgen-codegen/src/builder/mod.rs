//! Code generation building blocks.
//!
//! - [`CodeBuilder`] - Tab-indented text assembly
//! - [`CodeFragment`] - Intermediate representation for code pieces
//! - [`Renderable`] - Trait for types that can be converted to code fragments
//! - [`align_columns`] - gofmt-style column alignment

mod align;
mod code_builder;
mod renderable;

pub use align::align_columns;
pub use code_builder::CodeBuilder;
pub use renderable::{CodeFragment, Renderable};
