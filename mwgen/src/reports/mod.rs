//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod generate;
mod list;
mod output;

pub use generate::{GenerateReport, GenerationResult, PreviewFile, WrittenResult};
pub use list::ListReport;
pub use output::{Report, TerminalOutput};
