//! Tab-indented text assembly for Go source.

use super::{CodeFragment, Renderable};

/// Accumulates generated Go source, one line at a time.
///
/// Indentation is always one tab per level, as gofmt writes it. Blank lines
/// never carry indentation.
///
/// ```
/// use mwgen_codegen::builder::{CodeBuilder, CodeFragment};
///
/// let mut builder = CodeBuilder::new();
/// builder.push_line("package middleware").push_blank().emit(&CodeFragment::block(
///     "func ping() {",
///     vec![CodeFragment::line("return")],
///     Some("}".to_string()),
/// ));
///
/// assert_eq!(
///     builder.build(),
///     "package middleware\n\nfunc ping() {\n\treturn\n}\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    depth: usize,
    buffer: String,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, s: &str) -> &mut Self {
        for _ in 0..self.depth {
            self.buffer.push('\t');
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Add a `//` comment line.
    pub fn push_comment(&mut self, text: &str) -> &mut Self {
        self.push_line(&format!("// {}", text))
    }

    /// Emit every fragment of `node` at the current depth.
    pub fn emit(&mut self, node: &(impl Renderable + ?Sized)) -> &mut Self {
        for fragment in node.to_fragments() {
            self.apply(fragment);
        }
        self
    }

    fn apply(&mut self, fragment: CodeFragment) {
        match fragment {
            CodeFragment::Line(s) => {
                self.push_line(&s);
            }
            CodeFragment::Blank => {
                self.push_blank();
            }
            CodeFragment::Comment(text) => {
                self.push_comment(&text);
            }
            CodeFragment::Sequence(fragments) => {
                for f in fragments {
                    self.apply(f);
                }
            }
            CodeFragment::Block {
                header,
                body,
                close,
            } => {
                self.push_line(&header);
                self.depth += 1;
                for f in body {
                    self.apply(f);
                }
                self.depth -= 1;
                if let Some(close) = close {
                    self.push_line(&close);
                }
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }
}
