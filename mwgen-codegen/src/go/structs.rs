//! Go struct types and keyed composite literals.

use crate::builder::{CodeFragment, Renderable, align_columns};

/// Builder for a `type Name struct { ... }` declaration.
#[derive(Debug, Clone)]
pub struct Struct {
    name: String,
    doc: Option<String>,
    fields: Vec<(String, String)>,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            fields: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.fields.push((name.into(), ty.into()));
        self
    }
}

impl Renderable for Struct {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::comment(doc.clone()));
        }
        if self.fields.is_empty() {
            fragments.push(CodeFragment::line(format!("type {} struct{{}}", self.name)));
        } else {
            fragments.push(CodeFragment::block(
                format!("type {} struct {{", self.name),
                align_columns(&self.fields)
                    .into_iter()
                    .map(CodeFragment::Line)
                    .collect(),
                Some("}".to_string()),
            ));
        }
        fragments
    }
}

/// A keyed composite literal spread over several lines, e.g.
///
/// ```text
/// log.Fields{
///     "service": m.serviceName,
///     "method":  "Get",
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CompositeLit {
    ty: String,
    entries: Vec<(String, String)>,
}

impl CompositeLit {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Embed the literal in an expression: `before` precedes the type name
    /// on the opening line and `after` follows the closing brace.
    pub fn wrap(&self, before: &str, after: &str) -> CodeFragment {
        let rows: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|(key, value)| (format!("{}:", key), format!("{},", value)))
            .collect();

        CodeFragment::block(
            format!("{}{}{{", before, self.ty),
            align_columns(&rows)
                .into_iter()
                .map(CodeFragment::Line)
                .collect(),
            Some(format!("}}{}", after)),
        )
    }
}

impl Renderable for CompositeLit {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![self.wrap("", "")]
    }
}
