//! Go function and method declarations.

use crate::builder::{CodeFragment, Renderable};

/// Builder for a Go `func` declaration.
#[derive(Debug, Clone)]
pub struct Func {
    name: String,
    doc: Option<String>,
    receiver: Option<(String, String)>,
    params: Vec<(String, String)>,
    results: Vec<String>,
    body: Vec<CodeFragment>,
}

impl Func {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            receiver: None,
            params: Vec::new(),
            results: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Make this a method with receiver `name ty` (e.g. `m *logMiddleware`).
    pub fn receiver(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.receiver = Some((name.into(), ty.into()));
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push((name.into(), ty.into()));
        self
    }

    pub fn result(mut self, ty: impl Into<String>) -> Self {
        self.results.push(ty.into());
        self
    }

    pub fn body(mut self, body: Vec<CodeFragment>) -> Self {
        self.body = body;
        self
    }

    /// The declaration line without the opening brace.
    ///
    /// Results are parenthesized when there is more than one.
    pub fn signature(&self) -> String {
        let mut sig = String::from("func ");
        if let Some((name, ty)) = &self.receiver {
            sig.push_str(&format!("({} {}) ", name, ty));
        }
        let params = self
            .params
            .iter()
            .map(|(name, ty)| format!("{} {}", name, ty))
            .collect::<Vec<_>>()
            .join(", ");
        sig.push_str(&format!("{}({})", self.name, params));
        match self.results.as_slice() {
            [] => {}
            [single] => sig.push_str(&format!(" {}", single)),
            results => sig.push_str(&format!(" ({})", results.join(", "))),
        }
        sig
    }
}

impl Renderable for Func {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::comment(doc.clone()));
        }
        fragments.push(CodeFragment::block(
            format!("{} {{", self.signature()),
            self.body.clone(),
            Some("}".to_string()),
        ));
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CodeBuilder;

    #[test]
    fn test_method_signature() {
        let func = Func::new("Get")
            .receiver("m", "*logMiddleware")
            .param("ctx", "context.Context")
            .param("id", "uint")
            .result("orders.Item")
            .result("error");

        assert_eq!(
            func.signature(),
            "func (m *logMiddleware) Get(ctx context.Context, id uint) (orders.Item, error)"
        );
    }

    #[test]
    fn test_single_result_is_not_parenthesized() {
        let func = Func::new("Add").param("item", "Item").result("error");
        assert_eq!(func.signature(), "func Add(item Item) error");
        assert_eq!(Func::new("Ping").signature(), "func Ping()");
    }

    #[test]
    fn test_render_with_doc_and_body() {
        let func = Func::new("Ping")
            .doc("Ping does nothing.")
            .body(vec![CodeFragment::line("return")]);

        let mut builder = CodeBuilder::new();
        builder.emit(&func);
        assert_eq!(
            builder.build(),
            "// Ping does nothing.\nfunc Ping() {\n\treturn\n}\n"
        );
    }
}
