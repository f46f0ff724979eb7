//! List command report data structures.

use std::path::PathBuf;

use mwgen_reflect::InterfaceDescriptor;

use super::output::{Output, Report};

/// Interfaces declared in one package.
#[derive(Debug)]
pub struct ListReport {
    pub dir: PathBuf,
    pub import_path: Option<String>,
    /// Interfaces in traversal order.
    pub interfaces: Vec<InterfaceDescriptor>,
}

impl ListReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.interfaces)
    }
}

impl Report for ListReport {
    fn render(&self, out: &mut dyn Output) {
        let package = match &self.import_path {
            Some(path) => path.clone(),
            None => self.dir.display().to_string(),
        };

        if self.interfaces.is_empty() {
            out.result(&format!("No interfaces found in {}", package));
            return;
        }

        out.result(&format!(
            "Interfaces in {} ({}):",
            package,
            self.interfaces.len()
        ));
        for iface in &self.interfaces {
            out.blank();
            let file = iface
                .file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            out.field(&iface.name, &file);
            for method in &iface.methods {
                out.item(&method.signature());
            }
            for embedded in &iface.embedded {
                out.item(&format!("{} (embedded, not wrapped)", embedded));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mwgen_reflect::{MethodDescriptor, TypeExpr};

    use super::*;
    use crate::reports::output::BufferOutput;

    #[test]
    fn test_render_lists_signatures() {
        let report = ListReport {
            dir: "orders".into(),
            import_path: Some("example.com/shop/orders".to_string()),
            interfaces: vec![InterfaceDescriptor {
                name: "Service".to_string(),
                package: "orders".to_string(),
                import_path: Some("example.com/shop/orders".to_string()),
                file: "orders/service.go".into(),
                imports: Vec::new(),
                methods: vec![
                    MethodDescriptor::new("Get")
                        .param("id", TypeExpr::named("uint"))
                        .returns(TypeExpr::named("Item"))
                        .returns(TypeExpr::named("error")),
                ],
                embedded: Vec::new(),
            }],
        };

        let mut out = BufferOutput::default();
        report.render(&mut out);
        assert_eq!(out.stdout[0], "Interfaces in example.com/shop/orders (1):");
        assert_eq!(out.stdout[2], "Service: service.go");
        assert_eq!(out.stdout[3], "  - Get(id uint) (Item, error)");
    }

    #[test]
    fn test_render_empty() {
        let report = ListReport {
            dir: "orders".into(),
            import_path: None,
            interfaces: Vec::new(),
        };

        let mut out = BufferOutput::default();
        report.render(&mut out);
        assert_eq!(out.stdout, vec!["No interfaces found in orders"]);
    }
}
