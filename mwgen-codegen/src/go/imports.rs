//! Go import declarations.

use std::collections::BTreeMap;

use crate::builder::{CodeFragment, Renderable};

/// One import: a path and an optional explicit name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Import {
    pub path: String,
    pub alias: Option<String>,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn aliased(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }

    /// Render as an import spec, e.g. `log "github.com/sirupsen/logrus"`.
    pub fn render(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} \"{}\"", alias, self.path),
            None => format!("\"{}\"", self.path),
        }
    }
}

/// Deduplicated imports, rendered sorted by path.
///
/// The first alias registered for a path wins.
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    imports: BTreeMap<String, Option<String>>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, import: Import) {
        self.imports.entry(import.path).or_insert(import.alias);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.imports.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    /// Iterate over imports sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = Import> + '_ {
        self.imports.iter().map(|(path, alias)| Import {
            path: path.clone(),
            alias: alias.clone(),
        })
    }
}

impl Extend<Import> for ImportSet {
    fn extend<I: IntoIterator<Item = Import>>(&mut self, iter: I) {
        for import in iter {
            self.add(import);
        }
    }
}

impl Renderable for ImportSet {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let specs: Vec<String> = self.iter().map(|i| i.render()).collect();
        match specs.as_slice() {
            [] => Vec::new(),
            [single] => vec![CodeFragment::line(format!("import {}", single))],
            _ => vec![CodeFragment::block(
                "import (",
                specs.into_iter().map(CodeFragment::Line).collect(),
                Some(")".to_string()),
            )],
        }
    }
}
