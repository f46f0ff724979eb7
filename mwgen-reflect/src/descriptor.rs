//! Reflected declarations: the intermediate representation handed to the
//! code generator.

use std::path::PathBuf;

use serde::Serialize;

use crate::{lexer::Span, types::TypeExpr};

/// Canonical name of the call-context parameter.
pub const CONTEXT_PARAM: &str = "ctx";

/// One method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    /// Local name; unnamed and blank parameters are named `arg<i>`.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeExpr,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// The declared type as flat text (e.g. `*pkg.Item`).
    pub fn type_name(&self) -> String {
        self.ty.to_string()
    }

    /// The argument as written at a call site (`args...` for variadics).
    pub fn call_arg(&self) -> String {
        if self.ty.is_variadic() {
            format!("{}...", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// One interface method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<Param>,
    pub returns: Vec<TypeExpr>,
    #[serde(skip)]
    pub span: Span,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: Vec::new(),
            span: 0..0,
        }
    }

    pub fn param(mut self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    pub fn returns(mut self, ty: TypeExpr) -> Self {
        self.returns.push(ty);
        self
    }

    /// The call-context parameter, if the method has one.
    ///
    /// Only the first parameter qualifies, and only when it is named
    /// `ctx` or typed `context.Context`.
    pub fn context_param(&self) -> Option<&Param> {
        self.params
            .first()
            .filter(|p| p.name == CONTEXT_PARAM || p.ty.is_context())
    }

    /// Parameters other than the call context, in declaration order.
    pub fn value_params(&self) -> impl Iterator<Item = &Param> {
        let skip = usize::from(self.context_param().is_some());
        self.params.iter().skip(skip)
    }

    /// Return types as flat text.
    pub fn return_types(&self) -> Vec<String> {
        self.returns.iter().map(ToString::to_string).collect()
    }

    /// Render the signature as it appears in the interface, e.g.
    /// `Get(ctx context.Context, id uint) (*Item, error)`.
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| format!("{} {}", p.name, p.ty))
            .collect::<Vec<_>>()
            .join(", ");
        let returns = self.return_types();
        match returns.as_slice() {
            [] => format!("{}({})", self.name, params),
            [single] => format!("{}({}) {}", self.name, params, single),
            _ => format!("{}({}) ({})", self.name, params, returns.join(", ")),
        }
    }
}

/// An import declaration of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSpec {
    /// Explicit name (`alias "path"`, `_`, `.`), if any.
    pub alias: Option<String>,
    pub path: String,
}

impl ImportSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
        }
    }

    pub fn aliased(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            path: path.into(),
        }
    }

    /// The name this import binds in the file scope.
    ///
    /// Without an alias this is the last path element, skipping a major
    /// version suffix (`example.com/mod/v2` binds `mod`) and a `gopkg.in`
    /// style version (`yaml.v3` binds `yaml`).
    pub fn local_name(&self) -> &str {
        if let Some(alias) = &self.alias {
            return alias;
        }
        let mut segments = self.path.rsplit('/');
        let last = segments.next().unwrap_or(&self.path);
        let is_major = last.len() > 1
            && last.starts_with('v')
            && last[1..].chars().all(|c| c.is_ascii_digit());
        let name = if is_major {
            segments.next().unwrap_or(last)
        } else {
            last
        };
        match name.split_once(".v") {
            Some((base, version)) if version.chars().all(|c| c.is_ascii_digit()) => base,
            _ => name,
        }
    }
}

/// What a type declaration declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDeclKind {
    /// An interface with its methods and embedded elements.
    Interface {
        methods: Vec<MethodDescriptor>,
        embedded: Vec<String>,
    },
    /// Any other type; its shape is irrelevant to reflection.
    Other,
}

/// A top-level type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub span: Span,
    /// Whether the declaration has type parameters.
    pub generic: bool,
    pub kind: TypeDeclKind,
}

impl TypeDecl {
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeDeclKind::Interface { .. })
    }
}

/// A parsed Go source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub source: String,
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub types: Vec<TypeDecl>,
}

/// A reflected interface: its methods in declaration order plus the
/// context needed to reproduce its signatures elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDescriptor {
    pub name: String,
    /// Package clause of the declaring file.
    pub package: String,
    /// Import path of that package, when it could be determined.
    pub import_path: Option<String>,
    /// File that declares the interface.
    pub file: PathBuf,
    /// Imports of the declaring file.
    pub imports: Vec<ImportSpec>,
    pub methods: Vec<MethodDescriptor>,
    /// Embedded or constraint elements, which are not reflected.
    pub embedded: Vec<String>,
}

impl InterfaceDescriptor {
    /// Find the import that binds `local_name` in the declaring file.
    pub fn import_for(&self, local_name: &str) -> Option<&ImportSpec> {
        self.imports.iter().find(|i| i.local_name() == local_name)
    }
}
