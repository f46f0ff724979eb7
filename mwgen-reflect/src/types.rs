//! Textual model of Go type expressions.
//!
//! The reflector never resolves types; it only needs to reproduce them.
//! [`TypeExpr`] keeps enough structure to qualify bare names with a
//! package and to find which imports a signature depends on, and its
//! `Display` implementation renders canonical Go syntax.

use std::{collections::BTreeSet, fmt};

use serde::{Serialize, Serializer};

/// Names that are always in scope and never need a package qualifier.
const PREDECLARED: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// A parameter or result inside a function type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncField {
    pub name: Option<String>,
    pub ty: TypeExpr,
}

/// A field of an inline `struct{...}` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Field names; empty for an embedded field.
    pub names: Vec<String>,
    pub ty: TypeExpr,
    /// The tag literal as written, quotes included.
    pub tag: Option<String>,
}

/// One element of an inline `interface{...}` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElem {
    /// `Name(params) results`
    Method {
        name: String,
        params: Vec<FuncField>,
        results: Vec<FuncField>,
    },
    /// An embedded interface or a constraint union such as `~int | string`.
    Union(Vec<UnionTerm>),
}

/// A term of a constraint union; `tilde` marks `~T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionTerm {
    pub tilde: bool,
    pub ty: TypeExpr,
}

/// A Go type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `T`, `pkg.T`, `T[A, B]`
    Named {
        package: Option<String>,
        name: String,
        args: Vec<TypeExpr>,
    },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `[N]T`; the length expression is kept verbatim.
    Array { len: String, elem: Box<TypeExpr> },
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// `func(params) results`
    Func {
        params: Vec<FuncField>,
        results: Vec<FuncField>,
    },
    /// `...T` (final parameter only)
    Variadic(Box<TypeExpr>),
    /// `(T)`
    Paren(Box<TypeExpr>),
    /// `struct{...}`
    Struct(Vec<StructField>),
    /// `interface{...}`
    Interface(Vec<InterfaceElem>),
}

impl TypeExpr {
    /// A bare named type (e.g. `error`).
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: None,
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A package-qualified named type (e.g. `context.Context`).
    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: Some(package.into()),
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Whether this is the predeclared `error` type.
    pub fn is_error(&self) -> bool {
        matches!(self, TypeExpr::Named { package: None, name, args } if name == "error" && args.is_empty())
    }

    /// Whether this is `context.Context`.
    pub fn is_context(&self) -> bool {
        matches!(
            self,
            TypeExpr::Named { package: Some(pkg), name, args }
                if pkg == "context" && name == "Context" && args.is_empty()
        )
    }

    /// Whether this is a variadic `...T` parameter type.
    pub fn is_variadic(&self) -> bool {
        matches!(self, TypeExpr::Variadic(_))
    }

    /// Qualify every bare, non-predeclared named type with `package`.
    pub fn qualify(&self, package: &str) -> TypeExpr {
        match self {
            TypeExpr::Named {
                package: qualifier,
                name,
                args,
            } => {
                let qualifier = match qualifier {
                    Some(q) => Some(q.clone()),
                    None if PREDECLARED.contains(&name.as_str()) => None,
                    None => Some(package.to_string()),
                };
                TypeExpr::Named {
                    package: qualifier,
                    name: name.clone(),
                    args: args.iter().map(|a| a.qualify(package)).collect(),
                }
            }
            TypeExpr::Pointer(t) => TypeExpr::Pointer(Box::new(t.qualify(package))),
            TypeExpr::Slice(t) => TypeExpr::Slice(Box::new(t.qualify(package))),
            TypeExpr::Array { len, elem } => TypeExpr::Array {
                len: len.clone(),
                elem: Box::new(elem.qualify(package)),
            },
            TypeExpr::Map { key, value } => TypeExpr::Map {
                key: Box::new(key.qualify(package)),
                value: Box::new(value.qualify(package)),
            },
            TypeExpr::Chan { dir, elem } => TypeExpr::Chan {
                dir: *dir,
                elem: Box::new(elem.qualify(package)),
            },
            TypeExpr::Func { params, results } => TypeExpr::Func {
                params: qualify_fields(params, package),
                results: qualify_fields(results, package),
            },
            TypeExpr::Variadic(t) => TypeExpr::Variadic(Box::new(t.qualify(package))),
            TypeExpr::Paren(t) => TypeExpr::Paren(Box::new(t.qualify(package))),
            TypeExpr::Struct(fields) => TypeExpr::Struct(
                fields
                    .iter()
                    .map(|field| StructField {
                        names: field.names.clone(),
                        ty: field.ty.qualify(package),
                        tag: field.tag.clone(),
                    })
                    .collect(),
            ),
            TypeExpr::Interface(elems) => TypeExpr::Interface(
                elems
                    .iter()
                    .map(|elem| match elem {
                        InterfaceElem::Method {
                            name,
                            params,
                            results,
                        } => InterfaceElem::Method {
                            name: name.clone(),
                            params: qualify_fields(params, package),
                            results: qualify_fields(results, package),
                        },
                        InterfaceElem::Union(terms) => InterfaceElem::Union(
                            terms
                                .iter()
                                .map(|term| UnionTerm {
                                    tilde: term.tilde,
                                    ty: term.ty.qualify(package),
                                })
                                .collect(),
                        ),
                    })
                    .collect(),
            ),
        }
    }

    /// Collect every package qualifier referenced by this type.
    pub fn packages(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_packages(&mut out);
        out
    }

    fn collect_packages(&self, out: &mut BTreeSet<String>) {
        match self {
            TypeExpr::Named { package, args, .. } => {
                if let Some(p) = package {
                    out.insert(p.clone());
                }
                for a in args {
                    a.collect_packages(out);
                }
            }
            TypeExpr::Pointer(t)
            | TypeExpr::Slice(t)
            | TypeExpr::Variadic(t)
            | TypeExpr::Paren(t)
            | TypeExpr::Array { elem: t, .. }
            | TypeExpr::Chan { elem: t, .. } => t.collect_packages(out),
            TypeExpr::Map { key, value } => {
                key.collect_packages(out);
                value.collect_packages(out);
            }
            TypeExpr::Func { params, results } => {
                for f in params.iter().chain(results) {
                    f.ty.collect_packages(out);
                }
            }
            TypeExpr::Struct(fields) => {
                for field in fields {
                    field.ty.collect_packages(out);
                }
            }
            TypeExpr::Interface(elems) => {
                for elem in elems {
                    match elem {
                        InterfaceElem::Method {
                            params, results, ..
                        } => {
                            for f in params.iter().chain(results) {
                                f.ty.collect_packages(out);
                            }
                        }
                        InterfaceElem::Union(terms) => {
                            for term in terms {
                                term.ty.collect_packages(out);
                            }
                        }
                    }
                }
            }
        }
    }
}

fn qualify_fields(fields: &[FuncField], package: &str) -> Vec<FuncField> {
    fields
        .iter()
        .map(|f| FuncField {
            name: f.name.clone(),
            ty: f.ty.qualify(package),
        })
        .collect()
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named {
                package,
                name,
                args,
            } => {
                if let Some(p) = package {
                    write!(f, "{}.", p)?;
                }
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "[{}]", join(args))?;
                }
                Ok(())
            }
            TypeExpr::Pointer(t) => write!(f, "*{}", t),
            TypeExpr::Slice(t) => write!(f, "[]{}", t),
            TypeExpr::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            TypeExpr::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {}", elem),
                ChanDir::Send => write!(f, "chan<- {}", elem),
                ChanDir::Recv => write!(f, "<-chan {}", elem),
            },
            TypeExpr::Func { params, results } => {
                write!(f, "func{}", signature(params, results))
            }
            TypeExpr::Variadic(t) => write!(f, "...{}", t),
            TypeExpr::Paren(t) => write!(f, "({})", t),
            TypeExpr::Struct(fields) => {
                let fields: Vec<String> = fields.iter().map(ToString::to_string).collect();
                write_body(f, "struct", &fields)
            }
            TypeExpr::Interface(elems) => {
                let elems: Vec<String> = elems.iter().map(ToString::to_string).collect();
                write_body(f, "interface", &elems)
            }
        }
    }
}

impl fmt::Display for StructField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.names.is_empty() {
            write!(f, "{} ", self.names.join(", "))?;
        }
        write!(f, "{}", self.ty)?;
        if let Some(tag) = &self.tag {
            write!(f, " {}", tag)?;
        }
        Ok(())
    }
}

impl fmt::Display for InterfaceElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceElem::Method {
                name,
                params,
                results,
            } => write!(f, "{}{}", name, signature(params, results)),
            InterfaceElem::Union(terms) => {
                let terms: Vec<String> = terms
                    .iter()
                    .map(|term| {
                        if term.tilde {
                            format!("~{}", term.ty)
                        } else {
                            term.ty.to_string()
                        }
                    })
                    .collect();
                f.write_str(&terms.join(" | "))
            }
        }
    }
}

/// `(params) results`, with a single unnamed result left bare.
fn signature(params: &[FuncField], results: &[FuncField]) -> String {
    let params = format!("({})", join_fields(params));
    match results {
        [] => params,
        [single] if single.name.is_none() => format!("{} {}", params, single.ty),
        _ => format!("{} ({})", params, join_fields(results)),
    }
}

/// `keyword{}` or `keyword{ a; b }` on one line.
fn write_body(f: &mut fmt::Formatter<'_>, keyword: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        write!(f, "{}{{}}", keyword)
    } else {
        write!(f, "{}{{ {} }}", keyword, items.join("; "))
    }
}

impl Serialize for TypeExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn join(types: &[TypeExpr]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_fields(fields: &[FuncField]) -> String {
    fields
        .iter()
        .map(|field| match &field.name {
            Some(name) => format!("{} {}", name, field.ty),
            None => field.ty.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
