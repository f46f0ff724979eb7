//! Assembly of a complete wrapper unit from a reflected interface.

use std::collections::BTreeMap;

use mwgen_core::{
    DEFAULT_LAYER, DEFAULT_LOGGER_IMPORT, DEFAULT_OUTPUT, DEFAULT_TRACER_IMPORT, Diagnostic,
    GENERATED_HEADER, Phase,
};
use mwgen_reflect::{InterfaceDescriptor, MethodDescriptor, Param};
use tracing::{debug, info};

use crate::{
    aspect::{Aspect, AspectOptions, MethodScope},
    builder::CodeBuilder,
    go::{Func, Import, ImportSet},
    unit::GeneratedUnit,
};

/// The generated unit plus whatever the synthesizer had to say about it.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub unit: GeneratedUnit,
    pub diagnostics: Vec<Diagnostic>,
}

/// Drives one aspect strategy over every method of an interface.
///
/// ```
/// use mwgen_codegen::{Aspect, Synthesizer};
/// use mwgen_reflect::{InterfaceDescriptor, MethodDescriptor, TypeExpr};
///
/// let service = InterfaceDescriptor {
///     name: "Service".into(),
///     package: "orders".into(),
///     import_path: Some("example.com/shop/orders".into()),
///     file: "service.go".into(),
///     imports: vec![],
///     methods: vec![MethodDescriptor::new("Ping").returns(TypeExpr::named("error"))],
///     embedded: vec![],
/// };
///
/// let synthesis = Synthesizer::new(Aspect::Tracing).synthesize(&service);
/// assert!(synthesis.unit.content.contains("func (m *traceMiddleware) Ping() error {"));
/// ```
#[derive(Debug, Clone)]
pub struct Synthesizer {
    aspect: Aspect,
    package: String,
    label: Option<String>,
    layer: String,
    logger_import: String,
    tracer_import: String,
}

impl Synthesizer {
    pub fn new(aspect: Aspect) -> Self {
        Self {
            aspect,
            package: DEFAULT_OUTPUT.to_string(),
            label: None,
            layer: DEFAULT_LAYER.to_string(),
            logger_import: DEFAULT_LOGGER_IMPORT.to_string(),
            tracer_import: DEFAULT_TRACER_IMPORT.to_string(),
        }
    }

    /// Package clause of the generated unit.
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Aspect label; defaults to the interface name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    pub fn logger_import(mut self, path: impl Into<String>) -> Self {
        self.logger_import = path.into();
        self
    }

    pub fn tracer_import(mut self, path: impl Into<String>) -> Self {
        self.tracer_import = path.into();
        self
    }

    pub fn synthesize(&self, iface: &InterfaceDescriptor) -> Synthesis {
        let strategy = self.aspect.strategy(AspectOptions {
            label: self.label.clone().unwrap_or_else(|| iface.name.clone()),
            layer: self.layer.clone(),
            logger_import: self.logger_import.clone(),
            tracer_import: self.tracer_import.clone(),
        });
        let mut diagnostics = Vec::new();

        if !iface.embedded.is_empty() {
            diagnostics.push(
                Diagnostic::warning(
                    Phase::Reflect,
                    format!(
                        "embedded elements are not wrapped: {}",
                        iface.embedded.join(", ")
                    ),
                )
                .at(iface.name.clone()),
            );
        }

        // Signatures are reproduced from another package.
        let methods: Vec<MethodDescriptor> = iface
            .methods
            .iter()
            .map(|m| qualify_method(m, &iface.package))
            .collect();

        let mut imports = ImportSet::new();
        match &iface.import_path {
            Some(path) => imports.add(Import::new(path)),
            None => diagnostics.push(Diagnostic::warning(
                Phase::Synthesize,
                format!(
                    "import path of package '{}' is unknown; add a go.mod or set import_path",
                    iface.package
                ),
            )),
        }
        imports.extend(strategy.imports(&methods));
        imports.extend(signature_imports(iface, &methods, &mut diagnostics));

        let service = format!("{}.{}", iface.package, iface.name);
        let receiver_ty = format!("*{}", strategy.wrapper_type());

        let mut builder = CodeBuilder::new();
        builder
            .push_line(GENERATED_HEADER)
            .push_blank()
            .push_line(&format!("package {}", self.package))
            .push_blank();
        if !imports.is_empty() {
            builder.emit(&imports).push_blank();
        }
        builder.emit(&strategy.render_preamble(&iface.name, &service));

        for method in &methods {
            let mut scope = MethodScope::new(method);
            if scope.capture().is_many() {
                diagnostics.push(
                    Diagnostic::info(
                        Phase::Synthesize,
                        format!(
                            "{} returns {} values; all of them are captured",
                            method.name,
                            method.returns.len()
                        ),
                    )
                    .at(format!("{}.{}", iface.name, method.name)),
                );
            }
            debug!(
                method = %method.name,
                bindings = ?scope.capture().bindings(),
                "rendering method"
            );

            let body = strategy.render_method(&mut scope);
            let func = method.params.iter().fold(
                Func::new(&method.name).receiver(scope.receiver(), &receiver_ty),
                |func, p| func.param(&p.name, p.type_name()),
            );
            let func = method
                .returns
                .iter()
                .fold(func, |func, ty| func.result(ty.to_string()))
                .body(body);

            builder.push_blank().emit(&func);
        }

        info!(
            interface = %iface.name,
            aspect = %self.aspect,
            methods = methods.len(),
            "synthesized unit"
        );

        Synthesis {
            unit: GeneratedUnit {
                aspect: self.aspect,
                interface: iface.name.clone(),
                package: self.package.clone(),
                content: builder.build(),
            },
            diagnostics,
        }
    }
}

/// Synthesize `iface` with `aspect` and default options, labelled `label`.
pub fn synthesize(iface: &InterfaceDescriptor, aspect: Aspect, label: &str) -> GeneratedUnit {
    Synthesizer::new(aspect).label(label).synthesize(iface).unit
}

fn qualify_method(method: &MethodDescriptor, package: &str) -> MethodDescriptor {
    MethodDescriptor {
        params: method
            .params
            .iter()
            .map(|p| Param::new(p.name.clone(), p.ty.qualify(package)))
            .collect(),
        returns: method.returns.iter().map(|ty| ty.qualify(package)).collect(),
        ..method.clone()
    }
}

/// Imports for every package qualifier the signatures reference, resolved
/// through the declaring file's imports.
fn signature_imports(
    iface: &InterfaceDescriptor,
    methods: &[MethodDescriptor],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Import> {
    // qualifier -> first method using it
    let mut used: BTreeMap<String, &str> = BTreeMap::new();
    for method in methods {
        let types = method.params.iter().map(|p| &p.ty).chain(&method.returns);
        for ty in types {
            for package in ty.packages() {
                used.entry(package).or_insert(&method.name);
            }
        }
    }
    used.remove(&iface.package);

    let mut imports = Vec::new();
    for (qualifier, method) in used {
        match iface.import_for(&qualifier) {
            Some(spec) => imports.push(Import {
                path: spec.path.clone(),
                alias: spec.alias.clone(),
            }),
            None => diagnostics.push(
                Diagnostic::warning(
                    Phase::Synthesize,
                    format!(
                        "package '{}' is referenced but not imported by {}",
                        qualifier,
                        iface.file.display()
                    ),
                )
                .at(format!("{}.{}", iface.name, method)),
            ),
        }
    }
    imports
}
