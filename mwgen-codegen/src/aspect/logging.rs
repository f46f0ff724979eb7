//! Structured request/response logging.

use mwgen_reflect::MethodDescriptor;

use super::{Aspect, AspectOptions, AspectStrategy, MethodScope, WrapperNames, wrapper_preamble};
use crate::{
    builder::CodeFragment,
    go::{CompositeLit, Import, quote},
};

const NAMES: WrapperNames = WrapperNames {
    constant: "DefaultLogServiceName",
    constructor: "NewLogMiddleware",
    wrapper: "logMiddleware",
    label_field: "serviceName",
};

/// Package name the logger is imported under.
const LOGGER: &str = "log";

/// Logs a `<layer>-request` event with every non-context argument before
/// the delegate call and a `<layer>-response` event with its results after.
#[derive(Debug, Clone)]
pub struct LoggingStrategy {
    options: AspectOptions,
}

impl LoggingStrategy {
    pub fn new(options: AspectOptions) -> Self {
        Self { options }
    }

    fn event(&self, scope: &MethodScope<'_>, phase: &str, values: &[&str]) -> CodeFragment {
        let entry = match scope.context() {
            Some(ctx) => format!("{}.WithContext({}).WithFields(", LOGGER, ctx),
            None => format!("{}.WithFields(", LOGGER),
        };

        let fields = values.iter().fold(
            CompositeLit::new(format!("{}.Fields", LOGGER))
                .entry("\"service\"", format!("{}.{}", scope.receiver(), NAMES.label_field))
                .entry("\"method\"", quote(scope.name()))
                .entry("\"layer\"", quote(&self.options.layer)),
            |lit, name| lit.entry(quote(name), *name),
        );

        let message = quote(&format!("{}-{}", self.options.layer, phase));
        fields.wrap(&entry, &format!(").Info({})", message))
    }
}

impl AspectStrategy for LoggingStrategy {
    fn aspect(&self) -> Aspect {
        Aspect::Logging
    }

    fn wrapper_type(&self) -> &'static str {
        NAMES.wrapper
    }

    fn imports(&self, methods: &[MethodDescriptor]) -> Vec<Import> {
        if methods.is_empty() {
            return Vec::new();
        }
        vec![Import::aliased(LOGGER, &self.options.logger_import)]
    }

    fn render_preamble(&self, interface: &str, service: &str) -> Vec<CodeFragment> {
        wrapper_preamble(
            &NAMES,
            service,
            &self.options.label,
            format!(
                "{} is the service name logged when none is given.",
                NAMES.constant
            ),
            format!(
                "{} returns a {} that logs every request and response of service.",
                NAMES.constructor, interface
            ),
        )
    }

    fn render_method(&self, scope: &mut MethodScope<'_>) -> Vec<CodeFragment> {
        let args: Vec<&str> = scope.value_params().map(|p| p.name.as_str()).collect();
        let capture = scope.capture();

        let mut body = vec![
            self.event(scope, "request", &args),
            CodeFragment::blank(),
            CodeFragment::line(capture.call_line(&scope.delegate_call())),
            CodeFragment::blank(),
            self.event(scope, "response", &capture.bindings()),
        ];
        if let Some(ret) = capture.return_line() {
            body.push(CodeFragment::blank());
            body.push(CodeFragment::line(ret));
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use mwgen_reflect::TypeExpr;

    use super::*;
    use crate::builder::CodeBuilder;

    fn render(method: &MethodDescriptor) -> String {
        let strategy = LoggingStrategy::new(AspectOptions::new("Service"));
        let mut scope = MethodScope::new(method);
        let mut builder = CodeBuilder::new();
        builder.emit(&strategy.render_method(&mut scope));
        builder.build()
    }

    #[test]
    fn test_error_only_method() {
        let method = MethodDescriptor::new("Add")
            .param("ctx", TypeExpr::qualified("context", "Context"))
            .param("item", TypeExpr::named("Item"))
            .returns(TypeExpr::named("error"));

        assert_eq!(
            render(&method),
            r#"log.WithContext(ctx).WithFields(log.Fields{
	"service": m.serviceName,
	"method":  "Add",
	"layer":   "service",
	"item":    item,
}).Info("service-request")

err := m.next.Add(ctx, item)

log.WithContext(ctx).WithFields(log.Fields{
	"service": m.serviceName,
	"method":  "Add",
	"layer":   "service",
	"err":     err,
}).Info("service-response")

return err
"#
        );
    }

    #[test]
    fn test_method_without_context_or_results() {
        let method = MethodDescriptor::new("Notify").param("msg", TypeExpr::named("string"));

        assert_eq!(
            render(&method),
            r#"log.WithFields(log.Fields{
	"service": m.serviceName,
	"method":  "Notify",
	"layer":   "service",
	"msg":     msg,
}).Info("service-request")

m.next.Notify(msg)

log.WithFields(log.Fields{
	"service": m.serviceName,
	"method":  "Notify",
	"layer":   "service",
}).Info("service-response")
"#
        );
    }

    #[test]
    fn test_context_by_type_is_excluded_from_fields() {
        let method = MethodDescriptor::new("Get")
            .param("c", TypeExpr::qualified("context", "Context"))
            .param("id", TypeExpr::named("uint"))
            .returns(TypeExpr::named("Item"))
            .returns(TypeExpr::named("error"));

        let out = render(&method);
        assert!(out.starts_with("log.WithContext(c).WithFields("));
        assert!(!out.contains("\"c\":"));
        assert!(out.contains("res, err := m.next.Get(c, id)"));
        assert!(out.contains("\"res\":     res,"));
        assert!(out.ends_with("return res, err\n"));
    }

    #[test]
    fn test_custom_layer() {
        let strategy = LoggingStrategy::new(AspectOptions {
            layer: "repository".to_string(),
            ..AspectOptions::new("Repo")
        });
        let method = MethodDescriptor::new("Ping");
        let mut scope = MethodScope::new(&method);
        let mut builder = CodeBuilder::new();
        builder.emit(&strategy.render_method(&mut scope));
        let out = builder.build();

        assert!(out.contains("\"layer\":   \"repository\","));
        assert!(out.contains(".Info(\"repository-request\")"));
        assert!(out.contains(".Info(\"repository-response\")"));
    }

    #[test]
    fn test_logger_import_is_aliased() {
        let strategy = LoggingStrategy::new(AspectOptions::new("Service"));
        assert_eq!(
            strategy.imports(&[MethodDescriptor::new("Ping")]),
            vec![Import::aliased("log", "github.com/sirupsen/logrus")]
        );
    }

    #[test]
    fn test_no_logger_import_without_methods() {
        let strategy = LoggingStrategy::new(AspectOptions::new("Service"));
        assert!(strategy.imports(&[]).is_empty());
    }
}
