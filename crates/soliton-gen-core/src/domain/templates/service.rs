//! Skeletons for application services.

use crate::domain::templates::{RenderContext, go_imports};
use crate::domain::wiring::SERVICES_MARKER;

/// One method as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodModel {
    pub name: String,
    pub remark: Option<String>,
}

pub struct ServiceModel<'a> {
    /// Go package of the target directory (`orderapp`, `services`).
    pub package: &'a str,
    pub name: &'a str,
    pub remark: Option<&'a str>,
    pub methods: &'a [MethodModel],
    /// When an existing DTO file is reused the per-method request and
    /// response types are not generated, so signatures fall back to `any`.
    pub reuse_dto: bool,
}

const SERVICE: &str = r#"package {{PACKAGE}}

import (
{{IMPORTS}})

{{REMARK}}// {{SERVICE}} hosts application logic that does not belong to a single aggregate.
type {{SERVICE}} struct {
	// Repositories and other collaborators go here.
}

func New{{SERVICE}}() *{{SERVICE}} {
	return &{{SERVICE}}{}
}
{{METHODS}}"#;

pub fn service(model: &ServiceModel<'_>) -> String {
    let methods: String = model
        .methods
        .iter()
        .map(|m| {
            let remark = m
                .remark
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(|r| format!("// MethodRemark: {} :: {r}\n", m.name))
                .unwrap_or_default();
            let (req, resp) = if model.reuse_dto {
                ("any".to_string(), "any".to_string())
            } else {
                (format!("{}Request", m.name), format!("*{}Response", m.name))
            };
            format!(
                "\n{remark}// {name} implements the {name} use case.\n\
                 func (s *{svc}) {name}(ctx context.Context, req {req}) ({resp}, error) {{\n\
                 \treturn nil, errors.New(\"not implemented\")\n}}\n",
                name = m.name,
                svc = model.name,
            )
        })
        .collect();

    let remark = model
        .remark
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| format!("// ServiceRemark: {r}\n"))
        .unwrap_or_default();

    RenderContext::new()
        .with_variable("PACKAGE", model.package)
        .with_variable("SERVICE", model.name)
        .with_variable("IMPORTS", go_imports(&["context", "errors"], &[]))
        .with_variable("REMARK", remark)
        .with_variable("METHODS", methods)
        .render(SERVICE)
}

const DTO_HEADER: &str = "package {{PACKAGE}}\n";

pub fn dto(model: &ServiceModel<'_>) -> String {
    let mut out = RenderContext::new()
        .with_variable("PACKAGE", model.package)
        .render(DTO_HEADER);

    for m in model.methods {
        out.push_str(&format!(
            "\n// {name}Request is the input of {svc}.{name}.\n\
             type {name}Request struct {{\n\tID string `json:\"id,omitempty\"`\n}}\n\n\
             // {name}Response is the output of {svc}.{name}.\n\
             type {name}Response struct {{\n\
             \tSuccess bool   `json:\"success\"`\n\
             \tMessage string `json:\"message,omitempty\"`\n\
             \tData    any    `json:\"data,omitempty\"`\n}}\n",
            name = m.name,
            svc = model.name,
        ));
    }
    out
}

const MODULE: &str = r#"package {{PACKAGE}}

import "go.uber.org/fx"

// Module wires application services into Fx.
var Module = fx.Options(
	fx.Provide(New{{SERVICE}}),
{{MARKER}}
)
"#;

/// A fresh module file already registering `service`.
pub fn module(package: &str, service: &str) -> String {
    RenderContext::new()
        .with_variable("PACKAGE", package)
        .with_variable("SERVICE", service)
        .with_variable("MARKER", SERVICES_MARKER)
        .render(MODULE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::source;

    fn methods() -> Vec<MethodModel> {
        vec![
            MethodModel {
                name: "Charge".into(),
                remark: Some("charge a card".into()),
            },
            MethodModel {
                name: "Refund".into(),
                remark: None,
            },
        ]
    }

    #[test]
    fn service_round_trips_remarks() {
        let methods = methods();
        let src = service(&ServiceModel {
            package: "services",
            name: "BillingService",
            remark: Some("billing flows"),
            methods: &methods,
            reuse_dto: false,
        });
        assert!(src.contains(
            "func (s *BillingService) Charge(ctx context.Context, req ChargeRequest) \
             (*ChargeResponse, error) {"
        ));

        let parsed = source::service(&src).unwrap();
        assert_eq!(parsed.name, "BillingService");
        assert_eq!(parsed.remark.as_deref(), Some("billing flows"));
        assert_eq!(parsed.methods[0].1.as_deref(), Some("charge a card"));
        assert_eq!(parsed.methods[1], ("Refund".to_string(), None));
    }

    #[test]
    fn reused_dto_uses_any() {
        let methods = methods();
        let src = service(&ServiceModel {
            package: "orderapp",
            name: "OrderService",
            remark: None,
            methods: &methods,
            reuse_dto: true,
        });
        assert!(src.contains("Charge(ctx context.Context, req any) (any, error)"));
        assert!(!src.contains("ServiceRemark"));
    }

    #[test]
    fn dto_declares_each_method() {
        let methods = methods();
        let src = dto(&ServiceModel {
            package: "services",
            name: "BillingService",
            remark: None,
            methods: &methods,
            reuse_dto: false,
        });
        assert!(src.starts_with("package services\n"));
        assert!(src.contains("type ChargeRequest struct {"));
        assert!(src.contains("type RefundResponse struct {"));
    }

    #[test]
    fn module_registers_and_marks() {
        let src = module("services", "BillingService");
        assert!(src.contains("\tfx.Provide(NewBillingService),\n"));
        assert!(src.contains(SERVICES_MARKER));
    }
}
