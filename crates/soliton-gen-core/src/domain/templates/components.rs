//! Skeletons for single-file DDD components.

use crate::domain::artifact::target_param;
use crate::domain::field::Field;
use crate::domain::templates::{RenderContext, doc_line, go_imports};

fn enum_blocks(fields: &[Field]) -> String {
    fields
        .iter()
        .filter_map(|f| {
            let enum_type = f.enum_type.as_ref()?;
            let consts: String = f
                .enum_constants()
                .iter()
                .map(|(name, value)| format!("\t{name} {enum_type} = \"{value}\"\n"))
                .collect();
            Some(format!(
                "\n// {enum_type} enumerates the allowed {} values.\n\
                 type {enum_type} string\n\nconst (\n{consts})\n",
                f.name
            ))
        })
        .collect()
}

fn json_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| match &f.comment {
            Some(c) => format!("\t{} {} {} // {c}\n", f.name, f.go_type, f.json_tag),
            None => format!("\t{} {} {}\n", f.name, f.go_type, f.json_tag),
        })
        .collect()
}

fn params(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| format!("{} {}", f.camel, f.go_type))
        .collect::<Vec<_>>()
        .join(", ")
}

fn assigns(fields: &[Field], indent: &str) -> String {
    fields
        .iter()
        .map(|f| format!("{indent}{}: {},\n", f.name, f.camel))
        .collect()
}

fn field_imports(fields: &[Field]) -> (bool, Vec<String>) {
    let uses_time = fields.iter().any(Field::uses_time);
    let others = if fields.iter().any(Field::uses_datatypes) {
        vec!["gorm.io/datatypes".to_string()]
    } else {
        Vec::new()
    };
    (uses_time, others)
}

// ============================================================================
// Value Object
// ============================================================================

const VALUE_OBJECT: &str = r#"package {{PACKAGE}}

import (
{{IMPORTS}})
{{ENUMS}}
{{DOC}}
type {{NAME}} struct {
{{FIELDS}}}

// New{{NAME}} builds a validated {{NAME}}.
func New{{NAME}}({{PARAMS}}) ({{NAME}}, error) {
	vo := {{NAME}}{
{{ASSIGNS}}	}
	if err := vo.Validate(); err != nil {
		return {{NAME}}{}, err
	}
	return vo, nil
}

// Validate enforces the invariants of {{NAME}}.
func (v {{NAME}}) Validate() error {
	return errors.New("not implemented")
}

// Equals reports structural equality.
func (v {{NAME}}) Equals(other {{NAME}}) bool {
	return reflect.DeepEqual(v, other)
}
"#;

pub struct ValueObjectModel<'a> {
    pub package: &'a str,
    pub name: &'a str,
    pub remark: Option<&'a str>,
    pub fields: &'a [Field],
}

pub fn value_object(model: &ValueObjectModel<'_>) -> String {
    let (uses_time, others) = field_imports(model.fields);
    let mut std = vec!["errors", "reflect"];
    if uses_time {
        std.push("time");
    }

    RenderContext::new()
        .with_variable("PACKAGE", model.package)
        .with_variable("NAME", model.name)
        .with_variable("DOC", doc_line(model.name, model.remark, "is a value object."))
        .with_variable("IMPORTS", go_imports(&std, &others))
        .with_variable("ENUMS", enum_blocks(model.fields))
        .with_variable("FIELDS", json_fields(model.fields))
        .with_variable("PARAMS", params(model.fields))
        .with_variable("ASSIGNS", assigns(model.fields, "\t\t"))
        .render(VALUE_OBJECT)
}

// ============================================================================
// Specification & Policy
// ============================================================================

const SPECIFICATION: &str = r#"package {{PACKAGE}}

{{DOC}}
type {{NAME}} struct{}

// IsSatisfiedBy reports whether target meets the specification.
func (s {{NAME}}) IsSatisfiedBy(target {{TARGET}}) bool {
	return true
}
"#;

const POLICY: &str = r#"package {{PACKAGE}}

import "errors"

{{DOC}}
type {{NAME}} struct{}

// Validate returns an error when target violates the policy.
func (p {{NAME}}) Validate(target {{TARGET}}) error {
	return errors.New("not implemented")
}
"#;

pub struct RuleModel<'a> {
    pub package: &'a str,
    pub name: &'a str,
    pub remark: Option<&'a str>,
    /// Normalised target type (`any` or a bare type name).
    pub target: &'a str,
}

impl RuleModel<'_> {
    fn context(&self, fallback: &str) -> RenderContext {
        RenderContext::new()
            .with_variable("PACKAGE", self.package)
            .with_variable("NAME", self.name)
            .with_variable("DOC", doc_line(self.name, self.remark, fallback))
            .with_variable("TARGET", target_param(self.target))
    }
}

pub fn specification(model: &RuleModel<'_>) -> String {
    model.context("is a domain specification.").render(SPECIFICATION)
}

pub fn policy(model: &RuleModel<'_>) -> String {
    model.context("is a domain policy.").render(POLICY)
}

// ============================================================================
// Event
// ============================================================================

const EVENT: &str = r#"package {{PACKAGE}}

import (
{{IMPORTS}})
{{ENUMS}}
{{DOC}}
type {{NAME}} struct {
	ddd.BaseDomainEvent
{{FIELDS}}}

// EventName returns the topic {{NAME}} is published on.
func (e {{NAME}}) EventName() string {
	return "{{TOPIC}}"
}

func New{{NAME}}({{PARAMS}}) {{NAME}} {
	return {{NAME}}{
		BaseDomainEvent: ddd.NewBaseDomainEvent(),
{{ASSIGNS}}	}
}

func init() {
	event.RegisterEvent("{{TOPIC}}", func() ddd.DomainEvent {
		return &{{NAME}}{}
	})
}
"#;

pub struct EventModel<'a> {
    pub package: &'a str,
    /// Struct name, `...Event`.
    pub name: &'a str,
    pub topic: &'a str,
    pub remark: Option<&'a str>,
    pub fields: &'a [Field],
}

pub fn event(model: &EventModel<'_>) -> String {
    let (uses_time, mut others) = field_imports(model.fields);
    others.insert(0, "github.com/soliton-go/framework/ddd".into());
    others.insert(1, "github.com/soliton-go/framework/event".into());
    let std: &[&str] = if uses_time { &["time"] } else { &[] };

    RenderContext::new()
        .with_variable("PACKAGE", model.package)
        .with_variable("NAME", model.name)
        .with_variable("TOPIC", model.topic)
        .with_variable("DOC", doc_line(model.name, model.remark, "is a domain event."))
        .with_variable("IMPORTS", go_imports(std, &others))
        .with_variable("ENUMS", enum_blocks(model.fields))
        .with_variable("FIELDS", json_fields(model.fields))
        .with_variable("PARAMS", params(model.fields))
        .with_variable("ASSIGNS", assigns(model.fields, "\t\t"))
        .render(EVENT)
}

// ============================================================================
// Event Handler
// ============================================================================

const EVENT_HANDLER: &str = r#"package {{PACKAGE}}app

import (
	"context"
	"fmt"

	"github.com/soliton-go/framework/ddd"
	"github.com/soliton-go/framework/event"
	"go.uber.org/fx"

	"{{MODULE}}/internal/domain/{{PACKAGE}}"
)

// {{HANDLER}} reacts to {{EVENT}}.
type {{HANDLER}} struct{}

func New{{HANDLER}}() *{{HANDLER}} {
	return &{{HANDLER}}{}
}

// Handle processes one {{EVENT}}.
func (h *{{HANDLER}}) Handle(ctx context.Context, evt ddd.DomainEvent) error {
	e, ok := evt.(*{{PACKAGE}}.{{EVENT}})
	if !ok {
		return fmt.Errorf("unexpected event type: %T", evt)
	}
	_ = e
	return nil
}

// Register{{HANDLER}} subscribes the handler when the application starts.
func Register{{HANDLER}}(lc fx.Lifecycle, bus event.EventBus, handler *{{HANDLER}}) {
	lc.Append(fx.Hook{
		OnStart: func(ctx context.Context) error {
			return bus.Subscribe(ctx, "{{TOPIC}}", handler.Handle)
		},
		OnStop: func(ctx context.Context) error {
			return nil
		},
	})
}
"#;

pub struct EventHandlerModel<'a> {
    pub package: &'a str,
    pub module_path: &'a str,
    pub handler: &'a str,
    pub event: &'a str,
    pub topic: &'a str,
}

pub fn event_handler(model: &EventHandlerModel<'_>) -> String {
    RenderContext::new()
        .with_variable("PACKAGE", model.package)
        .with_variable("MODULE", model.module_path)
        .with_variable("HANDLER", model.handler)
        .with_variable("EVENT", model.event)
        .with_variable("TOPIC", model.topic)
        .render(EVENT_HANDLER)
}
