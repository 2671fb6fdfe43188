//! Parse grammar for generated Go sources.
//!
//! The registry owns no index: everything it reports is re-derived from the
//! files on disk through the small set of line-oriented patterns below.
//! They match what the renderers emit and tolerate ordinary hand edits
//! (reordered fields, extra comments, added methods).

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::field::FieldType;

static MODULE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*module\s+(\S+)").expect("valid regex"));

static GO_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*go\s+(\d+(?:\.\d+)*)\s*$").expect("valid regex"));

static STRUCT_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^type\s+([A-Za-z_]\w*)\s+struct\s*\{\s*$").expect("valid regex")
});

static FIELD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_]\w*)\s+([^\s`/]+)\s*(`[^`]*`)?\s*(?://\s*(.*))?$")
        .expect("valid regex")
});

static STRING_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^type\s+([A-Za-z_]\w*)\s+string\s*$").expect("valid regex"));

static ENUM_CONST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*([A-Za-z_]\w*)\s+([A-Za-z_]\w*)\s*=\s*"([^"]*)""#).expect("valid regex")
});

static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\)\s*TableName\(\)\s*string\s*\{\s*return\s+"([^"]+)""#).expect("valid regex")
});

static EVENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\)\s*EventName\(\)\s*string\s*\{\s*return\s+"([^"]+)""#).expect("valid regex")
});

static SUBSCRIBE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\.Subscribe\(\s*\w+\s*,\s*"([^"]+)""#).expect("valid regex"));

static TYPE_ASSERTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\(\*(?:\w+\.)?([A-Za-z_]\w*)\)").expect("valid regex"));

static SATISFIED_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\)\s*IsSatisfiedBy\(\s*\w+\s+\*?([\w.{}]+)\s*\)\s*bool").expect("valid regex")
});

static VALIDATE_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\)\s*Validate\(\s*\w+\s+\*?([\w.{}]+)\s*\)\s*error").expect("valid regex")
});

static SERVICE_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^func\s+\(\s*\w+\s+\*([A-Za-z_]\w*)\)\s+([A-Z]\w*)\(\s*ctx\s+context\.Context")
        .expect("valid regex")
});

static SERVICE_REMARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^//\s*ServiceRemark:\s*(.*?)\s*$").expect("valid regex"));

static METHOD_REMARK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*//\s*MethodRemark:\s*([A-Za-z_]\w*)\s*::\s*(.*?)\s*$")
        .expect("valid regex")
});

static GORM_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"gorm:"([^"]*)""#).expect("valid regex"));

static JSON_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"json:"([^"]*)""#).expect("valid regex"));

/// A field line of a Go struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoField {
    pub name: String,
    pub go_type: String,
    /// Raw tag including backticks.
    pub tag: Option<String>,
    pub comment: Option<String>,
}

impl GoField {
    pub fn gorm(&self) -> Option<&str> {
        tag_value(&GORM_TAG, self.tag.as_deref())
    }

    pub fn json(&self) -> Option<&str> {
        tag_value(&JSON_TAG, self.tag.as_deref())
    }
}

fn tag_value<'a>(re: &Regex, tag: Option<&'a str>) -> Option<&'a str> {
    re.captures(tag?)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoStruct {
    pub name: String,
    pub fields: Vec<GoField>,
}

/// Module path declared by a `go.mod` file.
pub fn module_path(go_mod: &str) -> Option<String> {
    MODULE_LINE
        .captures(go_mod)
        .map(|c| c[1].trim_matches('"').to_string())
}

/// Version of a `go X.Y` directive in `go.mod` or `go.work`.
pub fn go_directive(src: &str) -> Option<String> {
    GO_DIRECTIVE.captures(src).map(|c| c[1].to_string())
}

/// Every struct declared at top level, in order.
pub fn structs(src: &str) -> Vec<GoStruct> {
    STRUCT_OPEN
        .captures_iter(src)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps[1].to_string();
            let fields = src[whole.end()..]
                .lines()
                .take_while(|line| line.trim_end() != "}")
                .filter_map(parse_field_line)
                .collect();
            Some(GoStruct { name, fields })
        })
        .collect()
}

/// The struct named `name`, or the first struct when `name` is `None`.
pub fn find_struct(src: &str, name: Option<&str>) -> Option<GoStruct> {
    let all = structs(src);
    match name {
        Some(name) => all.into_iter().find(|s| s.name == name),
        None => all.into_iter().next(),
    }
}

fn parse_field_line(line: &str) -> Option<GoField> {
    let caps = FIELD_LINE.captures(line)?;
    Some(GoField {
        name: caps[1].to_string(),
        go_type: caps[2].to_string(),
        tag: caps.get(3).map(|m| m.as_str().to_string()),
        comment: caps
            .get(4)
            .map(|m| m.as_str().trim().to_string())
            .filter(|c| !c.is_empty()),
    })
}

/// Named string types with their constant values in declaration order.
pub fn enum_types(src: &str) -> Vec<(String, Vec<String>)> {
    let mut enums: Vec<(String, Vec<String>)> = STRING_TYPE
        .captures_iter(src)
        .map(|c| (c[1].to_string(), Vec::new()))
        .collect();

    for caps in ENUM_CONST.captures_iter(src) {
        if let Some((_, values)) = enums.iter_mut().find(|(name, _)| *name == caps[2]) {
            values.push(caps[3].to_string());
        }
    }

    // ID types are string types without constants.
    enums.retain(|(_, values)| !values.is_empty());
    enums
}

pub fn table_name(src: &str) -> Option<String> {
    TABLE_NAME.captures(src).map(|c| c[1].to_string())
}

/// Topic returned by an `EventName()` method.
pub fn event_topic(src: &str) -> Option<String> {
    EVENT_NAME.captures(src).map(|c| c[1].to_string())
}

/// `(event type, topic)` a handler is bound to.
pub fn handler_binding(src: &str) -> (Option<String>, Option<String>) {
    let event = TYPE_ASSERTION.captures(src).map(|c| c[1].to_string());
    let topic = SUBSCRIBE.captures(src).map(|c| c[1].to_string());
    (event, topic)
}

/// Target type of a specification.
pub fn specification_target(src: &str) -> Option<String> {
    SATISFIED_BY.captures(src).map(|c| c[1].to_string())
}

/// Target type of a policy.
pub fn policy_target(src: &str) -> Option<String> {
    VALIDATE_TARGET.captures(src).map(|c| c[1].to_string())
}

/// A service as recovered from its source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSource {
    pub name: String,
    pub remark: Option<String>,
    pub methods: Vec<(String, Option<String>)>,
}

/// Recover a service's methods and remarks. `None` when no struct with
/// `ctx context.Context` methods exists.
pub fn service(src: &str) -> Option<ServiceSource> {
    let mut name = None;
    let mut methods: Vec<(String, Option<String>)> = Vec::new();

    for caps in SERVICE_METHOD.captures_iter(src) {
        let receiver = caps[1].to_string();
        if *name.get_or_insert_with(|| receiver.clone()) != receiver {
            continue;
        }
        let method = caps[2].to_string();
        if !methods.iter().any(|(m, _)| *m == method) {
            methods.push((method, None));
        }
    }

    let name = match name {
        Some(name) => name,
        None => find_struct(src, None)
            .map(|s| s.name)
            .filter(|n| n.ends_with("Service"))?,
    };

    for caps in METHOD_REMARK.captures_iter(src) {
        if let Some((_, remark)) = methods.iter_mut().find(|(m, _)| *m == caps[1]) {
            *remark = Some(caps[2].to_string()).filter(|r| !r.is_empty());
        }
    }

    Some(ServiceSource {
        name,
        remark: SERVICE_REMARK
            .captures(src)
            .map(|c| c[1].to_string())
            .filter(|r| !r.is_empty()),
        methods,
    })
}

/// Map a rendered Go type and gorm tag back to its field type.
pub fn infer_field_type(go_type: &str, gorm: Option<&str>, is_enum: bool) -> Option<FieldType> {
    if is_enum {
        return Some(FieldType::Enum);
    }
    let gorm = gorm.unwrap_or_default();
    let ty = match go_type {
        "string" if gorm.contains("type:text") => FieldType::Text,
        "string" if gorm.contains("size:36") => FieldType::Uuid,
        "string" => FieldType::String,
        "int" => FieldType::Int,
        "int64" => FieldType::Int64,
        "float64" if gorm.contains("decimal") => FieldType::Decimal,
        "float64" => FieldType::Float,
        "bool" => FieldType::Bool,
        "time.Time" if gorm.contains("type:date") => FieldType::Date,
        "time.Time" => FieldType::Time,
        "*time.Time" if gorm.contains("type:date") => FieldType::OptionalDate,
        "*time.Time" => FieldType::OptionalTime,
        "datatypes.JSON" if gorm.contains("jsonb") => FieldType::Jsonb,
        "datatypes.JSON" => FieldType::Json,
        "[]byte" => FieldType::Bytes,
        _ => return None,
    };
    Some(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTITY: &str = r#"package order

import (
	"time"

	"gorm.io/gorm"
)

// OrderID is a strong typed ID.
type OrderID string

// OrderStatus enum.
type OrderStatus string

const (
	OrderStatusPending OrderStatus = "pending"
	OrderStatusPaid    OrderStatus = "paid"
)

// Order is the aggregate root.
type Order struct {
	ddd.BaseAggregateRoot
	ID        OrderID        `gorm:"primaryKey"`
	Amount    float64        `gorm:"type:decimal(10,2);default:0"` // total
	Status    OrderStatus    `gorm:"size:50;default:'pending'"`
	PaidAt    *time.Time
	CreatedAt time.Time      `gorm:"autoCreateTime"`
	DeletedAt gorm.DeletedAt `gorm:"index"`
}

// TableName returns the table name.
func (Order) TableName() string {
	return "orders"
}
"#;

    #[test]
    fn reads_module_path() {
        assert_eq!(
            module_path("// c\nmodule github.com/acme/shop\n\ngo 1.22\n").as_deref(),
            Some("github.com/acme/shop")
        );
        assert_eq!(module_path("go 1.22\n"), None);
    }

    #[test]
    fn reads_go_directive() {
        assert_eq!(go_directive("go 1.23.4\n\nuse (\n\t./app\n)\n").as_deref(), Some("1.23.4"));
        assert_eq!(go_directive("module x\n"), None);
    }

    #[test]
    fn reads_entity_struct() {
        let s = find_struct(ENTITY, Some("Order")).unwrap();
        let names: Vec<_> = s.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["ID", "Amount", "Status", "PaidAt", "CreatedAt", "DeletedAt"]);

        let amount = &s.fields[1];
        assert_eq!(amount.go_type, "float64");
        assert_eq!(amount.gorm(), Some("type:decimal(10,2);default:0"));
        assert_eq!(amount.comment.as_deref(), Some("total"));
        assert_eq!(s.fields[3].tag, None);
    }

    #[test]
    fn reads_enums_and_table() {
        let enums = enum_types(ENTITY);
        assert_eq!(
            enums,
            vec![("OrderStatus".to_string(), vec!["pending".to_string(), "paid".to_string()])]
        );
        assert_eq!(table_name(ENTITY).as_deref(), Some("orders"));
    }

    #[test]
    fn reads_handler_binding() {
        let src = "func (h *OrderPaidHandler) Handle(ctx context.Context, evt ddd.DomainEvent) \
                   error {\n\te, ok := evt.(*order.OrderPaidEvent)\n}\n\
                   bus.Subscribe(ctx, \"order.paid\", handler.Handle)\n";
        let (event, topic) = handler_binding(src);
        assert_eq!(event.as_deref(), Some("OrderPaidEvent"));
        assert_eq!(topic.as_deref(), Some("order.paid"));
    }

    #[test]
    fn reads_targets() {
        assert_eq!(
            specification_target("func (s Overdue) IsSatisfiedBy(target *Order) bool {").as_deref(),
            Some("Order")
        );
        assert_eq!(
            policy_target("func (p Refund) Validate(target any) error {").as_deref(),
            Some("any")
        );
    }

    #[test]
    fn reads_service_methods_and_remarks() {
        let src = "// ServiceRemark: billing flows\ntype BillingService struct {\n}\n\n\
                   // MethodRemark: Charge :: charge a card\n\
                   func (s *BillingService) Charge(ctx context.Context, req ChargeRequest) (*ChargeResponse, error) {\n}\n\
                   func (s *BillingService) Refund(ctx context.Context, req RefundRequest) (*RefundResponse, error) {\n}\n";
        let svc = service(src).unwrap();
        assert_eq!(svc.name, "BillingService");
        assert_eq!(svc.remark.as_deref(), Some("billing flows"));
        assert_eq!(
            svc.methods,
            vec![
                ("Charge".to_string(), Some("charge a card".to_string())),
                ("Refund".to_string(), None),
            ]
        );
    }

    #[test]
    fn infers_field_types() {
        assert_eq!(
            infer_field_type("float64", Some("type:decimal(10,2)"), false),
            Some(FieldType::Decimal)
        );
        assert_eq!(infer_field_type("*time.Time", None, false), Some(FieldType::OptionalTime));
        assert_eq!(infer_field_type("OrderStatus", None, true), Some(FieldType::Enum));
        assert_eq!(infer_field_type("Money", None, false), None);
    }
}
