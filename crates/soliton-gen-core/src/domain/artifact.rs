//! Artifact identity and on-disk naming.
//!
//! Every generated artifact is identified by `(domain?, kind, name)`. The
//! file-name convention below is the only index the registry has: files
//! that do not follow it are not considered generator-owned.
//!
//! | Kind | File |
//! |------|------|
//! | value object `Money` | `internal/domain/<d>/value_object_money.go` |
//! | specification `Overdue` | `internal/domain/<d>/spec_overdue.go` |
//! | policy `Refund` | `internal/domain/<d>/policy_refund.go` |
//! | event `OrderPaid` | `internal/domain/<d>/event_order_paid.go` |
//! | handler for `OrderPaid` | `internal/application/<d>/event_handler_order_paid.go` |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::identifier::{Identifier, canonical_key, to_pascal_case, to_snake_case};
use crate::domain::layout::LayoutRoots;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Domain,
    Service,
    ValueObject,
    Specification,
    Policy,
    Event,
    EventHandler,
}

impl ArtifactKind {
    /// Kinds scoped to a domain and stored as single files.
    pub const COMPONENTS: [ArtifactKind; 5] = [
        Self::ValueObject,
        Self::Specification,
        Self::Policy,
        Self::Event,
        Self::EventHandler,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Service => "service",
            Self::ValueObject => "value_object",
            Self::Specification => "specification",
            Self::Policy => "policy",
            Self::Event => "event",
            Self::EventHandler => "event_handler",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Service => "service",
            Self::ValueObject => "value object",
            Self::Specification => "specification",
            Self::Policy => "policy",
            Self::Event => "event",
            Self::EventHandler => "event handler",
        }
    }

    pub fn is_component(self) -> bool {
        Self::COMPONENTS.contains(&self)
    }

    /// File-name prefix of single-file components.
    pub fn file_prefix(self) -> Option<&'static str> {
        match self {
            Self::ValueObject => Some("value_object_"),
            Self::Specification => Some("spec_"),
            Self::Policy => Some("policy_"),
            Self::Event => Some("event_"),
            Self::EventHandler => Some("event_handler_"),
            Self::Domain | Self::Service => None,
        }
    }

    /// Components living in the application package rather than the domain one.
    pub fn in_app_layer(self) -> bool {
        matches!(self, Self::EventHandler)
    }

    /// Match a component file name, returning the snake stem.
    pub fn match_file(self, file_name: &str) -> Option<&str> {
        let prefix = self.file_prefix()?;
        let stem = file_name.strip_prefix(prefix)?.strip_suffix(".go")?;
        if stem.is_empty() || stem.ends_with("_test") {
            return None;
        }
        // `event_handler_x.go` lives in the app layer and never matches `event_`.
        if self == Self::Event && file_name.starts_with("event_handler_") {
            return None;
        }
        Some(stem)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ArtifactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "domain" | "domains" => Ok(Self::Domain),
            "service" | "services" => Ok(Self::Service),
            "value_object" | "value_objects" | "vo" | "valueobject" => Ok(Self::ValueObject),
            "specification" | "specifications" | "spec" | "specs" => Ok(Self::Specification),
            "policy" | "policies" => Ok(Self::Policy),
            "event" | "events" => Ok(Self::Event),
            "event_handler" | "event_handlers" | "handler" | "handlers" => Ok(Self::EventHandler),
            other => Err(DomainError::invalid_field(
                "kind",
                format!("unknown artifact kind '{other}'"),
            )),
        }
    }
}

/// Identity of an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub kind: ArtifactKind,
    pub name: String,
}

impl ArtifactId {
    pub fn new(domain: Option<&str>, kind: ArtifactKind, name: impl Into<String>) -> Self {
        Self {
            domain: domain
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            kind,
            name: name.into(),
        }
    }

    pub fn component(domain: &str, kind: ArtifactKind, name: impl Into<String>) -> Self {
        Self::new(Some(domain), kind, name)
    }

    /// The owning domain's package, required for components.
    pub fn domain_package(&self) -> Result<String, DomainError> {
        match &self.domain {
            Some(domain) => Ok(domain_package(&Identifier::new(domain)?)),
            None if self.kind.is_component() => {
                Err(DomainError::MissingRequiredField { field: "domain" })
            }
            None => Ok(domain_package(&Identifier::new(&self.name)?)),
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.domain {
            Some(d) => write!(f, "{} {}.{}", self.kind, d, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}

/// Go package of a domain.
pub fn domain_package(domain: &Identifier) -> String {
    domain.derive().package
}

// ============================================================================
// Component Naming
// ============================================================================

/// Names a single-file component carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentName {
    /// Exported Go type (`OrderPaidEvent`, `OrderPaidHandler`, `Money`).
    pub type_name: String,
    /// Name without the kind suffix (`OrderPaid`).
    pub base: String,
    /// Snake stem used in the file name (`order_paid`).
    pub stem: String,
}

impl ComponentName {
    pub fn new(kind: ArtifactKind, name: &Identifier) -> Self {
        let pascal = name.pascal();
        let base = match kind {
            ArtifactKind::Event | ArtifactKind::EventHandler => event_base(&pascal),
            _ => pascal,
        };
        let type_name = match kind {
            ArtifactKind::Event => format!("{base}Event"),
            ArtifactKind::EventHandler => format!("{base}Handler"),
            _ => base.clone(),
        };
        Self {
            stem: to_snake_case(&base),
            type_name,
            base,
        }
    }

    pub fn file_name(&self, kind: ArtifactKind) -> String {
        format!("{}{}.go", kind.file_prefix().unwrap_or_default(), self.stem)
    }

    /// Struct name of the event a handler consumes.
    pub fn event_type(&self) -> String {
        format!("{}Event", self.base)
    }

    pub fn canonical(&self) -> String {
        canonical_key(&self.type_name)
    }

    /// Absolute path of the backing file.
    pub fn path(&self, roots: &LayoutRoots, kind: ArtifactKind, package: &str) -> PathBuf {
        let dir = if kind.in_app_layer() {
            roots.app_package_dir(package)
        } else {
            roots.domain_package_dir(package)
        };
        dir.join(self.file_name(kind))
    }
}

/// Strip a trailing `Event` (any case) from a pascal name.
fn event_base(pascal: &str) -> String {
    let stripped = pascal
        .strip_suffix("Handler")
        .unwrap_or(pascal);
    let lower = stripped.to_lowercase();
    if lower.ends_with("event") && stripped.len() > "event".len() {
        stripped[..stripped.len() - "event".len()].to_string()
    } else {
        stripped.to_string()
    }
}

/// Default topic `<package>.<snake event base without the domain prefix>`.
pub fn default_topic(package: &str, domain_pascal: &str, event_base: &str) -> String {
    let rest = event_base.strip_prefix(domain_pascal).unwrap_or(event_base);
    let rest = to_snake_case(rest);
    if rest.is_empty() {
        format!("{package}.event")
    } else {
        format!("{package}.{rest}")
    }
}

/// Normalise a specification/policy target type: trimmed, `*` stripped,
/// `any` when empty.
pub fn normalize_target(target: Option<&str>) -> String {
    let target = target.unwrap_or_default().trim().trim_start_matches('*').trim();
    if target.is_empty() {
        "any".to_string()
    } else {
        target.to_string()
    }
}

/// Go parameter type for a target inside its package.
pub fn target_param(target: &str) -> String {
    if target == "any" || target == "interface{}" {
        target.to_string()
    } else {
        format!("*{target}")
    }
}

/// Service name with a guaranteed `Service` suffix.
pub fn service_type_name(name: &Identifier) -> String {
    let pascal = name.pascal();
    if pascal.ends_with("Service") {
        pascal
    } else {
        format!("{pascal}Service")
    }
}

/// Service name without its `Service` suffix (`OrderService` → `Order`).
pub fn service_base(type_name: &str) -> String {
    let base = type_name.strip_suffix("Service").unwrap_or(type_name);
    if base.is_empty() {
        type_name.to_string()
    } else {
        to_pascal_case(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    #[test]
    fn kind_aliases() {
        assert_eq!("vo".parse::<ArtifactKind>().unwrap(), ArtifactKind::ValueObject);
        assert_eq!("value-object".parse::<ArtifactKind>().unwrap(), ArtifactKind::ValueObject);
        assert_eq!("spec".parse::<ArtifactKind>().unwrap(), ArtifactKind::Specification);
        assert_eq!("handler".parse::<ArtifactKind>().unwrap(), ArtifactKind::EventHandler);
        assert!("widget".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn event_names_are_normalised() {
        let a = ComponentName::new(ArtifactKind::Event, &id("OrderPaid"));
        let b = ComponentName::new(ArtifactKind::Event, &id("order_paid_event"));
        let c = ComponentName::new(ArtifactKind::Event, &id("OrderPaidEVENT"));
        assert_eq!(a.type_name, "OrderPaidEvent");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.file_name(ArtifactKind::Event), "event_order_paid.go");
    }

    #[test]
    fn handler_names_follow_event() {
        let h = ComponentName::new(ArtifactKind::EventHandler, &id("OrderPaidEvent"));
        assert_eq!(h.type_name, "OrderPaidHandler");
        assert_eq!(h.event_type(), "OrderPaidEvent");
        assert_eq!(h.file_name(ArtifactKind::EventHandler), "event_handler_order_paid.go");

        let roots = LayoutRoots::new("m", "/p");
        assert_eq!(
            h.path(&roots, ArtifactKind::EventHandler, "order"),
            PathBuf::from("/p/internal/application/order/event_handler_order_paid.go")
        );
    }

    #[test]
    fn file_matching() {
        assert_eq!(ArtifactKind::ValueObject.match_file("value_object_money.go"), Some("money"));
        assert_eq!(ArtifactKind::Event.match_file("event_order_paid.go"), Some("order_paid"));
        assert_eq!(ArtifactKind::Event.match_file("event_handler_order_paid.go"), None);
        assert_eq!(ArtifactKind::Event.match_file("events.go"), None);
        assert_eq!(ArtifactKind::Policy.match_file("policy_refund_test.go"), None);
    }

    #[test]
    fn topics_default_from_domain() {
        assert_eq!(default_topic("order", "Order", "OrderPaid"), "order.paid");
        assert_eq!(default_topic("order", "Order", "Order"), "order.event");
        assert_eq!(default_topic("order", "Order", "StockReserved"), "order.stock_reserved");
    }

    #[test]
    fn targets_and_services() {
        assert_eq!(normalize_target(None), "any");
        assert_eq!(normalize_target(Some(" *Order ")), "Order");
        assert_eq!(target_param("Order"), "*Order");
        assert_eq!(target_param("any"), "any");
        assert_eq!(service_type_name(&id("Billing")), "BillingService");
        assert_eq!(service_type_name(&id("OrderService")), "OrderService");
        assert_eq!(service_base("OrderService"), "Order");
    }

    #[test]
    fn component_requires_domain() {
        let orphan = ArtifactId::new(None, ArtifactKind::Policy, "Refund");
        assert!(orphan.domain_package().is_err());
        let scoped = ArtifactId::component("OrderItem", ArtifactKind::Policy, "Refund");
        assert_eq!(scoped.domain_package().unwrap(), "orderitem");
    }
}
