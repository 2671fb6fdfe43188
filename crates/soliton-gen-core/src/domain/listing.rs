//! Read-only projections of the artifact registry.

use serde::Serialize;

use crate::domain::artifact::ArtifactKind;
use crate::domain::config::ServiceType;

/// One struct field as recovered from source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDetail {
    /// Exported Go name.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,
    pub go_type: String,
    /// Catalogue name (`decimal`, `time?`); `None` for types the generator
    /// never emits.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gorm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    pub name: String,
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub fields: Vec<String>,
    pub soft_delete: bool,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDetail {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    pub name: String,
    pub service_type: ServiceType,
    /// Owning domain package for domain services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    pub methods: Vec<MethodDetail>,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSummary {
    /// Domain package.
    pub domain: String,
    pub kind: ArtifactKind,
    /// Exported Go type.
    pub name: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Event consumed by a handler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

/// Everything `list` reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectListing {
    pub domains: Vec<DomainSummary>,
    pub services: Vec<ServiceSummary>,
    pub components: Vec<ComponentSummary>,
}

impl ProjectListing {
    pub fn components_of(&self, kind: ArtifactKind) -> impl Iterator<Item = &ComponentSummary> {
        self.components.iter().filter(move |c| c.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.services.is_empty() && self.components.is_empty()
    }
}

/// Kind-tagged detail of a single artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactDetail {
    Domain {
        #[serde(flatten)]
        summary: DomainSummary,
        field_details: Vec<FieldDetail>,
    },
    Service(ServiceSummary),
    ValueObject {
        domain: String,
        name: String,
        file: String,
        fields: Vec<FieldDetail>,
    },
    Specification {
        domain: String,
        name: String,
        file: String,
        target: String,
    },
    Policy {
        domain: String,
        name: String,
        file: String,
        target: String,
    },
    Event {
        domain: String,
        name: String,
        file: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
        fields: Vec<FieldDetail>,
    },
    EventHandler {
        domain: String,
        name: String,
        file: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        event: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
    },
}

impl ArtifactDetail {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Domain { .. } => ArtifactKind::Domain,
            Self::Service(_) => ArtifactKind::Service,
            Self::ValueObject { .. } => ArtifactKind::ValueObject,
            Self::Specification { .. } => ArtifactKind::Specification,
            Self::Policy { .. } => ArtifactKind::Policy,
            Self::Event { .. } => ArtifactKind::Event,
            Self::EventHandler { .. } => ArtifactKind::EventHandler,
        }
    }
}

/// Raw content of an artifact's primary file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSource {
    pub path: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_kind_tagged() {
        let detail = ArtifactDetail::Policy {
            domain: "order".into(),
            name: "RefundPolicy".into(),
            file: "internal/domain/order/policy_refund.go".into(),
            target: "Order".into(),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["kind"], "policy");
        assert_eq!(json["target"], "Order");
        assert_eq!(detail.kind(), ArtifactKind::Policy);
    }

    #[test]
    fn domain_detail_flattens_summary() {
        let detail = ArtifactDetail::Domain {
            summary: DomainSummary {
                name: "Order".into(),
                package: "order".into(),
                table: Some("orders".into()),
                fields: vec!["Amount".into()],
                soft_delete: true,
                files: vec![],
            },
            field_details: vec![],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["kind"], "domain");
        assert_eq!(json["table"], "orders");
        assert_eq!(json["soft_delete"], true);
    }
}
