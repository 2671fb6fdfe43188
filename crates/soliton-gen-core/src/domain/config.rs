//! Generation request configurations.
//!
//! These are the JSON-shaped inputs each generation kind accepts. They stay
//! close to the wire format (plain `String` names) and are checked by
//! `validate()` before any planning happens.

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::field::FieldConfig;
use crate::domain::identifier::Identifier;

/// Entity-centred domain scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_base: Option<String>,
    #[serde(default)]
    pub soft_delete: bool,
    #[serde(default)]
    pub wire: bool,
    #[serde(default)]
    pub force: bool,
}

impl DomainConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            table_name: None,
            route_base: None,
            soft_delete: false,
            wire: false,
            force: false,
        }
    }

    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    pub fn validate(&self) -> Result<Identifier, DomainError> {
        Identifier::new(&self.name)
    }
}

/// Whether a service belongs to one domain or spans several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    DomainService,
    CrossDomainService,
}

impl ServiceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DomainService => "domain_service",
            Self::CrossDomainService => "cross_domain_service",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "domain" | "domain_service" => Ok(Self::DomainService),
            "cross" | "cross_domain" | "cross_domain_service" => Ok(Self::CrossDomainService),
            other => Err(DomainError::invalid_field(
                "service_type",
                format!("unknown service type '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMethodConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl ServiceMethodConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remark: None,
        }
    }
}

/// Application service scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<ServiceMethodConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Overrides the classifier when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
    /// Overrides the classifier's DTO reuse advice when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reuse_dto: Option<bool>,
    #[serde(default)]
    pub force: bool,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            remark: None,
            service_type: None,
            reuse_dto: None,
            force: false,
        }
    }

    pub fn validate(&self) -> Result<Identifier, DomainError> {
        let id = Identifier::new(&self.name)?;
        for method in &self.methods {
            Identifier::new(&method.name)?;
        }
        Ok(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueObjectConfig {
    pub domain: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationConfig {
    pub domain: String,
    pub name: String,
    /// Type the predicate inspects; `any` when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub domain: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    pub domain: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHandlerConfig {
    pub domain: String,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub force: bool,
}

/// New project skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInitConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_replace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_version: Option<String>,
    #[serde(default)]
    pub force: bool,
}

impl ProjectInitConfig {
    pub const DEFAULT_MODULE_PREFIX: &'static str = "github.com/soliton-go";
    pub const DEFAULT_GO_VERSION: &'static str = "1.22";
    pub const DEFAULT_FRAMEWORK_VERSION: &'static str = "v0.1.0";
    pub const REPLACED_FRAMEWORK_VERSION: &'static str = "v0.0.0-00010101000000-000000000000";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_name: None,
            framework_version: None,
            framework_replace: None,
            go_version: None,
            force: false,
        }
    }

    /// Project names are directory names, so `-` is allowed here.
    pub fn validate(&self) -> Result<(), DomainError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }
        if name.starts_with('.')
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(DomainError::invalid_identifier(
                name,
                "project names may contain letters, digits, '-', '_' and '.' only",
            ));
        }
        if let Some(module) = self
            .module_name
            .as_deref()
            .filter(|m| m.trim().contains(char::is_whitespace))
        {
            return Err(DomainError::invalid_identifier(
                module,
                "module paths cannot contain whitespace",
            ));
        }
        Ok(())
    }

    pub fn module_path(&self) -> String {
        self.module_name
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("{}/{}", Self::DEFAULT_MODULE_PREFIX, self.name.trim()))
    }

    pub fn go_version(&self) -> &str {
        self.go_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(Self::DEFAULT_GO_VERSION)
    }
}

/// Any single generation request against an existing project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    Domain(DomainConfig),
    Service(ServiceConfig),
    ValueObject(ValueObjectConfig),
    Specification(SpecificationConfig),
    Policy(PolicyConfig),
    Event(EventConfig),
    EventHandler(EventHandlerConfig),
}

impl GenerationRequest {
    pub fn force(&self) -> bool {
        match self {
            Self::Domain(c) => c.force,
            Self::Service(c) => c.force,
            Self::ValueObject(c) => c.force,
            Self::Specification(c) => c.force,
            Self::Policy(c) => c.force,
            Self::Event(c) => c.force,
            Self::EventHandler(c) => c.force,
        }
    }

    /// Human label used in logs and messages.
    pub fn label(&self) -> String {
        match self {
            Self::Domain(c) => format!("domain {}", c.name),
            Self::Service(c) => format!("service {}", c.name),
            Self::ValueObject(c) => format!("value object {}.{}", c.domain, c.name),
            Self::Specification(c) => format!("specification {}.{}", c.domain, c.name),
            Self::Policy(c) => format!("policy {}.{}", c.domain, c.name),
            Self::Event(c) => format!("event {}.{}", c.domain, c.name),
            Self::EventHandler(c) => format!("event handler {}.{}", c.domain, c.event_name),
        }
    }
}

impl From<DomainConfig> for GenerationRequest {
    fn from(c: DomainConfig) -> Self {
        Self::Domain(c)
    }
}

impl From<ServiceConfig> for GenerationRequest {
    fn from(c: ServiceConfig) -> Self {
        Self::Service(c)
    }
}

impl From<ValueObjectConfig> for GenerationRequest {
    fn from(c: ValueObjectConfig) -> Self {
        Self::ValueObject(c)
    }
}

impl From<SpecificationConfig> for GenerationRequest {
    fn from(c: SpecificationConfig) -> Self {
        Self::Specification(c)
    }
}

impl From<PolicyConfig> for GenerationRequest {
    fn from(c: PolicyConfig) -> Self {
        Self::Policy(c)
    }
}

impl From<EventConfig> for GenerationRequest {
    fn from(c: EventConfig) -> Self {
        Self::Event(c)
    }
}

impl From<EventHandlerConfig> for GenerationRequest {
    fn from(c: EventHandlerConfig) -> Self {
        Self::EventHandler(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_config_from_json_uses_defaults() {
        let config: DomainConfig = serde_json::from_str(
            r#"{"name":"Invoice","fields":[{"name":"amount","type":"decimal"}],"soft_delete":true}"#,
        )
        .unwrap();
        assert_eq!(config.name, "Invoice");
        assert!(config.soft_delete);
        assert!(!config.force);
        assert!(!config.wire);
        assert_eq!(config.fields[0].kind, "decimal");
    }

    #[test]
    fn request_is_tagged_by_kind() {
        let request: GenerationRequest = serde_json::from_str(
            r#"{"kind":"specification","domain":"order","name":"Overdue"}"#,
        )
        .unwrap();
        assert!(matches!(request, GenerationRequest::Specification(_)));
        assert!(!request.force());
    }

    #[test]
    fn service_type_parses_short_forms() {
        assert_eq!("domain".parse::<ServiceType>().unwrap(), ServiceType::DomainService);
        assert_eq!(
            "cross-domain".parse::<ServiceType>().unwrap(),
            ServiceType::CrossDomainService
        );
        assert!("other".parse::<ServiceType>().is_err());
    }

    #[test]
    fn service_validation_checks_method_names() {
        let mut config = ServiceConfig::new("OrderService");
        config.methods.push(ServiceMethodConfig::new("1bad"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn project_module_defaults_to_prefix() {
        let config = ProjectInitConfig::new("shop-api");
        assert!(config.validate().is_ok());
        assert_eq!(config.module_path(), "github.com/soliton-go/shop-api");
        assert_eq!(config.go_version(), "1.22");
        assert!(ProjectInitConfig::new("bad name").validate().is_err());
        assert!(ProjectInitConfig::new("  ").validate().is_err());
    }
}
