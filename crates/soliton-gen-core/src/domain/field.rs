//! Field configuration and the fixed field-type table.
//!
//! A [`FieldConfig`] is what callers send; a [`Field`] is the resolved,
//! render-ready form with every Go type and struct tag precomputed so
//! templates only splice strings.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::identifier::{
    Identifier, enum_const, to_camel_case, to_pascal_case, to_snake_case,
};

/// Field names owned by the entity skeleton itself.
pub const RESERVED_FIELDS: [&str; 4] = ["id", "created_at", "updated_at", "deleted_at"];

// ============================================================================
// Field Types
// ============================================================================

/// Supported field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Text,
    Int,
    Int64,
    Float,
    Decimal,
    Bool,
    Time,
    OptionalTime,
    Date,
    OptionalDate,
    Uuid,
    Json,
    Jsonb,
    Bytes,
    Enum,
}

impl FieldType {
    /// Every type in catalogue order.
    pub const ALL: [FieldType; 16] = [
        Self::String,
        Self::Text,
        Self::Int,
        Self::Int64,
        Self::Float,
        Self::Decimal,
        Self::Bool,
        Self::Time,
        Self::OptionalTime,
        Self::Date,
        Self::OptionalDate,
        Self::Uuid,
        Self::Json,
        Self::Jsonb,
        Self::Bytes,
        Self::Enum,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Int => "int",
            Self::Int64 => "int64",
            Self::Float => "float64",
            Self::Decimal => "decimal",
            Self::Bool => "bool",
            Self::Time => "time",
            Self::OptionalTime => "time?",
            Self::Date => "date",
            Self::OptionalDate => "date?",
            Self::Uuid => "uuid",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::Bytes => "bytes",
            Self::Enum => "enum",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::String => "String (varchar 255)",
            Self::Text => "Text (long text)",
            Self::Int => "Integer (32-bit)",
            Self::Int64 => "Integer (64-bit)",
            Self::Float => "Float (64-bit)",
            Self::Decimal => "Decimal (10,2)",
            Self::Bool => "Boolean",
            Self::Time => "Timestamp",
            Self::OptionalTime => "Optional Timestamp",
            Self::Date => "Date",
            Self::OptionalDate => "Optional Date",
            Self::Uuid => "UUID (indexed)",
            Self::Json => "JSON document",
            Self::Jsonb => "JSONB document",
            Self::Bytes => "Binary data",
            Self::Enum => "Enum (requires enum_values)",
        }
    }

    /// Go type for non-enum fields. Enums are named per owner.
    fn go_type(self) -> &'static str {
        match self {
            Self::String | Self::Text | Self::Uuid | Self::Enum => "string",
            Self::Int => "int",
            Self::Int64 => "int64",
            Self::Float | Self::Decimal => "float64",
            Self::Bool => "bool",
            Self::Time | Self::Date => "time.Time",
            Self::OptionalTime | Self::OptionalDate => "*time.Time",
            Self::Json | Self::Jsonb => "datatypes.JSON",
            Self::Bytes => "[]byte",
        }
    }

    fn gorm_body(self) -> Option<&'static str> {
        match self {
            Self::String => Some("size:255"),
            Self::Text => Some("type:text"),
            Self::Int | Self::Int64 => Some("not null;default:0"),
            Self::Float => Some("default:0"),
            Self::Decimal => Some("type:decimal(10,2);default:0"),
            Self::Bool => Some("default:false"),
            Self::Time => Some("type:timestamp"),
            Self::Date | Self::OptionalDate => Some("type:date"),
            Self::Uuid => Some("size:36;index"),
            Self::Jsonb => Some("type:jsonb"),
            Self::Bytes => Some("type:bytes"),
            Self::OptionalTime | Self::Json | Self::Enum => None,
        }
    }

    pub fn is_pointer(self) -> bool {
        matches!(self, Self::OptionalTime | Self::OptionalDate)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "string" | "str" => Ok(Self::String),
            "text" => Ok(Self::Text),
            "int" | "integer" => Ok(Self::Int),
            "int64" | "long" => Ok(Self::Int64),
            "float" | "float64" | "double" => Ok(Self::Float),
            "decimal" => Ok(Self::Decimal),
            "bool" | "boolean" => Ok(Self::Bool),
            "time" | "datetime" | "timestamp" => Ok(Self::Time),
            "time?" | "datetime?" | "timestamp?" => Ok(Self::OptionalTime),
            "date" => Ok(Self::Date),
            "date?" => Ok(Self::OptionalDate),
            "uuid" | "id" => Ok(Self::Uuid),
            "json" => Ok(Self::Json),
            "jsonb" => Ok(Self::Jsonb),
            "bytes" | "binary" | "blob" => Ok(Self::Bytes),
            "enum" => Ok(Self::Enum),
            other => Err(DomainError::invalid_field(
                other,
                format!("unsupported field type '{other}'"),
            )),
        }
    }
}

/// One row of the field-type catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTypeInfo {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
}

/// The catalogue of supported field types.
pub fn field_types() -> Vec<FieldTypeInfo> {
    FieldType::ALL
        .iter()
        .map(|t| FieldTypeInfo {
            kind: t.as_str(),
            description: t.description(),
        })
        .collect()
}

// ============================================================================
// Field Configuration (input)
// ============================================================================

/// A caller-supplied field description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "remark")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            comment: None,
            enum_values: Vec::new(),
        }
    }

    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: "enum".into(),
            comment: None,
            enum_values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Parse the compact `name[:type]` list form, e.g.
    /// `username,age:int,status:enum(active|inactive)`.
    pub fn parse_list(spec: &str) -> Result<Vec<FieldConfig>, DomainError> {
        spec.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::parse_one)
            .collect()
    }

    fn parse_one(def: &str) -> Result<FieldConfig, DomainError> {
        let (name, kind) = match def.split_once(':') {
            Some((name, kind)) => (name.trim(), kind.trim()),
            None => (def, "string"),
        };

        if let Some(values) = kind
            .strip_prefix("enum(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let values = values
                .split('|')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from);
            return Ok(Self::enumeration(name, values));
        }

        Ok(Self::new(name, kind))
    }
}

// ============================================================================
// Resolved Field (render-ready)
// ============================================================================

/// How reserved names are treated when resolving a field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedFields {
    /// Drop `id`, `created_at`, ... since the skeleton declares them.
    Skip,
    /// Keep them (event payloads).
    Allow,
}

/// A fully resolved field with precomputed Go types and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Exported Go field name.
    pub name: String,
    pub snake: String,
    pub camel: String,
    pub kind: FieldType,
    /// Type inside the owning package.
    pub go_type: String,
    /// Type as seen from the application package (`order.OrderStatus`).
    pub app_go_type: String,
    /// Full gorm struct tag including backticks, or empty.
    pub gorm_tag: String,
    /// Full json struct tag including backticks.
    pub json_tag: String,
    pub comment: Option<String>,
    pub enum_type: Option<String>,
    pub enum_values: Vec<String>,
}

impl Field {
    /// Resolve one config for the owner type `owner` living in Go package `package`.
    pub fn resolve(config: &FieldConfig, owner: &str, package: &str) -> Result<Self, DomainError> {
        let id = Identifier::new(&config.name)
            .map_err(|e| DomainError::invalid_field(config.name.clone(), e.to_string()))?;
        let kind: FieldType = config
            .kind
            .parse()
            .map_err(|_| {
                DomainError::invalid_field(
                    &config.name,
                    format!("unsupported field type '{}'", config.kind),
                )
            })?;

        let name = to_pascal_case(id.as_str());
        let snake = to_snake_case(id.as_str());
        let camel = go_safe_param(&to_camel_case(id.as_str()));
        let comment = config
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);

        if kind == FieldType::Enum {
            let values = validate_enum_values(&config.name, &config.enum_values)?;
            let enum_type = format!("{owner}{name}");
            let first = values.first().cloned().unwrap_or_default();

            return Ok(Self {
                go_type: enum_type.clone(),
                app_go_type: format!("{package}.{enum_type}"),
                gorm_tag: format!("`gorm:\"size:50;default:'{first}'\"`"),
                json_tag: json_tag(&snake),
                enum_type: Some(enum_type),
                enum_values: values,
                name,
                snake,
                camel,
                kind,
                comment,
            });
        }

        if !config.enum_values.is_empty() {
            return Err(DomainError::invalid_field(
                &config.name,
                "enum_values are only allowed on enum fields",
            ));
        }

        Ok(Self {
            go_type: kind.go_type().to_string(),
            app_go_type: kind.go_type().to_string(),
            gorm_tag: kind
                .gorm_body()
                .map(|body| format!("`gorm:\"{body}\"`"))
                .unwrap_or_default(),
            json_tag: json_tag(&snake),
            enum_type: None,
            enum_values: Vec::new(),
            name,
            snake,
            camel,
            kind,
            comment,
        })
    }

    /// Resolve a whole field list, rejecting duplicates.
    pub fn resolve_all(
        configs: &[FieldConfig],
        owner: &str,
        package: &str,
        reserved: ReservedFields,
    ) -> Result<Vec<Field>, DomainError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(configs.len());

        for config in configs {
            let field = Self::resolve(config, owner, package)?;

            if reserved == ReservedFields::Skip && RESERVED_FIELDS.contains(&field.snake.as_str()) {
                continue;
            }
            if !seen.insert(field.snake.clone()) {
                return Err(DomainError::invalid_field(
                    &config.name,
                    "field names must be unique",
                ));
            }
            fields.push(field);
        }

        Ok(fields)
    }

    pub fn is_enum(&self) -> bool {
        self.kind == FieldType::Enum
    }

    pub fn is_pointer(&self) -> bool {
        self.kind.is_pointer()
    }

    pub fn uses_time(&self) -> bool {
        self.go_type.contains("time.Time")
    }

    pub fn uses_datatypes(&self) -> bool {
        self.go_type.contains("datatypes.")
    }

    /// Go type of the field in an update command/DTO: always optional.
    pub fn optional_app_type(&self) -> String {
        if self.is_pointer() {
            self.app_go_type.clone()
        } else {
            format!("*{}", self.app_go_type)
        }
    }

    /// Go type of an optional update parameter inside the owning package.
    pub fn optional_go_type(&self) -> String {
        if self.is_pointer() {
            self.go_type.clone()
        } else {
            format!("*{}", self.go_type)
        }
    }

    /// Extra ` binding:"..."` clause for create requests.
    pub fn create_binding(&self) -> String {
        if self.is_pointer() {
            return String::new();
        }
        if self.is_enum() {
            return format!(" binding:\"required,oneof={}\"", self.enum_values.join(" "));
        }
        if self.go_type == "string" {
            return " binding:\"required\"".to_string();
        }
        String::new()
    }

    /// Extra ` binding:"..."` clause for update requests.
    pub fn update_binding(&self) -> String {
        if self.is_enum() {
            format!(" binding:\"omitempty,oneof={}\"", self.enum_values.join(" "))
        } else {
            String::new()
        }
    }

    /// `(constant, value)` pairs for an enum field.
    pub fn enum_constants(&self) -> Vec<(String, String)> {
        let Some(enum_type) = &self.enum_type else {
            return Vec::new();
        };
        self.enum_values
            .iter()
            .map(|v| (format!("{enum_type}{}", enum_const(v)), v.clone()))
            .collect()
    }
}

/// The default field for entities without explicit fields.
pub fn default_entity_field() -> FieldConfig {
    FieldConfig::new("Name", "string")
}

/// The default field for value objects without explicit fields.
pub fn default_value_field() -> FieldConfig {
    FieldConfig::new("Value", "string")
}

fn json_tag(snake: &str) -> String {
    format!("`json:\"{snake}\"`")
}

fn validate_enum_values(field: &str, values: &[String]) -> Result<Vec<String>, DomainError> {
    let values: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();

    if values.is_empty() {
        return Err(DomainError::invalid_field(
            field,
            "enum fields need at least one value",
        ));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = values.iter().find(|v| !seen.insert(v.as_str())) {
        return Err(DomainError::invalid_field(
            field,
            format!("duplicate enum value '{dup}'"),
        ));
    }

    Ok(values)
}

/// Go keywords cannot be used as parameter names.
fn go_safe_param(camel: &str) -> String {
    const KEYWORDS: [&str; 25] = [
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
        "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
        "return", "select", "struct", "switch", "type", "var",
    ];
    if KEYWORDS.contains(&camel) {
        format!("{camel}Value")
    } else {
        camel.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(config: FieldConfig) -> Field {
        Field::resolve(&config, "Order", "order").unwrap()
    }

    #[test]
    fn type_aliases_parse() {
        assert_eq!("str".parse::<FieldType>().unwrap(), FieldType::String);
        assert_eq!("".parse::<FieldType>().unwrap(), FieldType::String);
        assert_eq!("Integer".parse::<FieldType>().unwrap(), FieldType::Int);
        assert_eq!("datetime?".parse::<FieldType>().unwrap(), FieldType::OptionalTime);
        assert_eq!("blob".parse::<FieldType>().unwrap(), FieldType::Bytes);
        assert!("money".parse::<FieldType>().is_err());
    }

    #[test]
    fn decimal_field_tags() {
        let f = resolve(FieldConfig::new("amount", "decimal"));
        assert_eq!(f.name, "Amount");
        assert_eq!(f.go_type, "float64");
        assert_eq!(f.gorm_tag, "`gorm:\"type:decimal(10,2);default:0\"`");
        assert_eq!(f.json_tag, "`json:\"amount\"`");
    }

    #[test]
    fn optional_time_has_no_gorm_tag() {
        let f = resolve(FieldConfig::new("paid_at", "time?"));
        assert_eq!(f.name, "PaidAt");
        assert_eq!(f.go_type, "*time.Time");
        assert!(f.gorm_tag.is_empty());
        assert!(f.is_pointer());
        assert_eq!(f.optional_go_type(), "*time.Time");
        assert_eq!(f.create_binding(), "");
    }

    #[test]
    fn enum_field_is_named_after_owner() {
        let f = resolve(FieldConfig::enumeration("status", ["pending", "paid"]));
        assert_eq!(f.go_type, "OrderStatus");
        assert_eq!(f.app_go_type, "order.OrderStatus");
        assert_eq!(f.gorm_tag, "`gorm:\"size:50;default:'pending'\"`");
        assert_eq!(f.create_binding(), " binding:\"required,oneof=pending paid\"");
        assert_eq!(f.update_binding(), " binding:\"omitempty,oneof=pending paid\"");
        assert_eq!(
            f.enum_constants(),
            vec![
                ("OrderStatusPending".to_string(), "pending".to_string()),
                ("OrderStatusPaid".to_string(), "paid".to_string()),
            ]
        );
    }

    #[test]
    fn enum_requires_unique_values() {
        let empty = Field::resolve(
            &FieldConfig::enumeration("status", Vec::<String>::new()),
            "Order",
            "order",
        );
        assert!(matches!(empty, Err(DomainError::InvalidField { .. })));

        let dup = Field::resolve(&FieldConfig::enumeration("status", ["a", "a"]), "Order", "order");
        assert!(matches!(dup, Err(DomainError::InvalidField { .. })));
    }

    #[test]
    fn string_create_binding_is_required() {
        let f = resolve(FieldConfig::new("title", "string"));
        assert_eq!(f.create_binding(), " binding:\"required\"");
        let n = resolve(FieldConfig::new("count", "int"));
        assert_eq!(n.create_binding(), "");
    }

    #[test]
    fn tags_are_stable_across_calls() {
        let config = FieldConfig::enumeration("kind", ["a", "b"]);
        assert_eq!(resolve(config.clone()), resolve(config));
    }

    #[test]
    fn resolve_all_skips_reserved_and_rejects_duplicates() {
        let configs = vec![
            FieldConfig::new("id", "uuid"),
            FieldConfig::new("CreatedAt", "time"),
            FieldConfig::new("title", "string"),
        ];
        let fields = Field::resolve_all(&configs, "Post", "post", ReservedFields::Skip).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "Title");

        let allowed =
            Field::resolve_all(&configs, "PostEvent", "post", ReservedFields::Allow).unwrap();
        assert_eq!(allowed.len(), 3);

        let dup = vec![FieldConfig::new("title", "string"), FieldConfig::new("Title", "text")];
        assert!(Field::resolve_all(&dup, "Post", "post", ReservedFields::Skip).is_err());
    }

    #[test]
    fn keyword_params_are_renamed() {
        let f = resolve(FieldConfig::new("type", "string"));
        assert_eq!(f.name, "Type");
        assert_eq!(f.camel, "typeValue");
    }

    #[test]
    fn parse_list_understands_enums() {
        let fields =
            FieldConfig::parse_list("username, age:int ,status:enum(active|inactive)").unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].kind, "string");
        assert_eq!(fields[1].kind, "int");
        assert_eq!(fields[2].kind, "enum");
        assert_eq!(fields[2].enum_values, vec!["active", "inactive"]);
    }

    #[test]
    fn catalogue_lists_every_type() {
        let catalogue = field_types();
        assert_eq!(catalogue.len(), FieldType::ALL.len());
        assert!(catalogue.iter().any(|t| t.kind == "time?"));
    }
}
