//! Identifier transformer.
//!
//! Every generated file name, Go type name, table name and route is derived
//! from one validated [`Identifier`] through the pure functions in this
//! module. Two calls with the same input always produce byte-identical output.
//!
//! ```text
//! "OrderItem" ─┬─ snake     order_item
//!              ├─ pascal    OrderItem
//!              ├─ camel     orderItem
//!              ├─ package   orderitem
//!              ├─ table     order_items
//!              ├─ route     order-items
//!              └─ canonical orderitem
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ============================================================================
// Identifier (Value Object)
// ============================================================================

/// A bare identifier: ASCII letters, digits and `_`, not starting with a digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Validate and wrap a raw name.
    ///
    /// Surrounding whitespace is trimmed before validation.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let value = raw.as_ref().trim();

        let first = value
            .chars()
            .next()
            .ok_or_else(|| DomainError::invalid_identifier(value, "identifier is empty"))?;

        if first.is_ascii_digit() {
            return Err(DomainError::invalid_identifier(
                value,
                "identifier cannot start with a digit",
            ));
        }

        if let Some(bad) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(DomainError::invalid_identifier(
                value,
                format!("character '{bad}' is not allowed"),
            ));
        }

        if !value.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::invalid_identifier(
                value,
                "identifier needs at least one letter or digit",
            ));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive all naming variants.
    pub fn derive(&self) -> NameVariants {
        NameVariants::from_identifier(self)
    }

    /// `snake_case` form.
    pub fn snake(&self) -> String {
        to_snake_case(&self.0)
    }

    /// `PascalCase` form.
    pub fn pascal(&self) -> String {
        to_pascal_case(&self.0)
    }

    /// Lowercase form without separators, used for identity comparison.
    pub fn canonical(&self) -> String {
        canonical_key(&self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

// ============================================================================
// Naming Variants
// ============================================================================

/// The full set of names derived from one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameVariants {
    pub pascal: String,
    pub camel: String,
    pub snake: String,
    /// Go package name: snake form with separators removed.
    pub package: String,
    pub table: String,
    pub route: String,
    pub canonical: String,
}

impl NameVariants {
    fn from_identifier(id: &Identifier) -> Self {
        let snake = to_snake_case(id.as_str());
        let plural = pluralize(&snake);

        Self {
            pascal: to_pascal_case(id.as_str()),
            camel: to_camel_case(id.as_str()),
            package: snake.replace('_', ""),
            table: plural.clone(),
            route: plural.replace('_', "-"),
            canonical: canonical_key(id.as_str()),
            snake,
        }
    }

    /// Replace the defaulted table name.
    pub fn with_table(mut self, table: Option<&str>) -> Self {
        if let Some(table) = table.map(str::trim).filter(|t| !t.is_empty()) {
            self.table = table.to_string();
        }
        self
    }

    /// Replace the defaulted route base.
    pub fn with_route(mut self, route: Option<&str>) -> Self {
        if let Some(route) = route
            .map(|r| r.trim().trim_matches('/'))
            .filter(|r| !r.is_empty())
        {
            self.route = route.to_string();
        }
        self
    }
}

// ============================================================================
// Case Conversion
// ============================================================================

/// Convert an identifier to `snake_case`.
///
/// | Input | Output |
/// |-------|--------|
/// | `OrderItem` | `order_item` |
/// | `HTTPServer` | `http_server` |
/// | `order_item` | `order_item` |
/// | `Item2Price` | `item2_price` |
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert an identifier to `PascalCase`.
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert an identifier to `camelCase`.
pub fn to_camel_case(s: &str) -> String {
    lower_first(&to_pascal_case(s))
}

/// Lowercase form with `_` removed.
pub fn canonical_key(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Uppercase the first character, leaving the rest untouched.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character, leaving the rest untouched.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Split an identifier into lowercase words.
///
/// Boundaries:
/// 1. `_` always splits
/// 2. lowercase or digit followed by uppercase (`orderItem`, `item2Price`)
/// 3. acronym end: uppercase followed by uppercase+lowercase (`HTTPServer`)
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        current.push(c);

        if let Some(&next) = chars.peek() {
            let camel_break =
                (c.is_ascii_lowercase() || c.is_ascii_digit()) && next.is_ascii_uppercase();
            let acronym_break = c.is_ascii_uppercase()
                && next.is_ascii_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_ascii_lowercase());

            if camel_break || acronym_break {
                words.push(current.to_lowercase());
                current.clear();
            }
        }
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

// ============================================================================
// Inflection
// ============================================================================

/// English plural of a lowercased word.
///
/// - `s`, `x`, `z`, `ch`, `sh` → `+es`
/// - consonant + `y` → `ies`
/// - otherwise `+s`
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();

    if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
        return format!("{lower}es");
    }

    if let Some(stem) = lower.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}ies");
        }
    }

    format!("{lower}s")
}

/// Inverse of [`pluralize`] for the shapes it produces.
///
/// Case of the input is preserved so `Orders` becomes `Order`.
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();

    if lower.ends_with("ies") && word.len() > 3 {
        return format!("{}y", &word[..word.len() - 3]);
    }

    if ["sses", "ches", "shes", "xes", "zes"]
        .iter()
        .any(|end| lower.ends_with(end))
    {
        return word[..word.len() - 2].to_string();
    }

    if lower.ends_with('s') && !lower.ends_with("ss") && word.len() > 1 {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Turn an enum value into a Go constant suffix.
///
/// | Value | Constant |
/// |-------|----------|
/// | `active` | `Active` |
/// | `in-progress` | `InProgress` |
/// | `2fa` | `Value2fa` |
/// | `***` | `Value` |
pub fn enum_const(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let normalized = cleaned.trim_matches('_').to_lowercase();
    if normalized.is_empty() {
        return "Value".to_string();
    }

    let pascal: String = normalized
        .split('_')
        .filter(|p| !p.is_empty())
        .map(capitalize)
        .collect();

    if pascal.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Value{pascal}")
    } else {
        pascal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_leading_digit() {
        assert!(Identifier::new("").is_err());
        assert!(Identifier::new("   ").is_err());
        assert!(Identifier::new("1Order").is_err());
        assert!(Identifier::new("___").is_err());
    }

    #[test]
    fn rejects_punctuation() {
        let err = Identifier::new("order-item").unwrap_err();
        assert!(matches!(err, DomainError::InvalidIdentifier { .. }));
        assert!(Identifier::new("order item").is_err());
        assert!(Identifier::new("order/item").is_err());
    }

    #[test]
    fn accepts_underscores_and_digits() {
        assert!(Identifier::new("order_item2").is_ok());
        assert!(Identifier::new("_private").is_ok());
    }

    #[test]
    fn snake_case_splits_on_case_boundaries() {
        assert_eq!(to_snake_case("OrderItem"), "order_item");
        assert_eq!(to_snake_case("orderItem"), "order_item");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("order_item"), "order_item");
        assert_eq!(to_snake_case("Item2Price"), "item2_price");
        assert_eq!(to_snake_case("ID"), "id");
    }

    #[test]
    fn pascal_and_camel_round_trip_snake() {
        assert_eq!(to_pascal_case("order_item"), "OrderItem");
        assert_eq!(to_pascal_case("OrderItem"), "OrderItem");
        assert_eq!(to_camel_case("OrderItem"), "orderItem");
        assert_eq!(to_camel_case("user"), "user");
    }

    #[test]
    fn derive_fills_every_variant() {
        let v = Identifier::new("OrderItem").unwrap().derive();
        assert_eq!(v.pascal, "OrderItem");
        assert_eq!(v.camel, "orderItem");
        assert_eq!(v.snake, "order_item");
        assert_eq!(v.package, "orderitem");
        assert_eq!(v.table, "order_items");
        assert_eq!(v.route, "order-items");
        assert_eq!(v.canonical, "orderitem");
    }

    #[test]
    fn derive_is_deterministic() {
        let id = Identifier::new("Category").unwrap();
        assert_eq!(id.derive(), id.derive());
    }

    #[test]
    fn overrides_replace_table_and_route() {
        let v = Identifier::new("Person")
            .unwrap()
            .derive()
            .with_table(Some("people"))
            .with_route(Some("/people/"));
        assert_eq!(v.table, "people");
        assert_eq!(v.route, "people");

        let unchanged = Identifier::new("Person").unwrap().derive().with_table(Some("  "));
        assert_eq!(unchanged.table, "persons");
    }

    #[test]
    fn pluralize_rules() {
        assert_eq!(pluralize("order"), "orders");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("batch"), "batches");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("User"), "users");
    }

    #[test]
    fn singularize_inverts_pluralize() {
        assert_eq!(singularize("Orders"), "Order");
        assert_eq!(singularize("Categories"), "Category");
        assert_eq!(singularize("Boxes"), "Box");
        assert_eq!(singularize("Address"), "Address");
        assert_eq!(singularize("Order"), "Order");
    }

    #[test]
    fn enum_const_normalizes_values() {
        assert_eq!(enum_const("active"), "Active");
        assert_eq!(enum_const("in-progress"), "InProgress");
        assert_eq!(enum_const("IN_PROGRESS"), "InProgress");
        assert_eq!(enum_const("2fa"), "Value2fa");
        assert_eq!(enum_const("***"), "Value");
    }

    #[test]
    fn canonical_ignores_case_and_underscores() {
        assert_eq!(canonical_key("Order_Amount"), canonical_key("orderamount"));
        assert_eq!(Identifier::new("OrderAmount").unwrap().canonical(), "orderamount");
    }
}
