//! Go source skeletons and the substitution engine that fills them.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  const SKELETON: &str  ── "type {{ENTITY}} struct {..."      │
//! │          │                                                   │
//! │          ▼                                                   │
//! │  RenderContext  ── ENTITY=Order, FIELDS="\tAmount float64.." │
//! │          │       (list blocks are precomputed strings)       │
//! │          ▼                                                   │
//! │  rendered Go source, byte-identical for identical input      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod components;
pub mod domain;
pub mod project;
pub mod service;

use std::collections::HashMap;

/// Context for template rendering.
///
/// Variables are `SCREAMING_SNAKE_CASE` keys substituted for `{{KEY}}`
/// placeholders. Unknown placeholders stay as literal text.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, consuming self and returning the extended context.
    ///
    /// ```rust,ignore
    /// let ctx = RenderContext::new()
    ///     .with_variable("ENTITY", "Order")
    ///     .with_variable("PACKAGE", "order");
    /// ```
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Render a template string by replacing `{{VARIABLE}}` placeholders.
    ///
    /// Single left-to-right scan: substituted values are never re-scanned,
    /// so the output does not depend on map iteration order.
    ///
    /// - `{{UNKNOWN}}` remains as literal `{{UNKNOWN}}`
    /// - `{{{KEY}}}` keeps the outer braces and replaces the inner placeholder
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len() + template.len() / 2);
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let value = after
                .find("}}")
                .map(|end| &after[..end])
                .filter(|key| is_placeholder_key(key))
                .and_then(|key| self.get(key).map(|v| (key.len(), v)));

            match value {
                Some((key_len, value)) => {
                    out.push_str(value);
                    rest = &after[key_len + 2..];
                }
                None => {
                    out.push('{');
                    rest = &rest[start + 1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Render a Go import block body. Standard-library paths come first,
/// then a blank line and the module/third-party paths. Entries of the
/// form `alias "path"` are kept verbatim.
pub(crate) fn go_imports(std: &[&str], others: &[String]) -> String {
    let mut out = String::new();
    for path in std {
        out.push_str(&format!("\t\"{path}\"\n"));
    }
    if !std.is_empty() && !others.is_empty() {
        out.push('\n');
    }
    for path in others {
        if path.contains('"') {
            out.push_str(&format!("\t{path}\n"));
        } else {
            out.push_str(&format!("\t\"{path}\"\n"));
        }
    }
    out
}

/// `// <text>` doc line, or the fallback when no remark was given.
pub(crate) fn doc_line(name: &str, remark: Option<&str>, fallback: &str) -> String {
    match remark.map(str::trim).filter(|r| !r.is_empty()) {
        Some(remark) => format!("// {name} {remark}"),
        None => format!("// {name} {fallback}"),
    }
}
