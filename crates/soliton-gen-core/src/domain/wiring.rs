//! Registration edits on `cmd/main.go` and `module.go` files.
//!
//! Every edit is a pure `&str -> Option<String>` function: `None` means
//! the source already has the desired shape, so callers can plan edits
//! like any other file and re-running a wiring step is a no-op.
//!
//! Lines are inserted directly above their marker comment:
//!
//! ```text
//! 		orderapp.Module,
//! 		// soliton-gen:modules          <- marker stays last
//! ```

use regex::Regex;

pub const IMPORTS_MARKER: &str = "\t// soliton-gen:imports";
pub const PROVIDERS_MARKER: &str = "\t\t\t// soliton-gen:providers";
pub const MODULES_MARKER: &str = "\t\t// soliton-gen:modules";
pub const HANDLERS_MARKER: &str = "\t\t// soliton-gen:handlers";
pub const ROUTES_MARKER: &str = "\t\t// soliton-gen:routes";
pub const SERVICES_MARKER: &str = "\t// soliton-gen:services";
pub const EVENT_HANDLERS_MARKER: &str = "\t// soliton-gen:event-handlers";

const BLANK_GORM_IMPORT: &str =
    "\t_ \"gorm.io/gorm\" // kept for fx.Invoke signatures using *gorm.DB";
const GORM_IMPORT: &str = "\t\"gorm.io/gorm\"";
const EVENT_IMPORT: &str = "\t\"github.com/soliton-go/framework/event\"";
const EVENT_BUS_PROVIDER: &str = "func() event.EventBus { return event.NewLocalEventBus() },";
const LEGACY_EVENT_BUS_PROVIDER: &str = "event.NewLocalEventBus,";

// ============================================================================
// Line Helpers
// ============================================================================

fn has_line(content: &str, line: &str) -> bool {
    let wanted = line.trim();
    content.lines().any(|l| l.trim() == wanted)
}

/// Insert `lines` (already indented) right above the line holding `marker`.
/// Returns `None` when the marker is absent.
fn insert_before_marker(content: &str, marker: &str, lines: &[String]) -> Option<String> {
    let needle = marker.trim();
    let start = content.find(needle)?;
    let line_start = content[..start].rfind('\n').map_or(0, |i| i + 1);

    let block: String = lines.iter().map(|l| format!("{l}\n")).collect();
    Some(format!("{}{block}{}", &content[..line_start], &content[line_start..]))
}

/// Insert before the closing `)` of `fx.Options(` when no marker exists.
fn insert_before_options_close(content: &str, lines: &[String]) -> Option<String> {
    let open = content.find("fx.Options(")? + "fx.Options(".len();
    let mut depth = 1usize;
    let mut close = None;
    for (i, c) in content[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;
    let line_start = content[..close].rfind('\n').map_or(0, |i| i + 1);
    let block: String = lines.iter().map(|l| format!("{l}\n")).collect();
    Some(format!("{}{block}{}", &content[..line_start], &content[line_start..]))
}

/// Re-enable a commented-out copy of `line` if one exists.
fn uncomment_line(content: &str, line: &str) -> Option<String> {
    let wanted = line.trim();
    let mut changed = false;
    let out = content
        .lines()
        .map(|l| {
            let trimmed = l.trim_start();
            match trimmed.strip_prefix("//").map(str::trim) {
                Some(rest) if !changed && rest == wanted => {
                    changed = true;
                    let indent = &l[..l.len() - trimmed.len()];
                    format!("{indent}{wanted}")
                }
                _ => l.to_string(),
            }
        })
        .collect::<Vec<_>>();
    changed.then(|| rejoin(content, out))
}

fn rejoin(original: &str, lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    if original.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Add the missing subset of `lines` before `marker`, uncommenting
/// disabled copies first. Falls back to `fallback` for marker-less files.
fn ensure_lines<F>(content: &str, marker: &str, lines: &[String], fallback: F) -> Option<String>
where
    F: Fn(&str, &[String]) -> Option<String>,
{
    let mut current = content.to_string();
    let mut missing = Vec::new();

    for line in lines {
        if has_line(&current, line) {
            continue;
        }
        match uncomment_line(&current, line) {
            Some(updated) => current = updated,
            None => missing.push(line.clone()),
        }
    }

    if !missing.is_empty() {
        current = insert_before_marker(&current, marker, &missing)
            .or_else(|| fallback(&current, &missing))?;
    }

    (current != content).then_some(current)
}

fn remove_lines(content: &str, lines: &[String]) -> Option<String> {
    let wanted: Vec<&str> = lines.iter().map(|l| l.trim()).collect();
    let kept: Vec<String> = content
        .lines()
        .filter(|l| !wanted.contains(&l.trim()))
        .map(String::from)
        .collect();
    let out = rejoin(content, kept);
    (out != content).then_some(out)
}

// ============================================================================
// Domain Wiring (cmd/main.go)
// ============================================================================

struct DomainWiring {
    imports: Vec<String>,
    module: String,
    handler: String,
    route_head: String,
    route_block: Vec<String>,
}

impl DomainWiring {
    fn new(module_path: &str, package: &str, entity: &str) -> Self {
        let route_head = format!(
            "\t\tfx.Invoke(func(db *gorm.DB, r *gin.Engine, \
             h *interfaceshttp.{entity}Handler) error {{"
        );
        Self {
            imports: vec![
                format!("\t{package}app \"{module_path}/internal/application/{package}\""),
                format!("\tinterfaceshttp \"{module_path}/internal/interfaces/http\""),
            ],
            module: format!("\t\t{package}app.Module,"),
            handler: format!("\t\tfx.Provide(interfaceshttp.New{entity}Handler),"),
            route_block: vec![
                route_head.clone(),
                format!("\t\t\tif err := {package}app.RegisterMigration(db); err != nil {{"),
                "\t\t\t\treturn err".to_string(),
                "\t\t\t}".to_string(),
                "\t\t\th.RegisterRoutes(r)".to_string(),
                "\t\t\treturn nil".to_string(),
                "\t\t}),".to_string(),
            ],
            route_head,
        }
    }
}

fn before_start_server(content: &str, lines: &[String]) -> Option<String> {
    insert_before_marker(content, "fx.Invoke(StartServer)", lines)
}

fn after_import_open(content: &str, lines: &[String]) -> Option<String> {
    let open = content.find("import (\n")? + "import (\n".len();
    let block: String = lines.iter().map(|l| format!("{l}\n")).collect();
    Some(format!("{}{block}{}", &content[..open], &content[open..]))
}

/// Register a domain's module, handler, migration and routes in `main.go`.
pub fn wire_domain(main: &str, module_path: &str, package: &str, entity: &str) -> Option<String> {
    let wiring = DomainWiring::new(module_path, package, entity);
    let mut current = main.to_string();

    if current.contains("_ \"gorm.io/gorm\"") && !has_line(&current, GORM_IMPORT) {
        current = current
            .lines()
            .map(|l| {
                if l.trim_start().starts_with("_ \"gorm.io/gorm\"") {
                    GORM_IMPORT.to_string()
                } else {
                    l.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
            + if main.ends_with('\n') { "\n" } else { "" };
    }

    if let Some(updated) =
        ensure_lines(&current, IMPORTS_MARKER, &wiring.imports, after_import_open)
    {
        current = updated;
    }
    if let Some(updated) =
        ensure_lines(&current, MODULES_MARKER, &[wiring.module], before_start_server)
    {
        current = updated;
    }
    if let Some(updated) =
        ensure_lines(&current, HANDLERS_MARKER, &[wiring.handler], before_start_server)
    {
        current = updated;
    }
    if !has_line(&current, &wiring.route_head) {
        if let Some(updated) = insert_before_marker(&current, ROUTES_MARKER, &wiring.route_block)
            .or_else(|| before_start_server(&current, &wiring.route_block))
        {
            current = updated;
        }
    }

    (current != main).then_some(current)
}

/// Remove everything [`wire_domain`] added for one domain.
pub fn unwire_domain(main: &str, module_path: &str, package: &str, entity: &str) -> Option<String> {
    let wiring = DomainWiring::new(module_path, package, entity);

    let mut lines: Vec<String> = Vec::new();
    let mut in_route = false;
    for line in main.lines() {
        if line.trim() == wiring.route_head.trim() {
            in_route = true;
            continue;
        }
        if in_route {
            if line.trim() == "})," {
                in_route = false;
            }
            continue;
        }
        lines.push(line.to_string());
    }
    let mut current = rejoin(main, lines);

    let mut single = vec![wiring.imports[0].clone(), wiring.module, wiring.handler];
    let still_uses_http = current
        .lines()
        .any(|l| l.contains("interfaceshttp.") && !l.contains(&format!("New{entity}Handler")));
    if !still_uses_http {
        single.push(wiring.imports[1].clone());
    }
    if let Some(updated) = remove_lines(&current, &single) {
        current = updated;
    }

    if has_line(&current, GORM_IMPORT) && !current.contains("*gorm.DB") {
        current = current
            .lines()
            .map(|l| {
                if l.trim() == GORM_IMPORT.trim() {
                    BLANK_GORM_IMPORT.to_string()
                } else {
                    l.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
            + if current.ends_with('\n') { "\n" } else { "" };
    }

    (current != main).then_some(current)
}

/// Whether `main.go` already registers the domain.
pub fn is_domain_wired(main: &str, package: &str) -> bool {
    has_line(main, &format!("\t\t{package}app.Module,"))
}

// ============================================================================
// Event Bus (cmd/main.go)
// ============================================================================

/// Make sure `main.go` imports the event package and provides an event bus.
pub fn ensure_event_bus(main: &str) -> Option<String> {
    let mut current = main.to_string();

    if !has_line(&current, EVENT_IMPORT) {
        let import = [EVENT_IMPORT.to_string()];
        if let Some(updated) = insert_before_marker(&current, IMPORTS_MARKER, &import)
            .or_else(|| after_import_open(&current, &import))
        {
            current = updated;
        }
    }

    if !current.contains(EVENT_BUS_PROVIDER) {
        if current.contains(LEGACY_EVENT_BUS_PROVIDER) {
            current = current.replacen(LEGACY_EVENT_BUS_PROVIDER, EVENT_BUS_PROVIDER, 1);
        } else {
            let provider = [format!("\t\t\t{EVENT_BUS_PROVIDER}")];
            if let Some(updated) = insert_before_marker(&current, PROVIDERS_MARKER, &provider)
                .or_else(|| insert_before_marker(&current, "\t\t\tNewRouter,", &provider))
            {
                current = updated;
            }
        }
    }

    (current != main).then_some(current)
}

// ============================================================================
// Module Registrations (module.go)
// ============================================================================

fn service_lines(service: &str) -> Vec<String> {
    vec![format!("\tfx.Provide(New{service}),")]
}

fn event_handler_lines(handler: &str) -> Vec<String> {
    vec![
        format!("\tfx.Provide(New{handler}),"),
        format!("\tfx.Invoke(Register{handler}),"),
    ]
}

pub fn register_service(module: &str, service: &str) -> Option<String> {
    ensure_lines(module, SERVICES_MARKER, &service_lines(service), insert_before_options_close)
}

pub fn unregister_service(module: &str, service: &str) -> Option<String> {
    remove_lines(module, &service_lines(service))
}

pub fn register_event_handler(module: &str, handler: &str) -> Option<String> {
    ensure_lines(
        module,
        EVENT_HANDLERS_MARKER,
        &event_handler_lines(handler),
        insert_before_options_close,
    )
}

pub fn unregister_event_handler(module: &str, handler: &str) -> Option<String> {
    remove_lines(module, &event_handler_lines(handler))
}

// ============================================================================
// Identifier Rewrites
// ============================================================================

/// Replace whole-word occurrences of each `(old, new)` pair.
pub fn rewrite_identifiers(content: &str, renames: &[(String, String)]) -> String {
    renames
        .iter()
        .filter(|(old, new)| !old.is_empty() && old != new)
        .fold(content.to_string(), |acc, (old, new)| {
            match Regex::new(&format!(r"\b{}\b", regex::escape(old))) {
                Ok(re) => re.replace_all(&acc, regex::NoExpand(new)).into_owned(),
                Err(_) => acc,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::templates::project::ProjectModel;

    fn main_go() -> String {
        ProjectModel {
            name: "shop",
            module_path: "example.com/shop",
            go_version: "1.22",
            framework_version: "v0.1.0",
            framework_replace: None,
        }
        .files()
        .into_iter()
        .find(|(p, _)| *p == "cmd/main.go")
        .map(|(_, c)| c)
        .unwrap()
    }

    #[test]
    fn wiring_is_idempotent() {
        let main = main_go();
        let wired = wire_domain(&main, "example.com/shop", "order", "Order").unwrap();
        assert!(wired.contains("\t\"gorm.io/gorm\"\n"));
        assert!(!wired.contains("_ \"gorm.io/gorm\""));
        assert!(wired.contains(
            "\torderapp \"example.com/shop/internal/application/order\"\n\
             \tinterfaceshttp \"example.com/shop/internal/interfaces/http\"\n\
             \t// soliton-gen:imports"
        ));
        assert!(wired.contains("\t\torderapp.Module,\n\t\t// soliton-gen:modules"));
        assert!(wired.contains("\t\tfx.Provide(interfaceshttp.NewOrderHandler),\n"));
        assert!(wired.contains("if err := orderapp.RegisterMigration(db); err != nil {"));
        assert!(is_domain_wired(&wired, "order"));

        assert_eq!(wire_domain(&wired, "example.com/shop", "order", "Order"), None);
    }

    #[test]
    fn second_domain_shares_http_import() {
        let main = main_go();
        let one = wire_domain(&main, "example.com/shop", "order", "Order").unwrap();
        let two = wire_domain(&one, "example.com/shop", "user", "User").unwrap();
        assert_eq!(two.matches("interfaceshttp \"example.com/shop").count(), 1);

        let back = unwire_domain(&two, "example.com/shop", "user", "User").unwrap();
        assert_eq!(back, one);
        let empty = unwire_domain(&back, "example.com/shop", "order", "Order").unwrap();
        assert_eq!(empty, main);
    }

    #[test]
    fn event_bus_is_added_once() {
        let main = main_go();
        let updated = ensure_event_bus(&main).unwrap();
        assert!(updated.contains(
            "\t\"github.com/soliton-go/framework/event\"\n\t// soliton-gen:imports"
        ));
        assert!(updated.contains(
            "\t\t\tfunc() event.EventBus { return event.NewLocalEventBus() },\n\
             \t\t\t// soliton-gen:providers"
        ));
        assert_eq!(ensure_event_bus(&updated), None);

        let legacy = main.replace(
            "\t\t\tNewRouter,",
            "\t\t\tevent.NewLocalEventBus,\n\t\t\tNewRouter,",
        );
        let fixed = ensure_event_bus(&legacy).unwrap();
        assert!(fixed.contains(EVENT_BUS_PROVIDER));
        assert!(!fixed.contains(&format!("\t\t\t{LEGACY_EVENT_BUS_PROVIDER}")));
    }

    #[test]
    fn module_without_markers_uses_options_close() {
        let module = "package x\n\nvar Module = fx.Options(\n\tfx.Provide(NewA),\n)\n\n\
                      func f() {\n\tg()\n}\n";
        let updated = register_event_handler(module, "PaidHandler").unwrap();
        assert_eq!(
            updated,
            "package x\n\nvar Module = fx.Options(\n\tfx.Provide(NewA),\n\
             \tfx.Provide(NewPaidHandler),\n\tfx.Invoke(RegisterPaidHandler),\n)\n\n\
             func f() {\n\tg()\n}\n"
        );
        assert_eq!(register_event_handler(&updated, "PaidHandler"), None);
        assert_eq!(unregister_event_handler(&updated, "PaidHandler").unwrap(), module);
    }

    #[test]
    fn service_registration_uses_marker_and_uncomments() {
        let module = format!(
            "var Module = fx.Options(\n\t// fx.Provide(NewBillingService),\n{SERVICES_MARKER}\n)\n"
        );
        let updated = register_service(&module, "BillingService").unwrap();
        assert!(updated.contains("\tfx.Provide(NewBillingService),\n"));
        assert!(!updated.contains("// fx.Provide"));

        let fresh = format!("var Module = fx.Options(\n{SERVICES_MARKER}\n)\n");
        let updated = register_service(&fresh, "BillingService").unwrap();
        assert!(updated.contains("\tfx.Provide(NewBillingService),\n\t// soliton-gen:services"));
    }

    #[test]
    fn rewrites_whole_words_only() {
        let src = "type Money struct{}\nfunc NewMoney() Money {}\n// MoneyBag stays\n";
        let out = rewrite_identifiers(
            src,
            &[("Money".into(), "Cash".into()), ("NewMoney".into(), "NewCash".into())],
        );
        assert_eq!(out, "type Cash struct{}\nfunc NewCash() Cash {}\n// MoneyBag stays\n");
    }
}
