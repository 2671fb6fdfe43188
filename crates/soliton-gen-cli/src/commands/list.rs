//! `soliton-gen list`: everything the registry can find in the project.

use soliton_gen_core::domain::{ComponentSummary, DomainSummary, ServiceSummary};
use soliton_gen_core::prelude::*;

use crate::{
    cli::{GlobalArgs, ListArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    project::Project,
};

pub fn execute(
    args: ListArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let project = Project::open(global, config)?;
    let listing = project
        .registry()
        .list(project.roots()?, args.domain.as_deref())?;

    output.emit(&listing, |out| {
        if listing.is_empty() {
            out.info("No domains, services or components found")?;
            return Ok(());
        }

        if !listing.domains.is_empty() {
            out.header(&format!("Domains ({})", listing.domains.len()))?;
            for domain in &listing.domains {
                out.print(&domain_line(domain))?;
            }
            out.print("")?;
        }

        if !listing.services.is_empty() {
            out.header(&format!("Services ({})", listing.services.len()))?;
            for service in &listing.services {
                out.print(&service_line(service))?;
            }
            out.print("")?;
        }

        for kind in ArtifactKind::COMPONENTS {
            let components: Vec<_> = listing.components_of(kind).collect();
            if components.is_empty() {
                continue;
            }
            out.header(&format!("{} ({})", plural(kind), components.len()))?;
            for component in components {
                out.print(&component_line(component))?;
            }
            out.print("")?;
        }
        Ok(())
    })
}

fn domain_line(domain: &DomainSummary) -> String {
    let mut line = format!("  {:<20} package {}", domain.name, domain.package);
    if let Some(table) = &domain.table {
        line.push_str(&format!(", table {table}"));
    }
    if domain.soft_delete {
        line.push_str(", soft delete");
    }
    if !domain.fields.is_empty() {
        line.push_str(&format!("\n  {:<20} fields: {}", "", domain.fields.join(", ")));
    }
    line
}

fn service_line(service: &ServiceSummary) -> String {
    let mut line = format!("  {:<20} {}", service.name, service.service_type);
    if let Some(domain) = &service.domain {
        line.push_str(&format!(" ({domain})"));
    }
    if !service.methods.is_empty() {
        let methods: Vec<&str> = service.methods.iter().map(|m| m.name.as_str()).collect();
        line.push_str(&format!("\n  {:<20} methods: {}", "", methods.join(", ")));
    }
    line
}

fn component_line(component: &ComponentSummary) -> String {
    let mut line = format!("  {}.{:<20} {}", component.domain, component.name, component.file);
    if let Some(target) = &component.target {
        line.push_str(&format!("  target {target}"));
    }
    if let Some(event) = &component.event {
        line.push_str(&format!("  event {event}"));
    }
    if let Some(topic) = &component.topic {
        line.push_str(&format!("  topic {topic}"));
    }
    line
}

fn plural(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Domain => "Domains",
        ArtifactKind::Service => "Services",
        ArtifactKind::ValueObject => "Value objects",
        ArtifactKind::Specification => "Specifications",
        ArtifactKind::Policy => "Policies",
        ArtifactKind::Event => "Events",
        ArtifactKind::EventHandler => "Event handlers",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_line_mentions_table_and_fields() {
        let line = domain_line(&DomainSummary {
            name: "Invoice".into(),
            package: "invoice".into(),
            table: Some("invoices".into()),
            fields: vec!["Amount".into(), "DueAt".into()],
            soft_delete: true,
            files: vec![],
        });
        assert!(line.contains("package invoice, table invoices, soft delete"));
        assert!(line.contains("fields: Amount, DueAt"));
    }

    #[test]
    fn component_line_shows_topic() {
        let line = component_line(&ComponentSummary {
            domain: "invoice".into(),
            kind: ArtifactKind::Event,
            name: "InvoicePaidEvent".into(),
            file: "internal/domain/invoice/event_invoice_paid.go".into(),
            target: None,
            topic: Some("invoice.paid".into()),
            event: None,
        });
        assert!(line.starts_with("  invoice.InvoicePaidEvent"));
        assert!(line.ends_with("topic invoice.paid"));
    }
}
