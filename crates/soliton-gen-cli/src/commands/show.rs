//! `soliton-gen detail` and `soliton-gen source`.

use soliton_gen_core::domain::{ArtifactDetail, FieldDetail};
use soliton_gen_core::prelude::*;

use crate::{
    cli::{ArtifactArgs, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    project::Project,
};

/// Structured view of one artifact, recovered from its source.
pub fn detail(
    args: ArtifactArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let project = Project::open(global, config)?;
    let id = artifact_id(&args);
    let detail = project.registry().detail(project.roots()?, &id)?;

    output.emit(&detail, |out| {
        for line in render(&detail) {
            out.print(&line)?;
        }
        Ok(())
    })
}

/// Raw content of the artifact's primary file.
pub fn source(
    args: ArtifactArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let project = Project::open(global, config)?;
    let id = artifact_id(&args);
    let source = project.registry().source(project.roots()?, &id)?;

    output.emit(&source, |out| {
        out.detail(&format!("// {}", source.path))?;
        out.raw(&source.content)?;
        Ok(())
    })
}

pub(crate) fn artifact_id(args: &ArtifactArgs) -> ArtifactId {
    ArtifactId::new(args.domain.as_deref(), args.kind, args.name.clone())
}

fn render(detail: &ArtifactDetail) -> Vec<String> {
    let mut lines = Vec::new();
    match detail {
        ArtifactDetail::Domain {
            summary,
            field_details,
        } => {
            lines.push(format!("Domain {}", summary.name));
            lines.push(format!("  package      {}", summary.package));
            if let Some(table) = &summary.table {
                lines.push(format!("  table        {table}"));
            }
            lines.push(format!("  soft delete  {}", yes_no(summary.soft_delete)));
            push_fields(&mut lines, field_details);
            if !summary.files.is_empty() {
                lines.push("  files".to_string());
                lines.extend(summary.files.iter().map(|f| format!("    {f}")));
            }
        }
        ArtifactDetail::Service(service) => {
            lines.push(format!("Service {}", service.name));
            lines.push(format!("  type         {}", service.service_type));
            if let Some(domain) = &service.domain {
                lines.push(format!("  domain       {domain}"));
            }
            if let Some(remark) = &service.remark {
                lines.push(format!("  remark       {remark}"));
            }
            lines.push(format!("  file         {}", service.file));
            if !service.methods.is_empty() {
                lines.push("  methods".to_string());
                for method in &service.methods {
                    match &method.remark {
                        Some(remark) => lines.push(format!("    {:<20} {remark}", method.name)),
                        None => lines.push(format!("    {}", method.name)),
                    }
                }
            }
        }
        ArtifactDetail::ValueObject {
            domain,
            name,
            file,
            fields,
        } => {
            lines.push(format!("Value object {domain}.{name}"));
            lines.push(format!("  file         {file}"));
            push_fields(&mut lines, fields);
        }
        ArtifactDetail::Specification {
            domain,
            name,
            file,
            target,
        }
        | ArtifactDetail::Policy {
            domain,
            name,
            file,
            target,
        } => {
            let label = if detail.kind() == ArtifactKind::Policy {
                "Policy"
            } else {
                "Specification"
            };
            lines.push(format!("{label} {domain}.{name}"));
            lines.push(format!("  target       {target}"));
            lines.push(format!("  file         {file}"));
        }
        ArtifactDetail::Event {
            domain,
            name,
            file,
            topic,
            fields,
        } => {
            lines.push(format!("Event {domain}.{name}"));
            if let Some(topic) = topic {
                lines.push(format!("  topic        {topic}"));
            }
            lines.push(format!("  file         {file}"));
            push_fields(&mut lines, fields);
        }
        ArtifactDetail::EventHandler {
            domain,
            name,
            file,
            event,
            topic,
        } => {
            lines.push(format!("Event handler {domain}.{name}"));
            if let Some(event) = event {
                lines.push(format!("  event        {event}"));
            }
            if let Some(topic) = topic {
                lines.push(format!("  topic        {topic}"));
            }
            lines.push(format!("  file         {file}"));
        }
    }
    lines
}

fn push_fields(lines: &mut Vec<String>, fields: &[FieldDetail]) {
    if fields.is_empty() {
        return;
    }
    lines.push("  fields".to_string());
    for field in fields {
        let mut line = format!("    {:<20} {}", field.name, field.go_type);
        if let Some(kind) = field.field_type {
            line.push_str(&format!(" ({kind})"));
        }
        if !field.enum_values.is_empty() {
            line.push_str(&format!(" [{}]", field.enum_values.join("|")));
        }
        lines.push(line);
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, go_type: &str, kind: Option<&'static str>) -> FieldDetail {
        FieldDetail {
            name: name.into(),
            json: None,
            go_type: go_type.into(),
            field_type: kind,
            enum_values: vec![],
            gorm: None,
            comment: None,
        }
    }

    #[test]
    fn value_object_lists_fields() {
        let lines = render(&ArtifactDetail::ValueObject {
            domain: "order".into(),
            name: "Address".into(),
            file: "internal/domain/order/value_object_address.go".into(),
            fields: vec![field("Street", "string", Some("string"))],
        });
        assert_eq!(lines[0], "Value object order.Address");
        assert!(lines.iter().any(|l| l.contains("Street") && l.ends_with("string (string)")));
    }

    #[test]
    fn policy_and_specification_share_layout() {
        let lines = render(&ArtifactDetail::Policy {
            domain: "order".into(),
            name: "RefundPolicy".into(),
            file: "internal/domain/order/policy_refund.go".into(),
            target: "Order".into(),
        });
        assert_eq!(lines[0], "Policy order.RefundPolicy");
        assert!(lines[1].ends_with("Order"));
    }

    #[test]
    fn artifact_id_keeps_domain_scope() {
        let args = ArtifactArgs {
            kind: ArtifactKind::Event,
            name: "OrderPaid".into(),
            domain: Some("order".into()),
        };
        let id = artifact_id(&args);
        assert_eq!(id.domain.as_deref(), Some("order"));
        assert_eq!(id.kind, ArtifactKind::Event);
    }
}
