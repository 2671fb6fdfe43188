//! Listing and reading artifacts back from generated sources.

mod common;

use std::path::Path;

use common::{PROJECT, invoice_project};
use soliton_gen_core::domain::DomainError;
use soliton_gen_core::prelude::*;

fn populated() -> common::Project {
    let project = invoice_project();
    let requests: Vec<GenerationRequest> = vec![
        GenerationRequest::Policy(PolicyConfig {
            domain: "invoice".into(),
            name: "Refund".into(),
            target: Some("Invoice".into()),
            remark: None,
            force: false,
        }),
        EventConfig {
            domain: "invoice".into(),
            name: "InvoicePaid".into(),
            fields: Vec::new(),
            topic: Some("billing.invoice_paid".into()),
            remark: None,
            force: false,
        }
        .into(),
        ServiceConfig::new("Reporting").into(),
    ];
    for request in requests {
        let result = project
            .planner
            .generate(&request, &project.layout, GenerationMode::Apply)
            .unwrap();
        assert!(result.success, "{:?}", result.errors);
    }
    project
}

#[test]
fn list_reports_every_kind() {
    let project = populated();
    let listing = project.registry().list(project.roots(), None).unwrap();

    assert_eq!(listing.domains.len(), 1);
    let invoice = &listing.domains[0];
    assert_eq!(invoice.name, "Invoice");
    assert_eq!(invoice.package, "invoice");
    assert!(invoice.soft_delete);
    assert_eq!(invoice.fields, vec!["Amount".to_string()]);
    assert!(
        invoice
            .files
            .contains(&"internal/infrastructure/persistence/invoice_repo.go".to_string())
    );

    assert_eq!(listing.services.len(), 1);
    assert_eq!(listing.services[0].name, "ReportingService");
    assert_eq!(listing.services[0].service_type, ServiceType::CrossDomainService);

    let events: Vec<_> = listing.components_of(ArtifactKind::Event).collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].topic.as_deref(), Some("billing.invoice_paid"));
    assert_eq!(listing.components_of(ArtifactKind::Policy).count(), 1);
}

#[test]
fn list_narrows_to_one_domain() {
    let project = populated();
    let listing = project
        .registry()
        .list(project.roots(), Some("Invoice"))
        .unwrap();
    assert_eq!(listing.domains.len(), 1);
    assert!(listing.services.is_empty());
}

#[test]
fn domain_detail_recovers_field_types() {
    let project = populated();
    let id = ArtifactId::new(None, ArtifactKind::Domain, "invoice");
    let detail = project.registry().detail(project.roots(), &id).unwrap();

    let ArtifactDetail::Domain { field_details, .. } = detail else {
        panic!("expected domain detail");
    };
    let amount = field_details.iter().find(|f| f.name == "Amount").unwrap();
    assert_eq!(amount.go_type, "float64");
    assert_eq!(amount.field_type, Some("decimal"));
}

#[test]
fn policy_detail_and_source() {
    let project = populated();
    let registry = project.registry();
    let id = ArtifactId::component("invoice", ArtifactKind::Policy, "Refund");

    match registry.detail(project.roots(), &id).unwrap() {
        ArtifactDetail::Policy { name, target, file, .. } => {
            assert_eq!(name, "Refund");
            assert_eq!(target, "Invoice");
            assert_eq!(file, "internal/domain/invoice/policy_refund.go");
        }
        other => panic!("unexpected {other:?}"),
    }

    let source = registry.source(project.roots(), &id).unwrap();
    assert_eq!(source.path, "internal/domain/invoice/policy_refund.go");
    assert_eq!(source.content, project.read(&source.path));
}

#[test]
fn unknown_artifacts_are_not_found() {
    let project = populated();
    let registry = project.registry();

    let id = ArtifactId::component("invoice", ArtifactKind::ValueObject, "Money");
    assert!(!registry.exists(project.roots(), &id).unwrap());
    let err = registry.detail(project.roots(), &id).unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::ArtifactNotFound { .. })));
}

#[test]
fn hand_written_files_are_not_listed() {
    let project = populated();
    let dir = Path::new(PROJECT).join("internal/domain/invoice");
    project
        .fs
        .write_file(&dir.join("policy_handwritten.go"), "package invoice\n\nfunc helper() {}\n")
        .unwrap();
    project
        .fs
        .write_file(&dir.join("event_audit.go"), "package invoice\n\ntype AuditEvent struct{}\n")
        .unwrap();

    let listing = project.registry().list(project.roots(), None).unwrap();
    let files: Vec<&str> = listing.components.iter().map(|c| c.file.as_str()).collect();
    assert!(!files.contains(&"internal/domain/invoice/policy_handwritten.go"));
    assert!(!files.contains(&"internal/domain/invoice/event_audit.go"));
    assert_eq!(listing.components_of(ArtifactKind::Policy).count(), 1);
    assert_eq!(listing.components_of(ArtifactKind::Event).count(), 1);
}

#[test]
fn domain_without_entity_struct_is_unparseable() {
    let project = populated();
    project
        .fs
        .write_file(
            &Path::new(PROJECT).join("internal/domain/invoice/invoice.go"),
            "package invoice\n\nconst Version = 1\n",
        )
        .unwrap();

    let id = ArtifactId::new(None, ArtifactKind::Domain, "Invoice");
    let err = project.registry().detail(project.roots(), &id).unwrap_err();
    match err.as_domain() {
        Some(DomainError::UnparseableArtifact { path, reason, .. }) => {
            assert_eq!(path, "internal/domain/invoice/invoice.go");
            assert_eq!(reason, "no entity struct");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(err.to_string().contains("no entity struct"));
}

#[test]
fn policy_without_validate_is_unparseable() {
    let project = populated();
    project
        .fs
        .write_file(
            &Path::new(PROJECT).join("internal/domain/invoice/policy_refund.go"),
            "package invoice\n\ntype Refund struct{}\n",
        )
        .unwrap();

    let id = ArtifactId::component("invoice", ArtifactKind::Policy, "Refund");
    let err = project.registry().detail(project.roots(), &id).unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::UnparseableArtifact { reason, .. }) if reason == "no Validate method"
    ));
}

#[test]
fn field_type_catalogue_is_exposed() {
    let project = populated();
    let types = project.registry().field_types();
    assert!(types.iter().any(|t| t.kind == "decimal"));
    assert!(types.iter().any(|t| t.kind == "enum"));
}
