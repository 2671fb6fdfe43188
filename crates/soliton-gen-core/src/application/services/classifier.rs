//! Service Classifier - domain service or cross-domain service.
//!
//! Advisory only: the result is a suggestion the caller may override
//! through `ServiceConfig::service_type` and `ServiceConfig::reuse_dto`.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::ports::Filesystem;
use crate::domain::artifact::{service_base, service_type_name};
use crate::domain::config::ServiceType;
use crate::domain::identifier::{Identifier, singularize, to_pascal_case};
use crate::domain::layout::LayoutRoots;
use crate::error::SolitonResult;

const DTO_FILE: &str = "dto.go";

/// Outcome of [`ServiceClassifier::detect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDetection {
    pub service_name: String,
    pub domain_name: String,
    /// Package of the candidate domain.
    pub domain_package: String,
    pub domain_exists: bool,
    pub service_type: ServiceType,
    /// Project-relative directory the service would be generated into.
    pub target_dir: String,
    pub should_reuse_dto: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_dto_path: Option<String>,
    pub message: String,
}

pub struct ServiceClassifier {
    filesystem: Arc<dyn Filesystem>,
}

impl ServiceClassifier {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Classify `service_name`. A missing domain is a normal outcome.
    #[instrument(skip_all, fields(service = %service_name))]
    pub fn detect(
        &self,
        roots: &LayoutRoots,
        service_name: &str,
    ) -> SolitonResult<ServiceDetection> {
        let service_name = service_type_name(&Identifier::new(service_name)?);
        let base = service_base(&service_name);
        let package = Identifier::new(&base)?.derive().package;

        // `OrdersService` still binds to the `order` domain.
        let existing = [package.clone(), singularize(&package)]
            .into_iter()
            .find(|candidate| self.filesystem.is_dir(&roots.domain_package_dir(candidate)));

        let detection = match existing {
            Some(found) => {
                let domain_name = if found == package {
                    base.clone()
                } else {
                    to_pascal_case(&singularize(&base))
                };
                let package = found;
                let dto = roots.app_package_dir(&package).join(DTO_FILE);
                let dto_exists = self.filesystem.is_file(&dto);
                let message = if dto_exists {
                    format!(
                        "Domain {domain_name} exists: \
                         generating a domain service that reuses its DTO"
                    )
                } else {
                    format!("Domain {domain_name} exists: generating a domain service")
                };
                ServiceDetection {
                    service_name,
                    domain_name,
                    target_dir: roots.relative(&roots.app_package_dir(&package)),
                    domain_package: package,
                    domain_exists: true,
                    service_type: ServiceType::DomainService,
                    should_reuse_dto: dto_exists,
                    existing_dto_path: dto_exists.then(|| roots.relative(&dto)),
                    message,
                }
            }
            None => ServiceDetection {
                message: format!("No {base} domain found: generating a cross-domain service"),
                service_name,
                domain_name: base,
                target_dir: roots.relative(&roots.services_dir()),
                domain_package: package,
                domain_exists: false,
                service_type: ServiceType::CrossDomainService,
                should_reuse_dto: false,
                existing_dto_path: None,
            },
        };

        debug!(
            service_type = %detection.service_type,
            reuse_dto = detection.should_reuse_dto,
            "service classified"
        );
        Ok(detection)
    }

    /// Absolute form of [`ServiceDetection::existing_dto_path`].
    pub fn dto_path(&self, roots: &LayoutRoots, detection: &ServiceDetection) -> Option<PathBuf> {
        detection
            .existing_dto_path
            .as_ref()
            .map(|rel| roots.module_dir.join(rel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use std::path::Path;

    fn roots() -> LayoutRoots {
        LayoutRoots::new("example.com/shop", "/shop")
    }

    fn fs_with(
        dirs: &'static [&'static str],
        files: &'static [&'static str],
    ) -> Arc<dyn Filesystem> {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir()
            .returning(move |p: &Path| dirs.iter().any(|d| p == Path::new(d)));
        fs.expect_is_file()
            .returning(move |p: &Path| files.iter().any(|f| p == Path::new(f)));
        Arc::new(fs)
    }

    #[test]
    fn existing_domain_gives_domain_service() {
        let classifier = ServiceClassifier::new(fs_with(&["/shop/internal/domain/order"], &[]));
        let d = classifier.detect(&roots(), "OrderService").unwrap();
        assert_eq!(d.service_type, ServiceType::DomainService);
        assert!(d.domain_exists);
        assert_eq!(d.domain_name, "Order");
        assert_eq!(d.target_dir, "internal/application/order");
        assert!(!d.should_reuse_dto);
    }

    #[test]
    fn existing_dto_is_reused() {
        let classifier = ServiceClassifier::new(fs_with(
            &["/shop/internal/domain/order"],
            &["/shop/internal/application/order/dto.go"],
        ));
        let d = classifier.detect(&roots(), "Orders").unwrap();
        assert_eq!(d.service_name, "OrdersService");
        assert_eq!(d.domain_package, "order");
        assert!(d.should_reuse_dto);
        assert_eq!(
            d.existing_dto_path.as_deref(),
            Some("internal/application/order/dto.go")
        );
        assert_eq!(
            classifier.dto_path(&roots(), &d),
            Some(PathBuf::from("/shop/internal/application/order/dto.go"))
        );
    }

    #[test]
    fn unknown_domain_gives_cross_domain_service() {
        let classifier = ServiceClassifier::new(fs_with(&[], &[]));
        let d = classifier.detect(&roots(), "ReportingService").unwrap();
        assert_eq!(d.service_type, ServiceType::CrossDomainService);
        assert!(!d.domain_exists);
        assert_eq!(d.target_dir, "internal/application/services");
    }

    #[test]
    fn invalid_name_is_rejected() {
        let classifier = ServiceClassifier::new(fs_with(&[], &[]));
        assert!(classifier.detect(&roots(), "1Bad").is_err());
    }
}
