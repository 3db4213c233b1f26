//! Validation pipeline integration tests
//!
//! Exercises the five checks end to end against the in-memory management
//! client, including their fixed ordering.

mod common;

use common::*;
use svcext_core::certificate::ServiceCertificate;
use svcext_core::types::DeploymentSlot;
use svcext_core::Error;
use svcext_extensions::{AuthMaterial, DomainJoinParams, Validator, DEFAULT_VERSION};

fn core_error(err: &anyhow::Error) -> &Error {
    err.downcast_ref::<Error>()
        .expect("expected a core validation error")
}

#[tokio::test]
async fn unknown_service_fails_with_invalid_service_reference() {
    let fake = FakeManagement::new();
    let err = Validator::new(&fake)
        .validate(thumbprint_domain_params())
        .await
        .unwrap_err();
    assert!(matches!(
        core_error(&err),
        Error::InvalidServiceReference { service } if service == "frontend"
    ));
}

#[tokio::test]
async fn empty_slot_fails_with_invalid_deployment_reference() {
    let fake = FakeManagement::new();
    fake.insert_service(service("frontend"));

    let err = Validator::new(&fake)
        .validate(thumbprint_domain_params())
        .await
        .unwrap_err();
    assert!(matches!(
        core_error(&err),
        Error::InvalidDeploymentReference { slot } if slot == "production"
    ));
}

#[tokio::test]
async fn unknown_role_fails_with_invalid_role_reference() {
    let fake = populated_fake(&["WebRole", "WorkerRole"]);

    let mut params = thumbprint_domain_params();
    params.roles = vec!["WebRole".to_string(), "CacheRole".to_string()];

    let err = Validator::new(&fake).validate(params).await.unwrap_err();
    assert!(matches!(
        core_error(&err),
        Error::InvalidRoleReference { role } if role == "CacheRole"
    ));
}

#[tokio::test]
async fn role_check_runs_before_certificate_check() {
    let fake = populated_fake(&["WebRole"]);

    // Both an unknown role and doubled-up auth material: the role check
    // comes earlier in the documented order and must win.
    let mut params = thumbprint_domain_params();
    params.roles = vec!["CacheRole".to_string()];
    params.certificate = Some(ServiceCertificate::from_der(b"cert".to_vec()).unwrap());

    let err = Validator::new(&fake).validate(params).await.unwrap_err();
    assert!(matches!(
        core_error(&err),
        Error::InvalidRoleReference { .. }
    ));
}

#[tokio::test]
async fn certificate_check_runs_before_shape_check() {
    let fake = populated_fake(&["WebRole"]);

    // Doubled-up auth material and no join target at all: the
    // certificate check comes earlier in the documented order.
    let mut params = thumbprint_domain_params();
    params.domain_name = None;
    params.certificate = Some(ServiceCertificate::from_der(b"cert".to_vec()).unwrap());

    let err = Validator::new(&fake).validate(params).await.unwrap_err();
    assert!(matches!(
        core_error(&err),
        Error::InvalidCertificateReference { .. }
    ));
}

#[tokio::test]
async fn certificate_and_thumbprint_together_are_rejected() {
    let fake = populated_fake(&["WebRole"]);

    let mut params = thumbprint_domain_params();
    params.certificate = Some(ServiceCertificate::from_der(b"cert".to_vec()).unwrap());

    let err = Validator::new(&fake).validate(params).await.unwrap_err();
    assert!(matches!(
        core_error(&err),
        Error::InvalidCertificateReference { .. }
    ));
}

#[tokio::test]
async fn bare_thumbprint_requires_a_default_algorithm() {
    let fake = populated_fake(&["WebRole"]);

    let mut params = thumbprint_domain_params();
    params.thumbprint_algorithm = None;

    let err = Validator::new(&fake)
        .validate(params.clone())
        .await
        .unwrap_err();
    assert!(matches!(
        core_error(&err),
        Error::InvalidCertificateReference { .. }
    ));

    // With a configured default the same request passes and the default
    // is filled in.
    let validated = Validator::new(&fake)
        .with_default_thumbprint_algorithm("sha256")
        .validate(params)
        .await
        .unwrap();
    match validated.config.auth {
        AuthMaterial::Thumbprint { algorithm, .. } => assert_eq!(algorithm, "sha256"),
        other => panic!("expected thumbprint material, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_auth_material_is_rejected() {
    let fake = populated_fake(&["WebRole"]);

    let mut params = thumbprint_domain_params();
    params.certificate_thumbprint = None;
    params.thumbprint_algorithm = None;

    let err = Validator::new(&fake).validate(params).await.unwrap_err();
    assert!(matches!(
        core_error(&err),
        Error::InvalidCertificateReference { .. }
    ));
}

#[tokio::test]
async fn neither_domain_nor_workgroup_is_rejected() {
    let fake = populated_fake(&["WebRole"]);

    let mut params = thumbprint_domain_params();
    params.domain_name = None;

    let err = Validator::new(&fake).validate(params).await.unwrap_err();
    assert!(matches!(
        core_error(&err),
        Error::InvalidConfiguration { .. }
    ));
}

#[tokio::test]
async fn workgroup_join_with_certificate_succeeds() {
    let fake = populated_fake(&["WebRole"]);

    let certificate = ServiceCertificate::from_der(b"workgroup-cert".to_vec()).unwrap();
    let params = DomainJoinParams {
        service_name: "frontend".to_string(),
        workgroup_name: Some("WORKGROUP1".to_string()),
        certificate: Some(certificate.clone()),
        ..Default::default()
    };

    let validated = Validator::new(&fake).validate(params).await.unwrap();
    assert_eq!(
        validated.config.auth,
        AuthMaterial::Certificate(certificate)
    );

    let input = validated.config.build().unwrap();
    assert!(input.certificate_thumbprint.is_none());
    assert!(input.thumbprint_algorithm.is_none());
}

#[tokio::test]
async fn version_resolution_prefers_request_then_profile_default() {
    let fake = populated_fake(&["WebRole"]);

    let mut params = thumbprint_domain_params();
    params.version = Some("2.3".to_string());
    let validated = Validator::new(&fake)
        .with_default_version("2.0")
        .validate(params)
        .await
        .unwrap();
    assert_eq!(validated.config.version, "2.3");

    let validated = Validator::new(&fake)
        .with_default_version("2.0")
        .validate(thumbprint_domain_params())
        .await
        .unwrap();
    assert_eq!(validated.config.version, "2.0");

    let validated = Validator::new(&fake)
        .validate(thumbprint_domain_params())
        .await
        .unwrap();
    assert_eq!(validated.config.version, DEFAULT_VERSION);
}

#[tokio::test]
async fn validation_returns_the_peer_deployment_when_present() {
    let fake = populated_fake(&["WebRole"]);
    fake.insert_deployment("frontend", deployment(DeploymentSlot::Staging, &["WebRole"]));

    let validated = Validator::new(&fake)
        .validate(thumbprint_domain_params())
        .await
        .unwrap();
    assert_eq!(
        validated.peer_deployment.map(|d| d.slot),
        Some(DeploymentSlot::Staging)
    );
}
