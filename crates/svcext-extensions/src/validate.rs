//! Parameter validation for the domain-join extension

use anyhow::Result;
use svcext_core::join::JoinFlags;
use svcext_core::types::{Deployment, HostedService};
use svcext_core::Error;
use svcext_management::ServiceManagement;
use tracing::debug;

use crate::domain_join::{
    AuthMaterial, DomainJoinConfig, DomainJoinParams, JoinOptionsSpec, JoinTarget, DEFAULT_VERSION,
};

/// Outcome of a successful validation pass.
///
/// Carries the confirmed remote state alongside the typed request so
/// callers never refetch what validation already proved to exist.
#[derive(Debug)]
pub struct ValidatedDomainJoin {
    /// The confirmed hosted service
    pub service: HostedService,

    /// The confirmed deployment in the target slot
    pub deployment: Deployment,

    /// The peer slot's deployment, when one exists
    pub peer_deployment: Option<Deployment>,

    /// The typed, contradiction-free request
    pub config: DomainJoinConfig,
}

/// Runs the validation checks against a management client.
///
/// Checks run in a fixed order, each failing fast with its own error:
///
/// 1. service existence (`InvalidServiceReference`)
/// 2. deployment existence in the slot (`InvalidDeploymentReference`)
/// 3. role membership, against the deployment confirmed in step 2
///    (`InvalidRoleReference`)
/// 4. thumbprint consistency (`InvalidCertificateReference`)
/// 5. configuration shape (`InvalidConfiguration`)
///
/// The remote checks run first because the role check needs the
/// deployment's confirmed role list; the local checks never run against
/// a service that does not exist.
pub struct Validator<'a, C: ServiceManagement + ?Sized> {
    client: &'a C,
    default_thumbprint_algorithm: Option<String>,
    default_version: Option<String>,
}

impl<'a, C: ServiceManagement + ?Sized> Validator<'a, C> {
    /// Create a validator over a management client
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            default_thumbprint_algorithm: None,
            default_version: None,
        }
    }

    /// Algorithm assumed when a thumbprint arrives without one
    pub fn with_default_thumbprint_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.default_thumbprint_algorithm = Some(algorithm.into());
        self
    }

    /// Version pin applied when the request does not carry one
    pub fn with_default_version(mut self, version: impl Into<String>) -> Self {
        self.default_version = Some(version.into());
        self
    }

    /// Validate a flat parameter bag into a typed request
    pub async fn validate(&self, params: DomainJoinParams) -> Result<ValidatedDomainJoin> {
        let service = self.check_service(&params).await?;
        let deployment = self.check_deployment(&params).await?;
        check_roles(&params, &deployment)?;
        let auth = self.check_auth_material(&params)?;
        let target = check_shape(&params)?;
        debug!(
            "Validated domain-join request for {} ({})",
            params.service_name, params.slot
        );

        let peer_deployment = self
            .client
            .get_deployment(&params.service_name, params.slot.peer())
            .await?;

        let version = params
            .version
            .or_else(|| self.default_version.clone())
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());

        Ok(ValidatedDomainJoin {
            service,
            deployment,
            peer_deployment,
            config: DomainJoinConfig {
                target,
                auth,
                roles: params.roles,
                restart: params.restart,
                credential: params.credential,
                version,
            },
        })
    }

    async fn check_service(&self, params: &DomainJoinParams) -> Result<HostedService> {
        self.client
            .get_hosted_service(&params.service_name)
            .await?
            .ok_or_else(|| Error::invalid_service_reference(&params.service_name).into())
    }

    async fn check_deployment(&self, params: &DomainJoinParams) -> Result<Deployment> {
        self.client
            .get_deployment(&params.service_name, params.slot)
            .await?
            .ok_or_else(|| Error::invalid_deployment_reference(params.slot.to_string()).into())
    }

    fn check_auth_material(&self, params: &DomainJoinParams) -> Result<AuthMaterial, Error> {
        match (&params.certificate, &params.certificate_thumbprint) {
            (Some(_), Some(_)) => Err(Error::invalid_certificate_reference(
                "a certificate and a certificate thumbprint are mutually exclusive",
            )),
            (Some(certificate), None) => {
                if params.thumbprint_algorithm.is_some() {
                    return Err(Error::invalid_certificate_reference(
                        "a thumbprint algorithm applies only to thumbprint-based requests",
                    ));
                }
                Ok(AuthMaterial::Certificate(certificate.clone()))
            }
            (None, Some(thumbprint)) => {
                let algorithm = params
                    .thumbprint_algorithm
                    .clone()
                    .or_else(|| self.default_thumbprint_algorithm.clone())
                    .ok_or_else(|| {
                        Error::invalid_certificate_reference(
                            "a certificate thumbprint requires a thumbprint algorithm \
                             and no default algorithm is configured",
                        )
                    })?;
                Ok(AuthMaterial::Thumbprint {
                    thumbprint: thumbprint.clone(),
                    algorithm,
                })
            }
            (None, None) => {
                if params.thumbprint_algorithm.is_some() {
                    return Err(Error::invalid_certificate_reference(
                        "a thumbprint algorithm was supplied without a certificate thumbprint",
                    ));
                }
                Err(Error::invalid_certificate_reference(
                    "either a certificate or a certificate thumbprint is required",
                ))
            }
        }
    }
}

/// Check 3: every named role must exist in the confirmed deployment,
/// in the order the caller named them
fn check_roles(params: &DomainJoinParams, deployment: &Deployment) -> Result<(), Error> {
    for role in &params.roles {
        if !deployment.has_role(role) {
            return Err(Error::invalid_role_reference(role));
        }
    }
    Ok(())
}

/// Check 5: exactly one join target, with domain-only fields rejected
/// for workgroup joins and at most one way of spelling the options
fn check_shape(params: &DomainJoinParams) -> Result<JoinTarget, Error> {
    if params.options.is_some() && params.join_option.is_some() {
        return Err(Error::invalid_configuration(
            "named join options and a raw join-option bitmask are mutually exclusive",
        ));
    }

    match (&params.domain_name, &params.workgroup_name) {
        (Some(_), Some(_)) => Err(Error::invalid_configuration(
            "a domain name and a workgroup name are mutually exclusive",
        )),
        (None, None) => Err(Error::invalid_configuration(
            "either a domain name or a workgroup name is required",
        )),
        (Some(domain), None) => {
            let options = if let Some(raw) = params.join_option {
                JoinOptionsSpec::Raw(raw)
            } else if let Some(flags) = params.options {
                JoinOptionsSpec::Flags(flags)
            } else {
                JoinOptionsSpec::Flags(JoinFlags::default_join())
            };

            Ok(JoinTarget::Domain {
                name: domain.clone(),
                ou_path: params.ou_path.clone(),
                unjoin_credential: params.unjoin_credential.clone(),
                options,
            })
        }
        (None, Some(workgroup)) => {
            if params.ou_path.is_some() {
                return Err(Error::invalid_configuration(
                    "an OU path applies only to domain joins",
                ));
            }
            if params.unjoin_credential.is_some() {
                return Err(Error::invalid_configuration(
                    "an unjoin credential applies only to domain joins",
                ));
            }
            if params.options.is_some() || params.join_option.is_some() {
                return Err(Error::invalid_configuration(
                    "join options apply only to domain joins",
                ));
            }
            Ok(JoinTarget::Workgroup {
                name: workgroup.clone(),
            })
        }
    }
}
