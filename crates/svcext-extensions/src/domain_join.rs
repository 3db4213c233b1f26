//! Domain-join extension parameter surface and payload construction

use serde::{Deserialize, Serialize};
use svcext_core::certificate::ServiceCertificate;
use svcext_core::credential::Credential;
use svcext_core::join::JoinFlags;
use svcext_core::types::{DeploymentSlot, ExtensionConfigurationInput, ExtensionRole};
use svcext_core::Result;

/// Publisher namespace the domain-join extension ships under
pub const PROVIDER_NAMESPACE: &str = "Platform.Compute.Extensions";

/// Extension type identifier within the provider namespace
pub const EXTENSION_TYPE: &str = "DomainJoinExtension";

/// Version pin used when neither the request nor the profile carries one
pub const DEFAULT_VERSION: &str = "1.*";

/// User-supplied parameters, flat as they arrive from the CLI surface.
///
/// [`Validator::validate`](crate::validate::Validator::validate) is the
/// only path from here to a [`DomainJoinConfig`]; the typed config cannot
/// represent a contradictory parameter combination.
#[derive(Debug, Clone, Default)]
pub struct DomainJoinParams {
    /// Hosted service to configure
    pub service_name: String,

    /// Deployment slot to configure
    pub slot: DeploymentSlot,

    /// Target roles; empty means every role
    pub roles: Vec<String>,

    /// Certificate shipped inline
    pub certificate: Option<ServiceCertificate>,

    /// Thumbprint of a certificate already installed on the instances
    pub certificate_thumbprint: Option<String>,

    /// Algorithm the thumbprint was computed with
    pub thumbprint_algorithm: Option<String>,

    /// Domain to join
    pub domain_name: Option<String>,

    /// Workgroup to join
    pub workgroup_name: Option<String>,

    /// Restart instances after the join completes
    pub restart: bool,

    /// Account performing the join
    pub credential: Option<Credential>,

    /// Account unjoining the previous domain
    pub unjoin_credential: Option<Credential>,

    /// Named join-option flags
    pub options: Option<JoinFlags>,

    /// Raw join-option bitmask, passed through unchanged
    pub join_option: Option<u32>,

    /// Organizational unit the machine accounts land in
    pub ou_path: Option<String>,

    /// Extension version pin
    pub version: Option<String>,
}

/// What the instances join: a domain or a workgroup
#[derive(Debug, Clone, PartialEq)]
pub enum JoinTarget {
    /// Join an Active Directory domain
    Domain {
        /// Domain FQDN
        name: String,
        /// Organizational unit for the machine accounts
        ou_path: Option<String>,
        /// Account unjoining the previous domain
        unjoin_credential: Option<Credential>,
        /// Join behavior options
        options: JoinOptionsSpec,
    },
    /// Join a workgroup
    Workgroup {
        /// Workgroup name
        name: String,
    },
}

/// How the join-option bitmask was specified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOptionsSpec {
    /// Named flags, OR-ed together
    Flags(JoinFlags),
    /// Raw numeric bitmask
    Raw(u32),
}

impl JoinOptionsSpec {
    /// Effective numeric value written into the public configuration
    pub fn value(&self) -> u32 {
        match self {
            Self::Flags(flags) => flags.bits(),
            Self::Raw(raw) => *raw,
        }
    }
}

/// Authentication material for the extension payload, exactly one kind
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMaterial {
    /// Certificate shipped inline with the request
    Certificate(ServiceCertificate),
    /// Thumbprint of a certificate already on the instances
    Thumbprint {
        /// Hex thumbprint
        thumbprint: String,
        /// Algorithm the thumbprint was computed with
        algorithm: String,
    },
}

/// Validated domain-join request.
///
/// One field per parameter-set axis: the join target selects domain vs
/// workgroup, the auth material selects certificate vs thumbprint, and
/// the options spec inside a domain target selects named flags vs a raw
/// bitmask. Every combination that exists is a valid parameter set.
#[derive(Debug, Clone)]
pub struct DomainJoinConfig {
    /// Domain or workgroup to join
    pub target: JoinTarget,

    /// Certificate or thumbprint
    pub auth: AuthMaterial,

    /// Target roles; empty means every role
    pub roles: Vec<String>,

    /// Restart instances after the join completes
    pub restart: bool,

    /// Account performing the join
    pub credential: Option<Credential>,

    /// Resolved version pin
    pub version: String,
}

/// Public half of the extension configuration blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicConfig {
    /// Domain FQDN or workgroup name
    pub name: String,

    /// Organizational unit, domain joins only
    #[serde(rename = "OUPath", skip_serializing_if = "Option::is_none")]
    pub ou_path: Option<String>,

    /// Join account name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Restart after join
    pub restart: bool,

    /// Effective join-option bitmask, domain joins only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<u32>,
}

/// Private half of the extension configuration blob; never logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrivateConfig {
    /// Join account secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Unjoin account name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unjoin_domain_user: Option<String>,

    /// Unjoin account secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unjoin_domain_password: Option<String>,
}

impl DomainJoinConfig {
    /// Public configuration blob for this request
    pub fn public_config(&self) -> PublicConfig {
        let user = self.credential.as_ref().map(|c| c.username.clone());
        match &self.target {
            JoinTarget::Domain {
                name,
                ou_path,
                options,
                ..
            } => PublicConfig {
                name: name.clone(),
                ou_path: ou_path.clone(),
                user,
                restart: self.restart,
                options: Some(options.value()),
            },
            JoinTarget::Workgroup { name } => PublicConfig {
                name: name.clone(),
                ou_path: None,
                user,
                restart: self.restart,
                options: None,
            },
        }
    }

    /// Private configuration blob for this request
    pub fn private_config(&self) -> PrivateConfig {
        let (unjoin_domain_user, unjoin_domain_password) = match &self.target {
            JoinTarget::Domain {
                unjoin_credential: Some(credential),
                ..
            } => (
                Some(credential.username.clone()),
                Some(credential.password.clone()),
            ),
            _ => (None, None),
        };

        PrivateConfig {
            password: self.credential.as_ref().map(|c| c.password.clone()),
            unjoin_domain_user,
            unjoin_domain_password,
        }
    }

    /// Build the extension configuration request handed to the manager.
    ///
    /// Deterministic: namespace and type are fixed by the extension kind,
    /// thumbprint material and certificate copy through unchanged, and
    /// the role list maps to one entry per named role or a single
    /// all-roles entry when empty.
    pub fn build(&self) -> Result<ExtensionConfigurationInput> {
        let public_configuration = serde_json::to_string(&self.public_config())?;
        let private_configuration = serde_json::to_string(&self.private_config())?;

        let (certificate, certificate_thumbprint, thumbprint_algorithm) = match &self.auth {
            AuthMaterial::Certificate(cert) => (Some(cert.clone()), None, None),
            AuthMaterial::Thumbprint {
                thumbprint,
                algorithm,
            } => (None, Some(thumbprint.clone()), Some(algorithm.clone())),
        };

        let roles = if self.roles.is_empty() {
            vec![ExtensionRole::AllRoles]
        } else {
            self.roles
                .iter()
                .map(|r| ExtensionRole::Named(r.clone()))
                .collect()
        };

        Ok(ExtensionConfigurationInput {
            provider_namespace: PROVIDER_NAMESPACE.to_string(),
            extension_type: EXTENSION_TYPE.to_string(),
            certificate,
            certificate_thumbprint,
            thumbprint_algorithm,
            public_configuration,
            private_configuration,
            version: self.version.clone(),
            roles,
        })
    }
}
