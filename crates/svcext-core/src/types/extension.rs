//! Extension configuration request types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::certificate::ServiceCertificate;

/// Target of one extension configuration entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionRole {
    /// Apply to every role in the deployment
    AllRoles,
    /// Apply to a single named role
    Named(String),
}

impl fmt::Display for ExtensionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllRoles => write!(f, "all roles"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Fully built extension configuration request handed to the manager.
///
/// Constructed fresh per invocation and discarded after dispatch.
#[derive(Debug, Clone)]
pub struct ExtensionConfigurationInput {
    /// Publisher namespace of the extension kind
    pub provider_namespace: String,

    /// Extension type identifier within the namespace
    pub extension_type: String,

    /// Certificate shipped inline, when certificate-based
    pub certificate: Option<ServiceCertificate>,

    /// Thumbprint of a pre-installed certificate, when thumbprint-based
    pub certificate_thumbprint: Option<String>,

    /// Algorithm paired with the thumbprint
    pub thumbprint_algorithm: Option<String>,

    /// Public configuration blob
    pub public_configuration: String,

    /// Private configuration blob; never logged or displayed
    pub private_configuration: String,

    /// Version pin
    pub version: String,

    /// One entry per named role, or a single all-roles entry
    pub roles: Vec<ExtensionRole>,
}

/// Body for registering an extension instance with a hosted service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionAddRequest {
    /// Instance id, unique within the service
    pub id: String,

    /// Publisher namespace
    pub provider_namespace: String,

    /// Extension type identifier
    #[serde(rename = "type")]
    pub extension_type: String,

    /// Version pin
    pub version: String,

    /// Thumbprint of a pre-installed certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbprint: Option<String>,

    /// Algorithm paired with the thumbprint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbprint_algorithm: Option<String>,

    /// Base64 DER when the certificate ships inline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_data: Option<String>,

    /// Public configuration blob
    pub public_configuration: String,

    /// Private configuration blob
    pub private_configuration: String,
}
