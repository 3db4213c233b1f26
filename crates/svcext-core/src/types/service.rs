//! Hosted service and deployment types returned by the management API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Deployment environment within a hosted service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentSlot {
    #[default]
    Production,
    Staging,
}

impl DeploymentSlot {
    /// The other slot of the same service
    pub fn peer(&self) -> Self {
        match self {
            Self::Production => Self::Staging,
            Self::Staging => Self::Production,
        }
    }
}

impl fmt::Display for DeploymentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Staging => write!(f, "staging"),
        }
    }
}

impl FromStr for DeploymentSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            other => Err(Error::invalid_configuration(format!(
                "unknown deployment slot: {other}"
            ))),
        }
    }
}

/// A hosted compute service as returned by the management API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedService {
    /// Service name, unique within the subscription
    pub service_name: String,

    /// Datacenter location
    #[serde(default)]
    pub location: Option<String>,

    /// Extension instances registered with the service
    #[serde(default)]
    pub extensions: Vec<HostedServiceExtension>,
}

/// An extension instance registered with a hosted service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedServiceExtension {
    /// Instance id referenced by deployment configurations
    pub id: String,

    /// Publisher namespace
    pub provider_namespace: String,

    /// Extension type identifier within the namespace
    #[serde(rename = "type")]
    pub extension_type: String,

    /// Pinned version
    #[serde(default)]
    pub version: Option<String>,

    /// Thumbprint of the certificate the instance was configured with
    #[serde(default)]
    pub thumbprint: Option<String>,

    /// Algorithm the thumbprint was computed with
    #[serde(default)]
    pub thumbprint_algorithm: Option<String>,

    /// Public configuration blob; the private blob is never returned
    #[serde(default)]
    pub public_configuration: Option<String>,
}

/// A deployment occupying one slot of a hosted service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Deployment name
    pub name: String,

    /// Slot the deployment runs in
    pub slot: DeploymentSlot,

    /// Deployment label
    #[serde(default)]
    pub label: Option<String>,

    /// Creation timestamp
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,

    /// Roles the deployment runs
    #[serde(default)]
    pub roles: Vec<DeploymentRole>,

    /// Which registered extensions apply to which roles
    #[serde(default)]
    pub extension_configuration: ExtensionConfiguration,
}

impl Deployment {
    /// Whether a role with this name is part of the deployment
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.role_name == name)
    }
}

/// A named group of compute instances within a deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRole {
    /// Role name, unique within the deployment
    pub role_name: String,

    /// Instance count
    #[serde(default)]
    pub instance_count: u32,
}

/// Which registered extensions apply to which roles of a deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionConfiguration {
    /// Extension ids applied to every role
    #[serde(default)]
    pub all_roles: Vec<String>,

    /// Per-role extension id lists
    #[serde(default)]
    pub named_roles: Vec<RoleExtensions>,
}

impl ExtensionConfiguration {
    /// Every id referenced anywhere in this configuration
    pub fn referenced_ids(&self) -> Vec<&str> {
        self.all_roles
            .iter()
            .map(String::as_str)
            .chain(
                self.named_roles
                    .iter()
                    .flat_map(|r| r.extension_ids.iter().map(String::as_str)),
            )
            .collect()
    }

    /// Drop every reference matching the predicate, pruning roles whose
    /// id list becomes empty
    pub fn remove_where<F: Fn(&str) -> bool>(&mut self, predicate: F) {
        self.all_roles.retain(|id| !predicate(id));
        for role in &mut self.named_roles {
            role.extension_ids.retain(|id| !predicate(id));
        }
        self.prune_empty_roles();
    }

    /// Reference an extension id from every role
    pub fn add_all_roles(&mut self, id: impl Into<String>) {
        self.all_roles.push(id.into());
    }

    /// Reference an extension id from a single named role
    pub fn add_named_role(&mut self, role_name: &str, id: impl Into<String>) {
        match self
            .named_roles
            .iter_mut()
            .find(|r| r.role_name == role_name)
        {
            Some(entry) => entry.extension_ids.push(id.into()),
            None => self.named_roles.push(RoleExtensions {
                role_name: role_name.to_string(),
                extension_ids: vec![id.into()],
            }),
        }
    }

    /// Drop named-role entries that reference nothing
    pub fn prune_empty_roles(&mut self) {
        self.named_roles.retain(|r| !r.extension_ids.is_empty());
    }
}

/// Extension ids referenced by one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleExtensions {
    /// Role name
    pub role_name: String,

    /// Referenced extension ids
    #[serde(default)]
    pub extension_ids: Vec<String>,
}
