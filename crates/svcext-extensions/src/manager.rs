//! Extension manager: registers extension instances on a hosted service
//! and rebuilds deployment extension configurations around them

use anyhow::{Context, Result};
use std::collections::HashSet;
use svcext_core::types::{
    Deployment, DeploymentSlot, ExtensionAddRequest, ExtensionConfiguration,
    ExtensionConfigurationInput, ExtensionRole, HostedServiceExtension,
};
use svcext_management::ServiceManagement;
use tracing::{debug, info};

/// Coordinates extension registration and configuration rebuilds for one
/// hosted service
pub struct ExtensionManager<'a, C: ServiceManagement + ?Sized> {
    client: &'a C,
    service_name: String,
}

impl<'a, C: ServiceManagement + ?Sized> ExtensionManager<'a, C> {
    /// Create a manager for one hosted service
    pub fn new(client: &'a C, service_name: impl Into<String>) -> Self {
        Self {
            client,
            service_name: service_name.into(),
        }
    }

    /// Install an extension: register a fresh instance under an id unused
    /// by either slot's deployment, then rebuild the target deployment's
    /// extension configuration around it.
    ///
    /// Ids are never reused across slots; a pending slot swap must not
    /// leave two deployments referencing the same instance.
    pub async fn install_extension(
        &self,
        input: &ExtensionConfigurationInput,
        slot: DeploymentSlot,
        deployment: &Deployment,
        peer_deployment: Option<&Deployment>,
    ) -> Result<ExtensionConfiguration> {
        let registered = self
            .client
            .list_extensions(&self.service_name)
            .await
            .context("Failed to list registered extensions")?;

        let id = allocate_extension_id(&input.extension_type, slot, deployment, peer_deployment);
        debug!("Allocated extension id {id}");

        let request = ExtensionAddRequest {
            id: id.clone(),
            provider_namespace: input.provider_namespace.clone(),
            extension_type: input.extension_type.clone(),
            version: input.version.clone(),
            thumbprint: input.certificate_thumbprint.clone(),
            thumbprint_algorithm: input.thumbprint_algorithm.clone(),
            certificate_data: input.certificate.as_ref().map(|c| c.to_base64()),
            public_configuration: input.public_configuration.clone(),
            private_configuration: input.private_configuration.clone(),
        };
        self.client
            .add_extension(&self.service_name, &request)
            .await
            .with_context(|| format!("Failed to register extension {id}"))?;
        info!("Registered extension instance {id}");

        let same_type = ids_of_type(&registered, &input.extension_type);
        let mut configuration = deployment.extension_configuration.clone();

        if input.roles.contains(&ExtensionRole::AllRoles) {
            configuration.remove_where(|candidate| same_type.contains(candidate));
            configuration.add_all_roles(&id);
        } else {
            let targets: Vec<String> = input
                .roles
                .iter()
                .filter_map(|role| match role {
                    ExtensionRole::Named(name) => Some(name.clone()),
                    ExtensionRole::AllRoles => None,
                })
                .collect();
            strip_type_for_roles(&mut configuration, deployment, &same_type, &targets);
            for target in &targets {
                configuration.add_named_role(target, &id);
            }
        }

        Ok(configuration)
    }

    /// Remove an extension type from a deployment's configuration, for
    /// the named roles or everywhere when `roles` is empty
    pub async fn remove_extension(
        &self,
        extension_type: &str,
        roles: &[String],
        deployment: &Deployment,
    ) -> Result<ExtensionConfiguration> {
        let registered = self
            .client
            .list_extensions(&self.service_name)
            .await
            .context("Failed to list registered extensions")?;

        let same_type = ids_of_type(&registered, extension_type);
        let mut configuration = deployment.extension_configuration.clone();

        if roles.is_empty() {
            configuration.remove_where(|candidate| same_type.contains(candidate));
        } else {
            strip_type_for_roles(&mut configuration, deployment, &same_type, roles);
        }

        Ok(configuration)
    }

    /// Apply a rebuilt configuration to a slot and return the updated
    /// deployment state. Management faults surface unchanged.
    pub async fn apply(
        &self,
        slot: DeploymentSlot,
        configuration: &ExtensionConfiguration,
    ) -> Result<Deployment> {
        self.client
            .change_deployment_configuration(&self.service_name, slot, configuration)
            .await
    }
}

/// Ids of the registered extension instances of one type
fn ids_of_type(registered: &[HostedServiceExtension], extension_type: &str) -> HashSet<String> {
    registered
        .iter()
        .filter(|e| e.extension_type == extension_type)
        .map(|e| e.id.clone())
        .collect()
}

/// Smallest-index id of the form `{type}-{slot}-Ext-{n}` not referenced
/// by either slot's deployment
fn allocate_extension_id(
    extension_type: &str,
    slot: DeploymentSlot,
    deployment: &Deployment,
    peer_deployment: Option<&Deployment>,
) -> String {
    let mut used: HashSet<&str> = deployment
        .extension_configuration
        .referenced_ids()
        .into_iter()
        .collect();
    if let Some(peer) = peer_deployment {
        used.extend(peer.extension_configuration.referenced_ids());
    }

    let prefix = extension_type.to_ascii_lowercase();
    let mut index = 0usize;
    loop {
        let candidate = format!("{prefix}-{slot}-Ext-{index}");
        if !used.contains(candidate.as_str()) {
            return candidate;
        }
        index += 1;
    }
}

/// Remove same-type references from the target roles only. When the type
/// was previously applied to all roles, the all-roles reference is
/// demoted to the untargeted roles so their coverage survives the
/// partial reconfiguration.
fn strip_type_for_roles(
    configuration: &mut ExtensionConfiguration,
    deployment: &Deployment,
    same_type: &HashSet<String>,
    targets: &[String],
) {
    let demoted: Vec<String> = configuration
        .all_roles
        .iter()
        .filter(|id| same_type.contains(*id))
        .cloned()
        .collect();

    if !demoted.is_empty() {
        configuration.all_roles.retain(|id| !same_type.contains(id));
        for role in deployment.roles.iter().map(|r| r.role_name.as_str()) {
            if !targets.iter().any(|t| t == role) {
                for id in &demoted {
                    configuration.add_named_role(role, id);
                }
            }
        }
    }

    for target in targets {
        if let Some(entry) = configuration
            .named_roles
            .iter_mut()
            .find(|r| &r.role_name == target)
        {
            entry.extension_ids.retain(|id| !same_type.contains(id));
        }
    }
    configuration.prune_empty_roles();
}
