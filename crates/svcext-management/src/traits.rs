//! Management client trait definitions

use anyhow::Result;
use async_trait::async_trait;
use svcext_core::types::{
    Deployment, DeploymentSlot, ExtensionAddRequest, ExtensionConfiguration, HostedService,
    HostedServiceExtension,
};

/// Client surface for the hosted-service management API.
///
/// Lookups return `None` for entities that do not exist; errors are
/// reserved for transport and server faults, which callers propagate
/// unchanged.
#[async_trait]
pub trait ServiceManagement: Send + Sync {
    /// Fetch a hosted service by name
    async fn get_hosted_service(&self, service_name: &str) -> Result<Option<HostedService>>;

    /// Fetch the deployment occupying a slot, if any
    async fn get_deployment(
        &self,
        service_name: &str,
        slot: DeploymentSlot,
    ) -> Result<Option<Deployment>>;

    /// List the extension instances registered with a hosted service
    async fn list_extensions(&self, service_name: &str) -> Result<Vec<HostedServiceExtension>>;

    /// Register an extension instance with a hosted service
    async fn add_extension(&self, service_name: &str, request: &ExtensionAddRequest) -> Result<()>;

    /// Replace a deployment's extension configuration and return the
    /// updated deployment state
    async fn change_deployment_configuration(
        &self,
        service_name: &str,
        slot: DeploymentSlot,
        configuration: &ExtensionConfiguration,
    ) -> Result<Deployment>;
}
