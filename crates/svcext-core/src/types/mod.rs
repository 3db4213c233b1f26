//! Type definitions for hosted services, deployments, and extensions

mod extension;
mod service;

pub use extension::{ExtensionAddRequest, ExtensionConfigurationInput, ExtensionRole};
pub use service::{
    Deployment, DeploymentRole, DeploymentSlot, ExtensionConfiguration, HostedService,
    HostedServiceExtension, RoleExtensions,
};
