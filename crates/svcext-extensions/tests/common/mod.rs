//! Shared test fixtures: builders and an in-memory management client

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use svcext_core::types::{
    Deployment, DeploymentRole, DeploymentSlot, ExtensionAddRequest, ExtensionConfiguration,
    HostedService, HostedServiceExtension,
};
use svcext_extensions::DomainJoinParams;
use svcext_management::ServiceManagement;

/// In-memory management client recording every mutation
#[derive(Default)]
pub struct FakeManagement {
    services: Mutex<HashMap<String, HostedService>>,
    deployments: Mutex<HashMap<(String, DeploymentSlot), Deployment>>,
    added: Mutex<Vec<ExtensionAddRequest>>,
    fail_configuration_change: bool,
}

impl FakeManagement {
    pub fn new() -> Self {
        Self::default()
    }

    /// All configuration changes fail with a transport-style error
    pub fn failing_configuration_changes() -> Self {
        Self {
            fail_configuration_change: true,
            ..Self::default()
        }
    }

    pub fn insert_service(&self, service: HostedService) {
        self.services
            .lock()
            .unwrap()
            .insert(service.service_name.clone(), service);
    }

    pub fn insert_deployment(&self, service_name: &str, deployment: Deployment) {
        self.deployments
            .lock()
            .unwrap()
            .insert((service_name.to_string(), deployment.slot), deployment);
    }

    /// Extension registrations recorded so far
    pub fn added_requests(&self) -> Vec<ExtensionAddRequest> {
        self.added.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceManagement for FakeManagement {
    async fn get_hosted_service(&self, service_name: &str) -> Result<Option<HostedService>> {
        Ok(self.services.lock().unwrap().get(service_name).cloned())
    }

    async fn get_deployment(
        &self,
        service_name: &str,
        slot: DeploymentSlot,
    ) -> Result<Option<Deployment>> {
        Ok(self
            .deployments
            .lock()
            .unwrap()
            .get(&(service_name.to_string(), slot))
            .cloned())
    }

    async fn list_extensions(&self, service_name: &str) -> Result<Vec<HostedServiceExtension>> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .get(service_name)
            .map(|s| s.extensions.clone())
            .unwrap_or_default())
    }

    async fn add_extension(&self, service_name: &str, request: &ExtensionAddRequest) -> Result<()> {
        let mut services = self.services.lock().unwrap();
        let service = services
            .get_mut(service_name)
            .ok_or_else(|| anyhow!("no such service: {service_name}"))?;
        service.extensions.push(HostedServiceExtension {
            id: request.id.clone(),
            provider_namespace: request.provider_namespace.clone(),
            extension_type: request.extension_type.clone(),
            version: Some(request.version.clone()),
            thumbprint: request.thumbprint.clone(),
            thumbprint_algorithm: request.thumbprint_algorithm.clone(),
            public_configuration: Some(request.public_configuration.clone()),
        });
        self.added.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn change_deployment_configuration(
        &self,
        service_name: &str,
        slot: DeploymentSlot,
        configuration: &ExtensionConfiguration,
    ) -> Result<Deployment> {
        if self.fail_configuration_change {
            return Err(anyhow!("management API unavailable"));
        }
        let mut deployments = self.deployments.lock().unwrap();
        let deployment = deployments
            .get_mut(&(service_name.to_string(), slot))
            .ok_or_else(|| anyhow!("no deployment in {slot}"))?;
        deployment.extension_configuration = configuration.clone();
        Ok(deployment.clone())
    }
}

/// A hosted service with no registered extensions
pub fn service(name: &str) -> HostedService {
    HostedService {
        service_name: name.to_string(),
        location: Some("North Europe".to_string()),
        extensions: Vec::new(),
    }
}

/// A deployment with the given roles and an empty extension configuration
pub fn deployment(slot: DeploymentSlot, roles: &[&str]) -> Deployment {
    Deployment {
        name: format!("frontend-{slot}"),
        slot,
        label: None,
        created_on: None,
        roles: roles
            .iter()
            .map(|r| DeploymentRole {
                role_name: r.to_string(),
                instance_count: 2,
            })
            .collect(),
        extension_configuration: ExtensionConfiguration::default(),
    }
}

/// A registered extension instance of the given type
pub fn registered_extension(id: &str, extension_type: &str) -> HostedServiceExtension {
    HostedServiceExtension {
        id: id.to_string(),
        provider_namespace: "Platform.Compute.Extensions".to_string(),
        extension_type: extension_type.to_string(),
        version: Some("1.*".to_string()),
        thumbprint: None,
        thumbprint_algorithm: None,
        public_configuration: None,
    }
}

/// Thumbprint-based domain-join parameters against `frontend`
pub fn thumbprint_domain_params() -> DomainJoinParams {
    DomainJoinParams {
        service_name: "frontend".to_string(),
        domain_name: Some("contoso.com".to_string()),
        certificate_thumbprint: Some("ABC123".to_string()),
        thumbprint_algorithm: Some("sha1".to_string()),
        ..Default::default()
    }
}

/// A fake with `frontend` and a production deployment of the given roles
pub fn populated_fake(roles: &[&str]) -> FakeManagement {
    let fake = FakeManagement::new();
    fake.insert_service(service("frontend"));
    fake.insert_deployment("frontend", deployment(DeploymentSlot::Production, roles));
    fake
}
