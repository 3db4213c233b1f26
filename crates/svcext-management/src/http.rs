//! HTTP implementation of the management client

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use svcext_core::types::{
    Deployment, DeploymentSlot, ExtensionAddRequest, ExtensionConfiguration, HostedService,
    HostedServiceExtension,
};
use tracing::debug;

use crate::traits::ServiceManagement;

/// Management client over the platform's REST surface
pub struct HttpManagementClient {
    base_url: String,
    subscription_id: String,
    client: reqwest::Client,
}

impl HttpManagementClient {
    /// Create a client against an endpoint and subscription
    pub fn new(endpoint: impl Into<String>, subscription_id: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("svcext/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: endpoint.into().trim_end_matches('/').to_string(),
            subscription_id: subscription_id.into(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/subscriptions/{}/{}",
            self.base_url, self.subscription_id, path
        )
    }
}

#[async_trait]
impl ServiceManagement for HttpManagementClient {
    async fn get_hosted_service(&self, service_name: &str) -> Result<Option<HostedService>> {
        let url = self.url(&format!("services/{service_name}"));
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch hosted service {service_name}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let service = response
            .error_for_status()
            .with_context(|| format!("Management API rejected lookup of {service_name}"))?
            .json::<HostedService>()
            .await
            .context("Failed to decode hosted service response")?;

        Ok(Some(service))
    }

    async fn get_deployment(
        &self,
        service_name: &str,
        slot: DeploymentSlot,
    ) -> Result<Option<Deployment>> {
        let url = self.url(&format!("services/{service_name}/deployments/{slot}"));
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {slot} deployment of {service_name}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let deployment = response
            .error_for_status()
            .with_context(|| format!("Management API rejected deployment lookup for {service_name}"))?
            .json::<Deployment>()
            .await
            .context("Failed to decode deployment response")?;

        Ok(Some(deployment))
    }

    async fn list_extensions(&self, service_name: &str) -> Result<Vec<HostedServiceExtension>> {
        let url = self.url(&format!("services/{service_name}/extensions"));
        debug!("GET {url}");

        let extensions = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to list extensions of {service_name}"))?
            .error_for_status()
            .with_context(|| format!("Management API rejected extension listing for {service_name}"))?
            .json::<Vec<HostedServiceExtension>>()
            .await
            .context("Failed to decode extension list response")?;

        Ok(extensions)
    }

    async fn add_extension(&self, service_name: &str, request: &ExtensionAddRequest) -> Result<()> {
        let url = self.url(&format!("services/{service_name}/extensions"));
        debug!("POST {url} (extension {})", request.id);

        self.client
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to register extension {}", request.id))?
            .error_for_status()
            .with_context(|| format!("Management API rejected extension {}", request.id))?;

        Ok(())
    }

    async fn change_deployment_configuration(
        &self,
        service_name: &str,
        slot: DeploymentSlot,
        configuration: &ExtensionConfiguration,
    ) -> Result<Deployment> {
        let url = self.url(&format!(
            "services/{service_name}/deployments/{slot}/extension-configuration"
        ));
        debug!("PUT {url}");

        let deployment = self
            .client
            .put(&url)
            .json(configuration)
            .send()
            .await
            .with_context(|| format!("Failed to update {slot} deployment of {service_name}"))?
            .error_for_status()
            .with_context(|| {
                format!("Management API rejected configuration change for {service_name}")
            })?
            .json::<Deployment>()
            .await
            .context("Failed to decode updated deployment response")?;

        Ok(deployment)
    }
}
