//! Command implementations

pub mod completions;
pub mod config;
pub mod domain_join;
pub mod extension;
pub mod version;

use anyhow::Result;
use svcext_core::ClientConfig;
use svcext_management::HttpManagementClient;

/// Build a management client from the loaded profile
pub(crate) fn management_client(config: &ClientConfig) -> Result<HttpManagementClient> {
    HttpManagementClient::new(config.endpoint(), config.require_subscription()?)
}
