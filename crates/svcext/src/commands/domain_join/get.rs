//! Show the domain-join extension configured on a deployment

use anyhow::Result;
use camino::Utf8Path;
use serde_json::json;
use svcext_core::types::{Deployment, HostedServiceExtension};
use svcext_core::{ClientConfig, Error};
use svcext_extensions::EXTENSION_TYPE;
use svcext_management::ServiceManagement;

use crate::cli::DomainJoinGetArgs;
use crate::commands::management_client;
use crate::output;

pub(super) async fn run(args: DomainJoinGetArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    let client = management_client(&config)?;

    let deployment = client
        .get_deployment(&args.service, args.slot)
        .await?
        .ok_or_else(|| Error::invalid_deployment_reference(args.slot.to_string()))?;

    let extensions = client.list_extensions(&args.service).await?;
    let configured: Vec<&HostedServiceExtension> = extensions
        .iter()
        .filter(|e| e.extension_type == EXTENSION_TYPE)
        .filter(|e| {
            deployment
                .extension_configuration
                .referenced_ids()
                .contains(&e.id.as_str())
        })
        .collect();

    if args.json {
        let entries: Vec<serde_json::Value> = configured
            .iter()
            .map(|e| {
                json!({
                    "id": e.id,
                    "version": e.version,
                    "thumbprint": e.thumbprint,
                    "thumbprintAlgorithm": e.thumbprint_algorithm,
                    "roles": roles_for(&deployment, &e.id),
                    "publicConfiguration": public_configuration_value(e),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if configured.is_empty() {
        output::info(&format!(
            "No domain-join extension configured on {} ({})",
            args.service, args.slot
        ));
        return Ok(());
    }

    for extension in configured {
        output::header(&extension.id);
        if let Some(version) = &extension.version {
            output::kv("version", version);
        }
        if let Some(thumbprint) = &extension.thumbprint {
            output::kv("thumbprint", thumbprint);
        }
        if let Some(algorithm) = &extension.thumbprint_algorithm {
            output::kv("thumbprint-algorithm", algorithm);
        }
        output::kv("roles", &roles_for(&deployment, &extension.id).join(", "));
        if let Some(public) = &extension.public_configuration {
            output::kv("public-configuration", public);
        }
    }
    Ok(())
}

/// Which roles of the deployment reference this extension instance
fn roles_for(deployment: &Deployment, id: &str) -> Vec<String> {
    let configuration = &deployment.extension_configuration;
    if configuration.all_roles.iter().any(|r| r == id) {
        return vec!["all roles".to_string()];
    }
    configuration
        .named_roles
        .iter()
        .filter(|r| r.extension_ids.iter().any(|e| e == id))
        .map(|r| r.role_name.clone())
        .collect()
}

/// Parse the public blob back into structured JSON when possible
fn public_configuration_value(extension: &HostedServiceExtension) -> serde_json::Value {
    extension
        .public_configuration
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or(serde_json::Value::Null)
}
