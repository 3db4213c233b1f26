//! Extension inventory commands

use anyhow::Result;
use camino::Utf8Path;
use svcext_core::types::{Deployment, DeploymentSlot};
use svcext_core::{ClientConfig, Error};
use svcext_management::ServiceManagement;

use crate::cli::{ExtensionCommands, ExtensionListArgs};
use crate::commands::management_client;
use crate::output;

/// Main entry point for extension subcommands
pub async fn run(cmd: ExtensionCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ExtensionCommands::List(args) => list(args, config_path).await,
    }
}

async fn list(args: ExtensionListArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    let client = management_client(&config)?;

    let service = client
        .get_hosted_service(&args.service)
        .await?
        .ok_or_else(|| Error::invalid_service_reference(&args.service))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&service.extensions)?);
        return Ok(());
    }

    if service.extensions.is_empty() {
        output::info(&format!("No extensions registered on {}", args.service));
        return Ok(());
    }

    let production = client
        .get_deployment(&args.service, DeploymentSlot::Production)
        .await?;
    let staging = client
        .get_deployment(&args.service, DeploymentSlot::Staging)
        .await?;

    output::header(&format!("Extensions on {}", args.service));
    for extension in &service.extensions {
        output::kv(
            &extension.id,
            &format!(
                "{}/{} {}",
                extension.provider_namespace,
                extension.extension_type,
                extension.version.as_deref().unwrap_or("-"),
            ),
        );
        for deployment in [production.as_ref(), staging.as_ref()].into_iter().flatten() {
            if let Some(usage) = usage_in(deployment, &extension.id) {
                output::kv(&format!("  {}", deployment.slot), &usage);
            }
        }
    }
    Ok(())
}

/// How a deployment references the instance, if it does
fn usage_in(deployment: &Deployment, id: &str) -> Option<String> {
    let configuration = &deployment.extension_configuration;
    if configuration.all_roles.iter().any(|r| r == id) {
        return Some("all roles".to_string());
    }
    let roles: Vec<&str> = configuration
        .named_roles
        .iter()
        .filter(|r| r.extension_ids.iter().any(|e| e == id))
        .map(|r| r.role_name.as_str())
        .collect();
    if roles.is_empty() {
        None
    } else {
        Some(roles.join(", "))
    }
}
