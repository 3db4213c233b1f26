//! Remove the domain-join extension from a deployment

use anyhow::Result;
use camino::Utf8Path;
use dialoguer::Confirm;
use svcext_core::{ClientConfig, Error};
use svcext_extensions::{ExtensionManager, EXTENSION_TYPE};
use svcext_management::ServiceManagement;

use crate::cli::DomainJoinRemoveArgs;
use crate::commands::management_client;
use crate::output;

pub(super) async fn run(args: DomainJoinRemoveArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    let client = management_client(&config)?;

    let deployment = client
        .get_deployment(&args.service, args.slot)
        .await?
        .ok_or_else(|| Error::invalid_deployment_reference(args.slot.to_string()))?;

    for role in &args.roles {
        if !deployment.has_role(role) {
            return Err(Error::invalid_role_reference(role).into());
        }
    }

    if !args.yes {
        let scope = if args.roles.is_empty() {
            "all roles".to_string()
        } else {
            args.roles.join(", ")
        };
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove domain-join extension from {} ({}) on {}?",
                args.service, args.slot, scope
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            output::info("Cancelled");
            return Ok(());
        }
    }

    let manager = ExtensionManager::new(&client, &args.service);
    let configuration = manager
        .remove_extension(EXTENSION_TYPE, &args.roles, &deployment)
        .await?;
    manager.apply(args.slot, &configuration).await?;

    output::success(&format!(
        "Domain-join extension removed from {} ({})",
        args.service, args.slot
    ));
    Ok(())
}
