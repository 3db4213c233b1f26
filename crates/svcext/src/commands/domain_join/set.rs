//! Configure the domain-join extension on a deployment

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use svcext_core::certificate::ServiceCertificate;
use svcext_core::credential::Credential;
use svcext_core::join::JoinFlags;
use svcext_core::ClientConfig;
use svcext_extensions::{DomainJoinParams, ExtensionManager, JoinTarget, Validator};
use tracing::debug;

use crate::cli::DomainJoinSetArgs;
use crate::commands::management_client;
use crate::output;

pub(super) async fn run(args: DomainJoinSetArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    let client = management_client(&config)?;

    let params = params_from_args(args)?;
    let service_name = params.service_name.clone();
    let slot = params.slot;

    let mut validator = Validator::new(&client);
    if let Some(algorithm) = config.default_thumbprint_algorithm() {
        validator = validator.with_default_thumbprint_algorithm(algorithm);
    }
    if let Some(version) = config.default_extension_version() {
        validator = validator.with_default_version(version);
    }

    let validated = validator.validate(params).await?;
    let input = validated.config.build()?;
    debug!(
        "Built {} configuration input ({} role entries)",
        input.extension_type,
        input.roles.len()
    );

    let manager = ExtensionManager::new(&client, &service_name);
    let configuration = manager
        .install_extension(
            &input,
            slot,
            &validated.deployment,
            validated.peer_deployment.as_ref(),
        )
        .await?;
    manager.apply(slot, &configuration).await?;

    output::success("Domain-join extension configured");
    output::kv("service", &service_name);
    output::kv("slot", &slot.to_string());
    match &validated.config.target {
        JoinTarget::Domain { name, .. } => output::kv("domain", name),
        JoinTarget::Workgroup { name } => output::kv("workgroup", name),
    }
    for role in &input.roles {
        output::kv("role", &role.to_string());
    }
    Ok(())
}

/// Map the parsed CLI arguments onto the flat parameter bag, loading the
/// certificate file and assembling credentials along the way
fn params_from_args(args: DomainJoinSetArgs) -> Result<DomainJoinParams> {
    let certificate = args
        .certificate
        .as_deref()
        .map(|path| {
            ServiceCertificate::load(path)
                .with_context(|| format!("Failed to load certificate {path}"))
        })
        .transpose()?;

    let credential = credential_from(args.join_user, args.join_password, "--join-user")?;
    let unjoin_credential =
        credential_from(args.unjoin_user, args.unjoin_password, "--unjoin-user")?;

    let options = if args.options.is_empty() {
        None
    } else {
        Some(
            args.options
                .iter()
                .fold(JoinFlags::empty(), |acc, flag| acc | JoinFlags::from(*flag)),
        )
    };

    Ok(DomainJoinParams {
        service_name: args.service,
        slot: args.slot,
        roles: args.roles,
        certificate,
        certificate_thumbprint: args.thumbprint,
        thumbprint_algorithm: args.thumbprint_algorithm,
        domain_name: args.domain,
        workgroup_name: args.workgroup,
        restart: args.restart,
        credential,
        unjoin_credential,
        options,
        join_option: args.join_option,
        ou_path: args.ou_path,
        version: args.version,
    })
}

/// A username/password pair must arrive whole or not at all. The
/// password can come from the environment, which clap's `requires`
/// does not see.
fn credential_from(
    user: Option<String>,
    password: Option<String>,
    user_flag: &str,
) -> Result<Option<Credential>> {
    match (user, password) {
        (Some(user), Some(password)) => Ok(Some(Credential::new(user, password))),
        (Some(_), None) => Err(anyhow!("{user_flag} requires a password")),
        (None, Some(_)) => Err(anyhow!("a password was supplied without {user_flag}")),
        (None, None) => Ok(None),
    }
}
