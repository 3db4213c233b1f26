//! Client profile commands

use anyhow::Result;
use camino::Utf8Path;
use svcext_core::ClientConfig;

use crate::cli::{ConfigCommands, ConfigInitArgs, ConfigShowArgs};
use crate::output;

pub async fn run(cmd: ConfigCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Init(args) => init(args),
        ConfigCommands::Show(args) => show(args, config_path),
    }
}

fn init(args: ConfigInitArgs) -> Result<()> {
    ClientConfig::init(&args.output, args.endpoint, args.subscription, args.force)?;
    output::success(&format!("Wrote client profile: {}", args.output));
    Ok(())
}

fn show(args: ConfigShowArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = ClientConfig::load(config_path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config.profile)?);
        return Ok(());
    }

    match &config.config_path {
        Some(path) => output::info(&format!("Client profile: {path}")),
        None => output::info("No client profile found, showing defaults"),
    }
    output::kv("endpoint", config.endpoint());
    output::kv(
        "subscription-id",
        config.profile.subscription_id.as_deref().unwrap_or("(not set)"),
    );
    output::kv(
        "default-thumbprint-algorithm",
        config.default_thumbprint_algorithm().unwrap_or("(not set)"),
    );
    output::kv(
        "default-extension-version",
        config.default_extension_version().unwrap_or("(not set)"),
    );
    Ok(())
}
