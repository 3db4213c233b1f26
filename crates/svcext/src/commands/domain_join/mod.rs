//! Domain-join extension commands
//!
//! - set: validate parameters, build the configuration payload, and hand
//!   it to the extension manager
//! - get: show the domain-join extension configured on a deployment
//! - remove: strip the domain-join extension from a deployment

mod get;
mod remove;
mod set;

use anyhow::Result;
use camino::Utf8Path;

use crate::cli::DomainJoinCommands;

/// Main entry point for domain-join subcommands
pub async fn run(cmd: DomainJoinCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        DomainJoinCommands::Set(args) => set::run(args, config_path).await,
        DomainJoinCommands::Get(args) => get::run(args, config_path).await,
        DomainJoinCommands::Remove(args) => remove::run(args, config_path).await,
    }
}
