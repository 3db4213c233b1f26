//! CLI argument parsing with clap
//!
//! The six domain-join parameter sets (domain vs workgroup, certificate
//! vs thumbprint, named flags vs raw bitmask) are expressed through
//! `conflicts_with`/`requires` attributes, so a contradictory combination
//! never parses.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use svcext_core::join::JoinFlags;
use svcext_core::types::DeploymentSlot;

/// svcext - hosted-service extension management
#[derive(Parser, Debug)]
#[command(name = "svcext")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to svcext.yaml client profile
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Client profile management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Domain-join extension management
    #[command(subcommand)]
    DomainJoin(DomainJoinCommands),

    /// Extension inventory
    #[command(subcommand)]
    Extension(ExtensionCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a starter client profile
    Init(ConfigInitArgs),

    /// Show the resolved client profile
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Management API endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Subscription id
    #[arg(long, value_name = "ID")]
    pub subscription: Option<String>,

    /// Output file path
    #[arg(short, long, default_value = "svcext.yaml")]
    pub output: Utf8PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Domain-join commands
#[derive(Subcommand, Debug)]
pub enum DomainJoinCommands {
    /// Configure the domain-join extension on a deployment
    Set(DomainJoinSetArgs),

    /// Show the domain-join extension configured on a deployment
    Get(DomainJoinGetArgs),

    /// Remove the domain-join extension from a deployment
    Remove(DomainJoinRemoveArgs),
}

#[derive(Args, Debug)]
pub struct DomainJoinSetArgs {
    /// Hosted service name
    #[arg(value_name = "SERVICE")]
    pub service: String,

    /// Deployment slot
    #[arg(long, default_value = "production", value_parser = parse_slot)]
    pub slot: DeploymentSlot,

    /// Target role; repeat for multiple roles, omit for all roles
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    /// PEM or DER certificate file shipped with the extension
    #[arg(long, value_name = "PATH", conflicts_with = "thumbprint")]
    pub certificate: Option<Utf8PathBuf>,

    /// Thumbprint of a certificate already installed on the instances
    #[arg(long, value_name = "HEX")]
    pub thumbprint: Option<String>,

    /// Algorithm the thumbprint was computed with
    #[arg(long, value_name = "ALG", requires = "thumbprint")]
    pub thumbprint_algorithm: Option<String>,

    /// Domain to join (FQDN)
    #[arg(
        long,
        value_name = "FQDN",
        required_unless_present = "workgroup",
        conflicts_with = "workgroup"
    )]
    pub domain: Option<String>,

    /// Workgroup to join instead of a domain
    #[arg(
        long,
        value_name = "NAME",
        conflicts_with_all = ["ou_path", "unjoin_user", "options", "join_option"]
    )]
    pub workgroup: Option<String>,

    /// Restart instances after the join completes
    #[arg(long)]
    pub restart: bool,

    /// Account used to perform the join
    #[arg(long, value_name = "USER")]
    pub join_user: Option<String>,

    /// Password for --join-user
    #[arg(
        long,
        value_name = "PASSWORD",
        env = "SVCEXT_JOIN_PASSWORD",
        hide_env_values = true,
        requires = "join_user"
    )]
    pub join_password: Option<String>,

    /// Account used to unjoin the previous domain
    #[arg(long, value_name = "USER")]
    pub unjoin_user: Option<String>,

    /// Password for --unjoin-user
    #[arg(
        long,
        value_name = "PASSWORD",
        env = "SVCEXT_UNJOIN_PASSWORD",
        hide_env_values = true,
        requires = "unjoin_user"
    )]
    pub unjoin_password: Option<String>,

    /// Named join option; repeat to combine flags
    #[arg(
        long = "options",
        value_name = "FLAG",
        value_enum,
        conflicts_with = "join_option"
    )]
    pub options: Vec<JoinFlagArg>,

    /// Raw join-option bitmask, passed through unchanged
    #[arg(long, value_name = "UINT")]
    pub join_option: Option<u32>,

    /// Organizational unit the machine accounts land in
    #[arg(long, value_name = "DN")]
    pub ou_path: Option<String>,

    /// Extension version pin (e.g. 1.0 or 1.*)
    #[arg(id = "ext_version", long = "ext-version", value_name = "VERSION")]
    pub version: Option<String>,
}

#[derive(Args, Debug)]
pub struct DomainJoinGetArgs {
    /// Hosted service name
    #[arg(value_name = "SERVICE")]
    pub service: String,

    /// Deployment slot
    #[arg(long, default_value = "production", value_parser = parse_slot)]
    pub slot: DeploymentSlot,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DomainJoinRemoveArgs {
    /// Hosted service name
    #[arg(value_name = "SERVICE")]
    pub service: String,

    /// Deployment slot
    #[arg(long, default_value = "production", value_parser = parse_slot)]
    pub slot: DeploymentSlot,

    /// Remove only from this role; repeat for multiple roles
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

// Extension commands
#[derive(Subcommand, Debug)]
pub enum ExtensionCommands {
    /// List the extensions registered on a hosted service
    List(ExtensionListArgs),
}

#[derive(Args, Debug)]
pub struct ExtensionListArgs {
    /// Hosted service name
    #[arg(value_name = "SERVICE")]
    pub service: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Named join-option flags accepted by --options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinFlagArg {
    JoinDomain,
    AccountCreate,
    Win9xUpgrade,
    JoinIfJoined,
    UnsecuredJoin,
    PasswordPass,
    DeferSpnSet,
    JoinWithNewName,
    JoinReadOnly,
    InstallInvoke,
}

impl From<JoinFlagArg> for JoinFlags {
    fn from(arg: JoinFlagArg) -> Self {
        match arg {
            JoinFlagArg::JoinDomain => JoinFlags::JOIN_DOMAIN,
            JoinFlagArg::AccountCreate => JoinFlags::ACCT_CREATE,
            JoinFlagArg::Win9xUpgrade => JoinFlags::WIN9X_UPGRADE,
            JoinFlagArg::JoinIfJoined => JoinFlags::DOMAIN_JOIN_IF_JOINED,
            JoinFlagArg::UnsecuredJoin => JoinFlags::JOIN_UNSECURE,
            JoinFlagArg::PasswordPass => JoinFlags::MACHINE_PWD_PASSED,
            JoinFlagArg::DeferSpnSet => JoinFlags::DEFER_SPN_SET,
            JoinFlagArg::JoinWithNewName => JoinFlags::JOIN_WITH_NEW_NAME,
            JoinFlagArg::JoinReadOnly => JoinFlags::JOIN_READONLY,
            JoinFlagArg::InstallInvoke => JoinFlags::INSTALL_INVOKE,
        }
    }
}

/// Case-insensitive slot parser for clap
fn parse_slot(s: &str) -> Result<DeploymentSlot, String> {
    s.parse::<DeploymentSlot>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args.iter().copied())
    }

    #[test]
    fn test_minimal_domain_set_parses() {
        let cli = parse(&[
            "svcext",
            "domain-join",
            "set",
            "frontend",
            "--domain",
            "contoso.com",
            "--thumbprint",
            "ABC123",
        ])
        .unwrap();
        match cli.command {
            Commands::DomainJoin(DomainJoinCommands::Set(args)) => {
                assert_eq!(args.service, "frontend");
                assert_eq!(args.slot, DeploymentSlot::Production);
                assert_eq!(args.domain.as_deref(), Some("contoso.com"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_slot_is_case_insensitive() {
        let cli = parse(&[
            "svcext",
            "domain-join",
            "set",
            "frontend",
            "--slot",
            "Staging",
            "--domain",
            "contoso.com",
        ])
        .unwrap();
        match cli.command {
            Commands::DomainJoin(DomainJoinCommands::Set(args)) => {
                assert_eq!(args.slot, DeploymentSlot::Staging);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_certificate_conflicts_with_thumbprint() {
        let err = parse(&[
            "svcext",
            "domain-join",
            "set",
            "frontend",
            "--domain",
            "contoso.com",
            "--certificate",
            "cert.pem",
            "--thumbprint",
            "ABC123",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_domain_conflicts_with_workgroup() {
        let err = parse(&[
            "svcext",
            "domain-join",
            "set",
            "frontend",
            "--domain",
            "contoso.com",
            "--workgroup",
            "WORKGROUP1",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_one_of_domain_or_workgroup_is_required() {
        let err = parse(&["svcext", "domain-join", "set", "frontend"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_workgroup_rejects_domain_only_flags() {
        for extra in [
            ["--ou-path", "OU=Web,DC=contoso,DC=com"],
            ["--join-option", "35"],
            ["--options", "account-create"],
        ] {
            let mut args = vec![
                "svcext",
                "domain-join",
                "set",
                "frontend",
                "--workgroup",
                "WORKGROUP1",
            ];
            args.extend(extra);
            let err = parse(&args).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        }
    }

    #[test]
    fn test_options_conflict_with_raw_join_option() {
        let err = parse(&[
            "svcext",
            "domain-join",
            "set",
            "frontend",
            "--domain",
            "contoso.com",
            "--options",
            "account-create",
            "--join-option",
            "35",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_thumbprint_algorithm_requires_thumbprint() {
        let err = parse(&[
            "svcext",
            "domain-join",
            "set",
            "frontend",
            "--domain",
            "contoso.com",
            "--thumbprint-algorithm",
            "sha1",
        ])
        .unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_repeated_roles_and_options_accumulate() {
        let cli = parse(&[
            "svcext",
            "domain-join",
            "set",
            "frontend",
            "--domain",
            "contoso.com",
            "--role",
            "WebRole",
            "--role",
            "WorkerRole",
            "--options",
            "join-domain",
            "--options",
            "join-with-new-name",
        ])
        .unwrap();
        match cli.command {
            Commands::DomainJoin(DomainJoinCommands::Set(args)) => {
                assert_eq!(args.roles, vec!["WebRole", "WorkerRole"]);
                assert_eq!(
                    args.options,
                    vec![JoinFlagArg::JoinDomain, JoinFlagArg::JoinWithNewName]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
