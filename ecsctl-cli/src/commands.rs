use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ecsctl_config::{ClusterEntry, ConfigResolver, ConfigStore, ProfileEntry, ToolSettings};
use ecsctl_params::read_ecs_params;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ecsctl", version, about)]
pub struct Cli {
    /// YAML settings file; `ECSCTL_*` variables still override it
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store cluster and profile configuration
    #[command(subcommand)]
    Configure(ConfigureCommand),
    /// Print the configuration a command would run with
    Show(ShowArgs),
    /// Parse an ECS params file and print the normalised result
    Params(ParamsArgs),
}

#[derive(Subcommand, Debug)]
pub enum ConfigureCommand {
    /// Save a named cluster configuration
    Cluster(ClusterArgs),
    /// Save a named credentials profile
    Profile(ProfileArgs),
    /// Make a saved cluster configuration the default
    DefaultCluster(DefaultClusterArgs),
    /// Make a saved profile the default
    DefaultProfile(DefaultProfileArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    #[arg(long)]
    pub config_name: String,
    #[arg(short, long)]
    pub cluster: String,
    #[arg(short, long)]
    pub region: String,
    #[arg(long)]
    pub compose_project_name_prefix: Option<String>,
    #[arg(long)]
    pub compose_service_name_prefix: Option<String>,
    #[arg(long)]
    pub cfn_stack_name_prefix: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    #[arg(long)]
    pub profile_name: String,
    #[arg(long)]
    pub access_key: String,
    #[arg(long)]
    pub secret_key: String,
}

#[derive(Args, Debug, Clone)]
pub struct DefaultClusterArgs {
    #[arg(long)]
    pub config_name: String,
}

#[derive(Args, Debug, Clone)]
pub struct DefaultProfileArgs {
    #[arg(long)]
    pub profile_name: String,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Cluster configuration to use instead of the default
    #[arg(long)]
    pub cluster_config: Option<String>,
    /// Profile to use instead of the default
    #[arg(long)]
    pub ecs_profile: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ParamsArgs {
    /// Params file; defaults to ecs-params.yml in the working directory
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

pub fn run_command(cli: Cli, settings: &ToolSettings) -> anyhow::Result<()> {
    match cli.command {
        Commands::Configure(cmd) => run_configure(cmd, settings),
        Commands::Show(args) => run_show(args, settings),
        Commands::Params(args) => run_params(args, settings),
    }
}

fn run_configure(cmd: ConfigureCommand, settings: &ToolSettings) -> anyhow::Result<()> {
    let store = ConfigStore::new(settings.destination()?);
    match cmd {
        ConfigureCommand::Cluster(args) => {
            let mut entry = ClusterEntry::new(args.cluster, args.region);
            entry.compose_project_name_prefix = args.compose_project_name_prefix;
            entry.compose_service_name_prefix = args.compose_service_name_prefix;
            entry.cfn_stack_name_prefix = args.cfn_stack_name_prefix;
            store.save_cluster(&args.config_name, &entry)?;
            info!(config_name = %args.config_name, cluster = %entry.cluster, "saved cluster configuration");
        }
        ConfigureCommand::Profile(args) => {
            let entry = ProfileEntry::new(args.access_key, args.secret_key);
            store.save_profile(&args.profile_name, &entry)?;
            info!(profile_name = %args.profile_name, "saved profile");
        }
        ConfigureCommand::DefaultCluster(args) => store.set_default_cluster(&args.config_name)?,
        ConfigureCommand::DefaultProfile(args) => store.set_default_profile(&args.profile_name)?,
    }
    Ok(())
}

fn run_show(args: ShowArgs, settings: &ToolSettings) -> anyhow::Result<()> {
    let resolver = ConfigResolver::new(settings.destination()?);
    let resolved = resolver.resolve(args.cluster_config.as_deref(), args.ecs_profile.as_deref())?;
    print!("{}", serde_yaml::to_string(&resolved)?);
    Ok(())
}

fn run_params(args: ParamsArgs, settings: &ToolSettings) -> anyhow::Result<()> {
    let path = args.file.or_else(|| settings.params_file.clone());
    let Some(doc) = read_ecs_params(path.as_deref())? else {
        println!("No ECS params file found.");
        return Ok(());
    };

    print!("{}", serde_yaml::to_string(&doc)?);
    let network = doc
        .network_configuration()
        .context("ECS params network configuration")?;
    if let Some(network) = network {
        println!("---");
        print!("{}", serde_yaml::to_string(&network)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_configure_cluster() {
        let cli = Cli::try_parse_from([
            "ecsctl",
            "configure",
            "cluster",
            "--config-name",
            "dev",
            "--cluster",
            "dev-cluster",
            "--region",
            "us-west-2",
            "--cfn-stack-name-prefix",
            "dev-",
        ])
        .unwrap();
        match cli.command {
            Commands::Configure(ConfigureCommand::Cluster(args)) => {
                assert_eq!(args.config_name, "dev");
                assert_eq!(args.cfn_stack_name_prefix.as_deref(), Some("dev-"));
                assert_eq!(args.compose_project_name_prefix, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn configure_then_show_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = ToolSettings {
            config_dir: Some(tmp.path().join(".ecs")),
            ..ToolSettings::default()
        };

        for argv in [
            vec!["ecsctl", "configure", "profile", "--profile-name", "ops", "--access-key", "AKIA", "--secret-key", "s"],
            vec!["ecsctl", "configure", "cluster", "--config-name", "dev", "-c", "dev-cluster", "-r", "us-east-1"],
        ] {
            run_command(Cli::try_parse_from(argv).unwrap(), &settings).unwrap();
        }

        let resolved = ConfigResolver::new(settings.destination().unwrap())
            .resolve(None, None)
            .unwrap();
        assert_eq!(resolved.cluster, "dev-cluster");
        assert_eq!(resolved.access_key.as_deref(), Some("AKIA"));
    }
}
