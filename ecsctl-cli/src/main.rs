//! ## ecsctl
//! Operator entrypoint for managing cluster/profile configuration and
//! checking ECS params files.

use clap::Parser;
use ecsctl_config::ToolSettings;

mod commands;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => ToolSettings::load_from_path(path)?,
        None => ToolSettings::load()?,
    };
    ecsctl_telemetry::init(&settings.log);

    commands::run_command(cli, &settings)
}
