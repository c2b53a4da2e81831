use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser, Debug)]
#[clap(
    name = "pgtrigger",
    about = "HTTP trigger for PostgreSQL backup and restore",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the /status, /backup and /restore triggers in the foreground
    Run,

    /// Check that the PostgreSQL client tools are installed
    Check,

    /// Back up the database named by the configured defaults
    Backup,

    /// Restore a dump into the database named by the configured defaults
    Restore {
        /// Dump file, relative to the backups root
        #[clap(short, long)]
        file: String,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_level(true)
        .format_module_path(false)
        .format_indent(Some(4))
        .filter_level(log::LevelFilter::Info)
        .try_init()?;

    let cli = Cli::parse();

    let config = common::config::load_config().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    match cli.command {
        Commands::Run => daemon::cli::run::execute(config).await?,
        Commands::Check => daemon::cli::check::execute(&config).await?,
        Commands::Backup => daemon::cli::backup::execute(&config).await?,
        Commands::Restore { file } => daemon::cli::restore::execute(&config, &file).await?,
        Commands::Config => daemon::cli::config::execute(&config)?,
    }

    Ok(())
}
