use anyhow::Result;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use std::path::{Path, PathBuf};

mod case;
mod server;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// LegalWatch Server - lawyer and user profiles, case monitoring
#[derive(Parser)]
#[command(name = "legalwatch-server")]
#[command(about = "LegalWatch Server - lawyer and user profiles, case monitoring")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Upload a case file, search related articles and analyze them
    Case(case::CaseArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir is normalized and created while loading
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("LegalWatch Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => server::run(config, args).await,
        Commands::Check => check_config(config),
        Commands::Case(case_args) => case::run(&config, case_args).await,
    }
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // Module sections are validated the same way modules read them at init
    let _: profiles::config::ProfilesConfig = config.module_config(profiles::module::MODULE_NAME)?;
    let _: case_monitor::CaseMonitorConfig = config.module_config(case::MODULE_NAME)?;
    if let Some(db) = &config.database {
        server::database_url(db, Path::new(&config.server.home_dir), false)?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
