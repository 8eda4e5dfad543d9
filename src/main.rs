use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "apigate",
    about = "Validates API deployment declarations before they run locally",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the project directory
    #[arg(
        short,
        long,
        env = "APIGATE_PROJECT",
        default_value = ".",
        global = true
    )]
    project: PathBuf,

    /// Configuration file listing the apis, relative to the project directory
    #[arg(
        short,
        long,
        env = "APIGATE_CONFIG",
        default_value = "cortex.yaml",
        global = true
    )]
    config: PathBuf,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the api declarations for local deployment (default command)
    Validate,

    /// List the files that belong to the project
    Files,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    init_logging(cli.verbose);
    init_error_reporting()?;

    match cli.command {
        Some(Commands::Validate) | None => {
            commands::validate_command(&cli.project, &cli.config)?;
        }
        Some(Commands::Files) => {
            commands::files_command(&cli.project)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("apigate=warn"), // Default: warnings and errors only
        1 => EnvFilter::new("apigate=info"), // -v: info messages
        _ => EnvFilter::new("apigate=debug"), // -vv or more: full debug
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn init_error_reporting() -> Result<()> {
    // Keep long "<api>: <key>: <reason>" messages on one line
    miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().width(160).build())
    }))?;
    Ok(())
}
