//! Clazz command-line tool
//!
//! Checks, describes and instantiates classes declared in JSON manifests.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clazz_cli::commands::{check, describe, info, new};
use clazz_cli::output::{resolve_color_choice, StyledOutput};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clazz")]
#[command(about = "Runtime class composition toolkit", long_about = None)]
#[command(version)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// When to use colors
    #[arg(long, global = true, value_parser = ["auto", "always", "never"])]
    color: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register and synthesize every class of a manifest
    Check {
        /// Manifest file
        manifest: PathBuf,
    },

    /// Show the reflection summary of a class
    Describe {
        /// Manifest file
        manifest: PathBuf,
        /// Class name
        class: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create an instance of a class
    New {
        /// Manifest file
        manifest: PathBuf,
        /// Class name
        class: String,
        /// Constructor arguments as a JSON array
        #[arg(long)]
        args: Option<String>,
        /// Method to call on the new instance
        #[arg(long)]
        call: Option<String>,
    },

    /// Show version, kinds and environment
    Info,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CLAZZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut out = StyledOutput::new(resolve_color_choice(cli.color.as_deref()));
    let config = clazz_cli::load_config(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Check { manifest } => match check::execute(&manifest, config, &mut out) {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(1),
            Err(e) => Err(e),
        },
        Commands::Describe {
            manifest,
            class,
            json,
        } => describe::execute(&manifest, config, &class, json, &mut out),
        Commands::New {
            manifest,
            class,
            args,
            call,
        } => new::execute(
            &manifest,
            config,
            &class,
            args.as_deref(),
            call.as_deref(),
            &mut out,
        ),
        Commands::Info => info::execute(&config, &mut out),
    };

    if let Err(e) = result {
        out.stderr_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
    Ok(())
}
