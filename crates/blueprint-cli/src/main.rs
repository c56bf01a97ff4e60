//! blueprint CLI — inspect, validate and render document blueprints.
//!
//! Provides four commands over a blueprint catalog directory:
//! `list`, `show`, `validate` and `render`.
//!
//! Each command builds a [`blueprint_core::Engine`] from the configuration
//! file (or defaults) and delegates to it.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "blueprint",
    about = "Document blueprints — validate data against a schema and render templates",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to blueprint.config.json (defaults are used when it does not exist)
    #[arg(long, global = true, default_value = "blueprint.config.json")]
    config: PathBuf,

    /// Override the catalog directory from the config
    #[arg(long, global = true, env = "BLUEPRINT_ROOT")]
    root: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List the blueprints in the catalog
    List,

    /// Show a blueprint's metadata and variable schema
    Show {
        /// Blueprint type
        template_type: String,
    },

    /// Validate a data file against a blueprint
    Validate {
        /// Blueprint type
        template_type: String,

        /// Path to the JSON data file
        #[arg(long, short)]
        data: PathBuf,
    },

    /// Render a blueprint with a data file
    Render {
        /// Blueprint type
        template_type: String,

        /// Path to the JSON data file
        #[arg(long, short)]
        data: PathBuf,

        /// Write the document here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let engine = commands::build_engine(&cli.config, cli.root.as_deref())?;

    match cli.command {
        Commands::List => {
            commands::list::run(&engine).await?;
        }
        Commands::Show { template_type } => {
            commands::show::run(&engine, &template_type).await?;
        }
        Commands::Validate {
            template_type,
            data,
        } => {
            commands::validate::run(&engine, &template_type, &data).await?;
        }
        Commands::Render {
            template_type,
            data,
            output,
        } => {
            commands::render::run(&engine, &template_type, &data, output.as_deref()).await?;
        }
    }

    Ok(())
}
