//! configsync Command-Line Client
//!
//! Inspects configuration files and applies changes through a single-node
//! sync manager.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// configsync Command-Line Client
#[derive(Parser, Debug)]
#[command(name = "configsync")]
#[command(version, about = "Cluster configuration sync tool")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Re-encode a config file (.yaml or .json)
    Convert {
        input: PathBuf,
        output: PathBuf,
    },

    /// List the projects in a config file
    Projects { config: PathBuf },

    /// Print one project as JSON
    Get { config: PathBuf, project_id: String },

    /// Create or replace a project from a JSON file
    SetProject {
        config: PathBuf,
        project: PathBuf,

        /// Bearer token passed along if the change is forwarded
        #[arg(long, default_value = "")]
        token: String,

        /// Limit the number of projects a community cluster may hold
        #[arg(long)]
        max_projects: Option<usize>,
    },

    /// Delete a project
    Delete {
        config: PathBuf,
        project_id: String,

        /// Bearer token passed along if the change is forwarded
        #[arg(long, default_value = "")]
        token: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "configsync=info".into()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Command::Convert { input, output } => commands::convert(&input, &output),
        Command::Projects { config } => {
            for (id, name) in commands::list_projects(&config)? {
                println!("{}\t{}", id, name);
            }
            Ok(())
        }
        Command::Get { config, project_id } => {
            let project = commands::get_project(&config, &project_id).await?;
            println!("{}", serde_json::to_string_pretty(&project)?);
            Ok(())
        }
        Command::SetProject {
            config,
            project,
            token,
            max_projects,
        } => commands::set_project(&config, &project, &token, max_projects).await,
        Command::Delete {
            config,
            project_id,
            token,
        } => commands::delete_project(&config, &project_id, &token).await,
    }
}
