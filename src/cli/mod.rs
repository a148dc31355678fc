pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::assigner::AssignmentError;

#[derive(Parser)]
#[command(name = "smartsociety-admin")]
#[command(about = "Smart Society operations CLI - identity platform role management")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Grant the admin role to the administrator account")]
    GrantAdmin {
        #[arg(long, help = "Email of the account to elevate (defaults to the configured admin email)")]
        email: Option<String>,

        #[arg(long, help = "Path to the service-account credential file")]
        credentials: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> Result<(), AssignmentError> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::GrantAdmin { email, credentials } => {
            commands::grant::handle(email, credentials, output_format).await
        }
    }
}
