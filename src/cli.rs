// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "armada")]
#[command(about = "Remove, pull and push images across a cluster of Docker nodes")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the cluster configuration (default: discovered in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new armada.yml configuration file
    Init {
        /// Node to list, as "address" or "id=address" (repeatable)
        #[arg(long = "node")]
        nodes: Vec<String>,

        /// Disable placement tracking (always broadcast)
        #[arg(long)]
        no_tracking: bool,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// List cluster nodes
    Nodes,

    /// Remove an image from the cluster
    Rmi {
        /// Image name
        image: String,
    },

    /// Pull an image onto the cluster
    Pull {
        /// Repository to pull
        repository: String,

        /// Tag to pull
        #[arg(short, long)]
        tag: Option<String>,

        /// Registry host
        #[arg(long)]
        registry: Option<String>,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Push an image from the cluster to a registry
    Push {
        /// Image name
        image: String,

        /// Tag to push
        #[arg(short, long)]
        tag: Option<String>,

        /// Registry host
        #[arg(long)]
        registry: Option<String>,

        #[command(flatten)]
        auth: AuthArgs,
    },
}

#[derive(Args)]
pub struct AuthArgs {
    /// Registry username
    #[arg(short, long, requires = "password")]
    pub username: Option<String>,

    /// Registry password or token
    #[arg(short, long, requires = "username")]
    pub password: Option<String>,

    /// Registry email
    #[arg(long)]
    pub email: Option<String>,

    /// Registry server address for the credentials
    #[arg(long)]
    pub server: Option<String>,
}
