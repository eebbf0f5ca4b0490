// ABOUTME: Entry point for the armada CLI application.
// ABOUTME: Builds the cluster from config and dispatches image commands.

mod cli;

use armada::cluster::{Cluster, Membership, Node};
use armada::config::{self, Config};
use armada::error::{Error, Result};
use armada::node::{BollardNode, PullOptions, PushOptions, RegistryAuth};
use armada::output::{Output, OutputMode};
use armada::placement::{DisabledPlacement, MemoryPlacement, PlacementStore};
use armada::types::ImageName;
use clap::Parser;
use cli::{AuthArgs, Cli, Commands};
use std::env;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    if let Commands::Init {
        nodes,
        no_tracking,
        force,
    } = &cli.command
    {
        let cwd = env::current_dir()?;
        config::init_config(&cwd, nodes, !no_tracking, *force)?;
        output.success(&format!("Wrote {}", config::CONFIG_FILENAME));
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&env::current_dir()?)?,
    };
    let cluster = build_cluster(&config)?;

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Nodes => {
            for node in config.nodes.iter() {
                output.info(&format!("{}\t{}", node.id, node.address));
            }
            Ok(())
        }
        Commands::Rmi { image } => {
            let name = ImageName::new(&image)?;
            cluster.remove_image(&name).await?;
            output.success(&format!("Removed {}", name));
            Ok(())
        }
        Commands::Pull {
            repository,
            tag,
            registry,
            auth,
        } => {
            let opts = PullOptions {
                repository,
                tag,
                registry,
                auth: registry_auth(auth),
            };
            cluster.pull_image(&opts, &output.progress_sink()).await?;
            output.success(&format!("Pulled {}", opts.from_image()));
            Ok(())
        }
        Commands::Push {
            image,
            tag,
            registry,
            auth,
        } => {
            let opts = PushOptions {
                name: ImageName::new(&image)?,
                tag,
                registry,
            };
            let auth = registry_auth(auth).unwrap_or_default();
            cluster
                .push_image(&opts, &auth, &output.progress_sink())
                .await?;
            output.success(&format!("Pushed {}", opts.reference()));
            Ok(())
        }
    }
}

/// Connect a node handle for every configured node.
///
/// Placement starts empty on each run, so with tracking on every operation
/// still broadcasts until something records a placement.
fn build_cluster(config: &Config) -> Result<Cluster> {
    let membership = Membership::new();
    for node in config.nodes.iter() {
        let handle = BollardNode::connect(node, config.timeout).map_err(Error::NodeConnection)?;
        membership.register(Node::new(node.id.clone(), handle));
    }

    let placement: Arc<dyn PlacementStore> = if config.placement.tracking {
        Arc::new(MemoryPlacement::new())
    } else {
        Arc::new(DisabledPlacement)
    };

    Ok(Cluster::new(Arc::new(membership), placement))
}

fn registry_auth(args: AuthArgs) -> Option<RegistryAuth> {
    let (username, password) = args.username.zip(args.password)?;
    Some(RegistryAuth {
        username,
        password,
        email: args.email,
        server: args.server,
    })
}
