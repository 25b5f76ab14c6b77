use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use waypath_cli::commands::nodes::handle_nodes_command;
use waypath_cli::commands::route::{handle_route_command, RouteCommandArgs};
use waypath_cli::output::OutputFormat;
use waypath_lib::{load_graph, resolve_graph_path};

#[derive(Parser, Debug)]
#[command(author, version, about = "Shortest paths over small weighted graphs")]
struct Cli {
    /// Graph file (edge list or .json). Falls back to WAYPATH_GRAPH.
    #[arg(long, global = true)]
    graph: Option<PathBuf>,

    /// Output format: text, json, or dot.
    #[arg(long, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the shortest route between two nodes.
    Route(RouteCommandArgs),
    /// List the nodes and edges of the graph.
    Nodes,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let graph_path =
        resolve_graph_path(cli.graph.as_deref()).context("failed to locate the graph file")?;
    let graph = load_graph(&graph_path)
        .with_context(|| format!("failed to load graph from {}", graph_path.display()))?;

    let output = match &cli.command {
        Command::Route(args) => handle_route_command(&graph, args, cli.format)?,
        Command::Nodes => handle_nodes_command(&graph, cli.format)?,
    };
    print!("{output}");

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
