//! shopgraph: command-line interface for the shop graph Gremlin demo
//!
//! Connects to a local Gremlin Server or a managed cluster, as configured
//! by the environment (or a `.env` file).

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use shopgraph::render::{self, OutputFormat};
use shopgraph::{ConnectionConfig, GraphModel, QueryStyle, RunOptions, Target, Transport};
use shopgraph_gremlin::{GremlinClient, Script};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shopgraph", version, about = "Shop graph demo for Gremlin servers")]
struct Cli {
    /// Use the managed cluster (NEPTUNE_ENDPOINT) instead of the local server
    #[arg(long, global = true, env = "GREMLIN_REMOTE")]
    remote: bool,

    /// Wire transport
    #[arg(long, value_enum, default_value = "ws", global = true, env = "GREMLIN_TRANSPORT")]
    transport: TransportArg,

    /// Query builder: typed traversals or raw Gremlin-Groovy scripts
    #[arg(long, value_enum, default_value = "traversal", global = true)]
    style: StyleArg,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: FormatArg,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TransportArg {
    Http,
    Ws,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Traversal,
    Script,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Table,
    Json,
}

impl From<TransportArg> for Transport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Http => Transport::Http,
            TransportArg::Ws => Transport::WebSocket,
        }
    }
}

impl From<StyleArg> for QueryStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Traversal => QueryStyle::Traversal,
            StyleArg::Script => QueryStyle::Script,
        }
    }
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the sample data and run every demo query (default)
    Demo,
    /// Start an interactive shell
    Interactive,
    /// Wipe the graph and load the sample data
    Seed,
    /// Test connectivity and report vertex and edge counts
    Check,
    /// Execute a raw Gremlin script
    Query {
        /// The Gremlin-Groovy script
        gremlin: String,

        /// Script binding as name=value; value is parsed as JSON, else taken as a string
        #[arg(long = "bind", value_name = "NAME=VALUE")]
        bindings: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let options = RunOptions {
        target: if cli.remote { Target::Remote } else { Target::Local },
        transport: cli.transport.into(),
        style: cli.style.into(),
        format: cli.format.into(),
    };
    debug!(
        version = shopgraph::version(),
        mode = %options.target,
        transport = %options.transport,
        "shopgraph starting"
    );

    let result = match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => run_demo(&options).await,
        Commands::Interactive => run_interactive(&options).await,
        Commands::Seed => run_seed(&options).await,
        Commands::Check => run_check(&options).await,
        Commands::Query { gremlin, bindings } => run_query(&options, &gremlin, &bindings).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_demo(options: &RunOptions) -> anyhow::Result<()> {
    let config = ConnectionConfig::from_env()?;
    shopgraph::run_demo(&config, options).await
}

async fn run_interactive(options: &RunOptions) -> anyhow::Result<()> {
    let config = ConnectionConfig::from_env()?;
    let connection = config.connect(options.target, options.transport).await?;
    info!(endpoint = connection.client().endpoint(), "Starting interactive shell");
    shopgraph::run_shell(std::io::BufReader::new(std::io::stdin()), &connection, options).await
}

async fn run_seed(options: &RunOptions) -> anyhow::Result<()> {
    let config = ConnectionConfig::from_env()?;
    let connection = config.connect(options.target, options.transport).await?;

    let result = async {
        let report = shopgraph::populate(connection.client()).await?;
        let (vertices, edges) = GraphModel::new(connection.client()).graph_counts().await?;
        match options.format {
            OutputFormat::Json => println!(
                "{}",
                render::to_json(&serde_json::json!({
                    "inserted": { "vertices": report.vertices(), "edges": report.edges() },
                    "graph": { "vertices": vertices, "edges": edges },
                }))
            ),
            OutputFormat::Table => {
                println!("Inserted: {} vertices, {} edges", report.vertices(), report.edges());
                println!("Graph now holds: {} vertices, {} edges", vertices, edges);
            }
        }
        anyhow::Ok(())
    }
    .await;

    connection.close().await?;
    result
}

async fn run_check(options: &RunOptions) -> anyhow::Result<()> {
    let config = ConnectionConfig::from_env()?;
    println!("Testing connection ({}, {})...", options.target, options.transport);
    let connection = config.connect(options.target, options.transport).await?;

    let counts = GraphModel::new(connection.client()).graph_counts().await;
    connection.close().await?;
    let (vertices, edges) = counts?;

    println!("Connected successfully! Vertex count: {}, edge count: {}", vertices, edges);
    Ok(())
}

fn parse_binding(raw: &str) -> anyhow::Result<(String, Value)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("binding must be NAME=VALUE: {}", raw))?;
    let value = serde_json::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.trim().to_string(), value))
}

async fn run_query(options: &RunOptions, gremlin: &str, bindings: &[String]) -> anyhow::Result<()> {
    let mut script = Script::new(gremlin);
    for raw in bindings {
        let (name, value) = parse_binding(raw)?;
        script = script.bind(name, value);
    }

    let config = ConnectionConfig::from_env()?;
    let connection = config.connect(options.target, options.transport).await?;
    info!(bindings = script.bindings.len(), "Submitting raw query");
    let rows = connection.client().rows(&script).await;
    connection.close().await?;

    println!("{}", render::format_rows(&rows?, options.format));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binding() {
        assert_eq!(parse_binding("uid=user1").unwrap(), ("uid".to_string(), Value::from("user1")));
        assert_eq!(parse_binding("n=3").unwrap(), ("n".to_string(), Value::from(3)));
        assert_eq!(parse_binding("s=\"7\"").unwrap(), ("s".to_string(), Value::from("7")));
        assert!(parse_binding("novalue").is_err());
    }

    #[test]
    fn test_default_command_is_demo() {
        let cli = Cli::try_parse_from(["shopgraph"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.remote);
        assert!(matches!(cli.transport, TransportArg::Ws));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["shopgraph", "check", "--transport", "http", "--remote"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check)));
        assert!(cli.remote);
        assert!(matches!(cli.transport, TransportArg::Http));
    }
}
