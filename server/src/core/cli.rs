use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::Transport;
use super::constants::{ENV_CONFIG, ENV_DATA_DIR, ENV_HOST, ENV_PORT, ENV_TRANSPORT};

#[derive(Parser)]
#[command(name = "gazetteer")]
#[command(
    version,
    about = "MCP server for country, city, state and community lookups",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// MCP transport (stdio or streamable-http)
    #[arg(long, short = 't', global = true, env = ENV_TRANSPORT, value_parser = parse_transport)]
    pub transport: Option<Transport>,

    /// Server host address (streamable-http only)
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port (streamable-http only)
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Directory holding world.db and community.db
    #[arg(long, short = 'd', global = true, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,
}

/// Parse transport from CLI/env string
fn parse_transport(s: &str) -> Result<Transport, String> {
    match s.to_lowercase().as_str() {
        "stdio" => Ok(Transport::Stdio),
        "streamable-http" | "http" => Ok(Transport::StreamableHttp),
        _ => Err(format!(
            "Invalid transport '{}'. Valid options: stdio, streamable-http",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the MCP server (default command)
    Start,
    /// List dataset files and whether they are present
    Datasets,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub transport: Option<Transport>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            transport: cli.transport,
            host: cli.host,
            port: cli.port,
            data_dir: cli.data_dir,
            config: cli.config,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
}
