//! Core application

use std::sync::Arc;

use anyhow::Result;

use crate::api::{ApiServer, mcp};
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::{AppConfig, Transport};
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::{Dataset, DatasetService};
use crate::utils::file::file_size;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub datasets: Arc<DatasetService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Datasets) => return Self::list_datasets(&cli_config),
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config)?;
        Self::start_server(app).await
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        Ok(Self::from_config(config))
    }

    /// Build the app around already-loaded configuration
    pub fn from_config(config: AppConfig) -> Self {
        let datasets = Arc::new(DatasetService::init(
            &config.data.dir,
            config.data.max_connections,
        ));

        for &dataset in Dataset::all() {
            let path = datasets.store(dataset).path();
            if !path.is_file() {
                tracing::warn!(
                    dataset = %dataset,
                    path = %path.display(),
                    "Dataset file not found; lookups against it will fail"
                );
            }
        }

        let shutdown = ShutdownService::new(datasets.clone());
        Self {
            shutdown,
            config,
            datasets,
        }
    }

    fn list_datasets(cli: &CliConfig) -> Result<()> {
        let config = AppConfig::load(cli)?;
        println!("Data directory: {}", config.data.dir.display());
        for &dataset in Dataset::all() {
            let path = config.data.dir.join(dataset.file_name());
            let status = match file_size(&path) {
                Some(bytes) => format!("\x1b[32mok\x1b[0m ({} bytes)", bytes),
                None => "\x1b[31mmissing\x1b[0m".to_string(),
            };
            println!("  {:<10} {:<40} {}", dataset.as_str(), path.display(), status);
        }
        Ok(())
    }

    /// Logs go to stderr; under stdio, stdout carries protocol frames
    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(false)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        tracing::info!(
            transport = %app.config.server.transport,
            data_dir = %app.config.data.dir.display(),
            "Starting MCP server"
        );

        let app = match app.config.server.transport {
            Transport::Stdio => {
                let ct = mcp::cancellation_token_from_shutdown(&app.shutdown);
                mcp::serve_stdio(app.datasets.clone(), ct).await?;
                app
            }
            Transport::StreamableHttp => {
                banner::print_banner(
                    &app.config.server.host,
                    app.config.server.port,
                    &app.config.data.dir.display().to_string(),
                );
                ApiServer::new(app).start().await?
            }
        };

        app.shutdown.shutdown().await;
        Ok(())
    }
}
