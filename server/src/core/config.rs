use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_DATA_DIR, DEFAULT_HOST, DEFAULT_PORT,
    SQLITE_MAX_CONNECTIONS,
};

// =============================================================================
// Transport Enum
// =============================================================================

/// How MCP clients reach the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transport {
    /// JSON-RPC over stdin/stdout (one client, launched by the client)
    #[default]
    Stdio,
    /// Streamable HTTP under `/mcp`
    StreamableHttp,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Stdio => "stdio",
            Transport::StreamableHttp => "streamable-http",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// File Config
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub transport: Option<Transport>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Dataset configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DataFileConfig {
    pub dir: Option<String>,
    pub max_connections: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub data: Option<DataFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.transport.is_some() {
                tracing::trace!(transport = ?server.transport, "Merging server.transport");
                current.transport = server.transport;
            }
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(data) = other.data {
            let current = self.data.get_or_insert_with(DataFileConfig::default);
            if data.dir.is_some() {
                tracing::trace!(dir = ?data.dir, "Merging data.dir");
                current.dir = data.dir;
            }
            if data.max_connections.is_some() {
                tracing::trace!(
                    max_connections = ?data.max_connections,
                    "Merging data.max_connections"
                );
                current.max_connections = data.max_connections;
            }
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub transport: Transport,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Directory holding the dataset files (absolute after load)
    pub dir: PathBuf,
    /// Max pooled connections per dataset
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.gazetteer/gazetteer.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let profile = get_profile_config_path().filter(|p| p.exists());
        let local = PathBuf::from(CONFIG_FILE_NAME);
        Self::load_from(cli, profile.as_deref(), local.exists().then_some(local.as_path()))
    }

    fn load_from(cli: &CliConfig, profile: Option<&Path>, local: Option<&Path>) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Profile config, skipped when absent
        if let Some(profile_path) = profile {
            let profile_config = FileConfig::load_from_file(profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            local.map(Path::to_path_buf)
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let file_server = file_config.server.unwrap_or_default();
        let file_data = file_config.data.unwrap_or_default();

        // 3. Layer configs: defaults -> file config -> CLI/env overrides
        let transport = cli
            .transport
            .or(file_server.transport)
            .unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let data_dir = cli
            .data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .or(file_data.dir)
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

        let config = Self {
            server: ServerConfig {
                transport,
                host,
                port,
            },
            data: DataConfig {
                dir: if data_dir.trim().is_empty() {
                    PathBuf::new()
                } else {
                    expand_path(&data_dir)
                },
                max_connections: file_data.max_connections.unwrap_or(SQLITE_MAX_CONNECTIONS),
            },
        };

        config.validate()?;

        tracing::debug!(
            transport = %config.server.transport,
            host = %config.server.host,
            port = config.server.port,
            data_dir = %config.data.dir.display(),
            "Configuration loaded"
        );

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.data.dir.as_os_str().is_empty() {
            anyhow::bail!("Configuration error: data.dir must not be empty");
        }
        if self.data.max_connections == 0 {
            anyhow::bail!("Configuration error: data.max_connections must be greater than 0");
        }

        // Host and port only matter when listening
        if self.server.transport == Transport::StreamableHttp {
            if self.server.host.is_empty() {
                anyhow::bail!("Configuration error: server.host must not be empty");
            }
            if self.server.port == 0 {
                anyhow::bail!("Configuration error: server.port must be greater than 0");
            }
        }

        Ok(())
    }
}

/// Get the profile config path (~/.gazetteer/gazetteer.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
