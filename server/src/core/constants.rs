// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Gazetteer";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "gazetteer";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".gazetteer";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "gazetteer.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "GAZETTEER_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for MCP transport (stdio or streamable-http)
pub const ENV_TRANSPORT: &str = "GAZETTEER_TRANSPORT";

/// Environment variable for server host
pub const ENV_HOST: &str = "GAZETTEER_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "GAZETTEER_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "GAZETTEER_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

/// Path the streamable HTTP MCP service is mounted under
pub const MCP_HTTP_PATH: &str = "/mcp";

/// Shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Environment Variables - Datasets
// =============================================================================

/// Environment variable for the dataset directory
pub const ENV_DATA_DIR: &str = "GAZETTEER_DATA_DIR";

/// Default dataset directory (relative to the working directory)
pub const DEFAULT_DATA_DIR: &str = "./db";

// =============================================================================
// SQLite Datasets
// =============================================================================

/// Countries, cities and states
pub const WORLD_DB_FILENAME: &str = "world.db";

/// Chat participants
pub const COMMUNITY_DB_FILENAME: &str = "community.db";

/// Max pooled connections per dataset
pub const SQLITE_MAX_CONNECTIONS: u32 = 4;

/// Seconds to wait for a pooled connection
pub const SQLITE_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;

/// Idle pooled connections are closed after this many seconds
pub const SQLITE_IDLE_TIMEOUT_SECS: u64 = 60;
