//! API server and MCP transports

pub mod mcp;
pub mod middleware;
pub mod routes;
mod server;

pub use server::ApiServer;
