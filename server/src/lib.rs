//! Gazetteer: an MCP server answering lookups over local SQLite datasets
//!
//! - `api` - MCP tool surface and HTTP transport
//! - `core` - CLI, configuration, shutdown
//! - `data` - query planning and read-only dataset stores
//! - `domain` - utility tools

pub mod api;
mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
