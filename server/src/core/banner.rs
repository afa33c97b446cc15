//! Startup banner for the HTTP transport

use super::config::is_all_interfaces;
use super::constants::{APP_NAME, MCP_HTTP_PATH};

/// Print the startup banner with URLs. Only used for streamable HTTP; stdout
/// belongs to the protocol under stdio.
pub fn print_banner(host: &str, port: u16, data_dir: &str) {
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    };
    const W: usize = 8;

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!(
        "  \x1b[35m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m http://{}:{}{}",
        "MCP:", display_host, port, MCP_HTTP_PATH
    );
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m http://{}:{}/health",
        "Health:", display_host, port
    );
    println!("  \x1b[90m➜  {:<W$} {}\x1b[0m", "Data:", data_dir);
    if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  \x1b[90m➜  {:<W$} use --host 0.0.0.0 to expose\x1b[0m",
            "Network:"
        );
    }
    println!();
}
