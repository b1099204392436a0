use clap::Parser;

/// Command-line and environment configuration for the server.
#[derive(Debug, Clone, Parser)]
#[command(name = "chartjs-mcp", version)]
#[command(about = "Chart.js configuration tools over the Model Context Protocol (stdio)", long_about = None)]
pub struct ServerConfig {
    /// Log filter directive, e.g. `chartjs_mcp=debug`
    #[arg(long, env = "CHARTJS_MCP_LOG", default_value = "chartjs_mcp=info")]
    pub log_filter: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "CHARTJS_MCP_LOG_JSON")]
    pub log_json: bool,

    /// Server name reported to clients on initialize
    #[arg(long, env = "CHARTJS_MCP_NAME", default_value = "ChartJS")]
    pub server_name: String,
}
