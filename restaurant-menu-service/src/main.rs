use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use restaurant_menu_service::api;
use restaurant_menu_service::config::AppConfig;
use restaurant_menu_service::service::MenuService;
use restaurant_menu_service::tools::menu_tools;

/// MCP server for restaurant menu lookups
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    init_logging();

    let cli = Cli::parse();

    info!(
        "Starting restaurant menu service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut config = AppConfig::load()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    config.upstream.log_status();

    let service = Arc::new(MenuService::new(config.upstream.clone())?);
    let registry = Arc::new(menu_tools());

    let tool_names: Vec<String> = registry
        .mcp_definitions()
        .into_iter()
        .map(|d| d.name)
        .collect();
    info!(tools = %tool_names.join(", "), "Registered MCP tools");

    let app = api::router(service, registry);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    info!("MCP SSE endpoint at http://{}/sse", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("restaurant_menu_service=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format))
        .with(filter)
        .init();
}
