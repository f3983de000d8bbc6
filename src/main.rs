//! Nutrition Text Analyzer (NTA)
//!
//! An MCP server that turns meal descriptions into quantified nutrition.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nta::analyzer::Analyzer;
use nta::build_info;
use nta::config::NtaConfig;
use nta::mcp::NtaService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nta=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = NtaConfig::from_env()?;
    eprintln!("Entity source: {}", config.entity_source.as_str());
    eprintln!(
        "USDA lookups: {}",
        if config.usda_configured() { "configured" } else { "not configured (estimates only)" }
    );

    let analyzer = Analyzer::from_config(&config)?;

    // Create the NTA service
    let service = NtaService::new(config, analyzer);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
