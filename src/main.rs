//! Bartindr
//!
//! An MCP server for cocktail measure normalization.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use bartindr::build_info;
use bartindr::config::EngineConfig;
use bartindr::mcp::BartindrService;
use bartindr::tools::status::{StatusTracker, VocabularySummary};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr so it does not interfere with MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bartindr=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = EngineConfig::from_env()?;
    build_info::print_startup_banner(&config.vocabulary_source());

    // Vocabulary errors are fatal before anything is served
    let engine = config.build_engine()?;
    let summary = VocabularySummary::new(config.vocabulary_source(), engine.vocabulary());
    eprintln!(
        "Vocabulary: {} primary, {} secondary, {} part, {} non-metric units",
        summary.primary, summary.secondary, summary.part, summary.nonmetric
    );

    let service = BartindrService::new(engine, StatusTracker::new(summary, config.verbose));

    eprintln!("Starting MCP server on stdio...");
    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
