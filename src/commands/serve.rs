use anyhow::{Context, Result};

use roundplan::config::Config;
use roundplan::server::PlannerServer;

/// Start the planner HTTP server
pub async fn serve(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = config.clone();
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let server = PlannerServer::new(config).context("Failed to create planner server")?;
    let info = server.info();

    println!("{}", info.display());
    println!();
    println!("API Endpoints:");
    println!("  GET  /planer/health        - Health check");
    println!("  POST /planer/generate      - Generate a plan");
    println!("  POST /planer/pairs         - Generate rounds of pairs");
    println!("  GET  /planer/statistics    - Ledger statistics");
    println!("  GET  /planer/pairings      - Groups sorted by frequency");
    println!("  GET  /planer/player-usage  - Rounds per player");
    println!("  GET  /planer/download      - Last plan as CSV");
    println!();
    println!("Planner server listening on http://{}", info.bind_address);
    println!("Press Ctrl+C to stop.\n");

    server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("Failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await?;

    println!("Planner server stopped.");
    Ok(())
}
