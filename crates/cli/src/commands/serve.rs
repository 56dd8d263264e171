//! `examiner serve` — Start the HTTP API server.

use examiner_config::AppConfig;

pub async fn run(
    mut config: AppConfig,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("📜 History Examiner Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Knowledge: {}", config.knowledge.path.display());

    examiner_gateway::start(config).await?;

    Ok(())
}
