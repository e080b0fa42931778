//! `agentdeck doctor` — Diagnose configuration and connectivity.

use agentdeck_config::AppConfig;
use agentdeck_engine::ReasoningEngineClient;
use agentdeck_engine::auth::provider_from_config;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Agentdeck Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    // Check config
    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid — project {} in {}", config.project, config.location);
            Some(config)
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("     Set GCP_PROJECT_ID and GCP_LOCATION (env or ~/.agentdeck/config.toml)");
            issues += 1;
            None
        }
    };

    if let Some(config) = config {
        // Check credentials
        let tokens = provider_from_config(&config.auth);
        match tokens.bearer_token().await {
            Ok(_) => println!("  ✅ Bearer token available (via {})", tokens.name()),
            Err(e) => {
                println!("  ❌ No bearer token: {e}");
                issues += 1;
            }
        }

        // Check the management plane
        let client = ReasoningEngineClient::new(&config.location, tokens);
        match client.list_agents(&config.project, &config.location).await {
            Ok(agents) => {
                println!("  ✅ Reached the reasoning-engine API — {} agent(s) deployed", agents.len());
                if agents.is_empty() {
                    println!("  ⚠️  No agents to chat with — deploy one first");
                }
            }
            Err(e) => {
                println!("  ❌ Could not list agents: {e}");
                issues += 1;
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
