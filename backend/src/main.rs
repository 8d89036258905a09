//! # Vault Directory CLI
//!
//! Entry point of the `vault-directory` binary. Each invocation builds the
//! directory services against the configured custody API, runs one query
//! and prints the result as JSON on stdout.
//!
//! ## Quick Start
//!
//! 1. Copy `.env.example` to `.env` and set `CUSTODY_API_KEY`
//! 2. `vault-directory resolve 0x5B38Da6a701c568545dCfcB03FcB875f56beddC4`
//! 3. `vault-directory balance <deposit-address> <token-contract>`
//!
//! Logs go to stderr, so stdout can be piped straight into `jq`.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use custody_vault_directory::config::AppConfig;
use custody_vault_directory::custody::CustodyHttpClient;
use custody_vault_directory::logging::init_logging;
use custody_vault_directory::models::{BalanceResponse, IndexResponse, ResolveResponse};
use custody_vault_directory::AppState;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // The subscriber may not be installed yet.
    if let Err(e) = run().await {
        eprintln!("{}", failure_message(&e));
        std::process::exit(1);
    }
}

/// One-line report of a failed run, including every context layer.
fn failure_message(err: &anyhow::Error) -> String {
    format!("error: {:#}", err)
}

async fn run() -> anyhow::Result<()> {
    // =========================================
    // STEP 1: Load Configuration
    // =========================================
    dotenvy::dotenv().ok(); // It's okay if .env doesn't exist

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    // =========================================
    // STEP 2: Initialize Logging
    // =========================================
    init_logging(&cli.log_level, config.log_format);

    info!("Custody API: {}", config.custody_api_base_url);
    info!(
        "Cache: ttl {:?}, policy {}",
        config.vault_cache_ttl, config.vault_cache_refresh_policy
    );

    // =========================================
    // STEP 3: Initialize Services
    // =========================================
    let api = CustodyHttpClient::new(&config).context("Failed to create custody client")?;
    let state = AppState::new(Arc::new(api), &config);

    // =========================================
    // STEP 4: Run Command
    // =========================================
    let output = match cli.command {
        Commands::Resolve { address } => {
            let vault_id = state
                .directory
                .resolve_vault_for_address(&address)
                .await
                .with_context(|| format!("Failed to resolve {}", address))?;
            serde_json::to_string_pretty(&ResolveResponse { address, vault_id })?
        }
        Commands::Balance {
            deposit_address,
            token_address,
        } => {
            let available = state
                .balances
                .balance(&deposit_address, &token_address)
                .await
                .with_context(|| format!("Failed to fetch balance of {}", token_address))?;
            serde_json::to_string_pretty(&BalanceResponse {
                deposit_address,
                token_address,
                available,
            })?
        }
        Commands::Index => {
            let index = state
                .directory
                .address_index()
                .await
                .context("Failed to build address index")?;
            serde_json::to_string_pretty(&IndexResponse::new(index.as_ref().clone()))?
        }
    };

    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_vault_directory::config::ConfigError;

    #[test]
    fn test_failure_message_keeps_context_chain() {
        let err = anyhow::Error::new(ConfigError::MissingEnvVar("CUSTODY_API_KEY".to_string()))
            .context("Failed to load configuration");

        assert_eq!(
            failure_message(&err),
            "error: Failed to load configuration: Missing environment variable: CUSTODY_API_KEY"
        );
    }
}
