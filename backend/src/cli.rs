//! # CLI Interface
//!
//! Command-line structure of `vault-directory`, using `clap` derive.

use clap::{Parser, Subcommand};

/// Query the custody vault directory.
///
/// Connection settings come from the environment (or `.env`); see the
/// configuration module for the full list.
#[derive(Parser, Debug)]
#[command(name = "vault-directory", version, propagate_version = true)]
pub struct Cli {
    /// Default log filter when `RUST_LOG` is not set.
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the vault owning a deposit address.
    Resolve {
        /// Deposit address, any case.
        address: String,
    },
    /// Spendable balance of a token held by one of the vaults.
    Balance {
        /// Deposit address the query is made for.
        deposit_address: String,
        /// Token contract address.
        token_address: String,
    },
    /// Print the full address index.
    Index,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_balance() {
        let cli = Cli::try_parse_from(["vault-directory", "balance", "0xAAA", "0xTOKEN"]).unwrap();
        match cli.command {
            Commands::Balance {
                deposit_address,
                token_address,
            } => {
                assert_eq!(deposit_address, "0xAAA");
                assert_eq!(token_address, "0xTOKEN");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_requires_address() {
        assert!(Cli::try_parse_from(["vault-directory", "resolve"]).is_err());
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
