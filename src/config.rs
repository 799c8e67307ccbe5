//! Configuration for the pool report
//!
//! Contract addresses are fixed in `tokens.rs`. Only the endpoints, the
//! expected chain and the reporting address come from the environment.

use alloy_primitives::Address;
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Env var naming an optional TOML config file
pub const CONFIG_PATH_VAR: &str = "POOL_REPORT_CONFIG";

const DEFAULT_RPC_URL: &str = "https://eth.llamarpc.com";
const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // ========== Network Settings ==========
    /// RPC URL (Alchemy/Infura recommended)
    pub rpc_url: String,

    /// Chain ID the fixed contract addresses live on (1 = Ethereum Mainnet)
    pub chain_id: u64,

    // ========== Position ==========
    /// Address whose staked position is reported.
    /// Falls back to the node's first unlocked account when unset.
    pub your_address: Option<String>,

    // ========== Price Feed ==========
    /// CoinGecko-compatible API base URL
    pub price_api_url: String,

    /// Timeout for price API calls
    pub price_api_timeout_secs: u64,
}

impl Config {
    /// Load from the TOML file named by `POOL_REPORT_CONFIG`, else from env
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        match env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.is_empty() => Self::from_file(path),
            _ => Self::from_env(),
        }
    }

    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            rpc_url: env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            your_address: env::var("YOUR_ADDRESS").ok().filter(|s| !s.is_empty()),
            price_api_url: env::var("PRICE_API_URL")
                .unwrap_or_else(|_| DEFAULT_PRICE_API_URL.to_string()),
            price_api_timeout_secs: env::var("PRICE_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validate before connecting
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() || self.rpc_url.contains("YOUR_API_KEY") {
            return Err(eyre::eyre!("Invalid RPC_URL - please set a valid Alchemy/Infura URL"));
        }

        if self.price_api_url.is_empty() {
            return Err(eyre::eyre!("PRICE_API_URL must not be empty"));
        }

        if self.price_api_timeout_secs == 0 {
            return Err(eyre::eyre!("PRICE_API_TIMEOUT_SECS must be at least 1"));
        }

        self.caller_address()?;

        Ok(())
    }

    /// Parsed reporting address, if configured
    pub fn caller_address(&self) -> Result<Option<Address>> {
        self.your_address
            .as_deref()
            .map(|s| {
                Address::from_str(s)
                    .map_err(|e| eyre::eyre!("Invalid YOUR_ADDRESS '{}': {}", s, e))
            })
            .transpose()
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              POOL REPORT - CONFIGURATION                   ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Chain ID:          {:^40} ║", self.chain_id);
        println!("║ RPC:               {:^40} ║", truncate(&self.rpc_url, 40));
        println!("║ Price API:         {:^40} ║", truncate(&self.price_api_url, 40));
        println!("║ Your Address:      {:^40} ║",
            if self.your_address.is_some() { "✓ Configured" } else { "Node account" }
        );
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: 1,
            your_address: None,
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            price_api_timeout_secs: 10,
        }
    }
}

/// Keep long URLs (which may embed API keys) out of the summary box
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chain_id, 1);
        assert!(config.your_address.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_placeholder_rpc_rejected() {
        let config = Config {
            rpc_url: "https://eth-mainnet.g.alchemy.com/v2/YOUR_API_KEY".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_caller_address() {
        let mut config = Config::default();
        assert_eq!(config.caller_address().unwrap(), None);

        config.your_address = Some("0x881c72D1e6317f10a1cDCBe05040E7564E790C80".to_string());
        assert!(config.caller_address().unwrap().is_some());

        config.your_address = Some("not-an-address".to_string());
        assert!(config.caller_address().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_config() {
        let content = r#"
            rpc_url = "http://localhost:8545"
            chain_id = 1
            your_address = "0x881c72D1e6317f10a1cDCBe05040E7564E790C80"
            price_api_url = "http://localhost:9000"
            price_api_timeout_secs = 3
        "#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.price_api_timeout_secs, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join("pool-report-config-test.toml");
        let config = Config {
            price_api_timeout_secs: 7,
            ..Config::default()
        };
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
