//! Token and contract definitions for the mUSD/USDC Balancer pool report
//!
//! CRITICAL: All addresses are for Ethereum Mainnet.

use alloy_primitives::{address, Address};

/// Represents a token the report reads or prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: &'static str,
    pub address: Address,
    pub decimals: u8,
    /// CoinGecko asset id, if the token is priced
    pub price_id: Option<&'static str>,
}

// ============================================
// POOL TOKENS
// ============================================

/// mUSD/USDC Balancer pool share token (the pool contract itself)
pub const BPT: Token = Token {
    symbol: "BPT",
    address: address!("72Cd8f4504941Bf8c5a21d1Fd83A96499FD71d2C"),
    decimals: 18,
    price_id: None,
};

/// Asset A of the pool
pub const USDC: Token = Token {
    symbol: "USDC",
    address: address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
    decimals: 6,
    price_id: Some("usd-coin"),
};

/// Asset B of the pool
pub const MUSD: Token = Token {
    symbol: "mUSD",
    address: address!("e2f2a5C287993345a840Db3B0845fbC70f5935a5"),
    decimals: 18,
    price_id: Some("musd"),
};

/// Reward token paid by the staking contract
pub const MTA: Token = Token {
    symbol: "MTA",
    address: address!("a3BeD4E1c75D00fa6f4E5E6922DB7261B5E9AcD2"),
    decimals: 18,
    price_id: Some("meta"),
};

// ============================================
// CONTRACTS
// ============================================

/// mStable rewards contract holding staked BPT
pub const BPT_STAKING_POOL: Address = address!("881c72D1e6317f10a1cDCBe05040E7564E790C80");

/// Seconds in a reward week
pub const SECONDS_PER_WEEK: u64 = 604_800;

/// Asset ids to request from the price feed, in request order
pub fn price_ids() -> Vec<&'static str> {
    [MUSD, MTA, USDC].iter().filter_map(|t| t.price_id).collect()
}
