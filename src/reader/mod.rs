//! On-chain reads
//!
//! `ChainReader` is the seam between the report and the chain. The RPC
//! implementation issues one `eth_call` per read; tests substitute fixed
//! values.

mod contracts;
mod rewards;
mod rpc;

pub use rpc::RpcReader;

use alloy_primitives::{Address, U256};
use eyre::Result;

use crate::metrics::RewardSnapshot;

/// Read-only access to the pool, share token and staking contracts
#[allow(async_fn_in_trait)]
pub trait ChainReader {
    /// `pool.totalSupply()`
    async fn total_supply(&self, pool: Address) -> Result<U256>;

    /// `pool.getBalance(token)`
    async fn pool_balance(&self, pool: Address, token: Address) -> Result<U256>;

    /// `token.balanceOf(owner)`
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256>;

    /// `staking.balanceOf(owner)`
    async fn staked_balance(&self, staking: Address, owner: Address) -> Result<U256>;

    /// Current weekly reward emission of the staking contract
    async fn weekly_reward(&self, staking: Address) -> Result<RewardSnapshot>;
}
