//! JSON-RPC implementation of `ChainReader`

use alloy_primitives::{Address, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use chrono::Utc;
use eyre::{eyre, Result, WrapErr};
use tracing::{debug, info, warn};

use super::contracts::{IBalancerPool, IERC20, IStakingRewards};
use super::rewards::reward_snapshot;
use super::ChainReader;
use crate::metrics::RewardSnapshot;

/// Reads contract state over HTTP through a single provider
pub struct RpcReader {
    provider: DynProvider,
}

impl RpcReader {
    /// Build the provider. No request is sent yet.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new().connect_http(rpc_url.parse()?).erased();

        Ok(Self { provider })
    }

    /// Fail unless the node is on `expected` chain
    pub async fn verify_chain(&self, expected: u64) -> Result<u64> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .wrap_err("Failed to reach RPC endpoint")?;

        if chain_id != expected {
            return Err(eyre!(
                "RPC endpoint is on chain {} but the pool contracts live on chain {}",
                chain_id,
                expected
            ));
        }

        debug!("Connected to chain {}", chain_id);
        Ok(chain_id)
    }

    /// The configured address, else the node's first unlocked account
    pub async fn resolve_caller(&self, configured: Option<Address>) -> Result<Address> {
        if let Some(address) = configured {
            return Ok(address);
        }

        let accounts = self
            .provider
            .get_accounts()
            .await
            .wrap_err("Failed to list node accounts")?;

        match accounts.first() {
            Some(address) => {
                info!("Using node account {:?}", address);
                Ok(*address)
            }
            None => {
                warn!("Node exposes no accounts");
                Err(eyre!("No YOUR_ADDRESS configured and the node exposes no accounts"))
            }
        }
    }

    /// Single `eth_call`, decoded
    async fn call<C: SolCall>(&self, target: Address, call: C) -> Result<C::Return> {
        let tx = TransactionRequest::default()
            .to(target)
            .input(call.abi_encode().into());

        let result = self
            .provider
            .call(tx)
            .await
            .map_err(|e| eyre!("{} on {:?} failed: {}", C::SIGNATURE, target, e))?;

        C::abi_decode_returns(&result)
            .map_err(|e| eyre!("Failed to decode {} from {:?}: {}", C::SIGNATURE, target, e))
    }
}

impl ChainReader for RpcReader {
    async fn total_supply(&self, pool: Address) -> Result<U256> {
        let supply = self.call(pool, IBalancerPool::totalSupplyCall {}).await?;
        debug!("totalSupply({:?}) = {}", pool, supply);
        Ok(supply)
    }

    async fn pool_balance(&self, pool: Address, token: Address) -> Result<U256> {
        let balance = self.call(pool, IBalancerPool::getBalanceCall { token }).await?;
        debug!("getBalance({:?}) on {:?} = {}", token, pool, balance);
        Ok(balance)
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        let balance = self.call(token, IERC20::balanceOfCall { account: owner }).await?;
        debug!("balanceOf({:?}) on {:?} = {}", owner, token, balance);
        Ok(balance)
    }

    async fn staked_balance(&self, staking: Address, owner: Address) -> Result<U256> {
        self.call(staking, IStakingRewards::balanceOfCall { account: owner })
            .await
    }

    async fn weekly_reward(&self, staking: Address) -> Result<RewardSnapshot> {
        let reward_rate = self.call(staking, IStakingRewards::rewardRateCall {}).await?;
        let period_finish = self.call(staking, IStakingRewards::periodFinishCall {}).await?;

        let snapshot = reward_snapshot(reward_rate, period_finish, Utc::now());
        if snapshot.weekly_emission.raw.is_zero() {
            warn!("Reward period of {:?} has finished", staking);
        }

        Ok(snapshot)
    }
}
