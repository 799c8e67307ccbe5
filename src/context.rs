//! Connection context shared by one report run

use alloy_primitives::Address;
use eyre::Result;
use tracing::info;

use crate::config::Config;
use crate::price_feed::CoinGeckoFeed;
use crate::reader::RpcReader;

/// Chain reader, price feed and the address being reported on.
/// Built once at startup and passed by reference.
pub struct ReportContext<R, F> {
    pub reader: R,
    pub feed: F,
    pub caller: Address,
}

impl<R, F> ReportContext<R, F> {
    pub fn new(reader: R, feed: F, caller: Address) -> Self {
        Self { reader, feed, caller }
    }
}

impl ReportContext<RpcReader, CoinGeckoFeed> {
    /// Connect to the configured endpoints and resolve the caller
    pub async fn connect(config: &Config) -> Result<Self> {
        let reader = RpcReader::new(&config.rpc_url)?;
        let chain_id = reader.verify_chain(config.chain_id).await?;
        let caller = reader.resolve_caller(config.caller_address()?).await?;

        let feed = CoinGeckoFeed::new(&config.price_api_url, config.price_api_timeout_secs)?;

        info!("Connected to chain {} as {}", chain_id, caller);
        Ok(Self::new(reader, feed, caller))
    }
}
