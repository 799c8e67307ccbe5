//! Price Feed - CoinGecko API Integration
//!
//! Looks up USD prices for all report assets in one request.
//!
//! API: https://api.coingecko.com/api/v3/simple/price?ids=musd,meta&vs_currencies=usd

use eyre::{eyre, Result, WrapErr};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::debug;

/// Quote currency requested from the API
const VS_CURRENCY: &str = "usd";

// ============================================
// API RESPONSE TYPES
// ============================================

#[derive(Debug, Deserialize)]
struct CoinPrice {
    usd: Option<f64>,
}

/// Parse a `simple/price` body into a snapshot holding exactly `ids`
pub fn parse_price_response(body: &str, ids: &[&str]) -> Result<PriceSnapshot> {
    let response: HashMap<String, CoinPrice> =
        serde_json::from_str(body).wrap_err("Malformed price API response")?;

    let mut prices = BTreeMap::new();
    for id in ids {
        let price = response
            .get(*id)
            .and_then(|coin| coin.usd)
            .ok_or_else(|| eyre!("Price API returned no USD price for '{}'", id))?;
        prices.insert(id.to_string(), price);
    }

    Ok(PriceSnapshot { prices })
}

// ============================================
// PRICE SNAPSHOT
// ============================================

/// USD price per asset id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSnapshot {
    prices: BTreeMap<String, f64>,
}

impl PriceSnapshot {
    pub fn usd(&self, id: &str) -> Result<f64> {
        self.prices
            .get(id)
            .copied()
            .ok_or_else(|| eyre!("No price for '{}'", id))
    }
}

impl<'a> FromIterator<(&'a str, f64)> for PriceSnapshot {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().map(|(id, p)| (id.to_string(), p)).collect(),
        }
    }
}

// ============================================
// PRICE FEED
// ============================================

/// Source of USD prices keyed by asset id
#[allow(async_fn_in_trait)]
pub trait PriceFeed {
    async fn lookup_prices(&self, ids: &[&str]) -> Result<PriceSnapshot>;
}

pub struct CoinGeckoFeed {
    http_client: Client,
    base_url: String,
}

impl CoinGeckoFeed {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .wrap_err("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn price_url(&self, ids: &[&str]) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies={}",
            self.base_url,
            ids.join(","),
            VS_CURRENCY
        )
    }
}

impl PriceFeed for CoinGeckoFeed {
    async fn lookup_prices(&self, ids: &[&str]) -> Result<PriceSnapshot> {
        let url = self.price_url(ids);
        debug!("Fetching prices: {}", url);

        let body = self
            .http_client
            .get(&url)
            .send()
            .await
            .wrap_err("Price API request failed")?
            .error_for_status()
            .wrap_err("Price API returned an error status")?
            .text()
            .await
            .wrap_err("Failed to read price API response")?;

        let snapshot = parse_price_response(&body, ids)?;
        debug!("Fetched {} prices", ids.len());
        Ok(snapshot)
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"musd":{"usd":1.0},"meta":{"usd":0.5},"usd-coin":{"usd":1.001}}"#;

    #[test]
    fn test_parse_response() {
        let snapshot = parse_price_response(BODY, &["musd", "meta", "usd-coin"]).unwrap();
        assert_eq!(snapshot.usd("musd").unwrap(), 1.0);
        assert_eq!(snapshot.usd("meta").unwrap(), 0.5);
        assert_eq!(snapshot.usd("usd-coin").unwrap(), 1.001);
        assert!(snapshot.usd("bitcoin").is_err());
    }

    #[test]
    fn test_missing_id_is_error() {
        let err = parse_price_response(r#"{"musd":{"usd":1.0}}"#, &["musd", "meta"]).unwrap_err();
        assert!(err.to_string().contains("meta"));
    }

    #[test]
    fn test_missing_usd_field_is_error() {
        assert!(parse_price_response(r#"{"meta":{}}"#, &["meta"]).is_err());
    }

    #[test]
    fn test_malformed_body_is_error() {
        assert!(parse_price_response("<html>rate limited</html>", &["meta"]).is_err());
    }

    #[test]
    fn test_price_url() {
        let feed = CoinGeckoFeed::new("https://api.coingecko.com/api/v3/", 5).unwrap();
        assert_eq!(
            feed.price_url(&["musd", "meta", "usd-coin"]),
            "https://api.coingecko.com/api/v3/simple/price?ids=musd,meta,usd-coin&vs_currencies=usd"
        );
    }

    #[test]
    fn test_unreachable_api_is_error() {
        let feed = CoinGeckoFeed::new("http://127.0.0.1:1", 1).unwrap();
        let result = tokio_test::block_on(feed.lookup_prices(&["meta"]));
        assert!(result.is_err());
    }
}
