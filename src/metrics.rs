//! Pool, reward and derived position metrics
//!
//! Everything here is a pure function of one run's snapshots. Divisions are
//! plain `f64` divisions: an empty pool or an empty staking contract yields
//! `inf`/`NaN`, which the report prints as-is.

use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};

use crate::amount::TokenAmount;
use crate::price_feed::PriceSnapshot;
use crate::tokens::{MTA, MUSD, USDC};

/// Days per reward week
pub const DAYS_PER_WEEK: f64 = 7.0;

/// Weeks per year for the naive APY
pub const WEEKS_PER_YEAR: f64 = 52.0;

/// Raw pool and staking balances read in one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// BPT issued by the pool
    pub total_shares: TokenAmount,
    /// BPT held by the staking contract
    pub total_staked: TokenAmount,
    /// BPT staked by the caller
    pub your_shares: TokenAmount,
    /// USDC reserve
    pub reserve_a: TokenAmount,
    /// mUSD reserve
    pub reserve_b: TokenAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardSnapshot {
    /// MTA emitted over the coming week
    pub weekly_emission: TokenAmount,
    /// End of the current reward period, when known
    pub period_finish: Option<DateTime<Utc>>,
}

/// USD prices of the pool assets and the reward token
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetPrices {
    pub asset_a: f64,
    pub asset_b: f64,
    pub reward: f64,
}

impl AssetPrices {
    pub fn from_snapshot(prices: &PriceSnapshot) -> Result<Self> {
        Ok(Self {
            asset_a: prices.usd(price_id(USDC.price_id)?)?,
            asset_b: prices.usd(price_id(MUSD.price_id)?)?,
            reward: prices.usd(price_id(MTA.price_id)?)?,
        })
    }
}

fn price_id(id: Option<&'static str>) -> Result<&'static str> {
    id.ok_or_else(|| eyre::eyre!("Token has no price id"))
}

/// Everything the report prints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    pub total_shares: f64,
    pub total_staked: f64,
    pub your_shares: f64,
    pub weekly_reward: f64,
    pub prices: AssetPrices,

    pub asset_a_per_share: f64,
    pub asset_b_per_share: f64,
    pub reward_per_share: f64,
    pub share_price: f64,
    pub your_stake_percent: f64,
    pub weekly_estimate: f64,
    pub weekly_roi_percent: f64,
}

impl DerivedMetrics {
    /// Scale the raw snapshots and derive the position metrics
    pub fn compute(
        pool: &PoolSnapshot,
        reward: &RewardSnapshot,
        prices: AssetPrices,
    ) -> Result<Self> {
        let total_shares = pool.total_shares.to_f64().wrap_err("total BPT supply")?;
        let total_staked = pool.total_staked.to_f64().wrap_err("total staked BPT")?;
        let your_shares = pool.your_shares.to_f64().wrap_err("your staked BPT")?;
        let total_asset_a = pool.reserve_a.to_f64().wrap_err("USDC reserve")?;
        let total_asset_b = pool.reserve_b.to_f64().wrap_err("mUSD reserve")?;
        let weekly_reward = reward.weekly_emission.to_f64().wrap_err("weekly reward")?;

        let asset_a_per_share = total_asset_a / total_shares;
        let asset_b_per_share = total_asset_b / total_shares;
        let reward_per_share = weekly_reward / total_staked;
        let share_price =
            share_price(asset_a_per_share, asset_b_per_share, prices.asset_a, prices.asset_b);

        Ok(Self {
            total_shares,
            total_staked,
            your_shares,
            weekly_reward,
            prices,
            asset_a_per_share,
            asset_b_per_share,
            reward_per_share,
            share_price,
            your_stake_percent: your_shares * 100.0 / total_staked,
            weekly_estimate: reward_per_share * your_shares,
            weekly_roi_percent: (reward_per_share * prices.reward) * 100.0 / share_price,
        })
    }

    pub fn daily_estimate(&self) -> f64 {
        daily(self.weekly_estimate)
    }

    pub fn daily_reward(&self) -> f64 {
        daily(self.weekly_reward)
    }

    pub fn daily_roi_percent(&self) -> f64 {
        daily(self.weekly_roi_percent)
    }

    pub fn apy_percent(&self) -> f64 {
        annualize(self.weekly_roi_percent)
    }
}

/// USD value of one share from its per-share asset amounts
pub fn share_price(a_per_share: f64, b_per_share: f64, price_a: f64, price_b: f64) -> f64 {
    a_per_share * price_a + b_per_share * price_b
}

pub fn daily(weekly: f64) -> f64 {
    weekly / DAYS_PER_WEEK
}

/// Simple, not compounded
pub fn annualize(weekly: f64) -> f64 {
    weekly * WEEKS_PER_YEAR
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::amount::units;

    pub(crate) fn reference_pool() -> PoolSnapshot {
        PoolSnapshot {
            total_shares: TokenAmount::new(units(1_000, 18), 18),
            total_staked: TokenAmount::new(units(800, 18), 18),
            your_shares: TokenAmount::new(units(80, 18), 18),
            reserve_a: TokenAmount::new(units(500_000, 6), 6),
            reserve_b: TokenAmount::new(units(450_000, 18), 18),
        }
    }

    pub(crate) fn reference_reward() -> RewardSnapshot {
        RewardSnapshot {
            weekly_emission: TokenAmount::new(units(1_000, 18), 18),
            period_finish: None,
        }
    }

    pub(crate) fn reference_prices() -> AssetPrices {
        AssetPrices { asset_a: 1.0, asset_b: 1.0, reward: 0.5 }
    }

    #[test]
    fn test_reference_position() {
        let m = DerivedMetrics::compute(&reference_pool(), &reference_reward(), reference_prices())
            .unwrap();

        assert_eq!(m.asset_a_per_share, 500.0);
        assert_eq!(m.asset_b_per_share, 450.0);
        assert_eq!(m.share_price, 950.0);
        assert_eq!(m.your_stake_percent, 10.0);
        assert_eq!(m.reward_per_share, 1.25);
        assert_eq!(m.weekly_estimate, 100.0);
        assert_eq!(m.weekly_estimate * m.prices.reward, 50.0);
        assert!((m.weekly_roi_percent - 0.0658).abs() < 0.0001);
    }

    #[test]
    fn test_share_price_identity() {
        let m = DerivedMetrics::compute(
            &reference_pool(),
            &reference_reward(),
            AssetPrices { asset_a: 0.998, asset_b: 1.013, reward: 2.4 },
        )
        .unwrap();

        assert_eq!(
            m.share_price,
            m.asset_a_per_share * 0.998 + m.asset_b_per_share * 1.013
        );
    }

    #[test]
    fn test_daily_and_annual() {
        for weekly in [0.0, 0.0658, 1.5, 123.456, -3.0] {
            assert_eq!(daily(weekly), weekly / 7.0);
            assert_eq!(annualize(weekly), weekly * 52.0);
        }

        let m = DerivedMetrics::compute(&reference_pool(), &reference_reward(), reference_prices())
            .unwrap();
        assert_eq!(m.daily_roi_percent(), m.weekly_roi_percent / 7.0);
        assert_eq!(m.apy_percent(), m.weekly_roi_percent * 52.0);
        assert_eq!(m.daily_estimate(), 100.0 / 7.0);
        assert_eq!(m.daily_reward(), 1_000.0 / 7.0);
    }

    proptest::proptest! {
        #[test]
        fn test_daily_and_annual_hold_for_any_weekly(weekly in proptest::num::f64::ANY) {
            let d = daily(weekly);
            let a = annualize(weekly);
            proptest::prop_assert!(d == weekly / 7.0 || (d.is_nan() && weekly.is_nan()));
            proptest::prop_assert!(a == weekly * 52.0 || (a.is_nan() && weekly.is_nan()));
        }

        #[test]
        fn test_roi_figures_follow_weekly_for_any_prices(
            reward_price in 0.0f64..1_000.0,
            usdc_price in 0.5f64..1.5,
            musd_price in 0.5f64..1.5,
        ) {
            let prices = AssetPrices { asset_a: usdc_price, asset_b: musd_price, reward: reward_price };
            let m = DerivedMetrics::compute(&reference_pool(), &reference_reward(), prices).unwrap();

            proptest::prop_assert_eq!(m.daily_roi_percent(), m.weekly_roi_percent / 7.0);
            proptest::prop_assert_eq!(m.apy_percent(), m.weekly_roi_percent * 52.0);
            proptest::prop_assert_eq!(
                m.share_price,
                m.asset_a_per_share * usdc_price + m.asset_b_per_share * musd_price
            );
        }
    }

    #[test]
    fn test_nothing_staked_is_non_finite() {
        let pool = PoolSnapshot {
            total_staked: TokenAmount::zero(18),
            your_shares: TokenAmount::zero(18),
            ..reference_pool()
        };
        let m = DerivedMetrics::compute(&pool, &reference_reward(), reference_prices()).unwrap();

        assert!(m.reward_per_share.is_infinite());
        assert!(m.your_stake_percent.is_nan());
        assert!(!m.weekly_roi_percent.is_finite());
        // Pool composition is unaffected
        assert_eq!(m.share_price, 950.0);
    }

    #[test]
    fn test_empty_pool_is_non_finite() {
        let pool = PoolSnapshot {
            total_shares: TokenAmount::zero(18),
            ..reference_pool()
        };
        let m = DerivedMetrics::compute(&pool, &reference_reward(), reference_prices()).unwrap();

        assert!(m.asset_a_per_share.is_infinite());
        assert!(m.share_price.is_infinite());
        assert_eq!(m.weekly_roi_percent, 0.0);
    }

    #[test]
    fn test_prices_from_snapshot() {
        let snapshot = PriceSnapshot::from_iter([("musd", 1.01), ("usd-coin", 0.99), ("meta", 0.5)]);
        let prices = AssetPrices::from_snapshot(&snapshot).unwrap();
        assert_eq!(prices, AssetPrices { asset_a: 0.99, asset_b: 1.01, reward: 0.5 });

        let partial = PriceSnapshot::from_iter([("musd", 1.0)]);
        assert!(AssetPrices::from_snapshot(&partial).is_err());
    }
}
